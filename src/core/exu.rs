//! Interrupt handshake model of the control core's execution unit.
//!
//! The execution pipeline itself is outside the model. This component drives
//! only its interrupt-facing signals: it holds `ir_enable` at a fixed level and
//! acknowledges a request after a configurable number of ticks, recording the
//! id it was given.

use crate::common::error::SimError;
use crate::common::unit::Unit;
use crate::sim::kernel::TickContext;
use crate::sim::register::Register;
use crate::sim::signal::{SignalId, SignalTable};
use crate::soc::intc::{IntcPorts, SelectedId};
use crate::soc::traits::Component;

pub struct IrqConsumer {
    ports: IntcPorts,
    enabled: bool,
    service_delay: u64,
    waited: Register<u64>,
    ack: Register<bool>,
    accepted: Option<SelectedId>,
    served: Vec<SelectedId>,
}

impl IrqConsumer {
    /// Creates a consumer that acknowledges `service_delay` ticks after seeing a request.
    pub fn new(ports: IntcPorts, enabled: bool, service_delay: u64) -> Self {
        Self {
            ports,
            enabled,
            service_delay: service_delay.max(1),
            waited: Register::new("exu_ir_wait"),
            ack: Register::new("exu_ir_ack"),
            accepted: None,
            served: Vec::new(),
        }
    }

    /// Ids acknowledged so far, oldest first.
    pub fn served(&self) -> &[SelectedId] {
        &self.served
    }
}

impl Component for IrqConsumer {
    fn name(&self) -> &str {
        "irq-consumer"
    }

    fn unit(&self) -> Unit {
        Unit::Exu(0)
    }

    fn drives(&self) -> Vec<SignalId> {
        vec![self.ports.ir_ack, self.ports.ir_enable]
    }

    fn evaluate(&self, signals: &mut SignalTable, _ctx: &TickContext) -> Result<(), SimError> {
        signals.drive_bit(self.ports.ir_enable, self.enabled);
        signals.drive_bit(self.ports.ir_ack, self.ack.read_or(false));
        Ok(())
    }

    fn clock(&mut self, signals: &SignalTable, ctx: &TickContext) {
        if !ctx.reset && !self.ack.is_defined() {
            return;
        }
        if ctx.reset {
            self.waited.stage(0);
            self.ack.stage(false);
            return;
        }

        let request = signals.get_bit(self.ports.ir_request);
        if request && !self.ack.read_or(false) {
            let waited = self.waited.read_or(0) + 1;
            if waited >= self.service_delay {
                let id = SelectedId::decode(signals.get(self.ports.ir_id), self.ports.id_width);
                log::debug!("tick {}: exu0 acknowledges interrupt {}", ctx.tick, id.index());
                self.accepted = Some(id);
                self.ack.stage(true);
                self.waited.stage(0);
            } else {
                self.waited.stage(waited);
            }
        } else {
            self.ack.stage(false);
            self.waited.stage(0);
        }
    }

    fn commit(&mut self) {
        self.waited.commit();
        self.ack.commit();
        if let Some(id) = self.accepted.take() {
            self.served.push(id);
        }
    }

    fn registers(&self) -> Vec<(&'static str, Option<u64>)> {
        vec![
            (self.waited.name(), self.waited.get()),
            (self.ack.name(), self.ack.get().map(u64::from)),
        ]
    }

    fn as_irq_consumer(&self) -> Option<&IrqConsumer> {
        Some(self)
    }
}

//! Interrupt Controller.
//!
//! Collects external interrupt lines into a pending vector, selects one source
//! by priority, and runs a request/acknowledge handshake with the control
//! core's execution unit.
//!
//! The controller is a Moore machine over three registers: the state, the
//! pending-line vector, and the latched id. [`compute_outputs`] reads only
//! committed register state; [`compute_next`] computes the whole next register
//! state from committed state, inputs, and the reset sample. Both are pure, so
//! re-evaluating them any number of times within a tick is harmless.
//!
//! | State   | Condition                      | Next    | Effect                       |
//! |---------|--------------------------------|---------|------------------------------|
//! | Idle    | any pending line and `enable`  | Pending | latch selected id            |
//! | Idle    | otherwise                      | Idle    | latch selected id            |
//! | Pending | `ack`                          | Handled |                              |
//! | Pending | otherwise                      | Pending |                              |
//! | Handled | always                         | Idle    | clear the latched line       |
//! | any     | `reset`                        | Idle    | clear pending and latched id |

use crate::common::bits::width_mask;
use crate::common::error::SimError;
use crate::common::unit::Unit;
use crate::sim::kernel::TickContext;
use crate::sim::register::Register;
use crate::sim::signal::{SignalId, SignalTable};
use crate::soc::interconnect::NetlistBuilder;
use crate::soc::traits::Component;
use serde::Serialize;

/// Controller state register values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum IntcState {
    #[default]
    Idle,
    Pending,
    Handled,
}

impl IntcState {
    /// Encoding used in traces.
    pub fn encode(self) -> u64 {
        match self {
            IntcState::Idle => 0,
            IntcState::Pending => 1,
            IntcState::Handled => 2,
        }
    }
}

/// An arbitrated interrupt source: line index plus a valid flag.
///
/// The index is only meaningful when at least one line was set at selection
/// time; otherwise it is 0 and `valid` is false.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SelectedId {
    index: u32,
    valid: bool,
}

impl SelectedId {
    /// No line selected.
    pub const NONE: SelectedId = SelectedId {
        index: 0,
        valid: false,
    };

    pub fn new(index: u32) -> Self {
        Self { index, valid: true }
    }

    pub fn index(self) -> u32 {
        self.index
    }

    pub fn is_valid(self) -> bool {
        self.valid
    }

    /// Packs the id into a consumer field of `field_width` bits.
    ///
    /// The index occupies the low bits and the valid flag the field's MSB.
    pub fn encode(self, field_width: u32) -> u64 {
        let valid = if self.valid { 1u64 << (field_width - 1) } else { 0 };
        valid | self.index as u64
    }

    /// Unpacks an id field produced by [`SelectedId::encode`].
    pub fn decode(raw: u64, field_width: u32) -> Self {
        let valid_bit = 1u64 << (field_width - 1);
        Self {
            index: (raw & (valid_bit - 1)) as u32,
            valid: raw & valid_bit != 0,
        }
    }
}

/// Selects the lowest-numbered set line among the low `lines` bits of `vector`.
///
/// Lower line numbers have higher priority.
pub fn select(vector: u64, lines: u32) -> SelectedId {
    let v = vector & width_mask(lines);
    if v == 0 {
        SelectedId::NONE
    } else {
        SelectedId::new(v.trailing_zeros())
    }
}

/// Committed register state of the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IntcRegs {
    pub state: IntcState,
    /// Unserviced interrupt lines.
    pub pending: u64,
    pub latched: SelectedId,
}

impl IntcRegs {
    /// Values forced by reset.
    pub const RESET: IntcRegs = IntcRegs {
        state: IntcState::Idle,
        pending: 0,
        latched: SelectedId::NONE,
    };
}

/// Inputs sampled by the controller each tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntcInputs {
    pub ex_int: u64,
    pub ack: bool,
    pub enable: bool,
}

/// Outputs toward the consumer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntcOutputs {
    pub request: bool,
    pub id: SelectedId,
}

/// Moore outputs: `request` while Pending, `id` from the latched register.
pub fn compute_outputs(regs: &IntcRegs) -> IntcOutputs {
    IntcOutputs {
        request: regs.state == IntcState::Pending,
        id: regs.latched,
    }
}

/// Next register state for one clock edge.
///
/// Reset dominates every other input combination.
pub fn compute_next(regs: &IntcRegs, inputs: &IntcInputs, reset: bool, lines: u32) -> IntcRegs {
    if reset {
        return IntcRegs::RESET;
    }

    let mut pending = (regs.pending | inputs.ex_int) & width_mask(lines);
    let mut latched = regs.latched;
    let mut state = regs.state;

    match regs.state {
        IntcState::Idle => {
            latched = select(pending, lines);
            if pending != 0 && inputs.enable {
                state = IntcState::Pending;
            }
        }
        IntcState::Pending => {
            if inputs.ack {
                state = IntcState::Handled;
            }
        }
        IntcState::Handled => {
            pending &= !(1u64 << latched.index());
            state = IntcState::Idle;
        }
    }

    IntcRegs {
        state,
        pending,
        latched,
    }
}

/// Signals connecting the controller to the pins and the control core.
#[derive(Clone, Debug)]
pub struct IntcPorts {
    pub ex_int: SignalId,
    pub ir_request: SignalId,
    pub ir_id: SignalId,
    pub ir_ack: SignalId,
    pub ir_enable: SignalId,
    /// Number of external interrupt lines (W).
    pub lines: u32,
    /// Width of the consumer's id field.
    pub id_width: u32,
}

impl IntcPorts {
    pub(crate) fn declare(b: &mut NetlistBuilder, lines: u32, id_width: u32) -> Self {
        let cepu = [Unit::Exu(0)];
        Self {
            ex_int: b.connect("ex_int", lines, Unit::Top, &[Unit::Intc]),
            ir_request: b.connect("ir_request", 1, Unit::Intc, &cepu),
            ir_id: b.connect("ir_id", id_width, Unit::Intc, &cepu),
            ir_ack: b.connect("ir_ack", 1, Unit::Exu(0), &[Unit::Intc]),
            ir_enable: b.connect("ir_enable", 1, Unit::Exu(0), &[Unit::Intc]),
            lines,
            id_width,
        }
    }
}

/// The clocked interrupt controller component.
pub struct InterruptController {
    ports: IntcPorts,
    state: Register<IntcState>,
    pending: Register<u64>,
    latched: Register<SelectedId>,
}

impl InterruptController {
    pub fn new(ports: IntcPorts) -> Self {
        Self {
            ports,
            state: Register::new("state"),
            pending: Register::new("irq_reg"),
            latched: Register::new("id_reg"),
        }
    }

    /// Committed register state, or `None` before the first reset.
    pub fn snapshot(&self) -> Option<IntcRegs> {
        Some(IntcRegs {
            state: self.state.get()?,
            pending: self.pending.get()?,
            latched: self.latched.get()?,
        })
    }

    fn regs(&self) -> IntcRegs {
        IntcRegs {
            state: self.state.read_or(IntcState::Idle),
            pending: self.pending.read_or(0),
            latched: self.latched.read_or(SelectedId::NONE),
        }
    }

    fn inputs(&self, signals: &SignalTable) -> IntcInputs {
        IntcInputs {
            ex_int: signals.get(self.ports.ex_int),
            ack: signals.get_bit(self.ports.ir_ack),
            enable: signals.get_bit(self.ports.ir_enable),
        }
    }
}

impl Component for InterruptController {
    fn name(&self) -> &str {
        "intc"
    }

    fn unit(&self) -> Unit {
        Unit::Intc
    }

    fn drives(&self) -> Vec<SignalId> {
        vec![self.ports.ir_request, self.ports.ir_id]
    }

    fn evaluate(&self, signals: &mut SignalTable, _ctx: &TickContext) -> Result<(), SimError> {
        let out = compute_outputs(&self.regs());
        signals.drive_bit(self.ports.ir_request, out.request);
        signals.drive(self.ports.ir_id, out.id.encode(self.ports.id_width));
        Ok(())
    }

    fn clock(&mut self, signals: &SignalTable, ctx: &TickContext) {
        // Only a reset edge gives undefined registers a value.
        if !ctx.reset && !self.state.is_defined() {
            return;
        }

        let regs = self.regs();
        let next = compute_next(&regs, &self.inputs(signals), ctx.reset, self.ports.lines);

        if next.state != regs.state {
            log::debug!(
                "tick {}: intc {:?} -> {:?} (id {}, pending {:#x})",
                ctx.tick,
                regs.state,
                next.state,
                next.latched.index(),
                next.pending
            );
        }

        self.state.stage(next.state);
        self.pending.stage(next.pending);
        self.latched.stage(next.latched);
    }

    fn commit(&mut self) {
        self.state.commit();
        self.pending.commit();
        self.latched.commit();
    }

    fn registers(&self) -> Vec<(&'static str, Option<u64>)> {
        let width = self.ports.id_width;
        vec![
            (self.state.name(), self.state.get().map(IntcState::encode)),
            (self.pending.name(), self.pending.get()),
            (self.latched.name(), self.latched.get().map(|id| id.encode(width))),
        ]
    }

    fn as_intc(&self) -> Option<&InterruptController> {
        Some(self)
    }
}

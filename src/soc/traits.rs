//! System-on-Chip Traits.
//!
//! This module defines the interface every clocked component of the SoC
//! implements. A component owns its registers and a fixed set of output
//! signals; the kernel drives it through the two phases of a tick.

use crate::common::error::SimError;
use crate::common::unit::Unit;
use crate::core::exu::IrqConsumer;
use crate::sim::kernel::TickContext;
use crate::sim::signal::{SignalId, SignalTable};
use crate::soc::intc::InterruptController;
use crate::soc::memory::BusSlave;
use crate::soc::stub::BoundaryStub;

/// A clocked unit taking part in the settle/commit cycle.
///
/// `evaluate` is the combinational half: it drives the component's outputs
/// from committed register state and current inputs, and must be idempotent.
/// `clock` is the sequential half: it stages next register values from the
/// settled signals. `commit` makes the staged values visible.
pub trait Component {
    /// Returns the user-friendly name of the component.
    fn name(&self) -> &str;

    /// The unit this component stands for in the binding table.
    fn unit(&self) -> Unit;

    /// Signals this component drives during `evaluate`.
    ///
    /// Checked against the binding table when the SoC is built.
    fn drives(&self) -> Vec<SignalId>;

    /// Recomputes combinational outputs. Must not touch registers.
    fn evaluate(&self, signals: &mut SignalTable, ctx: &TickContext) -> Result<(), SimError>;

    /// Stages next register values from the settled signals.
    fn clock(&mut self, _signals: &SignalTable, _ctx: &TickContext) {}

    /// Makes staged register values visible.
    fn commit(&mut self) {}

    /// Current register values for tracing; `None` marks an undefined register.
    fn registers(&self) -> Vec<(&'static str, Option<u64>)> {
        Vec::new()
    }

    /// Downcasts the component to the interrupt controller if applicable.
    fn as_intc(&self) -> Option<&InterruptController> {
        None
    }

    /// Downcasts the component to a boundary stub if applicable.
    ///
    /// Used by the harness API to assign values to unmodeled units' outputs.
    fn as_stub_mut(&mut self) -> Option<&mut BoundaryStub> {
        None
    }

    /// Downcasts the component to the bus slave model if applicable.
    fn as_bus_slave(&self) -> Option<&BusSlave> {
        None
    }

    /// Downcasts the component to the interrupt consumer model if applicable.
    fn as_irq_consumer(&self) -> Option<&IrqConsumer> {
        None
    }
}

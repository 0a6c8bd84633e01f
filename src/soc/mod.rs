//! System-on-Chip composition.
//!
//! The interrupt controller, the interconnect binding table, the bus
//! interface adapter, the harness-side bus slave, and the builder that wires
//! them into one clock/reset domain.

pub mod builder;
pub mod busif;
pub mod intc;
pub mod interconnect;
pub mod memory;
pub mod stub;
pub mod traits;

pub use builder::{Soc, SocBuilder};
pub use intc::{InterruptController, IntcRegs, IntcState, SelectedId};
pub use interconnect::{Interconnect, Netlist, NetlistBuilder};
pub use traits::Component;

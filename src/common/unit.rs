//! Component Identities.
//!
//! Every signal in the binding table names exactly one producing unit and any
//! number of consuming units. Per-core units carry the core index; core 0 is
//! the privileged control core.

use serde::Serialize;
use std::fmt;

/// Identity of a producer or consumer in the SoC composition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Top-level pins, driven by the environment (testbench, board).
    Top,
    /// Interrupt controller.
    Intc,
    /// Bus interface adapter between the memory unit and the master bus.
    BusIf,
    /// Shared memory unit.
    Memu,
    /// Debug module.
    Dm,
    /// Debug transport module (JTAG).
    Dtm,
    /// Instruction fetch unit of a core.
    Ifu(usize),
    /// Execution unit of a core.
    Exu(usize),
    /// Load-store unit of a core.
    Lsu(usize),
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Top => write!(f, "top"),
            Unit::Intc => write!(f, "intc"),
            Unit::BusIf => write!(f, "busif"),
            Unit::Memu => write!(f, "memu"),
            Unit::Dm => write!(f, "dm"),
            Unit::Dtm => write!(f, "dtm"),
            Unit::Ifu(i) => write!(f, "ifu{}", i),
            Unit::Exu(i) => write!(f, "exu{}", i),
            Unit::Lsu(i) => write!(f, "lsu{}", i),
        }
    }
}

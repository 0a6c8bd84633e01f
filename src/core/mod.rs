//! Per-core structure.
//!
//! Each core contributes a bundle of ports to the interconnect. The units
//! behind those ports (fetch, execute, load-store) are external collaborators;
//! only the execution unit's interrupt handshake has a model here.

/// Port bundles belonging to one core.
pub mod bundle;

/// Interrupt handshake model of the control core's execution unit.
pub mod exu;

pub use bundle::CoreBundle;
pub use exu::IrqConsumer;

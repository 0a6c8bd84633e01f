//! Common utilities and types used throughout the SoC model.
//!
//! This module provides the fundamental types shared by the signal substrate,
//! the interconnect, and the individual components: unit identities, bus
//! access classification, bit-vector helpers, and the error taxonomy.

/// Bit-vector helpers (masks, id field widths).
pub mod bits;

/// Bus access type definitions.
pub mod data;

/// Error types for configuration, wiring, and simulation.
pub mod error;

/// Component identities used by the binding table.
pub mod unit;

pub use bits::{id_field_width, index_bits, width_mask};
pub use data::AccessType;
pub use error::{ConfigError, SimError, SocError, WiringError};
pub use unit::Unit;

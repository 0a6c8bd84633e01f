//! Error Taxonomy.
//!
//! Configuration and wiring errors are detected while the SoC is being
//! constructed and prevent instantiation. Simulation errors are raised only
//! for conditions outside the supported envelope (combinational loops,
//! unsupported bus responses); the control logic itself has no failure path.

use crate::common::unit::Unit;
use thiserror::Error;

/// Invalid build-time parameters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Core count outside the supported range.
    #[error("core count must be between 1 and {max}, got {got}")]
    CoreCount { got: usize, max: usize },

    /// Interrupt line count outside the supported range.
    #[error("external interrupt line count must be between 1 and {max}, got {got}")]
    InterruptLines { got: u32, max: u32 },

    /// The consumer's id field cannot encode every interrupt source.
    #[error("{lines} interrupt lines need a {needed}-bit id field, consumer provides {available}")]
    IdWidth {
        lines: u32,
        needed: u32,
        available: u32,
    },

    /// Master bus data width not supported.
    #[error("bus interface width must be 32 or 64 bits, got {0}")]
    BusWidth(u32),

    /// Slave latency of zero cycles.
    #[error("memory latency must be at least one cycle")]
    Latency,

    /// Configuration file could not be read or parsed.
    #[error("failed to load configuration: {0}")]
    Load(String),
}

/// Violations of the single-producer binding discipline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WiringError {
    /// A signal was declared with two different producers.
    #[error("signal '{signal}' has multiple drivers: {first} and {second}")]
    MultipleDrivers {
        signal: String,
        first: Unit,
        second: Unit,
    },

    /// A signal name was declared twice by the same producer.
    #[error("signal '{0}' declared more than once")]
    Duplicate(String),

    /// Width is zero or exceeds 64 bits.
    #[error("signal '{signal}' has unsupported width {width}")]
    Width { signal: String, width: u32 },

    /// Lookup of a name that is not in the binding table.
    #[error("unknown signal '{0}'")]
    UnknownSignal(String),

    /// A component claims a signal owned by another unit.
    #[error("{unit} cannot drive '{signal}', which is produced by {owner}")]
    ForeignDriver {
        unit: Unit,
        signal: String,
        owner: Unit,
    },

    /// The harness tried to assign a signal that a modeled or attached component drives.
    #[error("'{signal}' is driven by {owner} and cannot be assigned by the harness")]
    NotHarnessDriven { signal: String, owner: Unit },
}

/// Runtime conditions outside the supported envelope.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Combinational evaluation kept changing signals.
    #[error("tick {tick}: signals did not settle after {passes} passes (combinational loop?)")]
    Unsettled { tick: u64, passes: usize },

    /// The bus slave terminated a cycle with error or retry.
    #[error("tick {tick}: unsupported bus response (err={error}, rty={retry})")]
    UnsupportedBusResponse { tick: u64, error: bool, retry: bool },

    /// Trace sink failed to accept a snapshot.
    #[error("trace sink failed: {0}")]
    Trace(String),
}

/// Any error surfaced by SoC construction or the harness API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SocError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Wiring(#[from] WiringError),

    #[error(transparent)]
    Sim(#[from] SimError),
}

//! Simulation substrate.
//!
//! Signals and registers, the two-phase settle/commit kernel, diagnostic
//! snapshots, and stimulus scripts for the harness.

/// Settle/commit kernel and per-tick context.
pub mod kernel;

/// Stimulus script loading.
pub mod loader;

/// Clocked state cells.
pub mod register;

/// Single-producer wires and their value table.
pub mod signal;

/// Snapshots and trace sinks.
pub mod trace;

pub use kernel::{Simulator, TickContext, SETTLE_LIMIT};
pub use register::Register;
pub use signal::{SignalId, SignalTable};
pub use trace::{JsonLinesSink, Snapshot, TraceSink};

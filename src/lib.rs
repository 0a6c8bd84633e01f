//! ParaNut SoC Control-Plane Model.
//!
//! This crate models the control logic of a multi-core processor's interrupt
//! subsystem and the structural interconnect binding per-core units to shared
//! resources. Everything runs in one synchronous clock domain: each tick
//! settles all combinational outputs to a fixpoint, then commits every
//! register at the same edge.
//!
//! # Architecture
//!
//! * **Substrate**: single-producer signals and clocked registers.
//! * **Interrupt controller**: three-state priority arbiter with a
//!   request/acknowledge handshake toward the control core.
//! * **Interconnect**: declarative binding table for N cores, validated for
//!   single-producer exclusivity at construction.
//! * **Bus interface adapter**: memory unit handshake to a synchronous bus master.
//!
//! # Modules
//!
//! * `common`: Shared types, unit identities, and error handling.
//! * `config`: Configuration loading and validation.
//! * `core`: Per-core port bundles and the control core's interrupt handshake model.
//! * `sim`: Signal/register substrate, kernel, tracing, stimulus loading.
//! * `soc`: Components and the SoC composition.
//! * `stats`: Run statistics.

/// Shared types, unit identities, bit helpers, and error handling.
pub mod common;

/// Configuration system for build-time SoC parameters.
///
/// Loads TOML configuration files and validates them before any component
/// is instantiated.
pub mod config;

/// Per-core structure.
///
/// Port bundles for each core and a boundary model of the control core's
/// interrupt handshake.
pub mod core;

/// Simulation substrate.
///
/// Signals, registers, the settle/commit kernel, snapshots, and stimulus
/// scripts.
pub mod sim;

/// System-on-Chip components and composition.
///
/// Interrupt controller, interconnect, bus interface adapter, bus slave
/// model, and the builder that ties them together.
pub mod soc;

/// Run statistics collection and reporting.
pub mod stats;

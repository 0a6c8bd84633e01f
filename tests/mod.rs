//! Test module organization.
//!
//! This module organizes all integration tests for the SoC model.

/// Bus interface adapter translation and bus slave transfer tests.
mod busif_tests;

/// Common utility and substrate tests.
mod common_tests;




/// Interrupt controller state machine and priority tests.
mod intc_tests;

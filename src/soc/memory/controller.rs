//! Slave Timing Controller.
//!
//! This module defines the `MemoryController` trait used by the bus slave
//! model to decide how many wait states a transfer takes, and a simple
//! fixed-latency implementation.

/// Trait for slave timing models.
pub trait MemoryController {
    /// Calculates the wait states for a transfer at a specific address.
    ///
    /// # Arguments
    ///
    /// * `addr` - The bus address being accessed.
    ///
    /// # Returns
    ///
    /// The number of ticks the request must be held before `ack` is raised.
    /// Values below 1 are treated as 1.
    fn access_latency(&mut self, addr: u64) -> u64;
}

/// A slave timing model with fixed latency.
///
/// Every transfer takes the same number of ticks regardless of address or
/// direction.
pub struct SimpleController {
    latency: u64,
}

impl SimpleController {
    /// Creates a new SimpleController.
    ///
    /// # Arguments
    ///
    /// * `latency` - The fixed latency in ticks.
    pub fn new(latency: u64) -> Self {
        Self { latency }
    }
}

impl MemoryController for SimpleController {
    fn access_latency(&mut self, _addr: u64) -> u64 {
        self.latency
    }
}

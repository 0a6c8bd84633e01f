//! Signal storage.
//!
//! Signals are the single-writer, multi-reader wires of the model. They hold a
//! value for the current tick only; anything that must survive a clock edge
//! lives in a [`Register`](super::register::Register). The binding table
//! guarantees that every [`SignalId`] has exactly one producer, so the table
//! itself performs no arbitration.

use crate::common::bits::width_mask;
use serde::Serialize;

/// Index of a signal in the binding table and in the [`SignalTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SignalId(pub(crate) u32);

impl SignalId {
    /// Position of the signal in declaration order.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Current values of every signal in the system.
pub struct SignalTable {
    values: Vec<u64>,
    masks: Vec<u64>,
    changed: bool,
}

impl SignalTable {
    /// Creates a table for signals of the given widths, all driven low.
    pub fn new(widths: impl IntoIterator<Item = u32>) -> Self {
        let masks: Vec<u64> = widths.into_iter().map(width_mask).collect();
        Self {
            values: vec![0; masks.len()],
            masks,
            changed: false,
        }
    }

    /// Number of signals in the table.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Reads the current value of a signal.
    #[inline]
    pub fn get(&self, id: SignalId) -> u64 {
        self.values[id.index()]
    }

    /// Reads a single-bit signal.
    #[inline]
    pub fn get_bit(&self, id: SignalId) -> bool {
        self.values[id.index()] & 1 != 0
    }

    /// Drives a signal, truncating the value to the signal's width.
    ///
    /// Records whether the value changed so the settle loop can detect a
    /// fixpoint.
    #[inline]
    pub fn drive(&mut self, id: SignalId, value: u64) {
        let idx = id.index();
        let v = value & self.masks[idx];
        if self.values[idx] != v {
            self.values[idx] = v;
            self.changed = true;
        }
    }

    /// Drives a single-bit signal.
    #[inline]
    pub fn drive_bit(&mut self, id: SignalId, value: bool) {
        self.drive(id, value as u64);
    }

    /// Returns whether any drive changed a value since the last call, and clears the flag.
    pub fn take_changed(&mut self) -> bool {
        std::mem::replace(&mut self.changed, false)
    }
}

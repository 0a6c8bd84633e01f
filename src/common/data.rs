//! Bus Access Types.
//!
//! This module defines the classification of transfers crossing the shared
//! memory unit's ports and the external master bus. Port bundles are either
//! read or write ports, and a single bus cycle is either a read or a write.

/// Direction of a memory transfer.
///
/// Used to distinguish read-port bundles from write-port bundles in the
/// binding table and read cycles from write cycles on the master bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessType {
    /// Data flows from the shared memory unit (or bus slave) to the requester.
    Read,

    /// Data flows from the requester to the shared memory unit (or bus slave).
    Write,
}

impl AccessType {
    /// Classifies a bus cycle from the master's write-enable line.
    pub fn from_write_enable(we: bool) -> Self {
        if we {
            AccessType::Write
        } else {
            AccessType::Read
        }
    }

    /// Short prefix used for port signal names (`rp` / `wp`).
    pub fn port_prefix(self) -> &'static str {
        match self {
            AccessType::Read => "rp",
            AccessType::Write => "wp",
        }
    }
}

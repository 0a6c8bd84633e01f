//! Bus slave model.
//!
//! A generic synchronous slave used by the harness to terminate the bus
//! interface adapter's cycles: a sparse word store behind a wait-state timing
//! model. It only ever terminates with `ack`; `err` and `rty` are held low.

/// Wait-state timing models.
pub mod controller;

use crate::common::bits::width_mask;
use crate::common::data::AccessType;
use crate::common::error::SimError;
use crate::common::unit::Unit;
use crate::sim::kernel::TickContext;
use crate::sim::register::Register;
use crate::sim::signal::{SignalId, SignalTable};
use crate::soc::busif::BusPins;
use crate::soc::traits::Component;
use controller::MemoryController;
use std::collections::HashMap;

/// Sparse word-addressed storage.
pub struct Memory {
    words: HashMap<u64, u64>,
    width_bytes: u64,
    word_mask: u64,
}

impl Memory {
    /// Creates an empty memory with words of `width_bits`.
    pub fn new(width_bits: u32) -> Self {
        Self {
            words: HashMap::new(),
            width_bytes: (width_bits / 8) as u64,
            word_mask: width_mask(width_bits),
        }
    }

    fn key(&self, addr: u64) -> u64 {
        addr / self.width_bytes
    }

    /// Reads the word containing `addr`. Unwritten words read as zero.
    pub fn read(&self, addr: u64) -> u64 {
        self.words.get(&self.key(addr)).copied().unwrap_or(0)
    }

    /// Writes the bytes of `data` enabled by `sel` into the word containing `addr`.
    pub fn write(&mut self, addr: u64, data: u64, sel: u64) {
        let mut mask = 0u64;
        for byte in 0..self.width_bytes {
            if sel & (1 << byte) != 0 {
                mask |= 0xff << (byte * 8);
            }
        }
        let key = self.key(addr);
        let old = self.words.get(&key).copied().unwrap_or(0);
        let new = ((old & !mask) | (data & mask)) & self.word_mask;
        self.words.insert(key, new);
    }
}

#[derive(Clone, Copy, Debug)]
struct PendingWrite {
    addr: u64,
    data: u64,
    sel: u64,
}

/// Slave component attached to the top-level bus pins.
pub struct BusSlave {
    pins: BusPins,
    memory: Memory,
    timing: Box<dyn MemoryController>,
    waited: Register<u64>,
    ack: Register<bool>,
    pending_write: Option<PendingWrite>,
    completed: Option<AccessType>,
    reads: u64,
    writes: u64,
}

impl BusSlave {
    pub fn new(pins: BusPins, width_bits: u32, timing: Box<dyn MemoryController>) -> Self {
        Self {
            pins,
            memory: Memory::new(width_bits),
            timing,
            waited: Register::new("slave_wait"),
            ack: Register::new("slave_ack"),
            pending_write: None,
            completed: None,
            reads: 0,
            writes: 0,
        }
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Completed read and write transfers.
    pub fn transfers(&self) -> (u64, u64) {
        (self.reads, self.writes)
    }
}

impl Component for BusSlave {
    fn name(&self) -> &str {
        "bus-slave"
    }

    fn unit(&self) -> Unit {
        Unit::Top
    }

    fn drives(&self) -> Vec<SignalId> {
        vec![self.pins.ack_i, self.pins.err_i, self.pins.rty_i, self.pins.dat_i]
    }

    fn evaluate(&self, signals: &mut SignalTable, _ctx: &TickContext) -> Result<(), SimError> {
        let ack = self.ack.read_or(false);
        signals.drive_bit(self.pins.ack_i, ack);
        signals.drive_bit(self.pins.err_i, false);
        signals.drive_bit(self.pins.rty_i, false);
        let data = if ack { self.memory.read(signals.get(self.pins.adr_o)) } else { 0 };
        signals.drive(self.pins.dat_i, data);
        Ok(())
    }

    fn clock(&mut self, signals: &SignalTable, ctx: &TickContext) {
        if !ctx.reset && !self.ack.is_defined() {
            return;
        }
        if ctx.reset {
            self.waited.stage(0);
            self.ack.stage(false);
            return;
        }

        let active = signals.get_bit(self.pins.cyc_o) && signals.get_bit(self.pins.stb_o);
        let acked = self.ack.read_or(false);
        if active && !acked {
            let addr = signals.get(self.pins.adr_o);
            let waited = self.waited.read_or(0) + 1;
            if waited >= self.timing.access_latency(addr).max(1) {
                let access = AccessType::from_write_enable(signals.get_bit(self.pins.we_o));
                if access == AccessType::Write {
                    self.pending_write = Some(PendingWrite {
                        addr,
                        data: signals.get(self.pins.dat_o),
                        sel: signals.get(self.pins.sel_o),
                    });
                }
                self.completed = Some(access);
                self.ack.stage(true);
                self.waited.stage(0);
            } else {
                self.waited.stage(waited);
            }
        } else {
            self.ack.stage(false);
            self.waited.stage(0);
        }
    }

    fn commit(&mut self) {
        self.waited.commit();
        self.ack.commit();
        if let Some(w) = self.pending_write.take() {
            self.memory.write(w.addr, w.data, w.sel);
        }
        match self.completed.take() {
            Some(AccessType::Read) => self.reads += 1,
            Some(AccessType::Write) => self.writes += 1,
            None => {}
        }
    }

    fn registers(&self) -> Vec<(&'static str, Option<u64>)> {
        vec![
            (self.waited.name(), self.waited.get()),
            (self.ack.name(), self.ack.get().map(u64::from)),
        ]
    }

    fn as_bus_slave(&self) -> Option<&BusSlave> {
        Some(self)
    }
}

//! Simulation Kernel.
//!
//! Advances the whole SoC one clock edge at a time in two phases:
//!
//! 1. **Settle**: every component's `evaluate` runs, repeatedly, until a full
//!    pass leaves every signal unchanged. Registers are not touched.
//! 2. **Commit**: every component stages its next register values from the
//!    settled signals, then every component commits. Because staging never
//!    changes a visible value, no register observes another's new value
//!    before the next tick.
//!
//! The reset pin is sampled after settling and handed to every `clock` call
//! through the [`TickContext`], where it overrides all locally computed next
//! values.

use crate::common::error::SimError;
use crate::sim::signal::{SignalId, SignalTable};
use crate::sim::trace::{RegisterSample, SignalSample, Snapshot};
use crate::soc::interconnect::Netlist;
use crate::soc::traits::Component;
use crate::stats::SimStats;

/// Upper bound on evaluation passes per settle phase.
pub const SETTLE_LIMIT: usize = 64;

/// Per-edge context handed to every component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickContext {
    /// Index of the current tick, starting at 0.
    pub tick: u64,
    /// Reset sampled at this edge.
    pub reset: bool,
}

pub struct Simulator {
    signals: SignalTable,
    components: Vec<Box<dyn Component>>,
    reset: SignalId,
    tick: u64,
    seen_reset: bool,
    warned: bool,
    pub stats: SimStats,
}

impl Simulator {
    /// Creates a kernel over `netlist` with the given components.
    ///
    /// `reset` is the signal sampled as the global reset at each edge.
    pub fn new(netlist: &Netlist, components: Vec<Box<dyn Component>>, reset: SignalId) -> Self {
        Self {
            signals: SignalTable::new(netlist.iter().map(|(_, s)| s.width)),
            components,
            reset,
            tick: 0,
            seen_reset: false,
            warned: false,
            stats: SimStats::default(),
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn signals(&self) -> &SignalTable {
        &self.signals
    }

    pub fn components(&self) -> &[Box<dyn Component>] {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut [Box<dyn Component>] {
        &mut self.components
    }

    fn context(&self) -> TickContext {
        TickContext {
            tick: self.tick,
            reset: self.signals.get_bit(self.reset),
        }
    }

    /// Runs the settle phase to a fixpoint and returns the number of passes.
    pub fn settle(&mut self) -> Result<usize, SimError> {
        let ctx = self.context();
        self.signals.take_changed();

        for pass in 1..=SETTLE_LIMIT {
            for c in &self.components {
                c.evaluate(&mut self.signals, &ctx)?;
            }
            if !self.signals.take_changed() {
                self.stats.record_settle(pass);
                return Ok(pass);
            }
        }

        Err(SimError::Unsettled {
            tick: self.tick,
            passes: SETTLE_LIMIT,
        })
    }

    /// Settles, then commits every register at one clock edge.
    pub fn step(&mut self) -> Result<(), SimError> {
        self.settle()?;
        let ctx = self.context();

        if !ctx.reset && !self.seen_reset && !self.warned {
            log::warn!(
                "tick {}: clocking before the first reset, register state is undefined",
                ctx.tick
            );
            self.warned = true;
        }

        for c in self.components.iter_mut() {
            c.clock(&self.signals, &ctx);
        }
        for c in self.components.iter_mut() {
            c.commit();
        }

        if ctx.reset {
            self.seen_reset = true;
            self.stats.reset_cycles += 1;
        }
        self.stats.cycles += 1;
        self.tick += 1;
        Ok(())
    }

    /// Captures every signal and register. Signals reflect the last settle.
    pub fn snapshot(&self, netlist: &Netlist) -> Snapshot {
        let signals = netlist
            .iter()
            .map(|(id, spec)| SignalSample {
                name: spec.name.clone(),
                producer: spec.producer,
                width: spec.width,
                value: self.signals.get(id),
            })
            .collect();

        let registers = self
            .components
            .iter()
            .flat_map(|c| {
                let unit = c.unit();
                c.registers()
                    .into_iter()
                    .map(move |(name, value)| RegisterSample {
                        unit,
                        name: name.to_string(),
                        value,
                    })
            })
            .collect();

        Snapshot {
            tick: self.tick,
            signals,
            registers,
        }
    }
}

//! SoC Interconnect.
//!
//! This module implements the structural binding of every unit in the SoC:
//! per-core fetch/execute/load-store bundles, the memory unit's read and
//! write ports, the control core's broadcast lanes, the interrupt nets, the
//! bus interface, and the debug transport. The binding table is declarative.
//! Each signal names one producer and its consumers; routing at run time is
//! nothing more than producer and consumers sharing the same [`SignalId`].
//!
//! The single-producer discipline is checked once in [`NetlistBuilder::build`].
//! Nothing on the per-tick path re-checks it.

use crate::common::error::WiringError;
use crate::common::unit::Unit;
use crate::config::SocConfig;
use crate::core::bundle::{CoreBundle, WORD_WIDTH};
use crate::sim::signal::SignalId;
use crate::soc::busif::BusPorts;
use crate::soc::intc::IntcPorts;
use std::collections::{BTreeMap, HashMap};

/// Address width of the debug module interface.
pub const DMI_ADDR_WIDTH: u32 = 6;

/// One row of the binding table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignalSpec {
    /// Unique signal name, e.g. `rp_adr[3]`.
    pub name: String,
    /// Width in bits (1..=64).
    pub width: u32,
    /// The only unit allowed to drive the signal.
    pub producer: Unit,
    /// Units reading the signal. May be empty for unobserved outputs.
    pub consumers: Vec<Unit>,
}

/// Collects signal declarations and validates them into a [`Netlist`].
#[derive(Default)]
pub struct NetlistBuilder {
    specs: Vec<SignalSpec>,
}

impl NetlistBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a signal and returns the id it will have in the built netlist.
    pub fn connect(
        &mut self,
        name: impl Into<String>,
        width: u32,
        producer: Unit,
        consumers: &[Unit],
    ) -> SignalId {
        let id = SignalId(self.specs.len() as u32);
        self.specs.push(SignalSpec {
            name: name.into(),
            width,
            producer,
            consumers: consumers.to_vec(),
        });
        id
    }

    /// Validates the declarations.
    ///
    /// Fails on the first signal with a second producer, a repeated
    /// declaration, or an unsupported width.
    pub fn build(self) -> Result<Netlist, WiringError> {
        let mut by_name: HashMap<String, SignalId> = HashMap::with_capacity(self.specs.len());

        for (i, spec) in self.specs.iter().enumerate() {
            if spec.width == 0 || spec.width > 64 {
                return Err(WiringError::Width {
                    signal: spec.name.clone(),
                    width: spec.width,
                });
            }
            if let Some(prev) = by_name.get(&spec.name) {
                let first = self.specs[prev.index()].producer;
                if first != spec.producer {
                    return Err(WiringError::MultipleDrivers {
                        signal: spec.name.clone(),
                        first,
                        second: spec.producer,
                    });
                }
                return Err(WiringError::Duplicate(spec.name.clone()));
            }
            by_name.insert(spec.name.clone(), SignalId(i as u32));
        }

        Ok(Netlist {
            specs: self.specs,
            by_name,
        })
    }
}

/// Per-unit connection counts, for static analysis reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FanStats {
    /// Signals this unit produces.
    pub produced: usize,
    /// Signals this unit consumes.
    pub consumed: usize,
}

/// A validated binding table: every name maps to exactly one producer.
#[derive(Clone, Debug)]
pub struct Netlist {
    specs: Vec<SignalSpec>,
    by_name: HashMap<String, SignalId>,
}

impl Netlist {
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Resolves a signal by name.
    pub fn id(&self, name: &str) -> Result<SignalId, WiringError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| WiringError::UnknownSignal(name.to_string()))
    }

    pub fn spec(&self, id: SignalId) -> &SignalSpec {
        &self.specs[id.index()]
    }

    pub fn name(&self, id: SignalId) -> &str {
        &self.specs[id.index()].name
    }

    pub fn producer(&self, id: SignalId) -> Unit {
        self.specs[id.index()].producer
    }

    pub fn consumers(&self, id: SignalId) -> &[Unit] {
        &self.specs[id.index()].consumers
    }

    /// Iterates over the table in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (SignalId, &SignalSpec)> {
        self.specs
            .iter()
            .enumerate()
            .map(|(i, s)| (SignalId(i as u32), s))
    }

    /// Signals whose producer is `unit`.
    pub fn produced_by(&self, unit: Unit) -> Vec<SignalId> {
        self.iter()
            .filter(|(_, s)| s.producer == unit)
            .map(|(id, _)| id)
            .collect()
    }

    /// Every distinct producing unit, in order.
    pub fn producers(&self) -> Vec<Unit> {
        let mut units: Vec<Unit> = self.specs.iter().map(|s| s.producer).collect();
        units.sort();
        units.dedup();
        units
    }

    /// Verifies that `unit` is the declared producer of `id`.
    pub fn check_owner(&self, unit: Unit, id: SignalId) -> Result<(), WiringError> {
        let owner = self.producer(id);
        if owner != unit {
            return Err(WiringError::ForeignDriver {
                unit,
                signal: self.name(id).to_string(),
                owner,
            });
        }
        Ok(())
    }

    /// Number of declarations per signal name. Always 1 for a built netlist.
    pub fn driver_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for spec in &self.specs {
            *counts.entry(spec.name.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Produced/consumed signal counts for every unit that appears in the table.
    pub fn fan_stats(&self) -> BTreeMap<Unit, FanStats> {
        let mut stats: BTreeMap<Unit, FanStats> = BTreeMap::new();
        for spec in &self.specs {
            stats.entry(spec.producer).or_default().produced += 1;
            for c in &spec.consumers {
                stats.entry(*c).or_default().consumed += 1;
            }
        }
        stats
    }
}

/// Debug transport pins and the debug module interface.
#[derive(Clone, Debug)]
pub struct DebugPorts {
    pub tck: SignalId,
    pub tms: SignalId,
    pub tdi: SignalId,
    pub tdo: SignalId,
    pub dmi_adr: SignalId,
    pub dmi_dat_o: SignalId,
    pub dmi_dat_i: SignalId,
    pub dmi_rd: SignalId,
    pub dmi_wr: SignalId,
    /// Debug module responses to memory unit accesses.
    pub dbg_ack: SignalId,
    pub dbg_dat: SignalId,
}

impl DebugPorts {
    fn declare(b: &mut NetlistBuilder, bus_width: u32) -> Self {
        Self {
            tck: b.connect("tck", 1, Unit::Top, &[Unit::Dtm]),
            tms: b.connect("tms", 1, Unit::Top, &[Unit::Dtm]),
            tdi: b.connect("tdi", 1, Unit::Top, &[Unit::Dtm]),
            tdo: b.connect("tdo", 1, Unit::Dtm, &[Unit::Top]),
            dmi_adr: b.connect("dmi_adr", DMI_ADDR_WIDTH, Unit::Dtm, &[Unit::Dm]),
            dmi_dat_o: b.connect("dmi_dat_o", WORD_WIDTH, Unit::Dtm, &[Unit::Dm]),
            dmi_dat_i: b.connect("dmi_dat_i", WORD_WIDTH, Unit::Dm, &[Unit::Dtm]),
            dmi_rd: b.connect("dmi_rd", 1, Unit::Dtm, &[Unit::Dm]),
            dmi_wr: b.connect("dmi_wr", 1, Unit::Dtm, &[Unit::Dm]),
            dbg_ack: b.connect("dbg_ack_i", 1, Unit::Dm, &[Unit::Memu]),
            dbg_dat: b.connect("dbg_dat_i", bus_width, Unit::Dm, &[Unit::Memu]),
        }
    }
}

/// Signals the control core drives toward the memory unit.
#[derive(Clone, Debug)]
pub struct CacheControl {
    pub icache_enable: SignalId,
    pub dcache_enable: SignalId,
}

/// The complete binding of an N-core SoC.
pub struct Interconnect {
    netlist: Netlist,
    /// Global reset pin, consumed by every unit.
    pub reset: SignalId,
    pub intc: IntcPorts,
    pub bus: BusPorts,
    pub debug: DebugPorts,
    pub cache: CacheControl,
    /// External exception input of the control core.
    pub ex_i: SignalId,
    pub cores: Vec<CoreBundle>,
}

impl Interconnect {
    /// Builds and validates the binding table for `config`.
    pub fn new(config: &SocConfig) -> Result<Self, WiringError> {
        let n = config.cores;
        let mut b = NetlistBuilder::new();

        let mut everyone = vec![Unit::Intc, Unit::BusIf, Unit::Memu, Unit::Dm, Unit::Dtm];
        for i in 0..n {
            everyone.extend([Unit::Ifu(i), Unit::Exu(i), Unit::Lsu(i)]);
        }
        let reset = b.connect("rst_i", 1, Unit::Top, &everyone);

        let intc = IntcPorts::declare(&mut b, config.ex_int_lines, config.ir_id_width);
        let bus = BusPorts::declare(&mut b, config.busif_width);
        let debug = DebugPorts::declare(&mut b, config.busif_width);
        let cache = CacheControl {
            icache_enable: b.connect("icache_enable", 1, Unit::Exu(0), &[Unit::Memu]),
            dcache_enable: b.connect("dcache_enable", 1, Unit::Exu(0), &[Unit::Memu]),
        };
        let ex_i = b.connect("ex_i", 1, Unit::Top, &[Unit::Exu(0)]);

        let cores = (0..n).map(|i| CoreBundle::declare(&mut b, i, n)).collect();

        let netlist = b.build()?;
        log::info!(
            "interconnect: {} cores, {} signals, {} producing units",
            n,
            netlist.len(),
            netlist.producers().len()
        );
        for (unit, fan) in netlist.fan_stats() {
            log::debug!(
                "interconnect: {} produces {}, consumes {}",
                unit,
                fan.produced,
                fan.consumed
            );
        }

        Ok(Self {
            netlist,
            reset,
            intc,
            bus,
            debug,
            cache,
            ex_i,
            cores,
        })
    }

    pub fn netlist(&self) -> &Netlist {
        &self.netlist
    }

    pub fn core(&self, index: usize) -> Option<&CoreBundle> {
        self.cores.get(index)
    }
}

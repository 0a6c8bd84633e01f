//! System-on-Chip (SoC) Builder.
//!
//! This module defines [`SocBuilder`] and the [`Soc`] it produces. The builder
//! validates the configuration, lays out the interconnect, instantiates the
//! modeled components (interrupt controller, bus interface adapter), accepts
//! user components standing in for external collaborators, and fills every
//! remaining output with a boundary stub. All ownership checks run here,
//! before the first tick.

use crate::common::error::{SocError, WiringError};
use crate::common::unit::Unit;
use crate::config::Config;
use crate::core::exu::IrqConsumer;
use crate::sim::kernel::Simulator;
use crate::sim::signal::SignalId;
use crate::sim::trace::{Snapshot, TraceSink};
use crate::soc::busif::BusInterfaceAdapter;
use crate::soc::intc::{IntcRegs, InterruptController, SelectedId};
use crate::soc::interconnect::{Interconnect, Netlist};
use crate::soc::memory::controller::SimpleController;
use crate::soc::memory::BusSlave;
use crate::soc::stub::BoundaryStub;
use crate::soc::traits::Component;
use crate::stats::SimStats;
use std::collections::{BTreeMap, HashMap};

/// Staged construction of a [`Soc`].
pub struct SocBuilder {
    config: Config,
    interconnect: Interconnect,
    attached: Vec<Box<dyn Component>>,
}

impl SocBuilder {
    /// Validates `config` and lays out the interconnect.
    ///
    /// # Errors
    ///
    /// Configuration errors and wiring violations are fatal; no SoC can be
    /// built from a builder that failed here.
    pub fn new(config: &Config) -> Result<Self, SocError> {
        config.validate()?;
        let interconnect = Interconnect::new(&config.soc)?;
        Ok(Self {
            config: config.clone(),
            interconnect,
            attached: Vec::new(),
        })
    }

    /// The binding table, for resolving signals of components to attach.
    pub fn interconnect(&self) -> &Interconnect {
        &self.interconnect
    }

    /// Replaces the boundary stub for the signals `component` drives.
    ///
    /// Ownership is checked in [`SocBuilder::build`].
    pub fn attach(mut self, component: Box<dyn Component>) -> Self {
        self.attached.push(component);
        self
    }

    /// Attaches a bus slave with the configured latency to the bus pins.
    pub fn with_memory(self) -> Self {
        let slave = BusSlave::new(
            self.interconnect.bus.pins.clone(),
            self.config.soc.busif_width,
            Box::new(SimpleController::new(self.config.memory.latency)),
        );
        self.attach(Box::new(slave))
    }

    /// Attaches an interrupt consumer in place of the control core's handshake outputs.
    pub fn with_irq_consumer(self, enabled: bool, service_delay: u64) -> Self {
        let consumer = IrqConsumer::new(self.interconnect.intc.clone(), enabled, service_delay);
        self.attach(Box::new(consumer))
    }

    /// Checks signal ownership and assembles the SoC.
    pub fn build(self) -> Result<Soc, SocError> {
        let netlist = self.interconnect.netlist();

        let mut components: Vec<Box<dyn Component>> = vec![
            Box::new(InterruptController::new(self.interconnect.intc.clone())),
            Box::new(BusInterfaceAdapter::new(self.interconnect.bus.clone())),
        ];
        components.extend(self.attached);

        let mut claimed: HashMap<SignalId, Unit> = HashMap::new();
        for c in &components {
            for id in c.drives() {
                netlist.check_owner(c.unit(), id)?;
                if let Some(first) = claimed.insert(id, c.unit()) {
                    return Err(WiringError::MultipleDrivers {
                        signal: netlist.name(id).to_string(),
                        first,
                        second: c.unit(),
                    }
                    .into());
                }
            }
        }

        let mut unclaimed: BTreeMap<Unit, Vec<SignalId>> = BTreeMap::new();
        for (id, spec) in netlist.iter() {
            if !claimed.contains_key(&id) {
                unclaimed.entry(spec.producer).or_default().push(id);
            }
        }

        let mut stubs = HashMap::new();
        for (unit, ids) in unclaimed {
            stubs.insert(unit, components.len());
            components.push(Box::new(BoundaryStub::new(unit, ids)));
        }

        log::info!(
            "soc: {} cores, {} interrupt lines, {} signals, {} components ({} stubs)",
            self.config.soc.cores,
            self.config.soc.ex_int_lines,
            netlist.len(),
            components.len(),
            stubs.len()
        );

        let sim = Simulator::new(netlist, components, self.interconnect.reset);
        Ok(Soc {
            config: self.config,
            interconnect: self.interconnect,
            sim,
            stubs,
        })
    }
}

/// A composed SoC: interconnect, components, and the kernel driving them.
pub struct Soc {
    config: Config,
    interconnect: Interconnect,
    sim: Simulator,
    stubs: HashMap<Unit, usize>,
}

impl Soc {
    /// Builds a SoC with only the modeled components and stubs.
    pub fn new(config: &Config) -> Result<Self, SocError> {
        SocBuilder::new(config)?.build()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn interconnect(&self) -> &Interconnect {
        &self.interconnect
    }

    pub fn netlist(&self) -> &Netlist {
        self.interconnect.netlist()
    }

    /// Number of clock edges committed so far.
    pub fn ticks(&self) -> u64 {
        self.sim.tick()
    }

    pub fn stats(&self) -> &SimStats {
        &self.sim.stats
    }

    /// Assigns the value a boundary stub drives on `id`.
    pub fn drive_id(&mut self, id: SignalId, value: u64) -> Result<(), SocError> {
        let owner = self.netlist().producer(id);
        let stub = self
            .stubs
            .get(&owner)
            .and_then(|&idx| self.sim.components_mut()[idx].as_stub_mut())
            .filter(|stub| stub.owns(id));

        match stub {
            Some(stub) => {
                stub.set(id, value);
                Ok(())
            }
            None => Err(WiringError::NotHarnessDriven {
                signal: self.interconnect.netlist().name(id).to_string(),
                owner,
            }
            .into()),
        }
    }

    /// Assigns a stub-driven signal by name.
    pub fn drive(&mut self, name: &str, value: u64) -> Result<(), SocError> {
        let id = self.netlist().id(name)?;
        self.drive_id(id, value)
    }

    /// Settles and returns the current value of `id`.
    pub fn read_id(&mut self, id: SignalId) -> Result<u64, SocError> {
        self.sim.settle()?;
        Ok(self.sim.signals().get(id))
    }

    /// Settles and returns the current value of a signal by name.
    pub fn peek(&mut self, name: &str) -> Result<u64, SocError> {
        let id = self.netlist().id(name)?;
        self.read_id(id)
    }

    /// Runs the settle phase alone and returns the number of passes it took.
    pub fn settle(&mut self) -> Result<usize, SocError> {
        Ok(self.sim.settle()?)
    }

    pub fn set_reset(&mut self, on: bool) -> Result<(), SocError> {
        self.drive_id(self.interconnect.reset, on as u64)
    }

    pub fn set_ex_int(&mut self, lines: u64) -> Result<(), SocError> {
        self.drive_id(self.interconnect.intc.ex_int, lines)
    }

    pub fn set_ir_ack(&mut self, on: bool) -> Result<(), SocError> {
        self.drive_id(self.interconnect.intc.ir_ack, on as u64)
    }

    pub fn set_ir_enable(&mut self, on: bool) -> Result<(), SocError> {
        self.drive_id(self.interconnect.intc.ir_enable, on as u64)
    }

    /// Interrupt request output as seen by the control core this tick.
    pub fn ir_request(&mut self) -> Result<bool, SocError> {
        Ok(self.read_id(self.interconnect.intc.ir_request)? != 0)
    }

    /// Interrupt id output as seen by the control core this tick.
    pub fn ir_id(&mut self) -> Result<SelectedId, SocError> {
        let raw = self.read_id(self.interconnect.intc.ir_id)?;
        Ok(SelectedId::decode(raw, self.interconnect.intc.id_width))
    }

    fn find<'a, T>(&'a self, f: impl Fn(&'a dyn Component) -> Option<&'a T>) -> Option<&'a T> {
        self.sim.components().iter().find_map(|c| f(c.as_ref()))
    }

    pub fn intc(&self) -> Option<&InterruptController> {
        self.find(|c| c.as_intc())
    }

    /// Committed interrupt controller registers, `None` before the first reset.
    pub fn intc_regs(&self) -> Option<IntcRegs> {
        self.intc().and_then(|i| i.snapshot())
    }

    pub fn bus_slave(&self) -> Option<&BusSlave> {
        self.find(|c| c.as_bus_slave())
    }

    pub fn irq_consumer(&self) -> Option<&IrqConsumer> {
        self.find(|c| c.as_irq_consumer())
    }

    /// Advances one clock edge.
    pub fn tick(&mut self) -> Result<(), SocError> {
        self.sim.settle()?;

        let before = self.intc_regs();
        let pins = &self.interconnect.bus.pins;
        let signals = self.sim.signals();
        let transfer = (signals.get_bit(pins.cyc_o) && signals.get_bit(pins.ack_i))
            .then(|| signals.get_bit(pins.we_o));
        let reset = signals.get_bit(self.interconnect.reset);

        self.sim.step()?;

        match transfer {
            Some(true) => self.sim.stats.bus_writes += 1,
            Some(false) => self.sim.stats.bus_reads += 1,
            None => {}
        }
        if let (Some(b), Some(a), false) = (before, self.intc_regs(), reset) {
            use crate::soc::intc::IntcState::*;
            match (b.state, a.state) {
                (Idle, Pending) => self.sim.stats.irq_raised += 1,
                (Pending, Handled) => self.sim.stats.irq_acked += 1,
                (Handled, Idle) => self.sim.stats.irq_serviced += 1,
                _ => {}
            }
        }
        Ok(())
    }

    /// Advances `n` clock edges.
    pub fn run(&mut self, n: u64) -> Result<(), SocError> {
        for _ in 0..n {
            self.tick()?;
        }
        Ok(())
    }

    /// Holds reset for one edge, then releases it.
    pub fn reset(&mut self) -> Result<(), SocError> {
        self.set_reset(true)?;
        self.tick()?;
        self.set_reset(false)
    }

    /// Settles and captures every signal and register.
    pub fn snapshot(&mut self) -> Result<Snapshot, SocError> {
        self.sim.settle()?;
        Ok(self.sim.snapshot(self.interconnect.netlist()))
    }

    /// Emits a snapshot to `sink`, and as text to stdout when there is no sink or `verbose` is set.
    pub fn trace(&mut self, sink: Option<&mut dyn TraceSink>, verbose: bool) -> Result<(), SocError> {
        let snapshot = self.snapshot()?;
        let print = sink.is_none() || verbose;
        if let Some(sink) = sink {
            sink.record(&snapshot)?;
        }
        if print {
            print!("{}", snapshot);
        }
        Ok(())
    }
}

//! Diagnostic snapshots.
//!
//! A [`Snapshot`] captures the value of every named signal and register at a
//! tick. It can be recorded to a structured [`TraceSink`] or rendered as text,
//! grouped by the unit that produces each value.

use crate::common::error::SimError;
use crate::common::unit::Unit;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignalSample {
    pub name: String,
    pub producer: Unit,
    pub width: u32,
    pub value: u64,
}

/// A register value; `None` while undefined (before the first reset).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegisterSample {
    pub unit: Unit,
    pub name: String,
    pub value: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub signals: Vec<SignalSample>,
    pub registers: Vec<RegisterSample>,
}

impl Snapshot {
    pub fn signal(&self, name: &str) -> Option<u64> {
        self.signals.iter().find(|s| s.name == name).map(|s| s.value)
    }

    pub fn register(&self, unit: Unit, name: &str) -> Option<Option<u64>> {
        self.registers
            .iter()
            .find(|r| r.unit == unit && r.name == name)
            .map(|r| r.value)
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut groups: BTreeMap<Unit, (Vec<&SignalSample>, Vec<&RegisterSample>)> = BTreeMap::new();
        for s in &self.signals {
            groups.entry(s.producer).or_default().0.push(s);
        }
        for r in &self.registers {
            groups.entry(r.unit).or_default().1.push(r);
        }

        writeln!(f, "=== tick {} ===", self.tick)?;
        for (unit, (signals, registers)) in groups {
            writeln!(f, "Signals of Module \"{}\":", unit)?;
            for s in signals {
                writeln!(f, "  {:<24} = {:#x}", s.name, s.value)?;
            }
            for r in registers {
                match r.value {
                    Some(v) => writeln!(f, "  {:<24} = {:#x} (reg)", r.name, v)?,
                    None => writeln!(f, "  {:<24} = X (reg)", r.name)?,
                }
            }
        }
        Ok(())
    }
}

/// Destination for structured snapshots.
pub trait TraceSink {
    fn record(&mut self, snapshot: &Snapshot) -> Result<(), SimError>;
}

/// Writes one JSON object per snapshot, newline-delimited.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for JsonLinesSink<W> {
    fn record(&mut self, snapshot: &Snapshot) -> Result<(), SimError> {
        serde_json::to_writer(&mut self.writer, snapshot).map_err(|e| SimError::Trace(e.to_string()))?;
        writeln!(self.writer).map_err(|e| SimError::Trace(e.to_string()))
    }
}

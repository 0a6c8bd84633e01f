//! Stimulus Loader.
//!
//! Reads harness stimulus scripts: a run length and a list of pin assignments
//! applied at given ticks, e.g.
//!
//! ```toml
//! ticks = 8
//!
//! [[event]]
//! tick = 1
//! signal = "ex_int"
//! value = 2
//! ```

use crate::common::error::ConfigError;
use serde::Deserialize;
use std::fs;

/// One harness assignment: drive `signal` with `value` from `tick` on.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct StimulusEvent {
    pub tick: u64,
    pub signal: String,
    pub value: u64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Stimulus {
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default, rename = "event")]
    pub events: Vec<StimulusEvent>,
}

impl Stimulus {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Load(e.to_string()))
    }

    /// Loads a stimulus script from disk.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Load(format!("{}: {}", path, e)))?;
        Self::from_toml(&text)
    }

    /// Events scheduled for `tick`, in file order.
    pub fn events_at(&self, tick: u64) -> impl Iterator<Item = &StimulusEvent> {
        self.events.iter().filter(move |e| e.tick == tick)
    }

    /// Last tick any event is scheduled at.
    pub fn last_tick(&self) -> Option<u64> {
        self.events.iter().map(|e| e.tick).max()
    }
}

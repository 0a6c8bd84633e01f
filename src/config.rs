//! SoC Configuration.
//!
//! Build-time parameters loaded from TOML: core count, interrupt line count,
//! id field width, bus width, and the bus slave's latency. Every parameter is
//! validated before any component is instantiated.

use crate::common::bits::id_field_width;
use crate::common::error::ConfigError;
use serde::Deserialize;
use std::fs;

const MAX_CORES: usize = 32;
const MAX_EX_INT: u32 = 64;

const DEFAULT_CORES: usize = 2;
const DEFAULT_EX_INT: u32 = 4;
const DEFAULT_IR_ID_WIDTH: u32 = 5;
const DEFAULT_BUSIF_WIDTH: u32 = 32;
const DEFAULT_LATENCY: u64 = 1;
const DEFAULT_MAX_TICKS: u64 = 64;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub soc: SocConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Config {
    /// Parses a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Load(e.to_string()))
    }

    /// Reads and parses a configuration file.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Load(format!("{}: {}", path, e)))?;
        Self::from_toml(&text)
    }

    /// Checks every build-time parameter for consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.soc.validate()?;
        self.memory.validate()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    #[serde(default)]
    pub trace: bool,
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace: false,
            max_ticks: DEFAULT_MAX_TICKS,
        }
    }
}

/// Parameters that fix vector and array sizes of the composition.
#[derive(Debug, Deserialize, Clone)]
pub struct SocConfig {
    #[serde(default = "default_cores")]
    pub cores: usize,

    #[serde(default = "default_ex_int")]
    pub ex_int_lines: u32,

    #[serde(default = "default_ir_id_width")]
    pub ir_id_width: u32,

    #[serde(default = "default_busif_width")]
    pub busif_width: u32,
}

impl Default for SocConfig {
    fn default() -> Self {
        Self {
            cores: DEFAULT_CORES,
            ex_int_lines: DEFAULT_EX_INT,
            ir_id_width: DEFAULT_IR_ID_WIDTH,
            busif_width: DEFAULT_BUSIF_WIDTH,
        }
    }
}

impl SocConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cores == 0 || self.cores > MAX_CORES {
            return Err(ConfigError::CoreCount {
                got: self.cores,
                max: MAX_CORES,
            });
        }
        if self.ex_int_lines == 0 || self.ex_int_lines > MAX_EX_INT {
            return Err(ConfigError::InterruptLines {
                got: self.ex_int_lines,
                max: MAX_EX_INT,
            });
        }
        let needed = id_field_width(self.ex_int_lines);
        if self.ir_id_width < needed || self.ir_id_width > 64 {
            return Err(ConfigError::IdWidth {
                lines: self.ex_int_lines,
                needed,
                available: self.ir_id_width,
            });
        }
        if self.busif_width != 32 && self.busif_width != 64 {
            return Err(ConfigError::BusWidth(self.busif_width));
        }
        Ok(())
    }

    /// Width of the byte-select lines on the master bus.
    pub fn byte_select_width(&self) -> u32 {
        self.busif_width / 8
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct MemoryConfig {
    #[serde(default = "default_latency")]
    pub latency: u64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            latency: DEFAULT_LATENCY,
        }
    }
}

impl MemoryConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.latency == 0 {
            return Err(ConfigError::Latency);
        }
        Ok(())
    }
}

fn default_max_ticks() -> u64 {
    DEFAULT_MAX_TICKS
}

fn default_cores() -> usize {
    DEFAULT_CORES
}

fn default_ex_int() -> u32 {
    DEFAULT_EX_INT
}

fn default_ir_id_width() -> u32 {
    DEFAULT_IR_ID_WIDTH
}

fn default_busif_width() -> u32 {
    DEFAULT_BUSIF_WIDTH
}

fn default_latency() -> u64 {
    DEFAULT_LATENCY
}

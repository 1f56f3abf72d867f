//! Configuration system for the shared FPU.
//!
//! This module defines the structures used to parameterize the FPU. It provides:
//! 1. **Defaults:** Baseline queue depth, unit latency, and native word width.
//! 2. **Structures:** The root `FpuConfig` and one `UnitConfig` per execution pipe.
//! 3. **Validation:** Checks that reject configurations the FPU cannot be built from.
//!
//! Configuration is supplied as JSON (see [`FpuConfig::from_json`]) or built with
//! `FpuConfig::default()`.

use serde::Deserialize;
use tracing::warn;

use crate::common::FpuError;
use crate::fpu::op::FpuOp;

/// Default configuration constants for the FPU.
mod defaults {
    /// Depth of each source's input queue.
    pub const INPUT_QUEUE_SIZE: usize = 2;

    /// Latency of a default unit, in cycles.
    pub const UNIT_LATENCY: u64 = 4;

    /// Native integer width of the simulated architecture, in bytes.
    pub const INTEGER_BYTES: usize = 8;
}

/// Root configuration structure for the FPU.
///
/// # Examples
///
/// ```
/// use fpusim_core::config::FpuConfig;
///
/// let json = r#"{
///     "units": [
///         { "ops": ["add", "sub"], "latency": 3, "pipelined": true },
///         { "ops": ["MUL", "DIV", "SQRT"], "latency": 10 }
///     ],
///     "input_queue_size": 4,
///     "integer_bytes": 4,
///     "big_endian": true
/// }"#;
///
/// let config = FpuConfig::from_json(json).unwrap();
/// assert_eq!(config.units.len(), 2);
/// assert_eq!(config.units[1].latency, 10);
/// assert!(!config.units[1].pipelined);
/// assert_eq!(config.input_queue_size, 4);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct FpuConfig {
    /// Execution units, in index order.
    #[serde(default)]
    pub units: Vec<UnitConfig>,

    /// Capacity of every source's input queue.
    #[serde(default = "FpuConfig::default_input_queue_size")]
    pub input_queue_size: usize,

    /// Native integer width in bytes; results are written back one such word at a time.
    #[serde(default = "FpuConfig::default_integer_bytes")]
    pub integer_bytes: usize,

    /// Big-endian sub-word ordering: word 0 of a wide result carries the most significant bits.
    #[serde(default)]
    pub big_endian: bool,
}

impl FpuConfig {
    /// Returns the default input queue capacity.
    fn default_input_queue_size() -> usize {
        defaults::INPUT_QUEUE_SIZE
    }

    /// Returns the default native integer width in bytes.
    fn default_integer_bytes() -> usize {
        defaults::INTEGER_BYTES
    }

    /// Parses a configuration from JSON and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`FpuError::Json`] on malformed input, or any error
    /// [`validate`](Self::validate) reports.
    pub fn from_json(json: &str) -> Result<Self, FpuError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that an FPU can be built from this configuration.
    ///
    /// # Errors
    ///
    /// * [`FpuError::NoUnits`] when `units` is empty.
    /// * [`FpuError::NoOperations`] when a unit names no recognised operation.
    /// * [`FpuError::ZeroLatency`] when a unit has zero latency.
    /// * [`FpuError::ZeroQueueSize`] when the input queue cannot hold anything.
    /// * [`FpuError::UnsupportedIntegerWidth`] unless the word is 4 or 8 bytes.
    pub fn validate(&self) -> Result<(), FpuError> {
        if self.units.is_empty() {
            return Err(FpuError::NoUnits);
        }
        for (i, unit) in self.units.iter().enumerate() {
            if unit.operations(i).is_empty() {
                return Err(FpuError::NoOperations { unit: i });
            }
            if unit.latency == 0 {
                return Err(FpuError::ZeroLatency { unit: i });
            }
        }
        if self.input_queue_size == 0 {
            return Err(FpuError::ZeroQueueSize);
        }
        if !matches!(self.integer_bytes, 4 | 8) {
            return Err(FpuError::UnsupportedIntegerWidth(self.integer_bytes));
        }
        Ok(())
    }
}

impl Default for FpuConfig {
    /// One pipelined unit that implements every operation.
    fn default() -> Self {
        Self {
            units: vec![UnitConfig::default()],
            input_queue_size: defaults::INPUT_QUEUE_SIZE,
            integer_bytes: defaults::INTEGER_BYTES,
            big_endian: false,
        }
    }
}

/// Configuration of one execution unit.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitConfig {
    /// Operation names this unit implements (case-insensitive, e.g. `"add"`, `"SQRT"`).
    #[serde(default)]
    pub ops: Vec<String>,

    /// Cycles from admission until the first result word can be written back.
    #[serde(default = "UnitConfig::default_latency")]
    pub latency: u64,

    /// Whether the unit accepts a new operation before the previous one retires.
    #[serde(default)]
    pub pipelined: bool,
}

impl UnitConfig {
    /// Returns the default unit latency in cycles.
    fn default_latency() -> u64 {
        defaults::UNIT_LATENCY
    }

    /// Resolves the configured operation names, in `FpuOp` order and without duplicates.
    ///
    /// Names that do not match any operation are skipped with a warning.
    ///
    /// # Arguments
    ///
    /// * `unit` - Index of this unit, used only for the warning.
    pub fn operations(&self, unit: usize) -> Vec<FpuOp> {
        let mut ops = Vec::with_capacity(FpuOp::ALL.len());
        for name in &self.ops {
            match name.parse::<FpuOp>() {
                Ok(op) if !ops.contains(&op) => ops.push(op),
                Ok(_) => {}
                Err(_) => warn!(target: "fpu", unit, name = %name, "ignoring unknown FPU operation"),
            }
        }
        ops.sort_unstable();
        ops
    }
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            ops: FpuOp::ALL.iter().map(ToString::to_string).collect(),
            latency: defaults::UNIT_LATENCY,
            pipelined: true,
        }
    }
}

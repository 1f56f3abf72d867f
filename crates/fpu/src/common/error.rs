//! FPU error definitions.
//!
//! Only configuration problems are reported as errors. Everything that can go
//! wrong while the FPU is running (a full input queue, a busy unit, a client that
//! cannot take a result yet, two units writing the same client in one cycle) is a
//! transient stall: it is retried on the next cycle and never surfaces here.

use thiserror::Error;

use crate::fpu::op::FpuOp;

/// Errors returned while building the FPU or routing a request to it.
#[derive(Debug, Error)]
pub enum FpuError {
    /// The configuration declares no execution units.
    #[error("no execution units configured")]
    NoUnits,

    /// A unit lists no operation the FPU recognises.
    #[error("no operation specified for unit {unit}")]
    NoOperations {
        /// Index of the offending unit.
        unit: usize,
    },

    /// A unit has a latency of zero cycles.
    #[error("unit {unit} has zero latency")]
    ZeroLatency {
        /// Index of the offending unit.
        unit: usize,
    },

    /// The per-source input queue has no room for any operation.
    #[error("input queue size must be at least 1")]
    ZeroQueueSize,

    /// The native integer width is not one the codec supports.
    #[error("unsupported native integer width: {0} bytes")]
    UnsupportedIntegerWidth(usize),

    /// An operation was requested that no configured unit implements.
    #[error("no unit implements {0}")]
    NoCapableUnit(FpuOp),

    /// The configuration text could not be parsed.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

//! Common types used throughout the FPU scheduler.
//!
//! This module provides the building blocks shared by every other module:
//! 1. **Identifiers:** Strong index types for sources, units, clients, and cycles.
//! 2. **Registers:** Register addresses that results are written back to.
//! 3. **Errors:** Configuration and request errors surfaced to the caller.

/// Identifier newtypes (sources, units, clients) and the cycle counter type.
pub mod id;

/// Register address types.
pub mod reg;

/// Error types.
pub mod error;

pub use error::FpuError;
pub use id::{ClientId, CycleNo, SourceId, UnitId};
pub use reg::{RegAddr, RegType};

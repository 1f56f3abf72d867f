//! Simulation kernel contract and a reference single-clock kernel.
//!
//! The FPU is a component of a larger cycle-driven simulation. This module holds
//! what it needs from that simulation (the [`Kernel`] trait), the storage-trace
//! algebra it declares its behaviour in, and a small [`Clock`]/[`Simulator`] pair
//! that drives an FPU on its own.

pub mod clock;
pub mod kernel;
pub mod simulator;
pub mod trace;

pub use self::clock::Clock;
pub use self::kernel::{Kernel, ProcessResult};
pub use self::simulator::Simulator;
pub use self::trace::{StorageId, StorageTrace, StorageTraceSet};

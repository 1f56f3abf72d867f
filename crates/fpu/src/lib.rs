//! Shared floating-point unit scheduler for a cycle-accurate simulator.
//!
//! This crate implements an FPU that several processor pipelines share. It provides:
//! 1. **Sources:** One bounded input FIFO per registered client, with round-robin admission.
//! 2. **Units:** Fixed-latency execution pipes, optionally pipelined, fed by a static op mapping.
//! 3. **Write-back:** Multi-word result delivery with per-source collision detection.
//! 4. **Storage traces:** The dependency descriptor the simulation kernel schedules on.
//! 5. **Simulation:** A reference kernel clock, configuration, and statistics collection.

/// Common types (identifiers, register addresses, errors).
pub mod common;
/// FPU configuration (defaults, unit descriptions, JSON loading).
pub mod config;
/// The shared FPU (sources, units, mapping, plan/apply engine, diagnostics).
pub mod fpu;
/// Kernel contract, storage traces, and a reference clock/simulator.
pub mod sim;
/// FPU statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `FpuConfig::default()` or `FpuConfig::from_json`.
pub use crate::config::FpuConfig;
/// The shared floating-point unit.
pub use crate::fpu::Fpu;
/// Reference simulator driving an `Fpu` from a `Clock`.
pub use crate::sim::Simulator;

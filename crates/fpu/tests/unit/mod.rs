//! # Unit Components
//!
//! Tests for every FPU component, from configuration parsing to the cycle engine.

/// Configuration defaults, JSON loading, and validation.
pub mod config;


/// The shared FPU: admission, execution, write-back, and storage traces.
pub mod fpu;

/// Diagnostic dump format.
pub mod inspect;


/// Statistics counters and report sections.
pub mod stats_verification;

//! # FPU Engine Tests
//!
//! Scenario tests driven through the `TestContext` harness.


/// Admission fairness and the rotating start pointer.
pub mod fairness;




/// Client registration, storage allocation, and trace declarations.
pub mod registration;

/// Queueing contract and cycle results.
pub mod requests;

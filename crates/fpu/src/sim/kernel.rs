//! Simulation kernel contract.
//!
//! The FPU does not own a clock. It relies on a kernel for four things: the current
//! cycle number, registration of the storage elements it owns, a place to declare
//! the storage traces of its process, and a sink for its active flag. The kernel in
//! turn invokes [`Fpu::tick`](crate::fpu::Fpu::tick) once per cycle while the FPU
//! is sensitive.

use super::trace::{StorageId, StorageTraceSet};
use crate::common::CycleNo;

/// Outcome of one process invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProcessResult {
    /// The process made progress (or had nothing to do).
    Success,
    /// Every piece of pending work stalled this cycle.
    Failed,
}

/// Services a component needs from the simulation kernel.
pub trait Kernel {
    /// Current cycle number.
    fn cycle(&self) -> CycleNo;

    /// Registers a named storage element and returns its handle.
    fn allocate_storage(&mut self, name: &str) -> StorageId;

    /// Declares the storage traces `process` may produce in one invocation.
    ///
    /// A later declaration for the same process replaces the earlier one.
    fn declare_storage_traces(&mut self, process: &str, traces: StorageTraceSet);

    /// Sets or clears a flag storage.
    fn set_active(&mut self, storage: StorageId, active: bool);
}

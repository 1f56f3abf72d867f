//! Reference kernel clock.
//!
//! A minimal single-clock [`Kernel`]: it counts cycles, hands out storage ids,
//! remembers the latest trace declaration of every process, and holds flag state.

use std::collections::BTreeMap;

use super::kernel::Kernel;
use super::trace::{StorageId, StorageTraceSet};
use crate::common::CycleNo;

/// Single-clock kernel.
#[derive(Debug, Default)]
pub struct Clock {
    cycle: CycleNo,
    storages: Vec<String>,
    flags: BTreeMap<StorageId, bool>,
    traces: BTreeMap<String, StorageTraceSet>,
}

impl Clock {
    /// Creates a clock at cycle 0 with no storages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances to the next cycle.
    pub fn advance(&mut self) {
        self.cycle += 1;
    }

    /// Name a storage was registered under.
    pub fn storage_name(&self, storage: StorageId) -> Option<&str> {
        self.storages.get(storage.0 as usize).map(String::as_str)
    }

    /// Looks a storage up by name.
    pub fn find_storage(&self, name: &str) -> Option<StorageId> {
        self.storages
            .iter()
            .position(|s| s == name)
            .map(|i| StorageId(i as u32))
    }

    /// Current value of a flag storage; unset flags read as `false`.
    pub fn flag(&self, storage: StorageId) -> bool {
        self.flags.get(&storage).copied().unwrap_or(false)
    }

    /// Latest trace declaration of `process`.
    pub fn traces(&self, process: &str) -> Option<&StorageTraceSet> {
        self.traces.get(process)
    }
}

impl Kernel for Clock {
    fn cycle(&self) -> CycleNo {
        self.cycle
    }

    fn allocate_storage(&mut self, name: &str) -> StorageId {
        let id = StorageId(self.storages.len() as u32);
        self.storages.push(name.to_owned());
        id
    }

    fn declare_storage_traces(&mut self, process: &str, traces: StorageTraceSet) {
        let _ = self.traces.insert(process.to_owned(), traces);
    }

    fn set_active(&mut self, storage: StorageId, active: bool) {
        let _ = self.flags.insert(storage, active);
    }
}

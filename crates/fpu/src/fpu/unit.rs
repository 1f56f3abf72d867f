//! FPU execution units.
//!
//! A unit is one physical pipe with a fixed latency. Results in flight are kept
//! in a queue of [`Slot`]s, oldest first. Every slot's age starts at 1 on
//! admission and grows by one per cycle the unit advances; the front slot can be
//! written back once its age equals the latency.

use std::collections::VecDeque;

use super::codec::FloatWidth;
use super::op::FpuOp;
use crate::common::{RegAddr, SourceId};

/// One in-flight result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Slot {
    /// First destination register.
    pub dest: RegAddr,
    /// Destination width.
    pub width: FloatWidth,
    /// Next sub-word to write back.
    pub index: usize,
    /// Cycles spent in the pipe, counting the admission cycle.
    pub age: u64,
    /// Result value, computed on admission.
    pub value: f64,
    /// Source the operation came from.
    pub source: SourceId,
    /// Per-source admission sequence number.
    pub seq: u64,
}

impl Slot {
    /// Register the next sub-word goes to.
    pub fn address(&self) -> RegAddr {
        self.dest.offset(self.index as u32)
    }
}

/// Number of slots in a unit and the age of its newest one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Occupancy {
    /// Slots in flight.
    pub len: usize,
    /// Age of the newest slot; meaningless when `len == 0`.
    pub newest_age: u64,
}

impl Occupancy {
    /// Whether a unit in this state can take a new operation.
    ///
    /// An empty unit always can. A pipelined unit can as long as its entry stage
    /// is free, i.e. the newest slot is past its first cycle.
    pub const fn accepts(&self, pipelined: bool) -> bool {
        self.len == 0 || (pipelined && self.newest_age != 1)
    }

    /// The state after one admission.
    #[must_use]
    pub const fn admitted(self) -> Self {
        Self {
            len: self.len + 1,
            newest_age: 1,
        }
    }
}

/// One physical FPU pipe.
#[derive(Debug)]
pub struct Unit {
    latency: u64,
    pipelined: bool,
    ops: Vec<FpuOp>,
    slots: VecDeque<Slot>,
    stalled_cycles: u64,
}

impl Unit {
    /// Creates an empty unit.
    ///
    /// # Arguments
    ///
    /// * `latency` - Cycles from admission to first write-back (at least 1).
    /// * `pipelined` - Whether the unit accepts work while busy.
    /// * `ops` - Operations the unit implements.
    pub fn new(latency: u64, pipelined: bool, ops: Vec<FpuOp>) -> Self {
        debug_assert!(latency >= 1, "unit latency must be at least one cycle");
        Self {
            latency,
            pipelined,
            ops,
            slots: VecDeque::new(),
            stalled_cycles: 0,
        }
    }

    /// Latency in cycles.
    pub fn latency(&self) -> u64 {
        self.latency
    }

    /// Whether the unit is pipelined.
    pub fn is_pipelined(&self) -> bool {
        self.pipelined
    }

    /// Operations the unit implements.
    pub fn ops(&self) -> &[FpuOp] {
        &self.ops
    }

    /// In-flight slots, oldest first.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    /// Number of in-flight slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Oldest in-flight slot.
    pub fn front(&self) -> Option<&Slot> {
        self.slots.front()
    }

    /// Whether the oldest slot has completed its latency.
    pub fn front_ready(&self) -> bool {
        self.front().is_some_and(|s| s.age >= self.latency)
    }

    /// Current occupancy.
    pub fn occupancy(&self) -> Occupancy {
        Occupancy {
            len: self.slots.len(),
            newest_age: self.slots.back().map_or(0, |s| s.age),
        }
    }

    /// Whether the unit can take a new operation right now.
    pub fn can_accept(&self) -> bool {
        self.occupancy().accepts(self.pipelined)
    }

    /// Number of consecutive cycles the unit has failed to write back.
    pub fn stalled_cycles(&self) -> u64 {
        self.stalled_cycles
    }

    /// Appends a freshly admitted slot.
    pub(crate) fn push(&mut self, slot: Slot) {
        debug_assert!(self.can_accept(), "admission into a busy unit");
        self.slots.push_back(slot);
    }

    /// Ages every slot by one cycle.
    pub(crate) fn advance(&mut self) {
        for slot in &mut self.slots {
            slot.age += 1;
        }
    }

    /// Completes one sub-word of the front slot.
    ///
    /// # Returns
    ///
    /// The slot, if that was its last word and it has left the unit.
    pub(crate) fn complete_word(&mut self, last: bool) -> Option<Slot> {
        if last {
            self.slots.pop_front()
        } else {
            if let Some(front) = self.slots.front_mut() {
                front.index += 1;
            }
            None
        }
    }

    /// Counts one more stalled cycle and returns the running total.
    pub(crate) fn stall(&mut self) -> u64 {
        self.stalled_cycles += 1;
        self.stalled_cycles
    }

    /// Resets the stall counter after progress.
    pub(crate) fn clear_stall(&mut self) {
        self.stalled_cycles = 0;
    }
}

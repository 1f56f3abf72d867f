//! Per-cycle scheduling.
//!
//! A cycle runs in two phases:
//! 1. **Plan:** [`Fpu::plan`] inspects units, sources and clients without mutating
//!    anything and produces a [`CyclePlan`]. Unit decisions are made in unit
//!    index order, so a lower unit wins a write-back collision. Admissions are
//!    then decided against each unit's projected post-write-back occupancy,
//!    visiting sources round-robin from the rotation pointer.
//! 2. **Apply:** [`Fpu::apply`] commits the plan: performs the client writes,
//!    ages and pops slots, admits operations, rotates the pointer and publishes
//!    the active flag.
//!
//! Results of one source are retired in admission order. A slot whose sequence
//! number is not the source's next to retire waits, even if it is ready, until
//! the older result (possibly in a slower unit) has been written back.

use std::fmt;

use tracing::{Level, debug, event, trace, warn};

use super::Fpu;
use super::client::ClientPort;
use super::unit::{Occupancy, Slot, Unit};
use crate::common::{CycleNo, RegAddr, SourceId, UnitId};
use crate::sim::kernel::{Kernel, ProcessResult};

/// Why a ready unit could not write back this cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StallReason {
    /// An older result of the same source is still in flight.
    OutOfOrder,
    /// Another unit already wrote back to the same source this cycle.
    Collision,
    /// The client reported the destination register unavailable.
    ClientBusy,
    /// The client refused the write after reporting itself available.
    WriteRejected,
}

impl StallReason {
    /// Whether the stall is an expected wait rather than a blocked client.
    pub const fn is_routine(self) -> bool {
        matches!(self, Self::OutOfOrder)
    }
}

impl fmt::Display for StallReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::OutOfOrder => "waiting for an older result of the same client",
            Self::Collision => {
                "unable to write back result because another FPU pipe already wrote back this cycle"
            }
            Self::ClientBusy => "client not ready to accept result",
            Self::WriteRejected => "client rejected the result write",
        };
        f.write_str(msg)
    }
}

/// One native word to deliver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Writeback {
    /// Source whose client receives the word.
    pub source: SourceId,
    /// Sequence number of the result within its source.
    pub seq: u64,
    /// Sub-word index of this word.
    pub index: usize,
    /// Destination register of this word.
    pub addr: RegAddr,
    /// Word value.
    pub word: u64,
    /// Whether this is the final word of the result.
    pub last: bool,
}

/// What a unit does this cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitStep {
    /// Nothing in flight.
    Idle,
    /// The oldest result has not finished its latency; every slot ages.
    Advance,
    /// Deliver one word of the oldest result.
    Retire(Writeback),
    /// The oldest result is ready but cannot be delivered.
    Stall {
        /// Source of the blocked result.
        source: SourceId,
        /// Cause.
        reason: StallReason,
        /// Whether the unit still claims the source's write port this cycle.
        claimed: bool,
    },
}

impl UnitStep {
    /// Whether the unit holds work this cycle.
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// What happens to a non-empty source this cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceStep {
    /// The source.
    pub source: SourceId,
    /// Unit its head operation routes to.
    pub unit: Option<UnitId>,
    /// Whether the head operation enters that unit.
    pub admitted: bool,
}

/// All decisions for one cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CyclePlan {
    now: CycleNo,
    units: Vec<UnitStep>,
    sources: Vec<SourceStep>,
}

impl CyclePlan {
    /// Cycle the plan was made for.
    pub const fn now(&self) -> CycleNo {
        self.now
    }

    /// Per-unit steps in unit index order.
    pub fn units(&self) -> &[UnitStep] {
        &self.units
    }

    /// Steps of the non-empty sources, in visiting order.
    pub fn sources(&self) -> &[SourceStep] {
        &self.sources
    }

    /// Admissions in the order they are performed.
    pub fn admissions(&self) -> impl Iterator<Item = (SourceId, UnitId)> + '_ {
        self.sources
            .iter()
            .filter(|s| s.admitted)
            .filter_map(|s| s.unit.map(|u| (s.source, u)))
    }

    /// Whether nothing is in flight and no source has work.
    pub fn is_idle(&self) -> bool {
        self.sources.is_empty() && self.units.iter().all(|u| !u.is_active())
    }
}

impl Fpu {
    /// Decides the cycle `now` without changing any state.
    ///
    /// `clients` is consulted only for output availability.
    pub fn plan<P: ClientPort + ?Sized>(&self, now: CycleNo, clients: &P) -> CyclePlan {
        // Write ports already taken this cycle, per source.
        let mut claims: Vec<Option<UnitId>> =
            self.sources.iter().map(|s| s.writer_at(now)).collect();

        let mut units = Vec::with_capacity(self.units.len());
        let mut projected = Vec::with_capacity(self.units.len());
        for (i, unit) in self.units.iter().enumerate() {
            let step = self.plan_unit(UnitId(i), unit, &mut claims, clients);
            projected.push(project(unit, &step));
            units.push(step);
        }

        let n = self.sources.len();
        let mut sources = Vec::new();
        for k in 0..n {
            let index = (self.last_source + k) % n;
            let id = SourceId(index);
            let Some(op) = self.sources[index].front() else {
                continue;
            };
            let unit = self.mapping.route(op.op, id);
            let mut admitted = false;
            if let Some(u) = unit {
                let occ = &mut projected[u.0];
                if occ.accepts(self.units[u.0].is_pipelined()) {
                    *occ = occ.admitted();
                    admitted = true;
                }
            }
            sources.push(SourceStep {
                source: id,
                unit,
                admitted,
            });
        }

        CyclePlan {
            now,
            units,
            sources,
        }
    }

    fn plan_unit<P: ClientPort + ?Sized>(
        &self,
        id: UnitId,
        unit: &Unit,
        claims: &mut [Option<UnitId>],
        clients: &P,
    ) -> UnitStep {
        let Some(slot) = unit.front() else {
            return UnitStep::Idle;
        };
        if slot.age < unit.latency() {
            return UnitStep::Advance;
        }

        let source = &self.sources[slot.source.0];
        let stall = |reason, claimed| UnitStep::Stall {
            source: slot.source,
            reason,
            claimed,
        };
        if claims[slot.source.0].is_some_and(|other| other != id) {
            return stall(StallReason::Collision, false);
        }
        if slot.seq != source.next_retire() {
            return stall(StallReason::OutOfOrder, false);
        }
        claims[slot.source.0] = Some(id);

        let addr = slot.address();
        let ready = source
            .client()
            .and_then(|c| clients.client(c.id))
            .is_some_and(|c| c.check_output_availability(addr));
        if !ready {
            return stall(StallReason::ClientBusy, true);
        }

        UnitStep::Retire(Writeback {
            source: slot.source,
            seq: slot.seq,
            index: slot.index,
            addr,
            word: self.codec.word(slot.value, slot.width, slot.index),
            last: slot.index + 1 == self.codec.words(slot.width),
        })
    }

    /// Commits `plan`.
    ///
    /// `plan` must have been made by [`plan`](Self::plan) on this FPU for the
    /// kernel's current cycle. A plan for another cycle, or for a cycle already
    /// committed, is discarded without touching any state. Within a fresh plan,
    /// each write-back is checked against the unit's front slot and each admission
    /// against the unit's occupancy, so a plan that no longer matches the FPU never
    /// writes a word twice, drops a result or overfills a unit.
    ///
    /// # Returns
    ///
    /// [`ProcessResult::Failed`] if the plan was discarded, or if there was work and
    /// every active unit and every non-empty source stalled;
    /// [`ProcessResult::Success`] otherwise.
    pub fn apply<P: ClientPort + ?Sized>(
        &mut self,
        plan: &CyclePlan,
        kernel: &mut dyn Kernel,
        clients: &mut P,
    ) -> ProcessResult {
        let now = plan.now;
        if now != kernel.cycle() || self.committed == Some(now) {
            warn!(
                target: "fpu",
                planned = now,
                cycle = kernel.cycle(),
                "discarding a plan that does not match the current cycle"
            );
            return ProcessResult::Failed;
        }
        self.committed = Some(now);

        let mut units_active = 0usize;
        let mut units_failed = 0usize;

        for (i, step) in plan.units.iter().enumerate() {
            let id = UnitId(i);
            match *step {
                UnitStep::Idle => continue,
                UnitStep::Advance => {
                    let unit = &mut self.units[i];
                    unit.advance();
                    unit.clear_stall();
                }
                UnitStep::Retire(wb) if !self.holds(id, &wb) => {
                    let cycles = self.units[i].stall();
                    warn!(
                        target: "fpu",
                        stalled = cycles,
                        "unit {i}: planned word {} of {} is not at the front",
                        wb.index,
                        wb.addr
                    );
                    units_failed += 1;
                }
                UnitStep::Retire(wb) => {
                    if !self.write_back(id, now, wb, clients) {
                        units_failed += 1;
                    }
                }
                UnitStep::Stall {
                    source,
                    reason,
                    claimed,
                } => {
                    self.record_stall(id, now, source, reason, claimed);
                    units_failed += 1;
                }
            }
            units_active += 1;
        }

        let sources_active = plan.sources.len();
        let mut sources_failed = 0usize;
        for step in &plan.sources {
            let admitted = match step.unit {
                Some(unit) if step.admitted => self.admit(step.source, unit),
                _ => false,
            };
            if !admitted {
                sources_failed += 1;
                self.stats.admission_stalls += 1;
            }
        }

        let n = self.sources.len();
        if n > 0 {
            self.last_source = (self.last_source + 1) % n;
        }

        self.active = self.units.iter().any(|u| !u.is_empty());
        kernel.set_active(self.active_storage, self.active);

        self.stats.cycles += 1;
        trace!(
            target: "fpu",
            cycle = now,
            units_active,
            units_failed,
            sources_active,
            sources_failed,
            active = self.active,
            "pipeline cycle"
        );
        let busy = units_active + sources_active > 0;
        if busy && units_failed == units_active && sources_failed == sources_active {
            self.stats.cycles_failed += 1;
            ProcessResult::Failed
        } else {
            ProcessResult::Success
        }
    }

    /// Whether the front slot of `unit` is the ready result `wb` was planned from.
    fn holds(&self, unit: UnitId, wb: &Writeback) -> bool {
        let u = &self.units[unit.0];
        u.front_ready()
            && u.front().is_some_and(|s| {
                s.source == wb.source && s.seq == wb.seq && s.index == wb.index
            })
    }

    /// Delivers one word; returns whether the client accepted it.
    fn write_back<P: ClientPort + ?Sized>(
        &mut self,
        unit: UnitId,
        now: CycleNo,
        wb: Writeback,
        clients: &mut P,
    ) -> bool {
        let source = &mut self.sources[wb.source.0];
        source.mark_write(now, unit);
        let written = source
            .client()
            .map(|c| c.id)
            .and_then(|id| clients.client_mut(id))
            .is_some_and(|c| c.write_result(wb.addr, wb.word));
        if !written {
            self.record_stall(unit, now, wb.source, StallReason::WriteRejected, true);
            return false;
        }

        self.stats.words_written += 1;
        let u = &mut self.units[unit.0];
        if let Some(slot) = u.complete_word(wb.last) {
            debug!(
                target: "fpu",
                client = %self.sources[wb.source.0].client_name(),
                "unit {} completed {} <- {:.6}",
                unit.0,
                slot.dest,
                slot.value
            );
            self.sources[wb.source.0].retire();
            u.advance();
            self.stats.ops_retired += 1;
        }
        u.clear_stall();
        true
    }

    fn record_stall(
        &mut self,
        unit: UnitId,
        now: CycleNo,
        source: SourceId,
        reason: StallReason,
        claimed: bool,
    ) {
        if claimed {
            self.sources[source.0].mark_write(now, unit);
        }
        let cycles = self.units[unit.0].stall();
        match reason {
            StallReason::OutOfOrder => self.stats.stalls_ordering += 1,
            StallReason::Collision => self.stats.stalls_collision += 1,
            StallReason::ClientBusy => self.stats.stalls_client += 1,
            StallReason::WriteRejected => self.stats.stalls_write_rejected += 1,
        }
        let client = self.sources[source.0].client_name();
        if reason.is_routine() {
            event!(
                target: "fpu",
                Level::DEBUG,
                client,
                stalled = cycles,
                "unit {}: {reason}",
                unit.0
            );
        } else {
            event!(
                target: "fpu",
                Level::WARN,
                client,
                stalled = cycles,
                "unit {}: {reason}",
                unit.0
            );
        }
    }

    /// Moves the head operation of `source` into `unit`.
    fn admit(&mut self, source: SourceId, unit: UnitId) -> bool {
        if !self.units[unit.0].can_accept() {
            return false;
        }
        let Some((op, seq)) = self.sources[source.0].admit() else {
            return false;
        };
        debug!(
            target: "fpu",
            client = %self.sources[source.0].client_name(),
            "unit {} executing {op}",
            unit.0
        );
        self.units[unit.0].push(Slot {
            dest: op.dest,
            width: op.width,
            index: 0,
            age: 1,
            value: op.compute(),
            source,
            seq,
        });
        self.stats.ops_admitted += 1;
        self.stats.op_counts[op.op.index()] += 1;
        true
    }
}

/// Occupancy of `unit` once `step` has been applied.
fn project(unit: &Unit, step: &UnitStep) -> Occupancy {
    let occ = unit.occupancy();
    match step {
        UnitStep::Idle => Occupancy::default(),
        UnitStep::Advance => Occupancy {
            len: occ.len,
            newest_age: occ.newest_age + 1,
        },
        UnitStep::Retire(wb) if wb.last => match occ.len - 1 {
            0 => Occupancy::default(),
            len => Occupancy {
                len,
                newest_age: occ.newest_age + 1,
            },
        },
        UnitStep::Retire(_) | UnitStep::Stall { .. } => occ,
    }
}

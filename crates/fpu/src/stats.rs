//! FPU statistics collection and reporting.
//!
//! This module tracks performance metrics for the shared FPU. It provides:
//! 1. **Cycles:** Invocations of the FPU process and how many of them stalled completely.
//! 2. **Queues:** Operations queued, rejected by a full queue, admitted, and held back.
//! 3. **Write-back:** Words written, operations retired, and stalls by cause.
//! 4. **Operation mix:** Admitted operations by kind.

use std::fmt;
use std::time::Instant;

use crate::fpu::op::{FpuOp, NUM_OPS};

/// FPU statistics.
#[derive(Clone, Debug)]
pub struct FpuStats {
    start_time: Instant,
    /// Cycles the FPU process was invoked.
    pub cycles: u64,
    /// Invocations where every active unit and source stalled.
    pub cycles_failed: u64,

    /// Operations accepted into an input queue.
    pub ops_queued: u64,
    /// Queue requests refused because the input queue was full.
    pub queue_rejections: u64,
    /// Operations moved from an input queue into a unit.
    pub ops_admitted: u64,
    /// Source-cycles where the head operation could not enter its unit.
    pub admission_stalls: u64,

    /// Result words delivered to clients.
    pub words_written: u64,
    /// Operations whose last word has been delivered.
    pub ops_retired: u64,
    /// Write-backs refused because the client was not ready.
    pub stalls_client: u64,
    /// Write-backs refused because another unit already wrote to the same source this cycle.
    pub stalls_collision: u64,
    /// Write-backs held because an older result of the same source was still in flight.
    pub stalls_ordering: u64,
    /// Write-backs the client rejected after reporting itself ready.
    pub stalls_write_rejected: u64,

    /// Admitted operations by kind, indexed by [`FpuOp::index`].
    pub op_counts: [u64; NUM_OPS],
}

impl Default for FpuStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            cycles_failed: 0,
            ops_queued: 0,
            queue_rejections: 0,
            ops_admitted: 0,
            admission_stalls: 0,
            words_written: 0,
            ops_retired: 0,
            stalls_client: 0,
            stalls_collision: 0,
            stalls_ordering: 0,
            stalls_write_rejected: 0,
            op_counts: [0; NUM_OPS],
        }
    }
}

/// Section names for selective stats output.
///
/// Pass an empty slice to `write_sections` to emit all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "queues", "writeback", "op_mix"];

impl FpuStats {
    /// Total write-back stalls of any cause.
    pub const fn writeback_stalls(&self) -> u64 {
        self.stalls_client + self.stalls_collision + self.stalls_ordering + self.stalls_write_rejected
    }

    /// Writes the requested sections.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]; an empty slice
    /// writes all of them. Ratios divide by `max(n, 1)` so an idle FPU reports zeros.
    ///
    /// # Errors
    ///
    /// Propagates errors from `out`.
    pub fn write_sections(&self, out: &mut dyn fmt::Write, sections: &[String]) -> fmt::Result {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let cyc = self.cycles.max(1) as f64;
        let pct = |n: u64, d: f64| (n as f64 / d) * 100.0;

        if want("summary") {
            let seconds = self.start_time.elapsed().as_secs_f64();
            writeln!(out, "==========================================================")?;
            writeln!(out, "SHARED FPU STATISTICS")?;
            writeln!(out, "==========================================================")?;
            writeln!(out, "host_seconds             {seconds:.4} s")?;
            writeln!(out, "fpu_cycles               {}", self.cycles)?;
            writeln!(
                out,
                "fpu_cycles_failed        {} ({:.2}%)",
                self.cycles_failed,
                pct(self.cycles_failed, cyc)
            )?;
            writeln!(
                out,
                "fpu_ops_per_cycle        {:.4}",
                self.ops_retired as f64 / cyc
            )?;
            writeln!(out, "----------------------------------------------------------")?;
        }
        if want("queues") {
            writeln!(out, "INPUT QUEUES")?;
            writeln!(out, "  queue.accepted         {}", self.ops_queued)?;
            writeln!(out, "  queue.rejected         {}", self.queue_rejections)?;
            writeln!(out, "  queue.admitted         {}", self.ops_admitted)?;
            writeln!(out, "  queue.admit_stalls     {}", self.admission_stalls)?;
            writeln!(out, "----------------------------------------------------------")?;
        }
        if want("writeback") {
            let stalls = self.writeback_stalls().max(1) as f64;
            writeln!(out, "WRITE-BACK")?;
            writeln!(out, "  wb.words               {}", self.words_written)?;
            writeln!(out, "  wb.retired             {}", self.ops_retired)?;
            writeln!(
                out,
                "  stalls.client          {} ({:.2}%)",
                self.stalls_client,
                pct(self.stalls_client, stalls)
            )?;
            writeln!(
                out,
                "  stalls.collision       {} ({:.2}%)",
                self.stalls_collision,
                pct(self.stalls_collision, stalls)
            )?;
            writeln!(
                out,
                "  stalls.ordering        {} ({:.2}%)",
                self.stalls_ordering,
                pct(self.stalls_ordering, stalls)
            )?;
            writeln!(
                out,
                "  stalls.rejected        {} ({:.2}%)",
                self.stalls_write_rejected,
                pct(self.stalls_write_rejected, stalls)
            )?;
            writeln!(out, "----------------------------------------------------------")?;
        }
        if want("op_mix") {
            let total = self.ops_admitted.max(1) as f64;
            writeln!(out, "OPERATION MIX")?;
            for op in FpuOp::ALL {
                let n = self.op_counts[op.index()];
                let label = format!("op.{}", op.name().to_ascii_lowercase());
                writeln!(out, "  {label:<22} {n} ({:.2}%)", pct(n, total))?;
            }
        }
        writeln!(out, "==========================================================")
    }

    /// Prints only the requested sections to stdout.
    pub fn print_sections(&self, sections: &[String]) {
        let mut text = String::new();
        if self.write_sections(&mut text, sections).is_ok() {
            print!("{text}");
        }
    }

    /// Prints all sections to stdout.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}

impl fmt::Display for FpuStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut text = String::new();
        self.write_sections(&mut text, &[])?;
        f.write_str(&text)
    }
}

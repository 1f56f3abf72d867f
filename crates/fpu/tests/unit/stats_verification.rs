//! # Statistics Verification
//!
//! Counter derivations and the sectioned text report.

use fpusim_core::fpu::op::FpuOp;
use fpusim_core::stats::{FpuStats, STATS_SECTIONS};

fn sample() -> FpuStats {
    let mut stats = FpuStats::default();
    stats.cycles = 10;
    stats.cycles_failed = 2;
    stats.ops_queued = 4;
    stats.ops_admitted = 4;
    stats.ops_retired = 4;
    stats.stalls_client = 3;
    stats.stalls_collision = 1;
    stats.op_counts[FpuOp::Add.index()] = 3;
    stats.op_counts[FpuOp::Sqrt.index()] = 1;
    stats
}

#[test]
fn test_writeback_stalls_sum_all_causes() {
    let mut stats = sample();
    stats.stalls_ordering = 2;
    stats.stalls_write_rejected = 5;
    assert_eq!(stats.writeback_stalls(), 11);
}

#[test]
fn test_full_report_has_every_section() {
    let text = sample().to_string();
    assert!(text.contains("SHARED FPU STATISTICS"));
    assert!(text.contains("fpu_cycles_failed        2 (20.00%)"));
    assert!(text.contains("fpu_ops_per_cycle        0.4000"));
    assert!(text.contains("INPUT QUEUES"));
    assert!(text.contains("stalls.client          3 (75.00%)"));
    assert!(text.contains("op.add"));
    assert!(text.contains("op.sqrt"));
    assert_eq!(STATS_SECTIONS.len(), 4);
}

#[test]
fn test_selected_sections_only() {
    let mut text = String::new();
    sample()
        .write_sections(&mut text, &["op_mix".to_owned()])
        .unwrap();
    assert!(!text.contains("SHARED FPU STATISTICS"));
    assert!(!text.contains("WRITE-BACK"));
    assert!(text.contains("OPERATION MIX"));
    assert!(text.contains("75.00%"));
}

#[test]
fn test_idle_report_divides_safely() {
    let text = FpuStats::default().to_string();
    assert!(text.contains("fpu_ops_per_cycle        0.0000"));
    assert!(!text.contains("NaN"));
}

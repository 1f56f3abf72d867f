//! # Inspection Tests
//!
//! The text dump of queues and pipelines.

use crate::common::harness::{TestContext, config, unit};
use fpusim_core::Fpu;
use fpusim_core::common::RegAddr;
use fpusim_core::config::FpuConfig;
use fpusim_core::fpu::op::FpuOp;
use fpusim_core::sim::Clock;
use pretty_assertions::assert_eq;

fn dump(ctx: &TestContext) -> String {
    let mut out = String::new();
    ctx.sim.fpu.read(&mut out).unwrap();
    out
}

#[test]
fn test_empty_fpu_dump() {
    let ctx = TestContext::new(&config(vec![unit(&["mul", "add"], 5, true)]), 1);
    let out = dump(&ctx);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Source: cpu0",
            "(Empty)",
            "",
            "",
            "Unit:       #0",
            "Pipelined:  true",
            "Latency:    5 cycles",
            "Operations: ADD MUL",
            "",
            "(Empty)",
            "",
        ]
    );
}

#[test]
fn test_dump_shows_queued_and_in_flight_operations() {
    let mut ctx = TestContext::new(&config(vec![unit(&["add", "sqrt"], 3, false)]), 1);
    assert!(ctx.queue(0, FpuOp::Add, 8, 1.0, 2.0, RegAddr::float(0)));
    assert!(ctx.queue(0, FpuOp::Sqrt, 8, 0.0, 9.0, RegAddr::float(1)));
    let _ = ctx.step();

    let out = dump(&ctx);
    assert!(out.contains(" Op  | Sz |           A          |            B         | Dest "));
    assert!(out.contains(&format!("SQRT | 64 | {:20} | {:>20} | $f1", "", "9.000000000000")));
    assert!(out.contains(" t | Sz |        Result       |  Reg  | Destination"));
    assert!(out.contains(&format!(" 1 | 64 | {:>20} | $f0   | cpu0", "3.000000000000")));
}

#[test]
fn test_partially_written_result_shows_its_destination() {
    let cfg = FpuConfig {
        integer_bytes: 4,
        ..config(vec![unit(&["add"], 2, false)])
    };
    let mut ctx = TestContext::new(&cfg, 1);
    assert!(ctx.queue(0, FpuOp::Add, 8, 1.0, 1.0, RegAddr::float(4)));
    let _ = ctx.run(3);
    assert_eq!(ctx.log.len(), 1);

    let out = dump(&ctx);
    assert!(out.contains(&format!(" 2 | 64 | {:>20} | $f4   | cpu0", "2.000000000000")));
    assert!(!out.contains("$f5"));
}

#[test]
fn test_unconnected_source_is_labelled() {
    let mut clock = Clock::new();
    let fpu = Fpu::new("spare", &config(vec![unit(&["add"], 1, false)]), 1, &mut clock).unwrap();
    let mut out = String::new();
    fpu.read(&mut out).unwrap();
    assert!(out.starts_with("Source: not connected\n(Empty)\n"));
}

#[test]
fn test_info_text() {
    assert!(Fpu::info().starts_with("The Floating-Point Unit executes"));
}

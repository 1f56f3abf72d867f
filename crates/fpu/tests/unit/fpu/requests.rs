//! # Request Tests
//!
//! The queueing contract, backpressure from full input queues, the active flag,
//! and the per-cycle process result.

use crate::common::harness::{TestContext, config, unit};
use crate::common::mocks::client::RecordingClient;
use fpusim_core::Simulator;
use fpusim_core::common::{ClientId, FpuError, RegAddr, SourceId};
use fpusim_core::config::FpuConfig;
use fpusim_core::fpu::op::FpuOp;
use fpusim_core::sim::{ProcessResult, StorageTraceSet};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_full_queue_rejects_until_admission() {
    let cfg = FpuConfig {
        input_queue_size: 2,
        ..config(vec![unit(&["add"], 3, false)])
    };
    let mut ctx = TestContext::new(&cfg, 1);
    assert!(ctx.queue(0, FpuOp::Add, 8, 1.0, 0.0, RegAddr::float(0)));
    assert!(ctx.queue(0, FpuOp::Add, 8, 2.0, 0.0, RegAddr::float(1)));
    assert!(!ctx.queue(0, FpuOp::Add, 8, 3.0, 0.0, RegAddr::float(2)));
    assert_eq!(ctx.sim.fpu.stats().queue_rejections, 1);

    let _ = ctx.step();
    assert!(ctx.queue(0, FpuOp::Add, 8, 3.0, 0.0, RegAddr::float(2)));
    ctx.run_until_idle(20);
    assert_eq!(ctx.values_for(0), vec![1.0, 2.0, 3.0]);
}

#[test]
fn test_unsupported_operation_is_an_error() {
    let mut ctx = TestContext::new(&config(vec![unit(&["add", "sub"], 1, true)]), 1);
    let source = ctx.sources[0];
    let err = ctx
        .sim
        .queue_operation(source, FpuOp::Mul, 8, 1.0, 1.0, RegAddr::float(0))
        .unwrap_err();
    assert!(matches!(err, FpuError::NoCapableUnit(FpuOp::Mul)));
    assert_eq!(err.to_string(), "no unit implements MUL");
    assert!(ctx.sim.fpu.source(source).is_empty());
}

#[rstest]
#[case::narrower_than_native(4)]
#[case::not_a_float_width(16)]
#[case::zero(0)]
#[should_panic(expected = "operand size")]
fn test_bad_operand_size_panics(#[case] size: usize) {
    let mut ctx = TestContext::new(&config(vec![unit(&["add"], 1, true)]), 1);
    let _ = ctx.queue(0, FpuOp::Add, size, 1.0, 1.0, RegAddr::float(0));
}

#[test]
#[should_panic(expected = "has no registered client")]
fn test_queue_on_unregistered_source_panics() {
    let mut sim = Simulator::new(&FpuConfig::default(), 2).unwrap();
    let client = RecordingClient::new("cpu0");
    let _ = sim.register_client(ClientId(0), &client, StorageTraceSet::nothing());
    let _ = sim.queue_operation(SourceId(1), FpuOp::Add, 8, 1.0, 1.0, RegAddr::float(0));
}

#[test]
fn test_idle_cycle_succeeds() {
    let mut ctx = TestContext::new(&FpuConfig::default(), 2);
    assert!(!ctx.sim.fpu.is_sensitive());
    assert_eq!(ctx.step(), ProcessResult::Success);
    let plan = ctx.sim.fpu.plan(ctx.cycle(), &ctx.clients);
    assert!(plan.is_idle());
}

#[test]
fn test_blocked_admission_alone_fails_cycle() {
    let mut ctx = TestContext::new(&config(vec![unit(&["add"], 1, false)]), 1);
    ctx.clients[0].ready = false;
    assert!(ctx.queue(0, FpuOp::Add, 8, 1.0, 1.0, RegAddr::float(0)));
    assert!(ctx.queue(0, FpuOp::Add, 8, 1.0, 1.0, RegAddr::float(1)));

    // Unit stalled on the client and the queued operation cannot enter.
    assert_eq!(ctx.run(2), vec![ProcessResult::Success, ProcessResult::Failed]);
    assert_eq!(ctx.sim.fpu.stats().admission_stalls, 1);
}

#[test]
fn test_active_flag_follows_in_flight_results() {
    let mut ctx = TestContext::new(&config(vec![unit(&["mul"], 2, false)]), 1);
    let active = ctx.sim.fpu.active_storage();
    assert!(!ctx.sim.clock.flag(active));

    assert!(ctx.queue(0, FpuOp::Mul, 8, 2.0, 2.0, RegAddr::float(0)));
    assert!(ctx.sim.fpu.is_sensitive());
    let _ = ctx.step();
    assert!(ctx.sim.fpu.is_active());
    assert!(ctx.sim.clock.flag(active));

    let _ = ctx.run(2);
    assert!(!ctx.sim.fpu.is_active());
    assert!(!ctx.sim.clock.flag(active));
    assert!(!ctx.sim.fpu.is_sensitive());
}

#[test]
fn test_stats_count_queue_and_mix() {
    let cfg = config(vec![unit(&["add", "sub", "mul", "div", "sqrt"], 1, true)]);
    let mut ctx = TestContext::new(&cfg, 1);
    for op in [FpuOp::Add, FpuOp::Sqrt, FpuOp::Sqrt] {
        assert!(ctx.queue(0, op, 8, 1.0, 4.0, RegAddr::float(0)));
    }
    ctx.run_until_idle(10);

    let stats = ctx.sim.fpu.stats();
    assert_eq!(stats.ops_queued, 3);
    assert_eq!(stats.ops_admitted, 3);
    assert_eq!(stats.ops_retired, 3);
    assert_eq!(stats.op_counts[FpuOp::Add.index()], 1);
    assert_eq!(stats.op_counts[FpuOp::Sqrt.index()], 2);
    assert_eq!(ctx.values_for(0), vec![5.0, 2.0, 2.0]);
}

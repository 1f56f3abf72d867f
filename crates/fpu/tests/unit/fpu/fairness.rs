//! # Fairness Tests
//!
//! Every non-empty source is visited once per cycle, starting from a pointer that
//! advances by one each cycle.

use crate::common::harness::{TestContext, config, unit};
use fpusim_core::common::{RegAddr, SourceId};
use fpusim_core::fpu::op::FpuOp;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_pointer_rotates_every_cycle() {
    let mut ctx = TestContext::new(&config(vec![unit(&["add"], 1, true)]), 3);
    for k in 1..=7 {
        let _ = ctx.step();
        assert_eq!(ctx.sim.fpu.last_source(), SourceId(k % 3));
    }
}

#[test]
fn test_visiting_order_starts_at_pointer() {
    let mut ctx = TestContext::new(&config(vec![unit(&["add"], 1, false)]), 3);
    let _ = ctx.step();
    for c in 0..3 {
        assert!(ctx.queue(c, FpuOp::Add, 8, 1.0, 1.0, RegAddr::float(0)));
    }

    let plan = ctx.sim.fpu.plan(ctx.cycle(), &ctx.clients);
    let order: Vec<usize> = plan.sources().iter().map(|s| s.source.0).collect();
    assert_eq!(order, vec![1, 2, 0]);
    let admitted: Vec<usize> = plan.admissions().map(|(s, _)| s.0).collect();
    assert_eq!(admitted, vec![1]);
}

#[test]
fn test_shared_unit_serves_clients_in_turn() {
    let mut ctx = TestContext::new(&config(vec![unit(&["add"], 1, false)]), 3);
    for c in 0..3 {
        for r in 0..2 {
            assert!(ctx.queue(c, FpuOp::Add, 8, 1.0, 1.0, RegAddr::float(r)));
        }
    }
    ctx.run_until_idle(20);

    let served: Vec<(u64, usize)> = ctx.log.iter().map(|w| (w.cycle, w.client)).collect();
    assert_eq!(
        served,
        vec![(1, 0), (2, 1), (3, 2), (4, 0), (5, 1), (6, 2)]
    );
}

proptest! {
    #[test]
    fn prop_no_source_starves(clients in 1usize..5, ops in 1usize..4) {
        let mut ctx = TestContext::new(&config(vec![unit(&["add"], 1, false)]), clients);
        for c in 0..clients {
            for r in 0..ops {
                prop_assert!(ctx.queue(c, FpuOp::Add, 8, r as f64, 0.0, RegAddr::float(r as u32)));
            }
        }
        // One result per cycle after the first admission.
        ctx.run_until_idle((clients * ops) as u64 + 2);

        for c in 0..clients {
            let writes = ctx.writes_to(c);
            prop_assert_eq!(writes.len(), ops);
            let regs: Vec<u32> = writes.iter().map(|w| w.addr.index).collect();
            prop_assert_eq!(regs, (0..ops as u32).collect::<Vec<_>>());
        }
        let stats = ctx.sim.fpu.stats();
        prop_assert_eq!(stats.ops_retired, (clients * ops) as u64);
    }
}

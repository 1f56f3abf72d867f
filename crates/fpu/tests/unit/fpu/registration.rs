//! # Registration Tests
//!
//! Storage allocated at construction and the storage traces the pipeline process
//! declares as clients connect.

use crate::common::mocks::client::{MockClient, RecordingClient};
use fpusim_core::Fpu;
use fpusim_core::common::{ClientId, FpuError, SourceId};
use fpusim_core::config::FpuConfig;
use fpusim_core::sim::{Clock, Kernel, StorageId, StorageTraceSet};
use pretty_assertions::assert_eq;

fn setup(sources: usize) -> (Clock, Fpu) {
    let mut clock = Clock::new();
    let fpu = Fpu::new("fpu0", &FpuConfig::default(), sources, &mut clock).unwrap();
    (clock, fpu)
}

#[test]
fn test_construction_allocates_named_storage() {
    let (clock, fpu) = setup(2);
    assert_eq!(clock.find_storage("fpu0.active"), Some(fpu.active_storage()));
    let s1 = clock.find_storage("fpu0.source1.inputs").unwrap();
    assert_eq!(fpu.source(SourceId(1)).storage(), s1);
    assert_eq!(fpu.source_trace(SourceId(1)), StorageTraceSet::single(s1));
    assert_eq!(fpu.num_sources(), 2);
    assert_eq!(fpu.source(SourceId(0)).client_name(), "not connected");
}

#[test]
fn test_initial_traces_only_touch_active_flag() {
    let (clock, fpu) = setup(2);
    let traces = clock.traces("fpu0.pipeline").unwrap();
    assert_eq!(traces, fpu.storage_traces());
    assert_eq!(traces.len(), 2);
    assert!(traces.contains(&[]));
    assert!(traces.contains(&[fpu.active_storage()]));
}

#[test]
fn test_traces_cover_every_write_order() {
    let (mut clock, mut fpu) = setup(2);
    let active = fpu.active_storage();
    let r0 = clock.allocate_storage("cpu0.regs");
    let r1 = clock.allocate_storage("cpu1.regs");

    let c0 = RecordingClient::new("cpu0");
    let c1 = RecordingClient::new("cpu1");
    assert_eq!(
        fpu.register_client(&mut clock, ClientId(0), &c0, StorageTraceSet::single(r0)),
        SourceId(0)
    );
    assert_eq!(clock.traces("fpu0.pipeline").unwrap().len(), 4);

    assert_eq!(
        fpu.register_client(&mut clock, ClientId(1), &c1, StorageTraceSet::single(r1)),
        SourceId(1)
    );
    let traces = clock.traces("fpu0.pipeline").unwrap();
    // {ε, r0, r1, r0 r1, r1 r0} followed optionally by the active flag.
    assert_eq!(traces.len(), 10);
    let expected: [&[StorageId]; 5] = [&[], &[active], &[r0, r1], &[r1, r0, active], &[r0, active]];
    for t in expected {
        assert!(traces.contains(t), "missing trace {t:?}");
    }
    assert!(!traces.contains(&[r0, r0]));
    assert!(!traces.contains(&[active, r0]));
}

#[test]
fn test_registration_captures_client_name() {
    let (mut clock, mut fpu) = setup(1);
    let mut client = MockClient::new();
    let _ = client.expect_name().times(1).return_const("core7".to_owned());
    let _ = client.expect_check_output_availability().never();
    let _ = client.expect_write_result().never();

    let source = fpu.register_client(&mut clock, ClientId(3), &client, StorageTraceSet::nothing());
    let binding = fpu.source(source).client().unwrap();
    assert_eq!(binding.id, ClientId(3));
    assert_eq!(binding.name, "core7");
}

#[test]
#[should_panic(expected = "no free source")]
fn test_registering_too_many_clients_panics() {
    let (mut clock, mut fpu) = setup(1);
    let a = RecordingClient::new("a");
    let b = RecordingClient::new("b");
    let _ = fpu.register_client(&mut clock, ClientId(0), &a, StorageTraceSet::nothing());
    let _ = fpu.register_client(&mut clock, ClientId(1), &b, StorageTraceSet::nothing());
}

#[test]
fn test_invalid_configuration_is_rejected() {
    let mut clock = Clock::new();
    let config = FpuConfig {
        units: Vec::new(),
        ..FpuConfig::default()
    };
    let err = Fpu::new("fpu", &config, 1, &mut clock).unwrap_err();
    assert!(matches!(err, FpuError::NoUnits));
    assert_eq!(clock.find_storage("fpu.active"), None);
}

#[test]
fn test_storage_ids_are_distinct() {
    let (clock, fpu) = setup(3);
    let mut ids: Vec<StorageId> = (0..3).map(|i| fpu.source(SourceId(i)).storage()).collect();
    ids.push(fpu.active_storage());
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 4);
    assert_eq!(clock.cycle(), 0);
}

//! # Configuration Tests
//!
//! Defaults, JSON deserialization, operation-name resolution, and validation.

use fpusim_core::common::FpuError;
use fpusim_core::config::*;
use fpusim_core::fpu::op::FpuOp;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_config_default() {
    let config = FpuConfig::default();
    assert_eq!(config.units.len(), 1);
    assert_eq!(config.input_queue_size, 2);
    assert_eq!(config.integer_bytes, 8);
    assert!(!config.big_endian);
    assert!(config.validate().is_ok());
}

#[test]
fn test_unit_config_defaults() {
    let unit = UnitConfig::default();
    assert_eq!(unit.latency, 4);
    assert!(unit.pipelined);
    assert_eq!(unit.operations(0), FpuOp::ALL.to_vec());
}

#[test]
fn test_json_fills_missing_fields() {
    let config = FpuConfig::from_json(r#"{ "units": [ { "ops": ["div"] } ] }"#).unwrap();
    assert_eq!(config.input_queue_size, 2);
    assert_eq!(config.integer_bytes, 8);
    assert_eq!(config.units[0].latency, 4);
    assert!(!config.units[0].pipelined);
}

#[test]
fn test_operation_names_are_resolved() {
    let unit = UnitConfig {
        ops: vec!["sqrt".into(), "ADD".into(), " add ".into(), "Mul".into(), "fma".into()],
        latency: 1,
        pipelined: false,
    };
    assert_eq!(unit.operations(0), vec![FpuOp::Add, FpuOp::Mul, FpuOp::Sqrt]);
}

#[rstest]
#[case::no_units(r#"{ "units": [] }"#, "no execution units configured")]
#[case::unknown_ops_only(r#"{ "units": [ { "ops": ["fma"] } ] }"#, "no operation specified for unit 0")]
#[case::zero_latency(
    r#"{ "units": [ { "ops": ["add"] }, { "ops": ["mul"], "latency": 0 } ] }"#,
    "unit 1 has zero latency"
)]
#[case::zero_queue(
    r#"{ "units": [ { "ops": ["add"] } ], "input_queue_size": 0 }"#,
    "input queue size must be at least 1"
)]
#[case::odd_integer_width(
    r#"{ "units": [ { "ops": ["add"] } ], "integer_bytes": 2 }"#,
    "unsupported native integer width: 2 bytes"
)]
fn test_invalid_configuration(#[case] json: &str, #[case] message: &str) {
    let err = FpuConfig::from_json(json).unwrap_err();
    assert_eq!(err.to_string(), message);
}

#[test]
fn test_malformed_json() {
    let err = FpuConfig::from_json("{ units: ").unwrap_err();
    assert!(matches!(err, FpuError::Json(_)));
    assert!(err.to_string().starts_with("invalid configuration"));
}

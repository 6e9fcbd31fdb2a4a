//! Configuration files and policy behavior end to end.

use std::fs;

use super::common::{assert_well_formed, recorded_with};
use guardstack::testing::tamper_checksum;
use guardstack::{ChecksumPolicy, StackConfig, StackError};

fn load(json: &str) -> StackConfig {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stack.json");
    fs::write(&path, json).unwrap();
    StackConfig::from_json(&fs::read_to_string(&path).unwrap()).unwrap()
}

#[test]
fn test_empty_file_object_is_default() {
    assert_eq!(load("{}"), StackConfig::default());
}

#[test]
fn test_report_only_from_file() {
    let config = load(r#"{ "checksum_policy": "report_only", "repoison_on_shrink": false }"#);
    assert_eq!(config.checksum_policy, ChecksumPolicy::ReportOnly);
    assert!(!config.repoison_on_shrink);
    assert!(config.verify_after_mutation);

    let mut stack = recorded_with::<i32>(1, config);
    stack.push(1).unwrap();
    tamper_checksum(&mut stack, 12345);
    assert_eq!(stack.pop(), Ok(1));
    assert_well_formed(&stack);
}

#[test]
fn test_enforce_from_file() {
    let mut stack = recorded_with::<i32>(1, load(r#"{ "checksum_policy": "enforce" }"#));
    stack.push(1).unwrap();
    tamper_checksum(&mut stack, 12345);
    assert!(matches!(
        stack.pop(),
        Err(StackError::ChecksumMismatch { stored: 12345, .. })
    ));
}

#[test]
fn test_malformed_config_is_an_error() {
    assert!(StackConfig::from_json(r#"{ "checksum_policy": 3 }"#).is_err());
    assert!(StackConfig::from_json("not json").is_err());
}

#[test]
fn test_lenient_roundtrips_through_json() {
    let lenient = StackConfig::lenient();
    let raw = serde_json::to_string(&lenient).unwrap();
    assert_eq!(StackConfig::from_json(&raw).unwrap(), lenient);
}

//! # Configuration Tests
//!
//! Defaults, JSON deserialization with partial documents, file loading, and
//! validation.

use std::io::Write;

use rstest::rstest;
use tamasim_core::HalError;
use tamasim_core::config::*;
use tamasim_core::hal::{LevelMask, LogLevel};

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.log.levels, vec![LogLevel::Error]);
    assert!((config.clock.speed - 1.0).abs() < f64::EPSILON);
    assert!(config.clock.pacing);
    assert_eq!(config.memory.budget_bytes, None);
    assert_eq!(config.session.poll_interval, 1000);
    assert_eq!(config.session.max_steps, None);
    assert!(config.validate().is_ok());
}

#[test]
fn test_empty_document_is_default() {
    assert_eq!(Config::from_json("{}").unwrap(), Config::default());
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let config = Config::from_json(r#"{ "clock": { "pacing": false } }"#).unwrap();
    assert!(!config.clock.pacing);
    assert!((config.clock.speed - 1.0).abs() < f64::EPSILON);
    assert_eq!(config.session, SessionConfig::default());
}

#[test]
fn test_log_mask_from_levels() {
    let config = Config::from_json(r#"{ "log": { "levels": ["info", "int", "cpu"] } }"#).unwrap();
    assert_eq!(
        config.log.mask(),
        LevelMask::NONE
            .with(LogLevel::Info)
            .with(LogLevel::Interrupt)
            .with(LogLevel::Cpu)
    );
}

#[test]
fn test_empty_levels_disable_logging() {
    let config = Config::from_json(r#"{ "log": { "levels": [] } }"#).unwrap();
    assert!(config.log.mask().is_empty());
}

#[rstest]
#[case::unknown_field(r#"{ "clock": { "sped": 2.0 } }"#)]
#[case::unknown_section(r#"{ "video": {} }"#)]
#[case::bad_level(r#"{ "log": { "levels": ["verbose"] } }"#)]
#[case::wrong_type(r#"{ "session": { "poll_interval": "often" } }"#)]
#[case::not_json("clock = 1")]
fn test_parse_errors(#[case] json: &str) {
    assert!(matches!(Config::from_json(json), Err(HalError::ConfigParse(_))));
}

#[rstest]
#[case::zero_speed(r#"{ "clock": { "speed": 0.0 } }"#, "clock.speed")]
#[case::negative_speed(r#"{ "clock": { "speed": -1.5 } }"#, "clock.speed")]
#[case::zero_poll(r#"{ "session": { "poll_interval": 0 } }"#, "session.poll_interval")]
fn test_validation_errors(#[case] json: &str, #[case] field: &str) {
    match Config::from_json(json) {
        Err(HalError::InvalidConfig(message)) => assert!(message.contains(field), "{message}"),
        other => panic!("expected InvalidConfig, got {other:?}"),
    }
}

#[test]
fn test_non_finite_speed_is_invalid() {
    let mut config = Config::default();
    config.clock.speed = f64::INFINITY;
    assert!(matches!(config.validate(), Err(HalError::InvalidConfig(_))));
    config.clock.speed = f64::NAN;
    assert!(matches!(config.validate(), Err(HalError::InvalidConfig(_))));
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "memory": {{ "budget_bytes": 2048 }}, "session": {{ "max_steps": 9 }} }}"#
    )
    .unwrap();
    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.memory.budget_bytes, Some(2048));
    assert_eq!(config.session.max_steps, Some(9));
}

#[test]
fn test_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::from_file(dir.path().join("absent.json"));
    assert!(matches!(result, Err(HalError::Io(_))));
}

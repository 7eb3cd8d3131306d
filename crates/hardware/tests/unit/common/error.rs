//! # Error Tests
//!
//! Display output and conversions of `HalError`.

use tamasim_core::HalError;
use tamasim_core::hal::Slot;

#[test]
fn test_missing_slot_names_the_slot() {
    let err = HalError::MissingSlot(Slot::SleepUntil);
    assert_eq!(
        err.to_string(),
        "hardware services table is missing the `sleep_until` slot"
    );
}

#[test]
fn test_register_while_running_reports_generation() {
    let err = HalError::RegisterWhileRunning { generation: 3 };
    assert!(err.to_string().contains("generation 3"));
}

#[test]
fn test_json_error_converts() {
    let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
    let err: HalError = json_err.into();
    assert!(matches!(err, HalError::ConfigParse(_)));
}

#[test]
fn test_io_error_converts() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let err = HalError::from(io);
    assert!(matches!(err, HalError::Io(_)));
    assert!(err.to_string().contains("gone"));
}

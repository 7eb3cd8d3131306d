//! # Service Table Tests
//!
//! Construction refuses partial tables; a built table dispatches every slot to exactly
//! the function it was built with.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use pretty_assertions::assert_eq;
use tamasim_core::HalError;
use tamasim_core::common::Timestamp;
use tamasim_core::hal::{HardwareServices, LevelMask, LogLevel, PollStatus, ServiceTable, Slot};
use tamasim_core::host::{Clock, MonotonicClock};

use crate::common::harness::{Call, CallLog, recording_builder, recording_table};

#[test]
fn test_empty_builder_reports_first_slot() {
    let builder = ServiceTable::builder();
    assert_eq!(builder.missing_slots(), Slot::ALL.to_vec());
    let err = builder.build().unwrap_err();
    assert!(matches!(err, HalError::MissingSlot(Slot::Allocate)));
}

#[test]
fn test_partial_builder_reports_first_gap_in_abi_order() {
    let builder = ServiceTable::builder()
        .allocate(|_| None)
        .release(drop)
        .halt(|| {})
        .log_discard()
        .poll_input(|| PollStatus::Continue);
    assert!(builder.is_populated(Slot::Log));
    assert!(!builder.is_populated(Slot::SleepUntil));
    assert_eq!(
        builder.missing_slots(),
        vec![
            Slot::SleepUntil,
            Slot::Timestamp,
            Slot::RefreshDisplay,
            Slot::SetPixel,
            Slot::SetIndicator,
            Slot::SetAudioFrequency,
            Slot::EnableAudio,
        ]
    );
    assert!(matches!(
        builder.build(),
        Err(HalError::MissingSlot(Slot::SleepUntil))
    ));
}

#[test]
fn test_full_builder_builds() {
    let log = CallLog::new();
    let builder = recording_builder(&log, "t", LevelMask::ALL, Timestamp::ZERO);
    assert!(builder.missing_slots().is_empty());
    assert!(builder.build().is_ok());
}

#[test]
fn test_every_slot_dispatches_to_its_function() {
    let log = CallLog::new();
    let mut table = recording_builder(&log, "t", LevelMask::ALL, Timestamp(777)).build().unwrap();

    let buffer = table.allocate(24).unwrap();
    table.release(buffer);
    table.halt();
    assert!(table.is_log_enabled(LogLevel::Memory));
    table.log(LogLevel::Memory, format_args!("read {:#04x}", 0x2a));
    table.sleep_until(Timestamp(900));
    assert_eq!(table.timestamp(), Timestamp(777));
    table.refresh_display();
    table.set_pixel(31, 15, true);
    table.set_indicator(7, false);
    table.set_audio_frequency(40_960);
    table.enable_audio(true);
    assert_eq!(table.poll_input(), PollStatus::Continue);

    assert_eq!(
        log.calls(),
        vec![
            Call::Allocate(24),
            Call::Release(24),
            Call::Halt,
            Call::IsLogEnabled(LogLevel::Memory),
            Call::Log(LogLevel::Memory, "read 0x2a".to_owned()),
            Call::SleepUntil(Timestamp(900)),
            Call::Timestamp,
            Call::RefreshDisplay,
            Call::SetPixel(31, 15, true),
            Call::SetIndicator(7, false),
            Call::SetAudioFrequency(40_960),
            Call::EnableAudio(true),
            Call::PollInput,
        ]
    );
    assert_eq!(log.slots(), Slot::ALL.to_vec(), "one call per slot, in ABI order");
}

#[test]
fn test_shim_arguments_pass_through_unchanged() {
    let log = CallLog::new();
    let mut table = recording_table(&log, "t");
    table.set_pixel(200, 255, false);
    table.set_indicator(99, true);
    table.set_audio_frequency(u32::MAX);
    assert_eq!(
        log.calls(),
        vec![
            Call::SetPixel(200, 255, false),
            Call::SetIndicator(99, true),
            Call::SetAudioFrequency(u32::MAX),
        ]
    );
}

#[test]
fn test_sleep_until_now_returns_immediately() {
    let clock = Arc::new(Mutex::new(MonotonicClock::new(1.0, true).unwrap()));
    let (reader, sleeper) = (Arc::clone(&clock), Arc::clone(&clock));
    let log = CallLog::new();
    let mut table = recording_builder(&log, "t", LevelMask::ALL, Timestamp::ZERO)
        .timestamp(move || reader.lock().unwrap().now())
        .sleep_until(move |deadline| sleeper.lock().unwrap().sleep_until(deadline))
        .build()
        .unwrap();

    let start = Instant::now();
    let now = table.timestamp();
    table.sleep_until(now);
    table.sleep_until(Timestamp(now.as_micros().wrapping_sub(10_000)));
    assert!(start.elapsed() < Duration::from_millis(50));

    let deadline = table.timestamp().wrapping_add(20_000);
    table.sleep_until(deadline);
    assert!(start.elapsed() >= Duration::from_millis(20), "a future deadline does block");
}

#[test]
fn test_allocate_none_is_exhaustion() {
    let log = CallLog::new();
    let mut table = recording_builder(&log, "t", LevelMask::ALL, Timestamp::ZERO)
        .allocate(|_| None)
        .build()
        .unwrap();
    for size in [0, 1, 4096, u32::MAX] {
        assert!(table.allocate(size).is_none());
    }
}

#[test]
fn test_debug_does_not_expose_closures() {
    let log = CallLog::new();
    let table = recording_table(&log, "t");
    assert!(format!("{table:?}").starts_with("ServiceTable"));
    assert!(format!("{:?}", ServiceTable::builder()).contains("missing"));
}

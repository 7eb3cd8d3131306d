//! # Pattern Core Tests
//!
//! The reference core drives every slot through a session, paces itself with
//! `sleep_until`, and treats a refused allocation as exhaustion.

use pretty_assertions::assert_eq;
use tamasim_core::common::Timestamp;
use tamasim_core::common::constants::{FRAME_PERIOD_US, LCD_HEIGHT};
use tamasim_core::config::SessionConfig;
use tamasim_core::hal::{LevelMask, LogLevel, ServiceRegistry, Slot};
use tamasim_core::host::{HostPlatform, ManualClock};
use tamasim_core::sim::pattern::{BEEP_DECIHERTZ, SCRATCH_BYTES};
use tamasim_core::sim::{PatternCore, Session, StopReason};
use tamasim_core::stats::Instrumented;

use crate::common::harness::{Call, CallLog, init_tracing, recording_builder, recording_table};

fn config() -> SessionConfig {
    SessionConfig {
        poll_interval: 1,
        max_steps: None,
    }
}

#[test]
#[cfg(not(feature = "strip-log"))]
fn test_pattern_uses_every_slot() {
    init_tracing();
    let log = CallLog::new();
    let registry = ServiceRegistry::new(Box::new(recording_table(&log, "t")));
    let mut session = Session::new(PatternCore::with_frames(2), registry, &config());
    assert_eq!(session.run(), StopReason::Halted);
    let _ = session.close();

    for slot in Slot::ALL {
        assert!(log.count(slot) > 0, "{slot} never called");
    }
    assert!(log.calls().contains(&Call::Allocate(SCRATCH_BYTES)));
    assert!(log.calls().contains(&Call::Release(SCRATCH_BYTES as usize)));
    assert!(log.calls().contains(&Call::SetAudioFrequency(BEEP_DECIHERTZ)));
}

#[test]
fn test_frames_are_paced_from_start_timestamp() {
    let log = CallLog::new();
    let start = Timestamp(1_000);
    let table = recording_builder(&log, "t", LevelMask::NONE, start).build().unwrap();
    let registry = ServiceRegistry::new(Box::new(table));
    let mut session = Session::new(PatternCore::with_frames(3), registry, &config());
    let _ = session.run();

    let deadlines: Vec<Timestamp> = log
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::SleepUntil(t) => Some(t),
            _ => None,
        })
        .collect();
    assert_eq!(
        deadlines,
        vec![
            start.wrapping_add(FRAME_PERIOD_US),
            start.wrapping_add(2 * FRAME_PERIOD_US),
            start.wrapping_add(3 * FRAME_PERIOD_US),
        ]
    );
}

#[test]
fn test_first_frame_lights_column_zero() {
    let log = CallLog::new();
    let registry = ServiceRegistry::new(Box::new(recording_table(&log, "t")));
    let mut session = Session::new(PatternCore::new(), registry, &config());
    let _ = session.step();

    let lit: Vec<(u8, u8)> = log
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::SetPixel(x, y, true) => Some((x, y)),
            _ => None,
        })
        .collect();
    assert_eq!(lit, (0..LCD_HEIGHT).map(|y| (0, y)).collect::<Vec<_>>());
}

#[test]
fn test_allocation_failure_is_exhaustion() {
    init_tracing();
    let log = CallLog::new();
    let table = recording_builder(&log, "t", LevelMask::ALL, Timestamp::ZERO)
        .allocate(|_| None)
        .build()
        .unwrap();
    let registry = ServiceRegistry::new(Box::new(table));
    let mut session = Session::new(PatternCore::with_frames(4), registry, &config());

    assert_eq!(session.run(), StopReason::Halted);
    assert!(session.core().exhausted());
    assert!(!session.core().has_scratch());
    assert_eq!(session.core().frames(), 4, "keeps running without scratch");

    let errors = log
        .calls()
        .into_iter()
        .filter(|call| matches!(call, Call::Log(LogLevel::Error, _)))
        .count();
    assert_eq!(errors, if cfg!(feature = "strip-log") { 0 } else { 1 });

    let _ = session.close();
    assert_eq!(log.count(Slot::Release), 0);
}

#[test]
fn test_pattern_on_host_platform() {
    init_tracing();
    let clock = ManualClock::stepping(Timestamp::ZERO);
    let time = clock.handle();
    let platform = HostPlatform::default().with_clock(clock);
    let monitor = platform.monitor();
    let services = Instrumented::new(platform);
    let counters = services.counters();

    let registry = ServiceRegistry::new(Box::new(services));
    let mut session = Session::new(PatternCore::with_frames(40), registry, &config());
    assert_eq!(session.run(), StopReason::Halted);
    let _ = session.close();

    assert!(monitor.is_halted());
    assert_eq!(monitor.refresh_count(), 40);
    assert_eq!(monitor.presented_frame().lit_pixels(), u32::from(LCD_HEIGHT));
    assert_eq!(monitor.memory().live_buffers, 0, "scratch released on close");
    assert!(!monitor.audio().playing);
    assert_eq!(time.elapsed_micros(), 40 * u64::from(FRAME_PERIOD_US));

    let stats = counters.snapshot();
    assert_eq!(stats.calls(Slot::RefreshDisplay), 40);
    assert_eq!(stats.calls(Slot::Halt), 1);
    assert_eq!(stats.calls(Slot::SetPixel), 40 * 2 * u64::from(LCD_HEIGHT));
}

#[test]
fn test_scratch_returns_to_the_platform_that_allocated_it() {
    let first = HostPlatform::default().with_clock(ManualClock::stepping(Timestamp::ZERO));
    let second = HostPlatform::default().with_clock(ManualClock::stepping(Timestamp::ZERO));
    let (first_monitor, second_monitor) = (first.monitor(), second.monitor());

    let registry = ServiceRegistry::new(Box::new(first));
    let mut session = Session::new(PatternCore::with_frames(10), registry, &config());
    let _ = session.step();
    let _ = session.step();
    assert_eq!(first_monitor.memory().live_buffers, 1);

    assert!(session.register(Box::new(second)).is_err());
    let _ = session.close();
    assert_eq!(first_monitor.memory().live_buffers, 0);
    assert_eq!(second_monitor.memory().allocations, 0);
}

#[test]
fn test_replace_services_moves_scratch_between_platforms() {
    let first = HostPlatform::default().with_clock(ManualClock::stepping(Timestamp::ZERO));
    let second = HostPlatform::default().with_clock(ManualClock::stepping(Timestamp::ZERO));
    let (first_monitor, second_monitor) = (first.monitor(), second.monitor());

    let registry = ServiceRegistry::new(Box::new(first));
    let mut session = Session::new(PatternCore::with_frames(10), registry, &config());
    let _ = session.step();
    session.replace_services(Box::new(second)).unwrap();
    assert_eq!(first_monitor.memory().live_buffers, 0);

    let _ = session.step();
    assert_eq!(second_monitor.memory().live_buffers, 1);
    let _ = session.close();
    assert_eq!(second_monitor.memory().live_buffers, 0);
    assert_eq!(second_monitor.memory().allocations, 1);
}

use std::sync::{Arc, Mutex, PoisonError};

use tamasim_core::common::Timestamp;
use tamasim_core::hal::{LevelMask, LogLevel, PollStatus, ServiceTable, ServiceTableBuilder, Slot};
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber once per test binary. Honors `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One recorded slot invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Allocate(u32),
    Release(usize),
    Halt,
    IsLogEnabled(LogLevel),
    Log(LogLevel, String),
    SleepUntil(Timestamp),
    Timestamp,
    RefreshDisplay,
    SetPixel(u8, u8, bool),
    SetIndicator(u8, bool),
    SetAudioFrequency(u32),
    EnableAudio(bool),
    PollInput,
}

impl Call {
    pub fn slot(&self) -> Slot {
        match self {
            Self::Allocate(_) => Slot::Allocate,
            Self::Release(_) => Slot::Release,
            Self::Halt => Slot::Halt,
            Self::IsLogEnabled(_) => Slot::IsLogEnabled,
            Self::Log(..) => Slot::Log,
            Self::SleepUntil(_) => Slot::SleepUntil,
            Self::Timestamp => Slot::Timestamp,
            Self::RefreshDisplay => Slot::RefreshDisplay,
            Self::SetPixel(..) => Slot::SetPixel,
            Self::SetIndicator(..) => Slot::SetIndicator,
            Self::SetAudioFrequency(_) => Slot::SetAudioFrequency,
            Self::EnableAudio(_) => Slot::EnableAudio,
            Self::PollInput => Slot::PollInput,
        }
    }
}

/// Shared, append-only record of slot calls, tagged with the table that received them.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<(&'static str, Call)>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, table: &'static str, call: Call) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((table, call));
    }

    /// Every recorded call with the name of the table that received it.
    pub fn tagged(&self) -> Vec<(&'static str, Call)> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.tagged().into_iter().map(|(_, call)| call).collect()
    }

    pub fn slots(&self) -> Vec<Slot> {
        self.calls().iter().map(Call::slot).collect()
    }

    pub fn count(&self, slot: Slot) -> usize {
        self.slots().into_iter().filter(|&s| s == slot).count()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

/// A builder with every slot recording into `log` under the name `table`.
///
/// `timestamp` returns `now`, `poll_input` returns `Continue`, `allocate` hands out real
/// zeroed buffers, and `is_log_enabled` answers from `enabled`. Individual slots can be
/// overridden on the returned builder.
pub fn recording_builder(
    log: &CallLog,
    table: &'static str,
    enabled: LevelMask,
    now: Timestamp,
) -> ServiceTableBuilder {
    let l = log.clone();
    let builder = ServiceTable::builder().allocate(move |size| {
        l.push(table, Call::Allocate(size));
        tamasim_core::hal::HostBuffer::zeroed(size as usize)
    });
    let l = log.clone();
    let builder = builder.release(move |buffer| l.push(table, Call::Release(buffer.len())));
    let l = log.clone();
    let builder = builder.halt(move || l.push(table, Call::Halt));
    let l = log.clone();
    let builder = builder.is_log_enabled(move |level| {
        l.push(table, Call::IsLogEnabled(level));
        enabled.contains(level)
    });
    let l = log.clone();
    let builder =
        builder.log(move |level, message| l.push(table, Call::Log(level, message.to_string())));
    let l = log.clone();
    let builder = builder.sleep_until(move |deadline| l.push(table, Call::SleepUntil(deadline)));
    let l = log.clone();
    let builder = builder.timestamp(move || {
        l.push(table, Call::Timestamp);
        now
    });
    let l = log.clone();
    let builder = builder.refresh_display(move || l.push(table, Call::RefreshDisplay));
    let l = log.clone();
    let builder = builder.set_pixel(move |x, y, on| l.push(table, Call::SetPixel(x, y, on)));
    let l = log.clone();
    let builder =
        builder.set_indicator(move |icon, on| l.push(table, Call::SetIndicator(icon, on)));
    let l = log.clone();
    let builder =
        builder.set_audio_frequency(move |dhz| l.push(table, Call::SetAudioFrequency(dhz)));
    let l = log.clone();
    let builder = builder.enable_audio(move |on| l.push(table, Call::EnableAudio(on)));
    let l = log.clone();
    builder.poll_input(move || {
        l.push(table, Call::PollInput);
        PollStatus::Continue
    })
}

/// A fully populated recording table with every log level enabled.
pub fn recording_table(log: &CallLog, table: &'static str) -> ServiceTable {
    recording_builder(log, table, LevelMask::ALL, Timestamp::ZERO)
        .build()
        .expect("recording table populates every slot")
}

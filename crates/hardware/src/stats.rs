//! Slot call statistics.
//!
//! This module counts how often the core invokes each services slot. It provides:
//! 1. **Counters:** Lock-free per-slot counters shared with observers on other threads.
//! 2. **Snapshots:** `SlotStats`, a plain copy of the counters with a printable report.
//! 3. **Instrumentation:** `Instrumented<S>`, a pass-through `HardwareServices` wrapper
//!    that bumps a counter and forwards every call unchanged.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::common::Timestamp;
use crate::hal::{HardwareServices, HostBuffer, LogLevel, PollStatus, Slot};

/// Live per-slot call counters.
#[derive(Debug, Default)]
pub struct SlotCounters {
    calls: [AtomicU64; Slot::COUNT],
}

impl SlotCounters {
    #[inline(always)]
    fn bump(&self, slot: Slot) {
        let _ = self.calls[slot.index()].fetch_add(1, Ordering::Relaxed);
    }

    /// Takes a snapshot of all counters.
    pub fn snapshot(&self) -> SlotStats {
        SlotStats {
            calls: std::array::from_fn(|i| self.calls[i].load(Ordering::Relaxed)),
        }
    }
}

/// Snapshot of per-slot call counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotStats {
    calls: [u64; Slot::COUNT],
}

impl SlotStats {
    /// Calls made to `slot`.
    pub const fn calls(&self, slot: Slot) -> u64 {
        self.calls[slot.index()]
    }

    /// Calls across all slots.
    pub fn total(&self) -> u64 {
        self.calls.iter().sum()
    }

    /// Prints the report to standard output.
    pub fn print(&self) {
        println!("{self}");
    }
}

impl fmt::Display for SlotStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==========================================================")?;
        writeln!(f, "HARDWARE SERVICES SLOT CALLS")?;
        writeln!(f, "==========================================================")?;
        for slot in Slot::ALL {
            writeln!(f, "{:<2} {:<24} {}", slot.index(), slot.name(), self.calls(slot))?;
        }
        writeln!(f, "----------------------------------------------------------")?;
        write!(f, "   {:<24} {}", "total", self.total())
    }
}

/// Counting wrapper around any services object.
#[derive(Debug)]
pub struct Instrumented<S> {
    inner: S,
    counters: Arc<SlotCounters>,
}

impl<S: HardwareServices> Instrumented<S> {
    /// Wraps `inner` with zeroed counters.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            counters: Arc::new(SlotCounters::default()),
        }
    }

    /// Shared handle to the live counters.
    pub fn counters(&self) -> Arc<SlotCounters> {
        Arc::clone(&self.counters)
    }

    /// Current counts.
    pub fn stats(&self) -> SlotStats {
        self.counters.snapshot()
    }

    /// The wrapped services.
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwraps the services, discarding the counters.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: HardwareServices> HardwareServices for Instrumented<S> {
    fn allocate(&mut self, size: u32) -> Option<HostBuffer> {
        self.counters.bump(Slot::Allocate);
        self.inner.allocate(size)
    }

    fn release(&mut self, buffer: HostBuffer) {
        self.counters.bump(Slot::Release);
        self.inner.release(buffer);
    }

    fn halt(&mut self) {
        self.counters.bump(Slot::Halt);
        self.inner.halt();
    }

    fn is_log_enabled(&self, level: LogLevel) -> bool {
        self.counters.bump(Slot::IsLogEnabled);
        self.inner.is_log_enabled(level)
    }

    fn log(&mut self, level: LogLevel, message: fmt::Arguments<'_>) {
        self.counters.bump(Slot::Log);
        self.inner.log(level, message);
    }

    fn sleep_until(&mut self, deadline: Timestamp) {
        self.counters.bump(Slot::SleepUntil);
        self.inner.sleep_until(deadline);
    }

    fn timestamp(&mut self) -> Timestamp {
        self.counters.bump(Slot::Timestamp);
        self.inner.timestamp()
    }

    fn refresh_display(&mut self) {
        self.counters.bump(Slot::RefreshDisplay);
        self.inner.refresh_display();
    }

    fn set_pixel(&mut self, x: u8, y: u8, on: bool) {
        self.counters.bump(Slot::SetPixel);
        self.inner.set_pixel(x, y, on);
    }

    fn set_indicator(&mut self, icon: u8, on: bool) {
        self.counters.bump(Slot::SetIndicator);
        self.inner.set_indicator(icon, on);
    }

    fn set_audio_frequency(&mut self, decihertz: u32) {
        self.counters.bump(Slot::SetAudioFrequency);
        self.inner.set_audio_frequency(decihertz);
    }

    fn enable_audio(&mut self, enabled: bool) {
        self.counters.bump(Slot::EnableAudio);
        self.inner.enable_audio(enabled);
    }

    fn poll_input(&mut self) -> PollStatus {
        self.counters.bump(Slot::PollInput);
        self.inner.poll_input()
    }
}

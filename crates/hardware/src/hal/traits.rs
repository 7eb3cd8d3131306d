//! The hardware services contract.
//!
//! This module defines the `HardwareServices` trait the emulation core is written
//! against. It provides:
//! 1. **Memory:** `allocate`/`release` as a matched pair over owned `HostBuffer`s.
//! 2. **Control:** `halt` and `poll_input`, the only ways the platform stops a run.
//! 3. **Logging:** `is_log_enabled` (O(1), side-effect free) guarding `log`.
//! 4. **Time:** `timestamp` and `sleep_until`, the sole sanctioned suspension point.
//! 5. **Output:** LCD pixels, indicator icons, display refresh, and the buzzer.
//!
//! Every method is required. A host that leaves a capability out does not compile, so a
//! partially populated table cannot exist. Methods appear in [`Slot`](super::Slot) order.

use std::fmt;

use super::buffer::HostBuffer;
use super::log::LogLevel;
use super::poll::PollStatus;
use crate::common::Timestamp;

/// Platform services consumed by the emulation core.
///
/// Implementations are called inline on the core's thread, potentially millions of times
/// per emulated second. Only [`sleep_until`](Self::sleep_until) may block; every other
/// method must return promptly.
pub trait HardwareServices: Send {
    /// Allocates a zeroed buffer of `size` bytes.
    ///
    /// `None` is ordinary exhaustion; callers decide the policy. Adapters never retry.
    fn allocate(&mut self, size: u32) -> Option<HostBuffer>;

    /// Returns a buffer obtained from [`allocate`](Self::allocate).
    fn release(&mut self, buffer: HostBuffer);

    /// Signals the platform to stop its run loop.
    fn halt(&mut self);

    /// Returns whether messages at `level` would be recorded.
    ///
    /// Answered in O(1) with no side effects; queried before any formatting.
    fn is_log_enabled(&self, level: LogLevel) -> bool;

    /// Records a guest log message. Side effect only.
    fn log(&mut self, level: LogLevel, message: fmt::Arguments<'_>);

    /// Blocks until `deadline` is reached; returns at once if it already has been.
    fn sleep_until(&mut self, deadline: Timestamp);

    /// Returns the current emulated-time timestamp.
    fn timestamp(&mut self) -> Timestamp;

    /// Flushes pending pixel and icon changes to the output.
    fn refresh_display(&mut self);

    /// Sets LCD pixel (`x`, `y`). Out-of-range coordinates are ignored.
    fn set_pixel(&mut self, x: u8, y: u8, on: bool);

    /// Sets indicator icon `icon`. Out-of-range ids are ignored.
    fn set_indicator(&mut self, icon: u8, on: bool);

    /// Sets the buzzer frequency, in decihertz.
    fn set_audio_frequency(&mut self, decihertz: u32);

    /// Starts or stops the buzzer.
    fn enable_audio(&mut self, enabled: bool);

    /// Polls host input; `Quit` asks the core to stop.
    fn poll_input(&mut self) -> PollStatus;
}

impl<S: HardwareServices + ?Sized> HardwareServices for Box<S> {
    #[inline(always)]
    fn allocate(&mut self, size: u32) -> Option<HostBuffer> {
        (**self).allocate(size)
    }

    #[inline(always)]
    fn release(&mut self, buffer: HostBuffer) {
        (**self).release(buffer);
    }

    #[inline(always)]
    fn halt(&mut self) {
        (**self).halt();
    }

    #[inline(always)]
    fn is_log_enabled(&self, level: LogLevel) -> bool {
        (**self).is_log_enabled(level)
    }

    #[inline(always)]
    fn log(&mut self, level: LogLevel, message: fmt::Arguments<'_>) {
        (**self).log(level, message);
    }

    #[inline(always)]
    fn sleep_until(&mut self, deadline: Timestamp) {
        (**self).sleep_until(deadline);
    }

    #[inline(always)]
    fn timestamp(&mut self) -> Timestamp {
        (**self).timestamp()
    }

    #[inline(always)]
    fn refresh_display(&mut self) {
        (**self).refresh_display();
    }

    #[inline(always)]
    fn set_pixel(&mut self, x: u8, y: u8, on: bool) {
        (**self).set_pixel(x, y, on);
    }

    #[inline(always)]
    fn set_indicator(&mut self, icon: u8, on: bool) {
        (**self).set_indicator(icon, on);
    }

    #[inline(always)]
    fn set_audio_frequency(&mut self, decihertz: u32) {
        (**self).set_audio_frequency(decihertz);
    }

    #[inline(always)]
    fn enable_audio(&mut self, enabled: bool) {
        (**self).enable_audio(enabled);
    }

    #[inline(always)]
    fn poll_input(&mut self) -> PollStatus {
        (**self).poll_input()
    }
}

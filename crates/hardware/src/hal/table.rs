//! Closure-backed services table.
//!
//! `ServiceTable` is the literal form of the HST: thirteen function references, one per
//! slot, fixed at construction. Its builder is the only way to make one, and `build`
//! refuses a table with any slot left empty, naming the first missing slot in ABI order.
//! Closures may capture shared platform state; the table itself has no setters.

use std::fmt;

use super::buffer::HostBuffer;
use super::log::{self, LogLevel};
use super::poll::PollStatus;
use super::slot::Slot;
use super::traits::HardwareServices;
use crate::common::{HalError, Timestamp};

type AllocateFn = Box<dyn FnMut(u32) -> Option<HostBuffer> + Send>;
type ReleaseFn = Box<dyn FnMut(HostBuffer) + Send>;
type SignalFn = Box<dyn FnMut() + Send>;
type LogEnabledFn = Box<dyn Fn(LogLevel) -> bool + Send>;
type LogFn = Box<dyn for<'a> FnMut(LogLevel, fmt::Arguments<'a>) + Send>;
type SleepFn = Box<dyn FnMut(Timestamp) + Send>;
type TimestampFn = Box<dyn FnMut() -> Timestamp + Send>;
type PixelFn = Box<dyn FnMut(u8, u8, bool) + Send>;
type IndicatorFn = Box<dyn FnMut(u8, bool) + Send>;
type FrequencyFn = Box<dyn FnMut(u32) + Send>;
type AudioFn = Box<dyn FnMut(bool) + Send>;
type PollFn = Box<dyn FnMut() -> PollStatus + Send>;

/// An immutable, fully populated hardware services table.
pub struct ServiceTable {
    allocate: AllocateFn,
    release: ReleaseFn,
    halt: SignalFn,
    is_log_enabled: LogEnabledFn,
    log: LogFn,
    sleep_until: SleepFn,
    timestamp: TimestampFn,
    refresh_display: SignalFn,
    set_pixel: PixelFn,
    set_indicator: IndicatorFn,
    set_audio_frequency: FrequencyFn,
    enable_audio: AudioFn,
    poll_input: PollFn,
}

impl ServiceTable {
    /// Starts an empty table.
    pub fn builder() -> ServiceTableBuilder {
        ServiceTableBuilder::default()
    }
}

impl HardwareServices for ServiceTable {
    #[inline(always)]
    fn allocate(&mut self, size: u32) -> Option<HostBuffer> {
        (self.allocate)(size)
    }

    #[inline(always)]
    fn release(&mut self, buffer: HostBuffer) {
        (self.release)(buffer);
    }

    #[inline(always)]
    fn halt(&mut self) {
        (self.halt)();
    }

    #[inline(always)]
    fn is_log_enabled(&self, level: LogLevel) -> bool {
        (self.is_log_enabled)(level)
    }

    #[inline(always)]
    fn log(&mut self, level: LogLevel, message: fmt::Arguments<'_>) {
        (self.log)(level, message);
    }

    #[inline(always)]
    fn sleep_until(&mut self, deadline: Timestamp) {
        (self.sleep_until)(deadline);
    }

    #[inline(always)]
    fn timestamp(&mut self) -> Timestamp {
        (self.timestamp)()
    }

    #[inline(always)]
    fn refresh_display(&mut self) {
        (self.refresh_display)();
    }

    #[inline(always)]
    fn set_pixel(&mut self, x: u8, y: u8, on: bool) {
        (self.set_pixel)(x, y, on);
    }

    #[inline(always)]
    fn set_indicator(&mut self, icon: u8, on: bool) {
        (self.set_indicator)(icon, on);
    }

    #[inline(always)]
    fn set_audio_frequency(&mut self, decihertz: u32) {
        (self.set_audio_frequency)(decihertz);
    }

    #[inline(always)]
    fn enable_audio(&mut self, enabled: bool) {
        (self.enable_audio)(enabled);
    }

    #[inline(always)]
    fn poll_input(&mut self) -> PollStatus {
        (self.poll_input)()
    }
}

impl fmt::Debug for ServiceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceTable")
            .field("slots", &Slot::COUNT)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ServiceTable`]; one setter per slot.
#[derive(Default)]
pub struct ServiceTableBuilder {
    allocate: Option<AllocateFn>,
    release: Option<ReleaseFn>,
    halt: Option<SignalFn>,
    is_log_enabled: Option<LogEnabledFn>,
    log: Option<LogFn>,
    sleep_until: Option<SleepFn>,
    timestamp: Option<TimestampFn>,
    refresh_display: Option<SignalFn>,
    set_pixel: Option<PixelFn>,
    set_indicator: Option<IndicatorFn>,
    set_audio_frequency: Option<FrequencyFn>,
    enable_audio: Option<AudioFn>,
    poll_input: Option<PollFn>,
}

impl ServiceTableBuilder {
    /// Sets the `allocate` slot.
    #[must_use]
    pub fn allocate(mut self, f: impl FnMut(u32) -> Option<HostBuffer> + Send + 'static) -> Self {
        self.allocate = Some(Box::new(f));
        self
    }

    /// Sets the `release` slot.
    #[must_use]
    pub fn release(mut self, f: impl FnMut(HostBuffer) + Send + 'static) -> Self {
        self.release = Some(Box::new(f));
        self
    }

    /// Sets the `halt` slot.
    #[must_use]
    pub fn halt(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.halt = Some(Box::new(f));
        self
    }

    /// Sets the `is_log_enabled` slot.
    #[must_use]
    pub fn is_log_enabled(mut self, f: impl Fn(LogLevel) -> bool + Send + 'static) -> Self {
        self.is_log_enabled = Some(Box::new(f));
        self
    }

    /// Sets the `log` slot.
    #[must_use]
    pub fn log(mut self, f: impl FnMut(LogLevel, fmt::Arguments<'_>) + Send + 'static) -> Self {
        self.log = Some(Box::new(f));
        self
    }

    /// Fills both logging slots with the stripped-build shims: every level reports
    /// disabled and the sink discards.
    #[must_use]
    pub fn log_discard(self) -> Self {
        self.is_log_enabled(|_| false).log(log::discard)
    }

    /// Sets the `sleep_until` slot.
    #[must_use]
    pub fn sleep_until(mut self, f: impl FnMut(Timestamp) + Send + 'static) -> Self {
        self.sleep_until = Some(Box::new(f));
        self
    }

    /// Sets the `timestamp` slot.
    #[must_use]
    pub fn timestamp(mut self, f: impl FnMut() -> Timestamp + Send + 'static) -> Self {
        self.timestamp = Some(Box::new(f));
        self
    }

    /// Sets the `refresh_display` slot.
    #[must_use]
    pub fn refresh_display(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.refresh_display = Some(Box::new(f));
        self
    }

    /// Sets the `set_pixel` slot.
    #[must_use]
    pub fn set_pixel(mut self, f: impl FnMut(u8, u8, bool) + Send + 'static) -> Self {
        self.set_pixel = Some(Box::new(f));
        self
    }

    /// Sets the `set_indicator` slot.
    #[must_use]
    pub fn set_indicator(mut self, f: impl FnMut(u8, bool) + Send + 'static) -> Self {
        self.set_indicator = Some(Box::new(f));
        self
    }

    /// Sets the `set_audio_frequency` slot.
    #[must_use]
    pub fn set_audio_frequency(mut self, f: impl FnMut(u32) + Send + 'static) -> Self {
        self.set_audio_frequency = Some(Box::new(f));
        self
    }

    /// Sets the `enable_audio` slot.
    #[must_use]
    pub fn enable_audio(mut self, f: impl FnMut(bool) + Send + 'static) -> Self {
        self.enable_audio = Some(Box::new(f));
        self
    }

    /// Sets the `poll_input` slot.
    #[must_use]
    pub fn poll_input(mut self, f: impl FnMut() -> PollStatus + Send + 'static) -> Self {
        self.poll_input = Some(Box::new(f));
        self
    }

    /// Returns `true` if `slot` has been set.
    pub const fn is_populated(&self, slot: Slot) -> bool {
        match slot {
            Slot::Allocate => self.allocate.is_some(),
            Slot::Release => self.release.is_some(),
            Slot::Halt => self.halt.is_some(),
            Slot::IsLogEnabled => self.is_log_enabled.is_some(),
            Slot::Log => self.log.is_some(),
            Slot::SleepUntil => self.sleep_until.is_some(),
            Slot::Timestamp => self.timestamp.is_some(),
            Slot::RefreshDisplay => self.refresh_display.is_some(),
            Slot::SetPixel => self.set_pixel.is_some(),
            Slot::SetIndicator => self.set_indicator.is_some(),
            Slot::SetAudioFrequency => self.set_audio_frequency.is_some(),
            Slot::EnableAudio => self.enable_audio.is_some(),
            Slot::PollInput => self.poll_input.is_some(),
        }
    }

    /// Slots still unset, in ABI order.
    pub fn missing_slots(&self) -> Vec<Slot> {
        Slot::ALL
            .into_iter()
            .filter(|&slot| !self.is_populated(slot))
            .collect()
    }

    /// Finishes the table.
    ///
    /// # Returns
    ///
    /// The table, or `HalError::MissingSlot` naming the first unset slot in ABI order.
    pub fn build(self) -> Result<ServiceTable, HalError> {
        use HalError::MissingSlot;
        // Fields are evaluated in ABI order, so the first `?` to fire names the first gap.
        Ok(ServiceTable {
            allocate: self.allocate.ok_or(MissingSlot(Slot::Allocate))?,
            release: self.release.ok_or(MissingSlot(Slot::Release))?,
            halt: self.halt.ok_or(MissingSlot(Slot::Halt))?,
            is_log_enabled: self.is_log_enabled.ok_or(MissingSlot(Slot::IsLogEnabled))?,
            log: self.log.ok_or(MissingSlot(Slot::Log))?,
            sleep_until: self.sleep_until.ok_or(MissingSlot(Slot::SleepUntil))?,
            timestamp: self.timestamp.ok_or(MissingSlot(Slot::Timestamp))?,
            refresh_display: self.refresh_display.ok_or(MissingSlot(Slot::RefreshDisplay))?,
            set_pixel: self.set_pixel.ok_or(MissingSlot(Slot::SetPixel))?,
            set_indicator: self.set_indicator.ok_or(MissingSlot(Slot::SetIndicator))?,
            set_audio_frequency: self
                .set_audio_frequency
                .ok_or(MissingSlot(Slot::SetAudioFrequency))?,
            enable_audio: self.enable_audio.ok_or(MissingSlot(Slot::EnableAudio))?,
            poll_input: self.poll_input.ok_or(MissingSlot(Slot::PollInput))?,
        })
    }
}

impl fmt::Debug for ServiceTableBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceTableBuilder")
            .field("missing", &self.missing_slots())
            .finish()
    }
}

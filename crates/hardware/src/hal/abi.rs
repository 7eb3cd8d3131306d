//! `#[repr(C)]` services table and its adapter.
//!
//! This module bridges hosts compiled separately from the core. It provides:
//! 1. **Layout:** `RawHal`, thirteen nullable `extern "C"` function pointers in
//!    [`Slot`] order, using C shapes (`u8` booleans, `c_int` levels and status codes,
//!    `u32` timestamps).
//! 2. **Validation:** A null pointer is a configuration error reported when the raw table
//!    is adopted, never checked per call.
//! 3. **Adapter shims:** `RawHalServices` normalizes every slot between the C shapes and
//!    the `HardwareServices` shapes. The C log slot receives a pre-formatted,
//!    NUL-terminated message instead of a variadic argument list.

use std::ffi::{CString, c_char, c_int, c_void};
use std::fmt;
use std::ptr::NonNull;

use super::buffer::HostBuffer;
use super::log::LogLevel;
use super::poll::PollStatus;
use super::slot::Slot;
use super::traits::HardwareServices;
use crate::common::{HalError, Timestamp};

/// C boolean as used by the raw table (`0` false, anything else true).
pub type BoolT = u8;

/// `malloc` slot.
pub type MallocFn = unsafe extern "C" fn(size: u32) -> *mut c_void;
/// `free` slot.
pub type FreeFn = unsafe extern "C" fn(ptr: *mut c_void);
/// `halt` and `update_screen` slots.
pub type VoidFn = unsafe extern "C" fn();
/// `is_log_enabled` slot.
pub type IsLogEnabledFn = unsafe extern "C" fn(level: c_int) -> BoolT;
/// `log` slot.
pub type LogFn = unsafe extern "C" fn(level: c_int, message: *const c_char);
/// `sleep_until` slot.
pub type SleepUntilFn = unsafe extern "C" fn(ts: u32);
/// `get_timestamp` slot.
pub type GetTimestampFn = unsafe extern "C" fn() -> u32;
/// `set_lcd_matrix` slot.
pub type SetLcdMatrixFn = unsafe extern "C" fn(x: u8, y: u8, val: BoolT);
/// `set_lcd_icon` slot.
pub type SetLcdIconFn = unsafe extern "C" fn(icon: u8, val: BoolT);
/// `set_frequency` slot.
pub type SetFrequencyFn = unsafe extern "C" fn(freq: u32);
/// `play_frequency` slot.
pub type PlayFrequencyFn = unsafe extern "C" fn(en: BoolT);
/// `handler` slot.
pub type HandlerFn = unsafe extern "C" fn() -> c_int;

/// The services table as laid out for C producers.
///
/// Field order is the ABI; it must match [`Slot::ALL`].
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct RawHal {
    /// Slot 0.
    pub malloc: Option<MallocFn>,
    /// Slot 1.
    pub free: Option<FreeFn>,
    /// Slot 2.
    pub halt: Option<VoidFn>,
    /// Slot 3.
    pub is_log_enabled: Option<IsLogEnabledFn>,
    /// Slot 4.
    pub log: Option<LogFn>,
    /// Slot 5.
    pub sleep_until: Option<SleepUntilFn>,
    /// Slot 6.
    pub get_timestamp: Option<GetTimestampFn>,
    /// Slot 7.
    pub update_screen: Option<VoidFn>,
    /// Slot 8.
    pub set_lcd_matrix: Option<SetLcdMatrixFn>,
    /// Slot 9.
    pub set_lcd_icon: Option<SetLcdIconFn>,
    /// Slot 10.
    pub set_frequency: Option<SetFrequencyFn>,
    /// Slot 11.
    pub play_frequency: Option<PlayFrequencyFn>,
    /// Slot 12.
    pub handler: Option<HandlerFn>,
}

impl RawHal {
    /// Returns `true` if the pointer for `slot` is non-null.
    pub const fn is_populated(&self, slot: Slot) -> bool {
        match slot {
            Slot::Allocate => self.malloc.is_some(),
            Slot::Release => self.free.is_some(),
            Slot::Halt => self.halt.is_some(),
            Slot::IsLogEnabled => self.is_log_enabled.is_some(),
            Slot::Log => self.log.is_some(),
            Slot::SleepUntil => self.sleep_until.is_some(),
            Slot::Timestamp => self.get_timestamp.is_some(),
            Slot::RefreshDisplay => self.update_screen.is_some(),
            Slot::SetPixel => self.set_lcd_matrix.is_some(),
            Slot::SetIndicator => self.set_lcd_icon.is_some(),
            Slot::SetAudioFrequency => self.set_frequency.is_some(),
            Slot::EnableAudio => self.play_frequency.is_some(),
            Slot::PollInput => self.handler.is_some(),
        }
    }

    /// Null slots, in ABI order.
    pub fn missing_slots(&self) -> Vec<Slot> {
        Slot::ALL
            .into_iter()
            .filter(|&slot| !self.is_populated(slot))
            .collect()
    }
}

/// A validated [`RawHal`] exposed as [`HardwareServices`].
#[derive(Clone, Copy, Debug)]
pub struct RawHalServices {
    malloc: MallocFn,
    free: FreeFn,
    halt: VoidFn,
    is_log_enabled: IsLogEnabledFn,
    log: LogFn,
    sleep_until: SleepUntilFn,
    get_timestamp: GetTimestampFn,
    update_screen: VoidFn,
    set_lcd_matrix: SetLcdMatrixFn,
    set_lcd_icon: SetLcdIconFn,
    set_frequency: SetFrequencyFn,
    play_frequency: PlayFrequencyFn,
    handler: HandlerFn,
}

impl RawHalServices {
    /// Adopts a raw table after checking that every slot is populated.
    ///
    /// # Errors
    ///
    /// `HalError::MissingSlot` naming the first null slot in ABI order.
    ///
    /// # Safety
    ///
    /// Every pointer must be callable with its documented C shape for as long as the
    /// returned value lives, from whichever thread drives the core. `free` must accept
    /// every non-null pointer returned by `malloc`, exactly once.
    pub unsafe fn adopt(raw: RawHal) -> Result<Self, HalError> {
        use HalError::MissingSlot;
        Ok(Self {
            malloc: raw.malloc.ok_or(MissingSlot(Slot::Allocate))?,
            free: raw.free.ok_or(MissingSlot(Slot::Release))?,
            halt: raw.halt.ok_or(MissingSlot(Slot::Halt))?,
            is_log_enabled: raw.is_log_enabled.ok_or(MissingSlot(Slot::IsLogEnabled))?,
            log: raw.log.ok_or(MissingSlot(Slot::Log))?,
            sleep_until: raw.sleep_until.ok_or(MissingSlot(Slot::SleepUntil))?,
            get_timestamp: raw.get_timestamp.ok_or(MissingSlot(Slot::Timestamp))?,
            update_screen: raw.update_screen.ok_or(MissingSlot(Slot::RefreshDisplay))?,
            set_lcd_matrix: raw.set_lcd_matrix.ok_or(MissingSlot(Slot::SetPixel))?,
            set_lcd_icon: raw.set_lcd_icon.ok_or(MissingSlot(Slot::SetIndicator))?,
            set_frequency: raw.set_frequency.ok_or(MissingSlot(Slot::SetAudioFrequency))?,
            play_frequency: raw.play_frequency.ok_or(MissingSlot(Slot::EnableAudio))?,
            handler: raw.handler.ok_or(MissingSlot(Slot::PollInput))?,
        })
    }
}

/// Converts a formatted message to a C string, replacing interior NULs.
fn to_c_message(message: fmt::Arguments<'_>) -> CString {
    let text = message.as_str().map_or_else(|| message.to_string(), str::to_owned);
    CString::new(text.replace('\0', "\u{fffd}")).unwrap_or_default()
}

// SAFETY (all slot calls below): `adopt` callers guarantee each pointer is callable with
// exactly these argument shapes for the lifetime of `self`.
impl HardwareServices for RawHalServices {
    fn allocate(&mut self, size: u32) -> Option<HostBuffer> {
        let raw = unsafe { (self.malloc)(size) };
        let ptr = NonNull::new(raw.cast::<u8>())?;
        // SAFETY: `malloc` returned `size` writable bytes that `free` reclaims once.
        Some(unsafe { HostBuffer::from_foreign(ptr, size as usize, self.free) })
    }

    fn release(&mut self, buffer: HostBuffer) {
        drop(buffer);
    }

    fn halt(&mut self) {
        unsafe { (self.halt)() };
    }

    #[inline(always)]
    fn is_log_enabled(&self, level: LogLevel) -> bool {
        unsafe { (self.is_log_enabled)(c_int::from(level.bit())) != 0 }
    }

    fn log(&mut self, level: LogLevel, message: fmt::Arguments<'_>) {
        let text = to_c_message(message);
        unsafe { (self.log)(c_int::from(level.bit()), text.as_ptr()) };
    }

    fn sleep_until(&mut self, deadline: Timestamp) {
        unsafe { (self.sleep_until)(deadline.as_micros()) };
    }

    #[inline(always)]
    fn timestamp(&mut self) -> Timestamp {
        Timestamp(unsafe { (self.get_timestamp)() })
    }

    fn refresh_display(&mut self) {
        unsafe { (self.update_screen)() };
    }

    #[inline(always)]
    fn set_pixel(&mut self, x: u8, y: u8, on: bool) {
        unsafe { (self.set_lcd_matrix)(x, y, BoolT::from(on)) };
    }

    fn set_indicator(&mut self, icon: u8, on: bool) {
        unsafe { (self.set_lcd_icon)(icon, BoolT::from(on)) };
    }

    fn set_audio_frequency(&mut self, decihertz: u32) {
        unsafe { (self.set_frequency)(decihertz) };
    }

    fn enable_audio(&mut self, enabled: bool) {
        unsafe { (self.play_frequency)(BoolT::from(enabled)) };
    }

    fn poll_input(&mut self) -> PollStatus {
        PollStatus::from_raw(unsafe { (self.handler)() })
    }
}

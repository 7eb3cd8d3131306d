//! Global Handheld Constants.
//!
//! This module defines the fixed shape of the emulated handheld as seen through the
//! services table. It includes:
//! 1. **Display Constants:** LCD matrix dimensions and indicator icon count.
//! 2. **Timing Constants:** Timestamp resolution and reference frame rate.
//! 3. **Session Constants:** Default polling cadence of the run loop.

/// Width of the LCD dot matrix in pixels.
pub const LCD_WIDTH: u8 = 32;

/// Height of the LCD dot matrix in pixels.
pub const LCD_HEIGHT: u8 = 16;

/// Number of indicator icons around the LCD.
pub const ICON_COUNT: u8 = 8;

/// Timestamp ticks per second (timestamps are microseconds).
pub const TIMESTAMP_HZ: u32 = 1_000_000;

/// Audio frequencies cross the boundary in decihertz.
pub const DECIHERTZ_PER_HZ: u32 = 10;

/// Frame period of the reference pattern core (30 frames per second).
pub const FRAME_PERIOD_US: u32 = TIMESTAMP_HZ / 30;

/// Default number of core steps between two `poll_input` calls.
pub const DEFAULT_POLL_INTERVAL: u32 = 1000;

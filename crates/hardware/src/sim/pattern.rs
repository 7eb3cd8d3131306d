//! A reference core that exercises every hardware services slot.
//!
//! Each step draws one frame: a lit column sweeping across the LCD, a rotating indicator
//! icon and a short beep every sixteen frames. Frames are paced at 30 Hz of emulated
//! time through `sleep_until`.

use crate::common::Timestamp;
use crate::common::constants::{FRAME_PERIOD_US, ICON_COUNT, LCD_HEIGHT, LCD_WIDTH};
use crate::hal::{HardwareServices, HostBuffer, LogLevel};
use crate::hal_log;
use crate::sim::session::{CoreStatus, EmulationCore};

/// Size of the scratch buffer requested on reset.
pub const SCRATCH_BYTES: u32 = 256;

/// Beep frequency: 4096 Hz.
pub const BEEP_DECIHERTZ: u32 = 40_960;

const BEEP_PERIOD: u64 = 16;
const BEEP_FRAMES: u64 = 2;

/// Test-pattern core.
#[derive(Debug, Default)]
pub struct PatternCore {
    frame: u64,
    frame_limit: Option<u64>,
    start: Timestamp,
    scratch: Option<HostBuffer>,
    exhausted: bool,
}

impl PatternCore {
    /// Creates a core that runs until stopped from outside.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a core that calls `halt` after drawing `frames` frames.
    pub fn with_frames(frames: u64) -> Self {
        Self {
            frame_limit: Some(frames),
            ..Self::default()
        }
    }

    /// Frames drawn so far.
    pub const fn frames(&self) -> u64 {
        self.frame
    }

    /// Whether the scratch allocation was refused on reset.
    pub const fn exhausted(&self) -> bool {
        self.exhausted
    }

    /// Whether the core currently holds its scratch buffer.
    pub const fn has_scratch(&self) -> bool {
        self.scratch.is_some()
    }

    /// Deadline of the frame following frame `frame`.
    fn deadline(&self, frame: u64) -> Timestamp {
        Timestamp::from_micros(
            u64::from(self.start.as_micros()) + frame * u64::from(FRAME_PERIOD_US),
        )
    }

    fn draw(&self, hal: &mut dyn HardwareServices) {
        let column = (self.frame % u64::from(LCD_WIDTH)) as u8;
        let previous = (column + LCD_WIDTH - 1) % LCD_WIDTH;
        for y in 0..LCD_HEIGHT {
            hal.set_pixel(previous, y, false);
            hal.set_pixel(column, y, true);
        }

        let icon = (self.frame % u64::from(ICON_COUNT)) as u8;
        hal.set_indicator((icon + ICON_COUNT - 1) % ICON_COUNT, false);
        hal.set_indicator(icon, true);

        hal.enable_audio(self.frame % BEEP_PERIOD < BEEP_FRAMES);
        hal.refresh_display();
    }
}

impl EmulationCore for PatternCore {
    fn reset(&mut self, hal: &mut dyn HardwareServices) {
        self.frame = 0;
        self.start = hal.timestamp();
        if let Some(old) = self.scratch.take() {
            hal.release(old);
        }
        self.scratch = hal.allocate(SCRATCH_BYTES);
        self.exhausted = self.scratch.is_none();
        if self.exhausted {
            hal_log!(
                hal,
                LogLevel::Error,
                "scratch allocation of {SCRATCH_BYTES} bytes refused, running without it"
            );
        } else {
            hal_log!(hal, LogLevel::Memory, "scratch buffer of {SCRATCH_BYTES} bytes");
        }
        hal.set_audio_frequency(BEEP_DECIHERTZ);
    }

    fn step(&mut self, hal: &mut dyn HardwareServices) -> CoreStatus {
        if self.frame_limit.is_some_and(|limit| self.frame >= limit) {
            hal_log!(hal, LogLevel::Info, "pattern finished after {} frames", self.frame);
            hal.halt();
            return CoreStatus::Halted;
        }

        self.draw(hal);
        if let Some(scratch) = self.scratch.as_mut().filter(|s| !s.is_empty()) {
            let slot = (self.frame % scratch.len() as u64) as usize;
            scratch[slot] = scratch[slot].wrapping_add(1);
        }
        hal_log!(hal, LogLevel::Cpu, "frame {}", self.frame);

        self.frame += 1;
        let deadline = self.deadline(self.frame);
        hal.sleep_until(deadline);
        CoreStatus::Running
    }

    fn shutdown(&mut self, hal: &mut dyn HardwareServices) {
        hal.enable_audio(false);
        if let Some(scratch) = self.scratch.take() {
            hal.release(scratch);
        }
    }
}

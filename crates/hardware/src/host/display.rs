//! LCD frames and presenters.
//!
//! The core writes pixels and icons one at a time into the pending frame; a
//! `refresh_display` call copies it to the presented frame and hands that to the
//! platform's [`FramePresenter`]. Each row is packed into a `u32`, one bit per column.

use std::fmt;

use crate::common::constants::{ICON_COUNT, LCD_HEIGHT, LCD_WIDTH};

/// One complete LCD image: the dot matrix plus the indicator icons.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LcdFrame {
    rows: [u32; LCD_HEIGHT as usize],
    icons: u8,
}

impl LcdFrame {
    /// A frame with every pixel and icon off.
    pub const fn blank() -> Self {
        Self {
            rows: [0; LCD_HEIGHT as usize],
            icons: 0,
        }
    }

    /// Returns pixel (`x`, `y`); out-of-range coordinates read as off.
    #[inline(always)]
    pub const fn pixel(&self, x: u8, y: u8) -> bool {
        x < LCD_WIDTH && y < LCD_HEIGHT && self.rows[y as usize] & (1 << x) != 0
    }

    /// Sets pixel (`x`, `y`).
    ///
    /// # Returns
    ///
    /// `false` (and no change) if the coordinates are outside the matrix.
    #[inline(always)]
    pub const fn set_pixel(&mut self, x: u8, y: u8, on: bool) -> bool {
        if x >= LCD_WIDTH || y >= LCD_HEIGHT {
            return false;
        }
        let row = &mut self.rows[y as usize];
        if on {
            *row |= 1 << x;
        } else {
            *row &= !(1 << x);
        }
        true
    }

    /// Returns icon `icon`; out-of-range ids read as off.
    pub const fn icon(&self, icon: u8) -> bool {
        icon < ICON_COUNT && self.icons & (1 << icon) != 0
    }

    /// Sets icon `icon`, returning `false` if the id is out of range.
    pub const fn set_icon(&mut self, icon: u8, on: bool) -> bool {
        if icon >= ICON_COUNT {
            return false;
        }
        if on {
            self.icons |= 1 << icon;
        } else {
            self.icons &= !(1 << icon);
        }
        true
    }

    /// Packed bits of row `y` (bit `x` is column `x`), or 0 out of range.
    pub const fn row(&self, y: u8) -> u32 {
        if y < LCD_HEIGHT { self.rows[y as usize] } else { 0 }
    }

    /// Packed icon bits (bit `n` is icon `n`).
    pub const fn icons(&self) -> u8 {
        self.icons
    }

    /// Number of lit pixels.
    pub fn lit_pixels(&self) -> u32 {
        self.rows.iter().map(|row| row.count_ones()).sum()
    }

    /// Unpacks the matrix into `[row][column]` booleans.
    pub fn to_matrix(&self) -> [[bool; LCD_WIDTH as usize]; LCD_HEIGHT as usize] {
        let mut matrix = [[false; LCD_WIDTH as usize]; LCD_HEIGHT as usize];
        for (y, line) in matrix.iter_mut().enumerate() {
            for (x, cell) in line.iter_mut().enumerate() {
                *cell = self.rows[y] & (1 << x) != 0;
            }
        }
        matrix
    }
}

impl fmt::Debug for LcdFrame {
    /// Renders the frame as `#`/`.` rows followed by the icon bits, so assertion diffs
    /// show the picture.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "LcdFrame {{")?;
        for y in 0..LCD_HEIGHT {
            let line: String = (0..LCD_WIDTH)
                .map(|x| if self.pixel(x, y) { '#' } else { '.' })
                .collect();
            writeln!(f, "    {line}")?;
        }
        writeln!(f, "    icons: {:08b}", self.icons)?;
        write!(f, "}}")
    }
}

/// Pending and presented frames of the LCD.
#[derive(Debug, Clone, Default)]
pub struct LcdPanel {
    pending: LcdFrame,
    presented: LcdFrame,
    refreshes: u64,
}

impl LcdPanel {
    /// Creates a blank panel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a pixel into the pending frame. Out-of-range writes are dropped.
    #[inline(always)]
    pub const fn set_pixel(&mut self, x: u8, y: u8, on: bool) {
        let _ = self.pending.set_pixel(x, y, on);
    }

    /// Writes an icon into the pending frame. Out-of-range writes are dropped.
    pub const fn set_icon(&mut self, icon: u8, on: bool) {
        let _ = self.pending.set_icon(icon, on);
    }

    /// Publishes the pending frame.
    ///
    /// # Returns
    ///
    /// The newly presented frame.
    pub const fn refresh(&mut self) -> LcdFrame {
        self.presented = self.pending;
        self.refreshes += 1;
        self.presented
    }

    /// Frame under construction.
    pub const fn pending(&self) -> &LcdFrame {
        &self.pending
    }

    /// Last published frame.
    pub const fn presented(&self) -> &LcdFrame {
        &self.presented
    }

    /// Number of refreshes so far.
    pub const fn refresh_count(&self) -> u64 {
        self.refreshes
    }
}

/// Output backend for published frames.
pub trait FramePresenter: Send {
    /// Shows `frame`. Called on the core thread from `refresh_display`.
    fn present(&mut self, frame: &LcdFrame);
}

/// Presenter that shows nothing (headless runs).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl FramePresenter for NullPresenter {
    fn present(&mut self, _frame: &LcdFrame) {}
}

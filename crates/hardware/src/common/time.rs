//! Wrapping microsecond timestamps.
//!
//! The core compares deadlines across a 32-bit microsecond counter that wraps roughly
//! every 71 minutes. Host clocks count in `u64` microseconds; narrowing keeps the full
//! microsecond resolution modulo 2^32, and all comparisons use the signed wrapping
//! distance so a deadline just past the wrap point still compares as "later".

use std::fmt;

/// A point in emulated time, in microseconds, modulo 2^32.
///
/// `Timestamp` deliberately does not implement `Ord`: two timestamps are only
/// comparable through [`Timestamp::micros_until`] within half the wrap period.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Timestamp(pub u32);

impl Timestamp {
    /// Timestamp zero.
    pub const ZERO: Self = Self(0);

    /// Narrows a host microsecond count to a wrapping timestamp.
    ///
    /// # Arguments
    ///
    /// * `micros` - Microseconds since the host clock's origin.
    ///
    /// # Returns
    ///
    /// The same instant expressed modulo 2^32.
    #[inline(always)]
    pub const fn from_micros(micros: u64) -> Self {
        Self(micros as u32)
    }

    /// Returns the raw microsecond counter.
    #[inline(always)]
    pub const fn as_micros(self) -> u32 {
        self.0
    }

    /// Returns this timestamp advanced by `micros`, wrapping at 2^32.
    #[inline(always)]
    pub const fn wrapping_add(self, micros: u32) -> Self {
        Self(self.0.wrapping_add(micros))
    }

    /// Signed distance in microseconds from `self` to `deadline`.
    ///
    /// Positive when `deadline` lies in the future of `self`, zero or negative once it
    /// has been reached.
    #[inline(always)]
    pub const fn micros_until(self, deadline: Self) -> i32 {
        deadline.0.wrapping_sub(self.0) as i32
    }

    /// Returns `true` once `self` is at or past `deadline`.
    #[inline(always)]
    pub const fn has_reached(self, deadline: Self) -> bool {
        self.micros_until(deadline) <= 0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}us", self.0)
    }
}

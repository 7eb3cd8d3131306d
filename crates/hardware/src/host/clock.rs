//! Timestamp sources and pacing.
//!
//! A `Clock` is the host side of the `timestamp` and `sleep_until` slots. Host clocks
//! count in `u64` microseconds and narrow to the wrapping [`Timestamp`] at the boundary.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::common::{HalError, Timestamp};
use crate::config::ClockConfig;

/// Host time source behind the `timestamp` and `sleep_until` slots.
pub trait Clock: Send {
    /// Current emulated time.
    fn now(&self) -> Timestamp;

    /// Blocks until `deadline`; returns at once if it has already been reached.
    fn sleep_until(&mut self, deadline: Timestamp);
}

/// Wall-clock time scaled by an emulation speed factor.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    origin: Instant,
    speed: f64,
    pacing: bool,
}

impl MonotonicClock {
    /// Creates a clock starting at timestamp zero.
    ///
    /// # Arguments
    ///
    /// * `speed` - Emulated microseconds per host microsecond (1.0 is real time).
    /// * `pacing` - When `false`, `sleep_until` never blocks and the core runs flat out.
    ///
    /// # Errors
    ///
    /// `HalError::InvalidConfig` if `speed` is not a positive finite number. A zero or
    /// NaN speed would turn every `sleep_until` into an unbounded sleep.
    pub fn new(speed: f64, pacing: bool) -> Result<Self, HalError> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(HalError::InvalidConfig(format!(
                "clock.speed must be a positive finite number, got {speed}"
            )));
        }
        Ok(Self::unchecked(speed, pacing))
    }

    fn unchecked(speed: f64, pacing: bool) -> Self {
        Self {
            origin: Instant::now(),
            speed,
            pacing,
        }
    }

    /// Creates a clock from configuration.
    ///
    /// # Errors
    ///
    /// As [`MonotonicClock::new`].
    pub fn from_config(config: &ClockConfig) -> Result<Self, HalError> {
        Self::new(config.speed, config.pacing)
    }

    /// Emulated microseconds since the origin.
    ///
    /// Exact below 2^53 microseconds, far beyond the wrap window of a `Timestamp`.
    #[allow(clippy::float_cmp)]
    fn elapsed_micros(&self) -> u64 {
        let host = self.origin.elapsed().as_micros();
        if self.speed == 1.0 {
            host as u64
        } else {
            (host as f64 * self.speed) as u64
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::unchecked(1.0, true)
    }
}

impl Clock for MonotonicClock {
    #[inline(always)]
    fn now(&self) -> Timestamp {
        Timestamp::from_micros(self.elapsed_micros())
    }

    fn sleep_until(&mut self, deadline: Timestamp) {
        if !self.pacing {
            return;
        }
        let remaining = self.now().micros_until(deadline);
        if remaining <= 0 {
            return;
        }
        let host_micros = (f64::from(remaining) / self.speed) as u64;
        thread::sleep(Duration::from_micros(host_micros));
    }
}

/// Deterministic clock for tests and headless runs.
///
/// Time only moves when told to: through its [`ManualClockHandle`], or, for a stepping
/// clock, by `sleep_until` jumping straight to the deadline.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
    advance_on_sleep: bool,
}

impl ManualClock {
    /// A clock fixed at `start`; `sleep_until` never moves it.
    pub fn frozen(start: Timestamp) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(u64::from(start.as_micros()))),
            advance_on_sleep: false,
        }
    }

    /// A clock at `start` whose `sleep_until` jumps to the deadline.
    pub fn stepping(start: Timestamp) -> Self {
        Self {
            advance_on_sleep: true,
            ..Self::frozen(start)
        }
    }

    /// Returns a handle that can read and move this clock from outside.
    pub fn handle(&self) -> ManualClockHandle {
        ManualClockHandle {
            now: Arc::clone(&self.now),
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_micros(self.now.load(Ordering::Relaxed))
    }

    fn sleep_until(&mut self, deadline: Timestamp) {
        if !self.advance_on_sleep {
            return;
        }
        let remaining = self.now().micros_until(deadline);
        if remaining > 0 {
            let _ = self.now.fetch_add(remaining as u64, Ordering::Relaxed);
        }
    }
}

/// External control over a [`ManualClock`].
#[derive(Debug, Clone)]
pub struct ManualClockHandle {
    now: Arc<AtomicU64>,
}

impl ManualClockHandle {
    /// Current time of the clock.
    pub fn now(&self) -> Timestamp {
        Timestamp::from_micros(self.now.load(Ordering::Relaxed))
    }

    /// Total microseconds elapsed since the clock's epoch, without wrapping.
    pub fn elapsed_micros(&self) -> u64 {
        self.now.load(Ordering::Relaxed)
    }

    /// Moves the clock forward by `micros`.
    pub fn advance(&self, micros: u64) {
        let _ = self.now.fetch_add(micros, Ordering::Relaxed);
    }

    /// Sets the clock to `ts`.
    pub fn set(&self, ts: Timestamp) {
        self.now.store(u64::from(ts.as_micros()), Ordering::Relaxed);
    }
}

//! The composed reference platform.
//!
//! `HostPlatform` is the default implementation of every services slot. Display, audio,
//! memory and halt state live behind one shared lock so a [`HostMonitor`] can observe
//! them from another thread while the core runs; the clock, log sink, input source and
//! presenter are owned by the platform and only touched on the core thread.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::common::{HalError, Timestamp};
use crate::config::Config;
use crate::hal::{HardwareServices, HostBuffer, LogLevel, PollStatus};
use crate::host::audio::{AudioState, Buzzer};
use crate::host::clock::{Clock, MonotonicClock};
use crate::host::display::{FramePresenter, LcdFrame, LcdPanel, NullPresenter};
use crate::host::input::{InputSource, NoInput};
use crate::host::logging::TracingLog;
use crate::host::memory::{HeapAllocator, MemoryStats};

/// State shared between the platform and its monitors.
#[derive(Debug, Default)]
struct HostState {
    panel: LcdPanel,
    buzzer: Buzzer,
    memory: HeapAllocator,
    halted: bool,
}

type Shared = Arc<Mutex<HostState>>;

fn lock(shared: &Shared) -> MutexGuard<'_, HostState> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Reference host platform.
pub struct HostPlatform {
    shared: Shared,
    clock: Box<dyn Clock>,
    log: TracingLog,
    input: Box<dyn InputSource>,
    presenter: Box<dyn FramePresenter>,
}

impl HostPlatform {
    /// Creates a headless platform from configuration.
    ///
    /// Uses a [`MonotonicClock`], no input and no presenter; replace them with the
    /// `with_*` builders.
    ///
    /// # Errors
    ///
    /// `HalError::InvalidConfig` if the clock section is unusable.
    pub fn new(config: &Config) -> Result<Self, HalError> {
        let clock = MonotonicClock::from_config(&config.clock)?;
        Ok(Self::with_parts(config, clock))
    }

    fn with_parts(config: &Config, clock: MonotonicClock) -> Self {
        let state = HostState {
            memory: HeapAllocator::new(config.memory.budget_bytes),
            ..HostState::default()
        };
        Self {
            shared: Arc::new(Mutex::new(state)),
            clock: Box::new(clock),
            log: TracingLog::new(config.log.mask()),
            input: Box::new(NoInput),
            presenter: Box::new(NullPresenter),
        }
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replaces the input source.
    #[must_use]
    pub fn with_input(mut self, input: impl InputSource + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    /// Replaces the frame presenter.
    #[must_use]
    pub fn with_presenter(mut self, presenter: impl FramePresenter + 'static) -> Self {
        self.presenter = Box::new(presenter);
        self
    }

    /// Replaces the log sink.
    #[must_use]
    pub const fn with_log(mut self, log: TracingLog) -> Self {
        self.log = log;
        self
    }

    /// Returns an observer handle onto the shared platform state.
    pub fn monitor(&self) -> HostMonitor {
        HostMonitor {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Default for HostPlatform {
    fn default() -> Self {
        Self::with_parts(&Config::default(), MonotonicClock::default())
    }
}

impl fmt::Debug for HostPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = lock(&self.shared);
        f.debug_struct("HostPlatform")
            .field("log", &self.log)
            .field("refreshes", &state.panel.refresh_count())
            .field("audio", &state.buzzer.state())
            .field("memory", &state.memory.stats())
            .field("halted", &state.halted)
            .finish_non_exhaustive()
    }
}

impl HardwareServices for HostPlatform {
    fn allocate(&mut self, size: u32) -> Option<HostBuffer> {
        let buffer = lock(&self.shared).memory.allocate(size);
        if buffer.is_none() {
            tracing::debug!(size, "host allocation refused");
        }
        buffer
    }

    fn release(&mut self, buffer: HostBuffer) {
        lock(&self.shared).memory.release(buffer);
    }

    fn halt(&mut self) {
        let mut state = lock(&self.shared);
        if !state.halted {
            state.halted = true;
            tracing::info!("core requested halt");
        }
    }

    #[inline(always)]
    fn is_log_enabled(&self, level: LogLevel) -> bool {
        self.log.enabled(level)
    }

    fn log(&mut self, level: LogLevel, message: fmt::Arguments<'_>) {
        self.log.emit(level, message);
    }

    fn sleep_until(&mut self, deadline: Timestamp) {
        self.clock.sleep_until(deadline);
    }

    #[inline(always)]
    fn timestamp(&mut self) -> Timestamp {
        self.clock.now()
    }

    fn refresh_display(&mut self) {
        let frame = lock(&self.shared).panel.refresh();
        self.presenter.present(&frame);
    }

    #[inline(always)]
    fn set_pixel(&mut self, x: u8, y: u8, on: bool) {
        lock(&self.shared).panel.set_pixel(x, y, on);
    }

    fn set_indicator(&mut self, icon: u8, on: bool) {
        lock(&self.shared).panel.set_icon(icon, on);
    }

    fn set_audio_frequency(&mut self, decihertz: u32) {
        lock(&self.shared).buzzer.set_frequency(decihertz);
    }

    fn enable_audio(&mut self, enabled: bool) {
        lock(&self.shared).buzzer.set_playing(enabled);
    }

    fn poll_input(&mut self) -> PollStatus {
        if lock(&self.shared).halted {
            return PollStatus::Quit;
        }
        self.input.poll()
    }
}

/// Cloneable read handle onto a [`HostPlatform`]'s shared state.
#[derive(Clone)]
pub struct HostMonitor {
    shared: Shared,
}

impl HostMonitor {
    /// Last frame published by `refresh_display`.
    pub fn presented_frame(&self) -> LcdFrame {
        *lock(&self.shared).panel.presented()
    }

    /// Frame currently being drawn.
    pub fn pending_frame(&self) -> LcdFrame {
        *lock(&self.shared).panel.pending()
    }

    /// Number of `refresh_display` calls.
    pub fn refresh_count(&self) -> u64 {
        lock(&self.shared).panel.refresh_count()
    }

    /// Buzzer state.
    pub fn audio(&self) -> AudioState {
        lock(&self.shared).buzzer.state()
    }

    /// Number of buzzer on/off transitions.
    pub fn audio_transitions(&self) -> u64 {
        lock(&self.shared).buzzer.transitions()
    }

    /// Whether `halt` has been called.
    pub fn is_halted(&self) -> bool {
        lock(&self.shared).halted
    }

    /// Allocator counters.
    pub fn memory(&self) -> MemoryStats {
        lock(&self.shared).memory.stats()
    }
}

impl fmt::Debug for HostMonitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostMonitor").finish_non_exhaustive()
    }
}

//! Host Service Functions.
//!
//! This module contains the reference platform behind the services table. It includes:
//! 1. **Clock:** Monotonic wall-clock pacing and a deterministic manual clock.
//! 2. **Display:** A bit-packed LCD frame with pending/presented double buffering.
//! 3. **Audio:** Buzzer frequency and on/off state.
//! 4. **Memory:** A libc heap allocator with an optional byte budget.
//! 5. **Logging:** A `tracing` sink filtered by a level mask.
//! 6. **Input:** Poll sources deciding whether the run continues.
//! 7. **Platform:** `HostPlatform`, which wires the above into `HardwareServices`.

/// Buzzer state.
pub mod audio;

/// Timestamp sources and pacing.
pub mod clock;

/// LCD frames, the panel, and frame presenters.
pub mod display;

/// Input poll sources.
pub mod input;

/// Guest log sink.
pub mod logging;

/// Host heap allocator.
pub mod memory;

/// The composed reference platform.
pub mod platform;

pub use audio::{AudioState, Buzzer};
pub use clock::{Clock, ManualClock, ManualClockHandle, MonotonicClock};
pub use display::{FramePresenter, LcdFrame, LcdPanel, NullPresenter};
pub use input::{InputSource, NoInput, QuitSignal};
pub use logging::TracingLog;
pub use memory::{HeapAllocator, MemoryStats};
pub use platform::{HostMonitor, HostPlatform};

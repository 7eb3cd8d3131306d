//! Input poll sources.
//!
//! The `poll_input` slot is the core's only way to learn that the user wants out. An
//! `InputSource` answers that question each time the session polls.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::hal::PollStatus;

/// Host side of the `poll_input` slot.
pub trait InputSource: Send {
    /// Drains pending host input and reports whether the run should continue.
    fn poll(&mut self) -> PollStatus;
}

/// Input source that never asks to quit.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl InputSource for NoInput {
    fn poll(&mut self) -> PollStatus {
        PollStatus::Continue
    }
}

/// Quit request shared with other threads (signal handlers, UI threads, tests).
///
/// Clones share one flag. Once requested, every poll reports `Quit`.
#[derive(Debug, Default, Clone)]
pub struct QuitSignal {
    requested: Arc<AtomicBool>,
}

impl QuitSignal {
    /// Creates an unset signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the run stop at the next poll.
    pub fn request(&self) {
        self.requested.store(true, Ordering::Release);
    }

    /// Whether a stop has been requested.
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}

impl InputSource for QuitSignal {
    fn poll(&mut self) -> PollStatus {
        if self.is_requested() {
            PollStatus::Quit
        } else {
            PollStatus::Continue
        }
    }
}

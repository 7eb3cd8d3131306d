//! Guest log sink.
//!
//! Guest messages are forwarded as `tracing` events under the `tamasim::guest` target,
//! one sub-target per level, so a subscriber filter such as
//! `tamasim::guest::memory=trace` selects them independently of host events.

use std::fmt;

use crate::hal::{LevelMask, LogLevel};

/// `tracing`-backed log sink filtered by a level mask.
#[derive(Debug, Clone, Copy)]
pub struct TracingLog {
    mask: LevelMask,
}

impl TracingLog {
    /// Creates a sink that accepts the levels in `mask`.
    pub const fn new(mask: LevelMask) -> Self {
        Self { mask }
    }

    /// Enabled levels.
    pub const fn mask(&self) -> LevelMask {
        self.mask
    }

    /// O(1) check used by the `is_log_enabled` slot.
    #[inline(always)]
    pub const fn enabled(&self, level: LogLevel) -> bool {
        self.mask.contains(level)
    }

    /// Emits `message` at `level`. Disabled levels are dropped without formatting.
    pub fn emit(&self, level: LogLevel, message: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        match level {
            LogLevel::Error => tracing::error!(target: "tamasim::guest", "{message}"),
            LogLevel::Info => tracing::info!(target: "tamasim::guest", "{message}"),
            LogLevel::Memory => tracing::trace!(target: "tamasim::guest::memory", "{message}"),
            LogLevel::Cpu => tracing::trace!(target: "tamasim::guest::cpu", "{message}"),
            LogLevel::Interrupt => {
                tracing::debug!(target: "tamasim::guest::interrupt", "{message}");
            }
        }
    }
}

impl Default for TracingLog {
    fn default() -> Self {
        Self::new(LevelMask::from_bits(LogLevel::Error.bit()))
    }
}

//! Guest logging shims.
//!
//! The core asks [`HardwareServices::is_log_enabled`](super::HardwareServices::is_log_enabled)
//! before it formats anything; only a positive answer leads to a `log` call. The
//! [`hal_log!`](crate::hal_log) macro packages that order of operations so the message
//! arguments are never evaluated for a disabled level. Builds with the `strip-log`
//! feature keep the macro's call shape but compile the whole path out.

use std::fmt;

use serde::Deserialize;

/// `true` when guest logging is compiled out (`strip-log` feature).
pub const STRIPPED: bool = cfg!(feature = "strip-log");

/// Guest log levels. Discriminants are the bit flags used on the C side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum LogLevel {
    /// Errors reported by the core.
    Error = 0x01,
    /// General information.
    Info = 0x02,
    /// Memory access tracing.
    Memory = 0x04,
    /// CPU instruction tracing.
    Cpu = 0x08,
    /// Interrupt tracing.
    #[serde(alias = "int")]
    Interrupt = 0x10,
}

impl LogLevel {
    /// Every level, lowest bit first.
    pub const ALL: [Self; 5] = [
        Self::Error,
        Self::Info,
        Self::Memory,
        Self::Cpu,
        Self::Interrupt,
    ];

    /// Bit flag of this level.
    #[inline(always)]
    pub const fn bit(self) -> u8 {
        self as u8
    }

    /// Decodes a raw C level code; codes that are not exactly one known flag are rejected.
    pub const fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0x01 => Some(Self::Error),
            0x02 => Some(Self::Info),
            0x04 => Some(Self::Memory),
            0x08 => Some(Self::Cpu),
            0x10 => Some(Self::Interrupt),
            _ => None,
        }
    }

    /// Lowercase name, as accepted in configuration files.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Info => "info",
            Self::Memory => "memory",
            Self::Cpu => "cpu",
            Self::Interrupt => "interrupt",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of enabled log levels.
///
/// A single byte, so `contains` is one AND and one compare.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LevelMask(u8);

impl LevelMask {
    /// No level enabled.
    pub const NONE: Self = Self(0);
    /// Every level enabled.
    pub const ALL: Self = Self(0x1F);

    /// Builds a mask from raw bits; unknown bits are dropped.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Raw bits of the mask.
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns the mask with `level` enabled.
    #[must_use]
    pub const fn with(self, level: LogLevel) -> Self {
        Self(self.0 | level.bit())
    }

    /// Returns the mask with `level` disabled.
    #[must_use]
    pub const fn without(self, level: LogLevel) -> Self {
        Self(self.0 & !level.bit())
    }

    /// Returns `true` if `level` is enabled.
    #[inline(always)]
    pub const fn contains(self, level: LogLevel) -> bool {
        self.0 & level.bit() != 0
    }

    /// Returns `true` if no level is enabled.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<LogLevel> for LevelMask {
    fn from_iter<I: IntoIterator<Item = LogLevel>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}

/// Log sink for builds where guest logging is stripped.
///
/// Same shape as [`HardwareServices::log`](super::HardwareServices::log); never touches
/// its arguments.
#[inline(always)]
pub const fn discard(_level: LogLevel, _message: fmt::Arguments<'_>) {}

/// Emits a guest log message through a services object, formatting lazily.
///
/// `is_log_enabled` is queried first; the format arguments are evaluated only when it
/// answers `true`. With the `strip-log` feature the check short-circuits at compile time.
///
/// ```
/// use tamasim_core::hal::{HardwareServices, LogLevel};
/// use tamasim_core::hal_log;
///
/// fn report(hal: &mut dyn HardwareServices, pc: u16) {
///     hal_log!(hal, LogLevel::Cpu, "pc={pc:#05x}");
/// }
/// ```
#[macro_export]
macro_rules! hal_log {
    ($hal:expr, $level:expr, $($arg:tt)+) => {{
        let level: $crate::hal::LogLevel = $level;
        let hal = &mut *$hal;
        if !$crate::hal::log::STRIPPED
            && $crate::hal::HardwareServices::is_log_enabled(&*hal, level)
        {
            $crate::hal::HardwareServices::log(hal, level, ::core::format_args!($($arg)+));
        }
    }};
}

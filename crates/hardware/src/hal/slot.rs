//! Slot enumeration in ABI order.
//!
//! The order of [`Slot::ALL`] is the order of function references in the table the
//! core was compiled against. Producers linked separately (see [`RawHal`](super::RawHal))
//! must lay their slots out identically; reordering or changing the arity of any slot is
//! a breaking change on both sides.

use std::fmt;

/// One capability of the hardware services table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Slot {
    /// Allocate a host buffer.
    Allocate = 0,
    /// Return a buffer obtained from `Allocate`.
    Release = 1,
    /// Ask the platform to stop its run loop.
    Halt = 2,
    /// O(1) query of whether a log level is enabled.
    IsLogEnabled = 3,
    /// Guest log sink.
    Log = 4,
    /// Block until a timestamp is reached.
    SleepUntil = 5,
    /// Read the current timestamp.
    Timestamp = 6,
    /// Flush pending display changes.
    RefreshDisplay = 7,
    /// Set one LCD pixel.
    SetPixel = 8,
    /// Set one indicator icon.
    SetIndicator = 9,
    /// Set the buzzer frequency.
    SetAudioFrequency = 10,
    /// Start or stop the buzzer.
    EnableAudio = 11,
    /// Poll host input and report whether to continue.
    PollInput = 12,
}

impl Slot {
    /// Number of slots in the table.
    pub const COUNT: usize = 13;

    /// Every slot, in ABI order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Allocate,
        Self::Release,
        Self::Halt,
        Self::IsLogEnabled,
        Self::Log,
        Self::SleepUntil,
        Self::Timestamp,
        Self::RefreshDisplay,
        Self::SetPixel,
        Self::SetIndicator,
        Self::SetAudioFrequency,
        Self::EnableAudio,
        Self::PollInput,
    ];

    /// Position of this slot in the table.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Slot at `index`, if any.
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// Rust-side method name of the slot.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Allocate => "allocate",
            Self::Release => "release",
            Self::Halt => "halt",
            Self::IsLogEnabled => "is_log_enabled",
            Self::Log => "log",
            Self::SleepUntil => "sleep_until",
            Self::Timestamp => "timestamp",
            Self::RefreshDisplay => "refresh_display",
            Self::SetPixel => "set_pixel",
            Self::SetIndicator => "set_indicator",
            Self::SetAudioFrequency => "set_audio_frequency",
            Self::EnableAudio => "enable_audio",
            Self::PollInput => "poll_input",
        }
    }

    /// Field name of the slot in the C layout.
    pub const fn c_name(self) -> &'static str {
        match self {
            Self::Allocate => "malloc",
            Self::Release => "free",
            Self::Halt => "halt",
            Self::IsLogEnabled => "is_log_enabled",
            Self::Log => "log",
            Self::SleepUntil => "sleep_until",
            Self::Timestamp => "get_timestamp",
            Self::RefreshDisplay => "update_screen",
            Self::SetPixel => "set_lcd_matrix",
            Self::SetIndicator => "set_lcd_icon",
            Self::SetAudioFrequency => "set_frequency",
            Self::EnableAudio => "play_frequency",
            Self::PollInput => "handler",
        }
    }

    /// C signature of the slot as laid out in [`RawHal`](super::RawHal).
    pub const fn c_signature(self) -> &'static str {
        match self {
            Self::Allocate => "void *(*)(u32_t size)",
            Self::Release => "void (*)(void *ptr)",
            Self::Halt => "void (*)(void)",
            Self::IsLogEnabled => "bool_t (*)(int level)",
            Self::Log => "void (*)(int level, const char *message)",
            Self::SleepUntil => "void (*)(u32_t ts)",
            Self::Timestamp => "u32_t (*)(void)",
            Self::RefreshDisplay => "void (*)(void)",
            Self::SetPixel => "void (*)(u8_t x, u8_t y, bool_t val)",
            Self::SetIndicator => "void (*)(u8_t icon, bool_t val)",
            Self::SetAudioFrequency => "void (*)(u32_t freq)",
            Self::EnableAudio => "void (*)(bool_t en)",
            Self::PollInput => "int (*)(void)",
        }
    }

    /// Only `SleepUntil` may block the calling thread.
    #[inline(always)]
    pub const fn may_block(self) -> bool {
        matches!(self, Self::SleepUntil)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

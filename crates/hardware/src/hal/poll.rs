//! Input poll status codes.
//!
//! `poll_input` is the platform's only way, besides `halt`, to tell the core to stop.
//! The raw value space is fixed: `0` means continue, any non-zero code means quit.

/// Outcome of one `poll_input` call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum PollStatus {
    /// Keep executing.
    #[default]
    Continue = 0,
    /// Stop the run loop.
    Quit = 1,
}

impl PollStatus {
    /// Decodes a raw status code; every non-zero code is `Quit`.
    #[inline(always)]
    pub const fn from_raw(code: i32) -> Self {
        if code == 0 { Self::Continue } else { Self::Quit }
    }

    /// Encodes the status for the C layout.
    #[inline(always)]
    pub const fn to_raw(self) -> i32 {
        self as i32
    }

    /// Returns `true` for `Quit`.
    #[inline(always)]
    pub const fn is_quit(self) -> bool {
        matches!(self, Self::Quit)
    }
}

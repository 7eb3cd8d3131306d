//! Buzzer state.
//!
//! The handheld has a single piezo buzzer: the core programs a frequency, then gates it
//! on and off. Frequencies arrive in decihertz.

use crate::common::constants::DECIHERTZ_PER_HZ;

/// Snapshot of the buzzer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct AudioState {
    /// Programmed frequency in decihertz.
    pub frequency_dhz: u32,
    /// Whether the buzzer is gated on.
    pub playing: bool,
}

impl AudioState {
    /// Programmed frequency in hertz.
    pub fn hz(&self) -> f64 {
        f64::from(self.frequency_dhz) / f64::from(DECIHERTZ_PER_HZ)
    }

    /// True when the buzzer is on with a non-zero frequency.
    pub const fn audible(&self) -> bool {
        self.playing && self.frequency_dhz != 0
    }
}

/// Buzzer with a count of on/off transitions.
#[derive(Debug, Clone, Default)]
pub struct Buzzer {
    state: AudioState,
    transitions: u64,
}

impl Buzzer {
    /// Creates a silent buzzer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Programs the frequency; does not change the on/off gate.
    pub const fn set_frequency(&mut self, decihertz: u32) {
        self.state.frequency_dhz = decihertz;
    }

    /// Gates the buzzer. Only actual changes count as transitions.
    pub const fn set_playing(&mut self, playing: bool) {
        if self.state.playing != playing {
            self.state.playing = playing;
            self.transitions += 1;
        }
    }

    /// Current state.
    pub const fn state(&self) -> AudioState {
        self.state
    }

    /// Number of on/off transitions so far.
    pub const fn transitions(&self) -> u64 {
        self.transitions
    }
}

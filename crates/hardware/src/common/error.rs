//! Boundary error definitions.
//!
//! Only configuration errors are represented here. Allocation failure is reported by
//! `allocate` returning `None`, log suppression is a normal control path, and
//! termination travels through `poll_input` and `halt`; none of those are errors.

use thiserror::Error;

use crate::hal::Slot;

/// Errors raised while assembling or installing a hardware services table.
///
/// All variants are fatal for the session that produced them: the core must not start
/// executing against a table that failed to build or register.
#[derive(Debug, Error)]
pub enum HalError {
    /// A table was built with a slot left unpopulated.
    #[error("hardware services table is missing the `{0}` slot")]
    MissingSlot(Slot),

    /// `register` was called after the core started executing.
    #[error("cannot register services after the core has started (generation {generation})")]
    RegisterWhileRunning {
        /// Generation of the table that stays active.
        generation: u32,
    },

    /// A configuration value is outside its valid domain.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("configuration I/O error: {0}")]
    Io(#[from] std::io::Error),
}

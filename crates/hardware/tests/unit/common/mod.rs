//! Unit tests for shared types.


/// Error messages.
pub mod error;

/// Wrapping timestamp arithmetic.
pub mod time;

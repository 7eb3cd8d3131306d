//! Unit tests for sessions and the reference core.

/// The test-pattern core against recording and host tables.
pub mod pattern;

//! Common types used on both sides of the hardware services boundary.
//!
//! This module provides the building blocks shared by the services table, the host
//! platform and the session driver. It includes:
//! 1. **Constants:** LCD geometry, indicator count, and timestamp resolution.
//! 2. **Time:** The wrapping microsecond `Timestamp` the core paces itself against.
//! 3. **Error Handling:** `HalError`, the configuration-error taxonomy of the boundary.

/// Handheld geometry and timing constants.
pub mod constants;

/// Error types for table construction, registration, and configuration.
pub mod error;

/// Wrapping microsecond timestamps.
pub mod time;

pub use error::HalError;
pub use time::Timestamp;

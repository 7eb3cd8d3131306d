//! Hardware services table for a cycle-accurate handheld emulator.
//!
//! This crate is the boundary between an emulation core and the platform it runs on:
//! 1. **HAL:** The `HardwareServices` contract, the fully populated `ServiceTable`, the
//!    `#[repr(C)]` `RawHal` layout for separately linked hosts, and registration.
//! 2. **Host:** A reference platform (heap allocator, `tracing` log sink, clocks, LCD
//!    panel, buzzer, input) implementing every slot.
//! 3. **Session:** The `EmulationCore` seam, the run loop, and a reference test-pattern
//!    core.
//! 4. **Statistics:** Per-slot call counting around any services object.

/// Common types and constants (timestamps, LCD geometry, errors).
pub mod common;
/// Platform configuration (defaults, JSON loading, validation).
pub mod config;
/// Hardware services contract, tables, raw ABI, and registration.
pub mod hal;
/// Reference host service functions.
pub mod host;
/// Session driving and the emulation core seam.
pub mod sim;
/// Slot call statistics.
pub mod stats;

/// Error raised while building or registering a services table.
pub use crate::common::HalError;
/// Wrapping microsecond timestamp exchanged with the core.
pub use crate::common::Timestamp;
/// Root configuration type; use `Config::default()` or load from JSON.
pub use crate::config::Config;
/// Registration entry point and the services contract.
pub use crate::hal::{HardwareServices, ServiceRegistry, ServiceTable, install_default_services};
/// Reference platform and its observer handle.
pub use crate::host::{HostMonitor, HostPlatform};
/// Core seam and run loop.
pub use crate::sim::{EmulationCore, Session};

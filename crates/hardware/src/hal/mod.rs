//! Hardware Services Table (HST).
//!
//! This module defines the seam between the emulation core and the platform it runs on.
//! It provides:
//! 1. **Contract:** The `HardwareServices` trait, one method per slot, in fixed ABI order.
//! 2. **Table:** `ServiceTable`, an immutable table of closures built through a builder
//!    that refuses partially populated tables.
//! 3. **Registration:** `ServiceRegistry`, the owner of the active table for one session.
//! 4. **Raw ABI:** `RawHal`, the `#[repr(C)]` layout, and its adapter for C hosts.
//! 5. **Shim types:** Log levels and masks, poll status codes, and host buffers.

/// `#[repr(C)]` table layout and its adapter.
pub mod abi;

/// Host-owned memory blocks handed out by `allocate`.
pub mod buffer;

/// Guest log levels, level masks, and the lazy `hal_log!` shim.
pub mod log;

/// Input poll status codes.
pub mod poll;

/// Active table ownership and the registration entry point.
pub mod registry;

/// Slot enumeration in ABI order.
pub mod slot;

/// Closure-backed services table and its builder.
pub mod table;

/// The `HardwareServices` trait.
pub mod traits;

pub use abi::{RawHal, RawHalServices};
pub use buffer::HostBuffer;
pub use log::{LevelMask, LogLevel};
pub use poll::PollStatus;
pub use registry::{ServiceRegistry, install_default_services};
pub use slot::Slot;
pub use table::{ServiceTable, ServiceTableBuilder};
pub use traits::HardwareServices;

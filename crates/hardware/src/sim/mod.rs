//! Session driving and the emulation core seam.
//!
//! This module connects an emulation core to its hardware services. It provides:
//! 1. **Seam:** The `EmulationCore` trait, the only thing a core implements.
//! 2. **Session:** Ownership of the core and its `ServiceRegistry`, the run loop, and
//!    the registration window.
//! 3. **Reference core:** `PatternCore`, which exercises every slot.

/// `EmulationCore`, `Session`, and stop reasons.
pub mod session;

/// The reference test-pattern core.
pub mod pattern;

pub use pattern::PatternCore;
pub use session::{CoreStatus, EmulationCore, Session, StopHandle, StopReason};

//! Active services ownership and registration.
//!
//! There is no process-wide table: each session owns a `ServiceRegistry`, which owns the
//! one active `HardwareServices` object. Registering replaces it wholesale, and is only
//! accepted while the core is not executing.

use std::fmt;

use super::traits::HardwareServices;
use crate::common::HalError;
use crate::host::HostPlatform;

/// Owner of the active hardware services for one emulation session.
pub struct ServiceRegistry {
    active: Box<dyn HardwareServices>,
    generation: u32,
    executing: bool,
}

impl ServiceRegistry {
    /// Creates a registry with `services` as generation 1.
    pub fn new(services: Box<dyn HardwareServices>) -> Self {
        tracing::debug!(generation = 1, "hardware services registered");
        Self {
            active: services,
            generation: 1,
            executing: false,
        }
    }

    /// Replaces the active services.
    ///
    /// The previous table is dropped; nothing from it carries over.
    ///
    /// # Errors
    ///
    /// `HalError::RegisterWhileRunning` if called between
    /// [`begin_execution`](Self::begin_execution) and
    /// [`end_execution`](Self::end_execution); the active table is left untouched.
    pub fn register(&mut self, services: Box<dyn HardwareServices>) -> Result<(), HalError> {
        if self.executing {
            tracing::error!(
                generation = self.generation,
                "rejected hardware services registration while the core is executing"
            );
            return Err(HalError::RegisterWhileRunning {
                generation: self.generation,
            });
        }
        self.active = services;
        self.generation = self.generation.wrapping_add(1);
        tracing::debug!(generation = self.generation, "hardware services replaced");
        Ok(())
    }

    /// Returns the active services for slot calls.
    #[inline(always)]
    pub fn services(&mut self) -> &mut dyn HardwareServices {
        self.active.as_mut()
    }

    /// Returns the active services for read-only queries.
    #[inline(always)]
    pub fn services_ref(&self) -> &dyn HardwareServices {
        self.active.as_ref()
    }

    /// Number of registrations so far, including the initial one.
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// Returns `true` while the core is executing against the active table.
    pub const fn is_executing(&self) -> bool {
        self.executing
    }

    /// Marks the start of execution; registration is refused until `end_execution`.
    pub const fn begin_execution(&mut self) {
        self.executing = true;
    }

    /// Marks the end of execution.
    pub const fn end_execution(&mut self) {
        self.executing = false;
    }

    /// Consumes the registry, returning the active services.
    pub fn into_services(self) -> Box<dyn HardwareServices> {
        self.active
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("generation", &self.generation)
            .field("executing", &self.executing)
            .finish_non_exhaustive()
    }
}

/// Registration entry point: builds the default host platform and registers it.
///
/// Takes no arguments; the platform is assembled from the host service functions in
/// [`crate::host`] with the default configuration.
pub fn install_default_services() -> ServiceRegistry {
    ServiceRegistry::new(Box::new(HostPlatform::default()))
}

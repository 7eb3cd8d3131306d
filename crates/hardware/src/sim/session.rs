//! Session: owns an emulation core together with its hardware services.
//!
//! The session is the single place where services are registered and where the core
//! runs. `register` is accepted only before the core is first reset: once started, the
//! core holds buffers and state obtained from the active table. Switching tables after
//! that goes through [`Session::replace_services`], which shuts the core down on the
//! old table and resets it against the new one.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::common::HalError;
use crate::config::SessionConfig;
use crate::hal::{HardwareServices, ServiceRegistry};

/// Result of a single core step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreStatus {
    /// The core can keep stepping.
    Running,
    /// The core has stopped on its own.
    Halted,
}

/// Why [`Session::run`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The core reported `Halted`.
    Halted,
    /// `poll_input` reported `Quit`.
    Quit,
    /// The configured step limit was reached.
    StepLimit,
    /// [`Session::stop`] or a [`StopHandle`] requested the stop.
    Stopped,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Halted => "core halted",
            Self::Quit => "input requested quit",
            Self::StepLimit => "step limit reached",
            Self::Stopped => "stop requested",
        })
    }
}

/// An emulation core driven through hardware services.
///
/// Cores never hold on to their services; each call receives the active table, so a
/// replacement registered between runs takes effect on the next call.
pub trait EmulationCore {
    /// Brings the core to its power-on state. Called once before the first step.
    fn reset(&mut self, hal: &mut dyn HardwareServices);

    /// Executes one unit of work (an instruction, or a frame for coarse cores).
    fn step(&mut self, hal: &mut dyn HardwareServices) -> CoreStatus;

    /// Releases anything the core acquired from `hal`. Called once by [`Session::close`].
    fn shutdown(&mut self, _hal: &mut dyn HardwareServices) {}
}

/// Cloneable handle that asks a running session to stop at its next poll.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    /// Requests a stop.
    pub fn stop(&self) {
        self.flag.store(true, Ordering::Release);
    }

    fn take(&self) -> bool {
        self.flag.swap(false, Ordering::AcqRel)
    }
}

/// A core, its registered services, and the run loop between them.
pub struct Session<C> {
    core: C,
    registry: ServiceRegistry,
    poll_interval: u32,
    max_steps: Option<u64>,
    steps: u64,
    started: bool,
    stop: StopHandle,
}

impl<C: EmulationCore> Session<C> {
    /// Creates a session. The core is reset lazily on the first step.
    ///
    /// # Arguments
    ///
    /// * `core` - The emulation core.
    /// * `registry` - Registration holding the initial services.
    /// * `config` - Poll interval and step limit.
    pub fn new(core: C, registry: ServiceRegistry, config: &SessionConfig) -> Self {
        Self {
            core,
            registry,
            poll_interval: config.poll_interval.max(1),
            max_steps: config.max_steps,
            steps: 0,
            started: false,
            stop: StopHandle::default(),
        }
    }

    /// Replaces the active services before the core starts.
    ///
    /// # Errors
    ///
    /// `HalError::RegisterWhileRunning` once the core has been reset; the active table
    /// stays registered.
    pub fn register(&mut self, services: Box<dyn HardwareServices>) -> Result<(), HalError> {
        if self.started {
            let generation = self.registry.generation();
            tracing::error!(
                generation,
                "rejected hardware services registration after the core started"
            );
            return Err(HalError::RegisterWhileRunning { generation });
        }
        self.registry.register(services)
    }

    /// Shuts the core down on the active services, then registers `services`.
    ///
    /// The core is reset against the new table on the next step, so every buffer is
    /// released through the table that allocated it.
    ///
    /// # Errors
    ///
    /// `HalError::RegisterWhileRunning` if the registry is marked as executing; the core
    /// is left untouched.
    pub fn replace_services(
        &mut self,
        services: Box<dyn HardwareServices>,
    ) -> Result<(), HalError> {
        if self.registry.is_executing() {
            return Err(HalError::RegisterWhileRunning {
                generation: self.registry.generation(),
            });
        }
        if self.started {
            self.core.shutdown(self.registry.services());
            self.started = false;
        }
        self.registry.register(services)
    }

    /// Whether the core has been reset and not shut down since.
    pub const fn is_started(&self) -> bool {
        self.started
    }

    fn ensure_started(&mut self) {
        if !self.started {
            self.started = true;
            self.core.reset(self.registry.services());
        }
    }

    /// Executes a single core step, without polling input.
    pub fn step(&mut self) -> CoreStatus {
        self.ensure_started();
        self.registry.begin_execution();
        let status = self.core.step(self.registry.services());
        self.registry.end_execution();
        self.steps += 1;
        status
    }

    /// Runs the core until it halts, input asks to quit, the step limit is reached, or a
    /// stop is requested.
    ///
    /// Input is polled every `poll_interval` steps. Stop requests are checked at the same
    /// cadence, so a stop takes effect within one interval.
    pub fn run(&mut self) -> StopReason {
        self.ensure_started();
        self.registry.begin_execution();
        let reason = self.run_loop();
        self.registry.end_execution();
        tracing::info!(steps = self.steps, %reason, "session stopped");
        reason
    }

    fn run_loop(&mut self) -> StopReason {
        let interval = u64::from(self.poll_interval);
        loop {
            if self.max_steps.is_some_and(|max| self.steps >= max) {
                return StopReason::StepLimit;
            }
            let services = self.registry.services();
            let status = self.core.step(services);
            self.steps += 1;
            if status == CoreStatus::Halted {
                return StopReason::Halted;
            }
            if self.steps % interval == 0 {
                if self.stop.take() {
                    return StopReason::Stopped;
                }
                if self.registry.services().poll_input().is_quit() {
                    return StopReason::Quit;
                }
            }
        }
    }

    /// Requests that a subsequent or in-progress `run` stop at its next poll.
    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Returns a handle that can stop the session from another thread.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Steps executed so far.
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    /// Whether the core is currently executing.
    pub const fn is_running(&self) -> bool {
        self.registry.is_executing()
    }

    /// The registry holding the active services.
    pub const fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// The core.
    pub const fn core(&self) -> &C {
        &self.core
    }

    /// Shuts the core down and returns it with its registry.
    ///
    /// `shutdown` is only called if the core was ever reset.
    pub fn close(mut self) -> (C, ServiceRegistry) {
        if self.started {
            self.core.shutdown(self.registry.services());
        }
        (self.core, self.registry)
    }
}

impl<C: fmt::Debug> fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("core", &self.core)
            .field("registry", &self.registry)
            .field("poll_interval", &self.poll_interval)
            .field("max_steps", &self.max_steps)
            .field("steps", &self.steps)
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}

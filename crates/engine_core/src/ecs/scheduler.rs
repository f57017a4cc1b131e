//! Systems scheduler
//!
//! Drives the simulation once per rendered frame with an accumulator:
//!
//! 1. the frame's elapsed time is added to the time still to simulate;
//! 2. while at least one fixed step is owed and the per-frame cap is not
//!    reached, every fixed time step system runs once and one step is taken
//!    off the accumulator;
//! 3. every variable time step system runs once with the frame's elapsed time.
//!
//! Steps beyond the cap stay in the accumulator, so a long stall makes the
//! simulation lag wall-clock time instead of stalling the frame. Errors from
//! systems abort the frame and are returned to the caller untouched.

use std::collections::HashSet;
use std::time::Duration;

use log::{debug, trace, warn};
use thiserror::Error;

use super::scene::Scene;
use super::system::{FixedTimeStepSystem, SystemError, VariableTimeStepSystem};
use crate::config::{ConfigError, SchedulerConfig};
use crate::foundation::time::FrameTimer;

/// Errors raised while building or running the scheduler
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// Invalid timing configuration
    #[error("Scheduler configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A priority override names no registered system
    #[error("Unknown system '{0}' in priority overrides")]
    UnknownSystem(String),

    /// Two systems of the same category share a name
    #[error("System '{0}' is registered more than once")]
    DuplicateSystem(String),

    /// A system failed during a frame
    #[error("System '{system}' failed")]
    System {
        /// Name of the failing system
        system: String,
        /// Underlying failure
        #[source]
        source: SystemError,
    },
}

/// Summary of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// Fixed steps simulated this frame
    pub fixed_steps: u32,
    /// Whether the per-frame cap stopped the loop with time still owed
    pub capped: bool,
    /// Elapsed time passed to variable time step systems
    pub elapsed: Duration,
}

struct Scheduled<S: ?Sized> {
    name: String,
    priority: i32,
    system: Box<S>,
}

impl<S: ?Sized> Scheduled<S> {
    fn new(name: String, priority: i32, system: Box<S>) -> Self {
        Self {
            name,
            priority,
            system,
        }
    }
}

/// Builder for [`SystemsScheduler`]
///
/// Systems are kept in registration order until [`build`](Self::build)
/// applies the configured priority overrides and sorts each category stably.
pub struct SystemsSchedulerBuilder {
    config: SchedulerConfig,
    scene: Scene,
    fixed_systems: Vec<Box<dyn FixedTimeStepSystem>>,
    variable_systems: Vec<Box<dyn VariableTimeStepSystem>>,
}

impl SystemsSchedulerBuilder {
    /// Start a builder with the given timing configuration and an empty scene
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            scene: Scene::new("main"),
            fixed_systems: Vec::new(),
            variable_systems: Vec::new(),
        }
    }

    /// Scene the scheduler will own
    pub fn with_scene(mut self, scene: Scene) -> Self {
        self.scene = scene;
        self
    }

    /// Register a fixed time step system
    pub fn with_fixed_system(mut self, system: impl FixedTimeStepSystem + 'static) -> Self {
        self.fixed_systems.push(Box::new(system));
        self
    }

    /// Register a variable time step system
    pub fn with_variable_system(mut self, system: impl VariableTimeStepSystem + 'static) -> Self {
        self.variable_systems.push(Box::new(system));
        self
    }

    /// Validate the configuration and order the systems
    pub fn build(self) -> Result<SystemsScheduler, SchedulerError> {
        let fixed_step = self.config.fixed_step()?;
        let overrides = &self.config.system_priorities;

        let mut known = HashSet::new();
        let mut fixed_systems = Vec::with_capacity(self.fixed_systems.len());
        for system in self.fixed_systems {
            let name = system.name().to_string();
            if !known.insert(("fixed", name.clone())) {
                return Err(SchedulerError::DuplicateSystem(name));
            }
            let priority = overrides.get(&name).copied().unwrap_or_else(|| system.priority());
            fixed_systems.push(Scheduled::new(name, priority, system));
        }

        let mut variable_systems = Vec::with_capacity(self.variable_systems.len());
        for system in self.variable_systems {
            let name = system.name().to_string();
            if !known.insert(("variable", name.clone())) {
                return Err(SchedulerError::DuplicateSystem(name));
            }
            let priority = overrides.get(&name).copied().unwrap_or_else(|| system.priority());
            variable_systems.push(Scheduled::new(name, priority, system));
        }

        if let Some(unknown) = overrides
            .keys()
            .find(|name| !known.iter().any(|(_, known_name)| known_name == *name))
        {
            return Err(SchedulerError::UnknownSystem(unknown.clone()));
        }

        // `sort_by_key` is stable: equal priorities keep registration order
        fixed_systems.sort_by_key(|entry| entry.priority);
        variable_systems.sort_by_key(|entry| entry.priority);

        debug!(
            "Scheduler built: step {:?}, cap {}, fixed [{}], variable [{}]",
            fixed_step,
            self.config.max_fixed_steps_per_frame,
            describe(&fixed_systems),
            describe(&variable_systems),
        );

        Ok(SystemsScheduler {
            scene: self.scene,
            fixed_systems,
            variable_systems,
            fixed_step,
            max_fixed_steps_per_frame: self.config.max_fixed_steps_per_frame,
            time_to_simulate: Duration::ZERO,
            fixed_update_count: 0,
            timer: None,
        })
    }
}

fn describe<S: ?Sized>(systems: &[Scheduled<S>]) -> String {
    systems
        .iter()
        .map(|entry| format!("{}({})", entry.name, entry.priority))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Per-frame driver of fixed and variable time step systems
///
/// Owns the scene; systems only ever see it through `&mut Scene` for the
/// duration of their own update.
pub struct SystemsScheduler {
    scene: Scene,
    fixed_systems: Vec<Scheduled<dyn FixedTimeStepSystem>>,
    variable_systems: Vec<Scheduled<dyn VariableTimeStepSystem>>,
    fixed_step: Duration,
    max_fixed_steps_per_frame: u32,
    time_to_simulate: Duration,
    fixed_update_count: u64,
    timer: Option<FrameTimer>,
}

impl SystemsScheduler {
    /// Start building a scheduler
    pub fn builder(config: SchedulerConfig) -> SystemsSchedulerBuilder {
        SystemsSchedulerBuilder::new(config)
    }

    /// The simulated scene
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable access to the simulated scene
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Swap in a new scene, returning the previous one
    pub fn replace_scene(&mut self, scene: Scene) -> Scene {
        std::mem::replace(&mut self.scene, scene)
    }

    /// Real time not yet consumed by fixed steps
    pub fn time_to_simulate(&self) -> Duration {
        self.time_to_simulate
    }

    /// Length of one fixed step
    pub fn fixed_step(&self) -> Duration {
        self.fixed_step
    }

    /// Fixed steps simulated since creation
    pub fn fixed_update_count(&self) -> u64 {
        self.fixed_update_count
    }

    /// Names of the fixed time step systems in execution order
    pub fn fixed_system_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fixed_systems.iter().map(|entry| entry.name.as_str())
    }

    /// Names of the variable time step systems in execution order
    pub fn variable_system_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.variable_systems.iter().map(|entry| entry.name.as_str())
    }

    /// Run one frame, measuring elapsed time with the internal timer
    ///
    /// The first call elapses zero time.
    pub fn tick(&mut self) -> Result<FrameReport, SchedulerError> {
        let elapsed = match self.timer.as_mut() {
            Some(timer) => timer.lap(),
            None => {
                self.timer = Some(FrameTimer::new());
                Duration::ZERO
            }
        };
        self.advance(elapsed)
    }

    /// Run one frame with host-supplied elapsed time
    pub fn advance(&mut self, elapsed: Duration) -> Result<FrameReport, SchedulerError> {
        self.time_to_simulate += elapsed;

        let cap = self.max_fixed_steps_per_frame;
        let mut fixed_steps = 0u32;
        while self.time_to_simulate >= self.fixed_step && (cap == 0 || fixed_steps < cap) {
            for entry in &mut self.fixed_systems {
                entry
                    .system
                    .fixed_update(&mut self.scene)
                    .map_err(|source| SchedulerError::System {
                        system: entry.name.clone(),
                        source,
                    })?;
            }
            self.time_to_simulate -= self.fixed_step;
            self.fixed_update_count += 1;
            fixed_steps += 1;
            trace!("Fixed step {} done", self.fixed_update_count);
        }

        let capped = self.time_to_simulate >= self.fixed_step;
        if capped {
            warn!(
                "Fixed step cap of {} reached, {:?} left to simulate",
                cap, self.time_to_simulate
            );
        }

        for entry in &mut self.variable_systems {
            entry
                .system
                .update(&mut self.scene, elapsed)
                .map_err(|source| SchedulerError::System {
                    system: entry.name.clone(),
                    source,
                })?;
        }

        Ok(FrameReport {
            fixed_steps,
            capped,
            elapsed,
        })
    }
}

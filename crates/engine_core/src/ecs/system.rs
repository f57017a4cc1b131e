//! System traits
//!
//! A system is a unit of per-tick behaviour that reads and writes the scene.
//! Systems come in two categories: fixed time step systems run once per
//! simulated step of constant length, variable time step systems run once per
//! rendered frame with the real elapsed time. Within a category the scheduler
//! runs systems in ascending [`System::priority`] order.

use std::time::Duration;

use thiserror::Error;

use super::component::short_type_name;
use super::scene::{Scene, SceneError};

/// Error raised by a system while updating the scene
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SystemError {
    /// A scene query failed
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// The system could not complete its update
    #[error("System '{system}' failed: {reason}")]
    Failed {
        /// Name of the failing system
        system: String,
        /// Human readable cause
        reason: String,
    },
}

/// Behaviour common to every system
pub trait System {
    /// Name used in logs, errors and priority overrides
    ///
    /// Defaults to the unqualified type name.
    fn name(&self) -> &str {
        short_type_name::<Self>()
    }

    /// Execution priority; lower values run first
    fn priority(&self) -> i32 {
        0
    }
}

/// System advanced in constant-size steps
///
/// The step length is a scheduler-wide constant and is therefore not passed
/// in; systems that need it take it at construction.
pub trait FixedTimeStepSystem: System {
    /// Advance by one fixed step
    fn fixed_update(&mut self, scene: &mut Scene) -> Result<(), SystemError>;
}

/// System advanced once per rendered frame
pub trait VariableTimeStepSystem: System {
    /// Advance by the real time elapsed since the previous frame
    fn update(&mut self, scene: &mut Scene, elapsed: Duration) -> Result<(), SystemError>;
}

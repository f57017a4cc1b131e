//! Movement integration system

use std::time::Duration;

use crate::config::SchedulerConfig;
use crate::ecs::components::{MovementComponent, TransformComponent};
use crate::ecs::{FixedTimeStepSystem, Scene, System, SystemError};

/// Default priority: movement runs before collision detection
pub const MOVEMENT_SYSTEM_PRIORITY: i32 = -10;

/// Applies [`MovementComponent`] velocities to transforms each fixed step
#[derive(Debug, Clone)]
pub struct MovementSystem {
    step_seconds: f32,
    priority: i32,
}

impl MovementSystem {
    /// Create a movement system integrating over `step`
    pub fn new(step: Duration) -> Self {
        Self {
            step_seconds: step.as_secs_f32(),
            priority: MOVEMENT_SYSTEM_PRIORITY,
        }
    }

    /// Create a movement system matching a scheduler configuration
    pub fn from_config(config: &SchedulerConfig) -> Result<Self, SystemError> {
        let step = config.fixed_step().map_err(|err| SystemError::Failed {
            system: "MovementSystem".to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self::new(step))
    }

    /// Builder pattern: Set the execution priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl System for MovementSystem {
    fn priority(&self) -> i32 {
        self.priority
    }
}

impl FixedTimeStepSystem for MovementSystem {
    fn fixed_update(&mut self, scene: &mut Scene) -> Result<(), SystemError> {
        let moving: Vec<_> = scene.entities_with::<MovementComponent>().collect();
        for id in moving {
            let entity = scene.entity_mut(id)?;
            if !entity.has_component::<TransformComponent>() {
                continue;
            }
            let movement = entity.get_component::<MovementComponent>()?.clone();
            let transform = entity.get_component_mut::<TransformComponent>()?;
            transform.translation += movement.velocity * self.step_seconds;
            if movement.angular_velocity != 0.0 {
                transform.rotate_z(movement.angular_velocity * self.step_seconds);
            }
        }
        Ok(())
    }
}

//! Movement component for entities that drift across the plane

use serde::{Deserialize, Serialize};

use crate::ecs::Component;
use crate::foundation::math::Vec3;

/// Constant-velocity motion, integrated by the movement system every fixed step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementComponent {
    /// Linear velocity in units per second
    pub velocity: Vec3,

    /// Angular velocity about the Z axis in radians per second
    pub angular_velocity: f32,
}

impl Component for MovementComponent {}

impl MovementComponent {
    /// Create a movement component with initial velocity
    pub fn with_velocity(velocity: Vec3) -> Self {
        Self {
            velocity,
            ..Default::default()
        }
    }

    /// Builder pattern: Set angular velocity
    pub fn with_angular_velocity(mut self, angular_velocity: f32) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }
}

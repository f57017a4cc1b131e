//! ECS Systems module

pub mod movement_system;
pub mod physics_system;

pub use movement_system::{MovementSystem, MOVEMENT_SYSTEM_PRIORITY};
pub use physics_system::{CollisionPair, PhysicsSystem};

//! ECS Components module
//!
//! Contains the engine's built-in components

pub mod collision;
pub mod movement;
pub mod transform;

pub use collision::{ColliderComponent, ColliderShape};
pub use movement::MovementComponent;
pub use transform::TransformComponent;

//! Physics module for collision detection
//!
//! Narrow-phase only: every candidate pair is tested with the separating
//! axis test on 2D world-space shapes. The per-tick driver lives in
//! [`crate::ecs::systems::PhysicsSystem`].

pub mod collision_layers;
pub mod sat;
pub mod shapes;

pub use collision_layers::CollisionLayers;
pub use sat::overlaps;
pub use shapes::{Circle, Projection, Rectangle, Shape};

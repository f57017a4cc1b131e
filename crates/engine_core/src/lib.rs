//! # Engine Core
//!
//! Simulation core of a real-time engine: a scene tree of entities with
//! type-erased components, a scheduler that advances fixed and variable time
//! step systems every frame, and 2D collision detection with the separating
//! axis test.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use engine_core::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default();
//!     engine_core::foundation::logging::init_with_config(&config.logging);
//!
//!     let mut scene = Scene::new("level");
//!     let ship = scene.spawn("ship");
//!     scene.add_component(ship, TransformComponent::from_xy(0.0, 0.0))?;
//!     scene.add_component(ship, ColliderComponent::circle(1.0))?;
//!
//!     let mut scheduler = SystemsScheduler::builder(config.scheduler.clone())
//!         .with_scene(scene)
//!         .with_fixed_system(MovementSystem::from_config(&config.scheduler)?)
//!         .with_fixed_system(PhysicsSystem::new())
//!         .build()?;
//!
//!     loop {
//!         scheduler.tick()?;
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::must_use_candidate)]

pub mod config;
pub mod ecs;
pub mod foundation;
pub mod physics;
pub mod serialization;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, EngineConfig, SchedulerConfig},
        ecs::{
            components::{ColliderComponent, ColliderShape, MovementComponent, TransformComponent},
            systems::{MovementSystem, PhysicsSystem},
            Component, Entity, EntityId, FixedTimeStepSystem, FrameReport, Scene, SceneError,
            SchedulerError, System, SystemError, SystemsScheduler, VariableTimeStepSystem,
        },
        foundation::math::{Mat3, Quat, Vec2, Vec3},
        physics::{CollisionLayers, Shape},
        serialization::SceneDocument,
    };
}

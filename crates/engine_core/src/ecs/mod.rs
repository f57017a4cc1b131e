//! Entity-Component-System implementation
//!
//! Entities form a tree owned by a [`Scene`]; each entity owns a list of
//! type-erased components. Systems update the scene once per fixed step or
//! once per frame, driven by the [`SystemsScheduler`].

pub mod component;
pub mod components;
pub mod entity;
pub mod scene;
pub mod scheduler;
pub mod system;
pub mod systems;

#[cfg(test)]
mod tests;

pub use component::Component;
pub use entity::{Entity, EntityId};
pub use scene::{PostOrder, Scene, SceneError};
pub use scheduler::{FrameReport, SchedulerError, SystemsScheduler, SystemsSchedulerBuilder};
pub use system::{FixedTimeStepSystem, System, SystemError, VariableTimeStepSystem};

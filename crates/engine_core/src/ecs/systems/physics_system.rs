//! Collision detection system
//!
//! Every tick the system snapshots each entity that carries both a transform
//! and a collider, moves the collider shape into world space, forgets the
//! previous tick's results and tests every unordered pair with the separating
//! axis test. Overlaps are recorded on both colliders, so the colliding sets
//! are always symmetric.
//!
//! Pair testing is O(n²) with no broad phase.

use std::time::Duration;

use log::{debug, trace};

use crate::ecs::components::transform::world_matrix_2d;
use crate::ecs::components::{ColliderComponent, TransformComponent};
use crate::ecs::{EntityId, FixedTimeStepSystem, Scene, System, SystemError, VariableTimeStepSystem};
use crate::physics::{sat, CollisionLayers, Shape};

/// Pair of entities whose colliders overlapped this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    /// Entity visited first during scene traversal
    pub entity_a: EntityId,
    /// Entity visited second
    pub entity_b: EntityId,
}

#[derive(Debug, Clone, Copy)]
struct ColliderSnapshot {
    entity: EntityId,
    shape: Shape,
    layer: CollisionLayers,
    mask: CollisionLayers,
}

/// Narrow-phase collision detection over the whole scene
///
/// Usable as either a fixed or a variable time step system; both entry points
/// do the same work. Scratch buffers are reused between ticks and only ever
/// grow.
#[derive(Debug, Default)]
pub struct PhysicsSystem {
    priority: i32,
    snapshots: Vec<ColliderSnapshot>,
    pairs: Vec<CollisionPair>,
}

impl PhysicsSystem {
    /// Create a physics system with priority 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: Set the execution priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Pairs found by the last tick, in detection order
    pub fn collision_pairs(&self) -> &[CollisionPair] {
        &self.pairs
    }

    /// Rebuild every collider's colliding set
    pub fn detect_collisions(&mut self, scene: &mut Scene) -> Result<(), SystemError> {
        let snapshot_capacity = self.snapshots.capacity();
        let pair_capacity = self.pairs.capacity();
        self.snapshots.clear();
        self.pairs.clear();

        for id in scene.all_entities() {
            let entity = scene.entity(id)?;
            if !entity.has_component::<TransformComponent>() || !entity.has_component::<ColliderComponent>() {
                continue;
            }
            let world_matrix = world_matrix_2d(scene, id)?;
            let collider = entity.get_component::<ColliderComponent>()?;
            let shape = collider.world_shape(&world_matrix);
            if !shape.is_well_formed() {
                return Err(SystemError::Failed {
                    system: self.name().to_string(),
                    reason: format!("entity '{}' has a malformed collider: {:?}", entity.name(), shape),
                });
            }
            self.snapshots.push(ColliderSnapshot {
                entity: id,
                shape,
                layer: collider.layer,
                mask: collider.mask,
            });
        }

        for snapshot in &self.snapshots {
            scene
                .entity_mut(snapshot.entity)?
                .get_component_mut::<ColliderComponent>()?
                .clear_colliding_entities();
        }

        for (i, a) in self.snapshots.iter().enumerate() {
            for b in &self.snapshots[i + 1..] {
                if CollisionLayers::should_collide(a.layer, a.mask, b.layer, b.mask)
                    && sat::overlaps(&a.shape, &b.shape)
                {
                    self.pairs.push(CollisionPair {
                        entity_a: a.entity,
                        entity_b: b.entity,
                    });
                }
            }
        }

        for pair in &self.pairs {
            scene
                .entity_mut(pair.entity_a)?
                .get_component_mut::<ColliderComponent>()?
                .add_colliding_entity(pair.entity_b);
            scene
                .entity_mut(pair.entity_b)?
                .get_component_mut::<ColliderComponent>()?
                .add_colliding_entity(pair.entity_a);
        }

        if self.snapshots.capacity() > snapshot_capacity || self.pairs.capacity() > pair_capacity {
            debug!(
                "Physics scratch buffers grew to {} colliders, {} pairs",
                self.snapshots.capacity(),
                self.pairs.capacity()
            );
        }
        trace!(
            "Physics tick: {} colliders, {} colliding pairs",
            self.snapshots.len(),
            self.pairs.len()
        );
        Ok(())
    }
}

impl System for PhysicsSystem {
    fn priority(&self) -> i32 {
        self.priority
    }
}

impl FixedTimeStepSystem for PhysicsSystem {
    fn fixed_update(&mut self, scene: &mut Scene) -> Result<(), SystemError> {
        self.detect_collisions(scene)
    }
}

impl VariableTimeStepSystem for PhysicsSystem {
    fn update(&mut self, scene: &mut Scene, _elapsed: Duration) -> Result<(), SystemError> {
        self.detect_collisions(scene)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::SceneError;

    fn spawn_circle(scene: &mut Scene, name: &str, x: f32, radius: f32) -> EntityId {
        let id = scene.spawn(name);
        scene.add_component(id, TransformComponent::from_xy(x, 0.0)).unwrap();
        scene.add_component(id, ColliderComponent::circle(radius)).unwrap();
        id
    }

    #[test]
    fn test_entities_without_transform_are_ignored() {
        let mut scene = Scene::new("test");
        let a = spawn_circle(&mut scene, "a", 0.0, 1.0);
        let bare = scene.spawn("bare");
        scene.add_component(bare, ColliderComponent::circle(5.0)).unwrap();

        let mut physics = PhysicsSystem::new();
        physics.detect_collisions(&mut scene).unwrap();

        assert!(physics.collision_pairs().is_empty());
        let collider = scene.entity(a).unwrap().get_component::<ColliderComponent>().unwrap();
        assert!(!collider.is_colliding());
    }

    #[test]
    fn test_scratch_buffers_are_reused() {
        let mut scene = Scene::new("test");
        for i in 0..4 {
            spawn_circle(&mut scene, "c", i as f32, 1.0);
        }
        let mut physics = PhysicsSystem::new();
        physics.detect_collisions(&mut scene).unwrap();
        let capacity = physics.snapshots.capacity();

        let last = scene.roots()[3];
        scene.despawn(last).unwrap();
        physics.detect_collisions(&mut scene).unwrap();

        assert_eq!(physics.snapshots.len(), 3);
        assert_eq!(physics.snapshots.capacity(), capacity);
    }

    #[test]
    fn test_ambiguous_collider_is_an_error() {
        let mut scene = Scene::new("test");
        let id = spawn_circle(&mut scene, "double", 0.0, 1.0);
        scene.add_component(id, ColliderComponent::circle(2.0)).unwrap();

        let err = PhysicsSystem::new().detect_collisions(&mut scene).unwrap_err();
        assert!(matches!(
            err,
            SystemError::Scene(SceneError::AmbiguousComponent { count: 2, .. })
        ));
    }

    #[test]
    fn test_malformed_collider_fails_the_tick() {
        let mut scene = Scene::new("test");
        spawn_circle(&mut scene, "inverted", 0.0, -1.0);
        spawn_circle(&mut scene, "fine", 5.0, 1.0);

        let err = PhysicsSystem::new().fixed_update(&mut scene).unwrap_err();
        assert!(matches!(
            err,
            SystemError::Failed { ref system, ref reason }
                if system == "PhysicsSystem" && reason.contains("inverted")
        ));
    }

    #[test]
    fn test_non_finite_transform_fails_the_tick() {
        let mut scene = Scene::new("test");
        let id = spawn_circle(&mut scene, "lost", 0.0, 1.0);
        scene
            .entity_mut(id)
            .unwrap()
            .get_component_mut::<TransformComponent>()
            .unwrap()
            .translation
            .x = f32::NAN;

        let err = PhysicsSystem::new().detect_collisions(&mut scene).unwrap_err();
        assert!(matches!(err, SystemError::Failed { .. }));
    }

    #[test]
    fn test_layer_mask_skips_pair() {
        let mut scene = Scene::new("test");
        let a = spawn_circle(&mut scene, "a", 0.0, 1.0);
        let b = spawn_circle(&mut scene, "b", 0.5, 1.0);
        scene
            .entity_mut(b)
            .unwrap()
            .get_component_mut::<ColliderComponent>()
            .unwrap()
            .mask = CollisionLayers::empty();

        let mut physics = PhysicsSystem::new();
        physics.detect_collisions(&mut scene).unwrap();

        assert!(physics.collision_pairs().is_empty());
        let collider = scene.entity(a).unwrap().get_component::<ColliderComponent>().unwrap();
        assert!(!collider.is_colliding_with(b));
    }
}

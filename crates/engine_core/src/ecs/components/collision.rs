//! Collision components for ECS
//!
//! A collider pairs a local-space shape with its filtering layers and the set
//! of entities it overlapped during the last physics tick. The set is owned
//! by the physics system: it is cleared and rebuilt from scratch every tick.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::ecs::{Component, EntityId};
use crate::foundation::math::{Mat3, Vec2};
use crate::physics::shapes::{Circle, Rectangle, Shape};
use crate::physics::CollisionLayers;

/// Local-space collision shape, centered on the entity origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    /// Circle collider
    Circle {
        /// Radius before scaling
        radius: f32,
    },
    /// Rectangle collider
    Rectangle {
        /// Width and height before scaling
        dimension: Vec2,
    },
}

impl ColliderShape {
    /// Geometric primitive in local space
    pub fn local_shape(&self) -> Shape {
        match *self {
            ColliderShape::Circle { radius } => Circle::new(radius).into(),
            ColliderShape::Rectangle { dimension } => Rectangle::new(dimension).into(),
        }
    }
}

/// Component that marks an entity as taking part in collision detection
#[derive(Debug, Clone, PartialEq)]
pub struct ColliderComponent {
    /// The collision shape
    pub shape: ColliderShape,

    /// Layers this collider sits on
    pub layer: CollisionLayers,

    /// Layers this collider reacts to
    pub mask: CollisionLayers,

    colliding_entities: HashSet<EntityId>,
}

impl Component for ColliderComponent {}

impl ColliderComponent {
    /// Create a new collider on every layer, colliding with every layer
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            layer: CollisionLayers::default(),
            mask: CollisionLayers::default(),
            colliding_entities: HashSet::new(),
        }
    }

    /// Circle collider
    pub fn circle(radius: f32) -> Self {
        Self::new(ColliderShape::Circle { radius })
    }

    /// Rectangle collider
    pub fn rectangle(width: f32, height: f32) -> Self {
        Self::new(ColliderShape::Rectangle {
            dimension: Vec2::new(width, height),
        })
    }

    /// Create a collider with specific layer and mask
    pub fn with_layers(mut self, layer: CollisionLayers, mask: CollisionLayers) -> Self {
        self.layer = layer;
        self.mask = mask;
        self
    }

    /// Shape moved into world space by an entity's world matrix
    pub fn world_shape(&self, world_matrix: &Mat3) -> Shape {
        self.shape.local_shape().transform(world_matrix)
    }

    /// Whether this collider and `other` pass each other's layer filter
    pub fn accepts(&self, other: &ColliderComponent) -> bool {
        CollisionLayers::should_collide(self.layer, self.mask, other.layer, other.mask)
    }

    /// Check if we're currently colliding with any entity
    pub fn is_colliding(&self) -> bool {
        !self.colliding_entities.is_empty()
    }

    /// Entities overlapped during the last tick
    pub fn colliding_entities(&self) -> &HashSet<EntityId> {
        &self.colliding_entities
    }

    /// Check if we're colliding with a specific entity
    pub fn is_colliding_with(&self, entity: EntityId) -> bool {
        self.colliding_entities.contains(&entity)
    }

    /// Record an overlap; adding the same entity twice is a no-op
    pub fn add_colliding_entity(&mut self, entity: EntityId) {
        self.colliding_entities.insert(entity);
    }

    /// Forget every recorded overlap
    pub fn clear_colliding_entities(&mut self) {
        self.colliding_entities.clear();
    }
}

//! Scene persistence format
//!
//! A [`SceneDocument`] mirrors the entity forest as plain serde data: every
//! entity with its name, its persisted components and its children, in
//! order. Colliding sets are recomputed by the physics system each tick and
//! are not stored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ecs::components::{ColliderComponent, ColliderShape, MovementComponent, TransformComponent};
use crate::ecs::component::downcast_ref;
use crate::ecs::{Component, EntityId, Scene, SceneError};
use crate::foundation::math::Vec2;
use crate::physics::CollisionLayers;

/// Errors raised while converting scenes to and from documents
#[derive(Error, Debug)]
pub enum SerializationError {
    /// The text is not a valid document
    #[error("Parse error: {0}")]
    Parse(String),

    /// The document could not be written
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// A component type has no persisted form
    #[error("Component '{0}' cannot be serialized")]
    UnsupportedComponent(String),

    /// Rebuilding the scene failed
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Persisted form of a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComponentRecord {
    /// [`TransformComponent`]
    Transform(TransformComponent),
    /// Circle [`ColliderComponent`]
    CircleCollider {
        /// Radius before scaling
        radius: f32,
        /// Layer bits
        layer: u32,
        /// Mask bits
        mask: u32,
    },
    /// Rectangle [`ColliderComponent`]
    RectangleCollider {
        /// Width and height before scaling
        dimension: Vec2,
        /// Layer bits
        layer: u32,
        /// Mask bits
        mask: u32,
    },
    /// [`MovementComponent`]
    Movement(MovementComponent),
}

impl ComponentRecord {
    /// Persisted form of a type-erased component
    pub fn from_component(component: &dyn Component) -> Result<Self, SerializationError> {
        if let Some(transform) = downcast_ref::<TransformComponent>(component) {
            return Ok(Self::Transform(transform.clone()));
        }
        if let Some(movement) = downcast_ref::<MovementComponent>(component) {
            return Ok(Self::Movement(movement.clone()));
        }
        if let Some(collider) = downcast_ref::<ColliderComponent>(component) {
            let (layer, mask) = (collider.layer.bits(), collider.mask.bits());
            return Ok(match collider.shape {
                ColliderShape::Circle { radius } => Self::CircleCollider { radius, layer, mask },
                ColliderShape::Rectangle { dimension } => Self::RectangleCollider { dimension, layer, mask },
            });
        }
        Err(SerializationError::UnsupportedComponent(
            component.component_name().to_string(),
        ))
    }

    /// Rebuild the component
    pub fn into_component(self) -> Box<dyn Component> {
        let collider = |shape, layer, mask| {
            ColliderComponent::new(shape).with_layers(
                CollisionLayers::from_bits_retain(layer),
                CollisionLayers::from_bits_retain(mask),
            )
        };
        match self {
            Self::Transform(transform) => Box::new(transform),
            Self::Movement(movement) => Box::new(movement),
            Self::CircleCollider { radius, layer, mask } => {
                Box::new(collider(ColliderShape::Circle { radius }, layer, mask))
            }
            Self::RectangleCollider { dimension, layer, mask } => {
                Box::new(collider(ColliderShape::Rectangle { dimension }, layer, mask))
            }
        }
    }
}

/// Persisted form of an entity and its subtree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Display name
    pub name: String,
    /// Components in attachment order
    #[serde(default)]
    pub components: Vec<ComponentRecord>,
    /// Children in order
    #[serde(default)]
    pub children: Vec<EntityRecord>,
}

/// Persisted form of a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Scene name
    pub name: String,
    /// Root entities in order
    #[serde(default)]
    pub roots: Vec<EntityRecord>,
}

impl SceneDocument {
    /// Capture the scene's attached entities
    ///
    /// Detached entities are not part of the tree and are skipped.
    pub fn from_scene(scene: &Scene) -> Result<Self, SerializationError> {
        let roots = scene
            .roots()
            .iter()
            .map(|&root| Self::record(scene, root))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            name: scene.name().to_string(),
            roots,
        })
    }

    fn record(scene: &Scene, id: EntityId) -> Result<EntityRecord, SerializationError> {
        let entity = scene.entity(id)?;
        Ok(EntityRecord {
            name: entity.name().to_string(),
            components: entity
                .components()
                .map(ComponentRecord::from_component)
                .collect::<Result<_, _>>()?,
            children: entity
                .children()
                .iter()
                .map(|&child| Self::record(scene, child))
                .collect::<Result<_, _>>()?,
        })
    }

    /// Build a new scene from the document
    pub fn into_scene(self) -> Result<Scene, SerializationError> {
        let mut scene = Scene::new(self.name);
        for root in self.roots {
            let id = scene.spawn(root.name.clone());
            Self::restore(&mut scene, id, root)?;
        }
        Ok(scene)
    }

    fn restore(scene: &mut Scene, id: EntityId, record: EntityRecord) -> Result<(), SerializationError> {
        let entity = scene.entity_mut(id)?;
        for component in record.components {
            entity.add_boxed_component(component.into_component());
        }
        for child in record.children {
            let child_id = scene.spawn_child(id, child.name.clone())?;
            Self::restore(scene, child_id, child)?;
        }
        Ok(())
    }

    /// Pretty-printed RON text
    pub fn to_ron(&self) -> Result<String, SerializationError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| SerializationError::Serialize(e.to_string()))
    }

    /// Parse RON text
    pub fn from_ron(text: &str) -> Result<Self, SerializationError> {
        ron::from_str(text).map_err(|e| SerializationError::Parse(e.to_string()))
    }
}

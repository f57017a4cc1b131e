//! Transform component for the ECS system
//!
//! Pure data: position, orientation and scale of an entity relative to its
//! parent. Collision works in the XY plane, so the component flattens itself
//! into a 2D homogeneous matrix, and [`world_matrix_2d`] composes those
//! matrices up the scene tree.

use serde::{Deserialize, Serialize};

use crate::ecs::{Component, EntityId, Scene, SceneError};
use crate::foundation::math::{Mat3, Mat3Ext, Quat, Vec2, Vec3};

/// Spatial transformation of an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformComponent {
    /// Position
    pub translation: Vec3,

    /// Orientation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Component for TransformComponent {}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            translation: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl TransformComponent {
    /// Create identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create from a position in the XY plane
    pub fn from_xy(x: f32, y: f32) -> Self {
        Self::default().with_translation(Vec3::new(x, y, 0.0))
    }

    /// Builder pattern: Set translation
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    /// Builder pattern: Set rotation from quaternion
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: Set rotation about the Z axis (radians)
    pub fn with_angle(mut self, angle: f32) -> Self {
        self.rotation = Quat::from_euler_angles(0.0, 0.0, angle);
        self
    }

    /// Builder pattern: Set scale (uniform)
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::new(scale, scale, scale);
        self
    }

    /// Builder pattern: Set scale (non-uniform)
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Rotation about the Z axis (radians)
    pub fn angle(&self) -> f32 {
        self.rotation.euler_angles().2
    }

    /// Rotate about the Z axis by `delta` radians
    pub fn rotate_z(&mut self, delta: f32) {
        self.rotation = Quat::from_euler_angles(0.0, 0.0, delta) * self.rotation;
    }

    /// 2D matrix relative to the parent: translate * rotate(z) * scale
    pub fn local_matrix_2d(&self) -> Mat3 {
        Mat3::transform_2d(
            self.translation.xy(),
            self.angle(),
            Vec2::new(self.scale.x, self.scale.y),
        )
    }
}

/// 2D world matrix of an entity
///
/// Multiplies the local matrices of the entity and every ancestor, root
/// first. Ancestors without a transform contribute identity.
pub fn world_matrix_2d(scene: &Scene, id: EntityId) -> Result<Mat3, SceneError> {
    let mut matrix = Mat3::identity();
    let mut current = Some(id);
    while let Some(node) = current {
        let entity = scene.entity(node)?;
        if entity.has_component::<TransformComponent>() {
            matrix = entity.get_component::<TransformComponent>()?.local_matrix_2d() * matrix;
        }
        current = entity.parent();
    }
    Ok(matrix)
}

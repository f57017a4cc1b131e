//! Math utilities and types
//!
//! Provides the fundamental math types used by the simulation core. Spatial
//! state is stored in 3D (so scenes can be shared with a 3D renderer), while
//! collision detection works in the XY plane through 3x3 homogeneous matrices.

pub use nalgebra::{Matrix3, Quaternion, Unit, Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type, used as a 2D homogeneous transform
pub type Mat3 = Matrix3<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;
}

/// Extension trait for Mat3 used as a 2D homogeneous transform
pub trait Mat3Ext {
    /// Build a translate * rotate * scale transform in the XY plane
    fn transform_2d(translation: Vec2, angle: f32, scale: Vec2) -> Mat3;

    /// Map a point through the transform (translation applies)
    fn apply_to_point(&self, point: Vec2) -> Vec2;

    /// Length of the transformed X and Y basis vectors
    fn basis_scale(&self) -> Vec2;
}

impl Mat3Ext for Mat3 {
    fn transform_2d(translation: Vec2, angle: f32, scale: Vec2) -> Mat3 {
        Mat3::new_translation(&translation)
            * Mat3::new_rotation(angle)
            * Mat3::new_nonuniform_scaling(&scale)
    }

    fn apply_to_point(&self, point: Vec2) -> Vec2 {
        self.transform_point(&Point2::from(point)).coords
    }

    fn basis_scale(&self) -> Vec2 {
        Vec2::new(
            Vec2::new(self.m11, self.m21).magnitude(),
            Vec2::new(self.m12, self.m22).magnitude(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_transform_2d_order_is_translate_rotate_scale() {
        let matrix = Mat3::transform_2d(Vec2::new(5.0, 0.0), constants::HALF_PI, Vec2::new(2.0, 1.0));

        // (1, 0) scaled to (2, 0), rotated to (0, 2), translated to (5, 2)
        let mapped = matrix.apply_to_point(Vec2::new(1.0, 0.0));
        assert_relative_eq!(mapped, Vec2::new(5.0, 2.0), epsilon = 1e-5);
    }

    #[test]
    fn test_basis_scale_survives_rotation() {
        let matrix = Mat3::transform_2d(Vec2::zeros(), 0.7, Vec2::new(3.0, 0.5));
        assert_relative_eq!(matrix.basis_scale(), Vec2::new(3.0, 0.5), epsilon = 1e-5);
    }
}

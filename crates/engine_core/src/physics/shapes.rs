//! 2D collision primitives
//!
//! Shapes are defined in local space (centered on the origin) and moved into
//! world space with a 3x3 homogeneous transform before testing. Everything
//! the separating axis test needs from a shape is exposed through [`Shape`]:
//! candidate axes and a projection onto an arbitrary axis.

use crate::foundation::math::{Mat3, Mat3Ext, Vec2};

/// Closed interval on an axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    min: f32,
    max: f32,
}

impl Projection {
    /// Create a projection
    ///
    /// # Panics
    /// When `min > max` (or either bound is NaN). Callers always derive the
    /// bounds from a min/max fold, so a violation is a bug.
    pub fn new(min: f32, max: f32) -> Self {
        assert!(min <= max, "projection min ({min}) must not exceed max ({max})");
        Self { min, max }
    }

    /// Lower bound
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Upper bound
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Whether two intervals intersect; touching intervals count
    ///
    /// Compares the distance between the centers with the sum of the
    /// half-widths, both doubled. Every operation is mirrored when the
    /// arguments swap, so `a.overlaps(&b) == b.overlaps(&a)` holds exactly.
    pub fn overlaps(&self, other: &Projection) -> bool {
        let center_distance = ((self.min + self.max) - (other.min + other.max)).abs();
        let width_sum = (self.max - self.min) + (other.max - other.min);
        center_distance <= width_sum
    }
}

/// Circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Center point
    pub center: Vec2,
    /// Radius
    pub radius: f32,
}

impl Circle {
    /// Circle of the given radius centered on the origin
    pub fn new(radius: f32) -> Self {
        Self {
            center: Vec2::zeros(),
            radius,
        }
    }

    /// Map the circle through a transform
    ///
    /// Non-uniform scale cannot keep a circle round; the radius grows by the
    /// larger of the two axis scales so the result still bounds the ellipse.
    pub fn transform(&self, matrix: &Mat3) -> Circle {
        let scale = matrix.basis_scale();
        Circle {
            center: matrix.apply_to_point(self.center),
            radius: self.radius * scale.x.max(scale.y),
        }
    }

    /// Project onto a unit axis
    pub fn project(&self, axis: Vec2) -> Projection {
        let center = self.center.dot(&axis);
        Projection::new(center - self.radius, center + self.radius)
    }
}

/// Rectangle stored as its four corners (counter-clockwise)
///
/// After an affine transform the corners form a parallelogram, which is
/// still convex with two distinct edge directions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    /// Corner points
    pub vertices: [Vec2; 4],
}

impl Rectangle {
    /// Rectangle of the given width and height centered on the origin
    pub fn new(dimension: Vec2) -> Self {
        let half = dimension * 0.5;
        Self {
            vertices: [
                Vec2::new(-half.x, -half.y),
                Vec2::new(half.x, -half.y),
                Vec2::new(half.x, half.y),
                Vec2::new(-half.x, half.y),
            ],
        }
    }

    /// Map every corner through a transform
    pub fn transform(&self, matrix: &Mat3) -> Rectangle {
        Rectangle {
            vertices: self.vertices.map(|v| matrix.apply_to_point(v)),
        }
    }

    /// Mean of the corners
    pub fn center(&self) -> Vec2 {
        self.vertices.iter().sum::<Vec2>() * 0.25
    }

    /// Unit normals of the two distinct edge directions
    ///
    /// A zero-length edge has no normal of its own. A rectangle collapsed to
    /// a segment uses the segment's direction in its place, and one collapsed
    /// to a point uses the world X and Y axes, so two axes are always tested.
    pub fn edge_normals(&self) -> [Vec2; 2] {
        let normal = |from: Vec2, to: Vec2| {
            let edge = to - from;
            Vec2::new(-edge.y, edge.x).try_normalize(f32::EPSILON)
        };
        match (
            normal(self.vertices[0], self.vertices[1]),
            normal(self.vertices[1], self.vertices[2]),
        ) {
            (Some(first), Some(second)) => [first, second],
            (Some(n), None) | (None, Some(n)) => [n, Vec2::new(-n.y, n.x)],
            (None, None) => [Vec2::x(), Vec2::y()],
        }
    }

    /// Corner closest to a point
    pub fn closest_vertex(&self, point: Vec2) -> Vec2 {
        self.vertices
            .iter()
            .copied()
            .min_by(|a, b| {
                (a - point)
                    .magnitude_squared()
                    .total_cmp(&(b - point).magnitude_squared())
            })
            .unwrap_or(self.vertices[0])
    }

    /// Project onto a unit axis
    pub fn project(&self, axis: Vec2) -> Projection {
        let (min, max) = self
            .vertices
            .iter()
            .map(|v| v.dot(&axis))
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Projection::new(min, max)
    }
}

/// Convex shape participating in the separating axis test
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Circle
    Circle(Circle),
    /// Rectangle (or a transformed parallelogram)
    Rectangle(Rectangle),
}

impl Shape {
    /// Map the shape through a transform
    pub fn transform(&self, matrix: &Mat3) -> Shape {
        match self {
            Shape::Circle(circle) => Shape::Circle(circle.transform(matrix)),
            Shape::Rectangle(rect) => Shape::Rectangle(rect.transform(matrix)),
        }
    }

    /// Whether every coordinate is finite and a circle's radius is not negative
    ///
    /// Only well-formed shapes can be projected; anything else would produce
    /// inverted or NaN intervals.
    pub fn is_well_formed(&self) -> bool {
        let finite = |v: &Vec2| v.x.is_finite() && v.y.is_finite();
        match self {
            Shape::Circle(circle) => finite(&circle.center) && circle.radius.is_finite() && circle.radius >= 0.0,
            Shape::Rectangle(rect) => rect.vertices.iter().all(finite),
        }
    }

    /// Geometric center
    pub fn center(&self) -> Vec2 {
        match self {
            Shape::Circle(circle) => circle.center,
            Shape::Rectangle(rect) => rect.center(),
        }
    }

    /// Project onto a unit axis
    pub fn project(&self, axis: Vec2) -> Projection {
        match self {
            Shape::Circle(circle) => circle.project(axis),
            Shape::Rectangle(rect) => rect.project(axis),
        }
    }

    /// Candidate separating axes this shape contributes when tested
    /// against `other`
    ///
    /// A rectangle contributes its two edge normals. A circle has no edges,
    /// so it contributes the direction from its center to the nearest
    /// feature of the other shape: the other circle's center, or the closest
    /// rectangle corner. A circle's axis is dropped when that feature sits on
    /// its center.
    pub fn axes_against(&self, other: &Shape) -> [Option<Vec2>; 2] {
        match self {
            Shape::Rectangle(rect) => rect.edge_normals().map(Some),
            Shape::Circle(circle) => {
                let target = match other {
                    Shape::Circle(other_circle) => other_circle.center,
                    Shape::Rectangle(rect) => rect.closest_vertex(circle.center),
                };
                [(target - circle.center).try_normalize(f32::EPSILON), None]
            }
        }
    }
}

impl From<Circle> for Shape {
    fn from(circle: Circle) -> Self {
        Shape::Circle(circle)
    }
}

impl From<Rectangle> for Shape {
    fn from(rect: Rectangle) -> Self {
        Shape::Rectangle(rect)
    }
}

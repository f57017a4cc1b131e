//! Separating axis test between convex 2D shapes
//!
//! Two convex shapes are disjoint exactly when some axis exists on which
//! their projections do not overlap. The candidate axes are the edge normals
//! of each polygon plus, for circles, the direction toward the other shape's
//! nearest feature. Touching shapes are reported as overlapping.

use super::shapes::Shape;

/// Whether two world-space shapes overlap
pub fn overlaps(a: &Shape, b: &Shape) -> bool {
    a.axes_against(b)
        .into_iter()
        .chain(b.axes_against(a))
        .flatten()
        .all(|axis| a.project(axis).overlaps(&b.project(axis)))
}

//! Conversions between screen positions and barycentric weights.
//!
//! A point `P` inside triangle `(A, B, C)` can be written as the affine
//! combination
//!
//! ```text
//! P = b0*A + b1*B + b2*C,   b0 + b1 + b2 = 1
//! ```
//!
//! Fixing `b2 = 1 - b0 - b1` leaves a 2x2 linear system in `b0` and `b1`
//! built from the edges towards `C`, solved here with Cramer's rule. A
//! weight below zero puts the point on the far side of the opposite edge,
//! which is what the rasterizer uses as its coverage test.

use crate::math::Vec2;

/// Weights of `point` relative to `triangle`.
///
/// Returns `None` when the triangle is degenerate (its determinant is
/// exactly zero), in which case no point can be resolved against it.
#[inline]
pub fn cartesian_to_barycentric(point: Vec2, triangle: &[Vec2; 3]) -> Option<[f32; 3]> {
    let determinant = determinant(triangle);
    if determinant == 0.0 {
        return None;
    }

    let [a, b, c] = *triangle;

    let dx = point.x - c.x;
    let dy = point.y - c.y;
    let b0 = ((b.y - c.y) * dx + (c.x - b.x) * dy) / determinant;
    let b1 = ((c.y - a.y) * dx + (a.x - c.x) * dy) / determinant;
    Some([b0, b1, 1.0 - b0 - b1])
}

/// The affine combination `sum(bary[i] * triangle[i])`.
///
/// Works for any per-vertex 2D attribute, not just positions.
#[inline]
pub fn barycentric_to_cartesian(bary: [f32; 3], triangle: &[Vec2; 3]) -> Vec2 {
    triangle[0] * bary[0] + triangle[1] * bary[1] + triangle[2] * bary[2]
}

/// Whether the triangle has zero area, so no point resolves against it.
#[inline]
pub fn is_degenerate(triangle: &[Vec2; 3]) -> bool {
    determinant(triangle) == 0.0
}

#[inline]
fn determinant(triangle: &[Vec2; 3]) -> f32 {
    let [a, b, c] = *triangle;
    (b.y - c.y) * (a.x - c.x) + (c.x - b.x) * (a.y - c.y)
}

/// True when every weight is non-negative.
#[inline]
pub fn is_inside(bary: [f32; 3]) -> bool {
    bary.iter().all(|&b| b >= 0.0)
}

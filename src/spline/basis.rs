//! Uniform cubic B-spline basis
//!
//! A segment is evaluated as `T(t) * B * P`, where `T` is a monomial row
//! (or one of its derivatives), `B` the constant basis matrix and `P` the
//! four control points of the segment.

use glam::{Mat4, Vec3, Vec4};

/// Four consecutive control points
pub type Segment = [Vec3; 4];

/// Basis matrix, row-normalized by 1/6.
///
/// Stored column-major from the rows of `B`, so the matrix held here is
/// `Bᵀ` and `BASIS * row` yields the per-point weights `row * B`.
const BASIS: Mat4 = Mat4::from_cols_array_2d(&[
    [-1.0 / 6.0, 3.0 / 6.0, -3.0 / 6.0, 1.0 / 6.0],
    [3.0 / 6.0, -6.0 / 6.0, 3.0 / 6.0, 0.0],
    [-3.0 / 6.0, 0.0, 3.0 / 6.0, 0.0],
    [1.0 / 6.0, 4.0 / 6.0, 1.0 / 6.0, 0.0],
]);

/// Apply the basis to a monomial row and blend the segment's points
#[inline]
fn blend(row: Vec4, points: &Segment) -> Vec3 {
    let w = BASIS * row;
    points[0] * w.x + points[1] * w.y + points[2] * w.z + points[3] * w.w
}

/// Point on the segment at parameter `t`.
///
/// Meaningful for `t` in `[0, 1]`; values outside extrapolate the cubic.
#[inline]
pub fn evaluate_position(t: f32, points: &Segment) -> Vec3 {
    blend(Vec4::new(t * t * t, t * t, t, 1.0), points)
}

/// First derivative (tangent) at `t`
#[inline]
pub fn evaluate_tangent(t: f32, points: &Segment) -> Vec3 {
    blend(Vec4::new(3.0 * t * t, 2.0 * t, 1.0, 0.0), points)
}

/// Second derivative at `t`
#[inline]
pub fn evaluate_second_derivative(t: f32, points: &Segment) -> Vec3 {
    blend(Vec4::new(6.0 * t, 2.0, 0.0, 0.0), points)
}

//! Orientation of an object following the curve
//!
//! The primary path rotates the object from a fixed reference axis onto the
//! current tangent (axis-angle). The Frenet frame is kept for callers that
//! want a full basis instead.

use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

use super::basis::{Segment, evaluate_second_derivative, evaluate_tangent};

/// Below this length a vector is treated as degenerate
const DEGENERATE_LENGTH: f32 = 1e-6;

/// Axis-angle rotation taking the reference axis onto the tangent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    /// Rotation angle in degrees, in `[0, 180]`
    pub angle_degrees: f32,
    /// Rotation axis (not normalized; zero when the vectors are parallel)
    pub axis: Vec3,
}

impl Orientation {
    pub fn between(reference: Vec3, tangent: Vec3) -> Self {
        Self {
            angle_degrees: rotation_angle(reference, tangent),
            axis: rotation_axis(reference, tangent),
        }
    }

    /// Rotation as a matrix; identity when the axis is degenerate
    pub fn to_mat3(&self) -> Mat3 {
        match self.axis.try_normalize() {
            Some(axis) => Mat3::from_axis_angle(axis, self.angle_degrees.to_radians()),
            None => Mat3::IDENTITY,
        }
    }
}

/// Angle in degrees between `reference` and `tangent`.
///
/// Returns 0 when either vector has (near) zero length. The cosine is
/// clamped so nearly parallel vectors never produce NaN.
pub fn rotation_angle(reference: Vec3, tangent: Vec3) -> f32 {
    let mag = reference.length() * tangent.length();
    if mag < DEGENERATE_LENGTH {
        return 0.0;
    }
    let cos = (reference.dot(tangent) / mag).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Rotation axis `reference × tangent` (zero for parallel vectors)
#[inline]
pub fn rotation_axis(reference: Vec3, tangent: Vec3) -> Vec3 {
    reference.cross(tangent)
}

/// Frenet-style frame at `t`: columns are the tangent `w`, `u = w × w''`
/// and `v = w × u`.
///
/// Vectors are left unnormalized. Returns `None` where the curve has no
/// curvature (straight pieces) or no tangent.
pub fn frenet_frame(t: f32, points: &Segment) -> Option<Mat3> {
    let w = evaluate_tangent(t, points);
    let u = w.cross(evaluate_second_derivative(t, points));
    if w.length() < DEGENERATE_LENGTH || u.length() < DEGENERATE_LENGTH {
        return None;
    }
    let v = w.cross(u);
    Some(Mat3::from_cols(w, u, v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_perpendicular() {
        let a = rotation_angle(Vec3::X, Vec3::Y * 3.0);
        assert!((a - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_angle_opposite() {
        let a = rotation_angle(Vec3::X, -Vec3::X);
        assert!((a - 180.0).abs() < 1e-3);
    }

    #[test]
    fn test_angle_degenerate_is_zero() {
        assert_eq!(rotation_angle(Vec3::ZERO, Vec3::X), 0.0);
        assert_eq!(rotation_angle(Vec3::X, Vec3::ZERO), 0.0);
    }

    #[test]
    fn test_angle_nearly_parallel_is_finite() {
        let a = rotation_angle(Vec3::new(1.0, 1e-8, 0.0), Vec3::new(3.0, 0.0, 0.0));
        assert!(a.is_finite());
        assert!(a < 1e-2);
    }

    #[test]
    fn test_axis_parallel_is_zero() {
        assert_eq!(rotation_axis(Vec3::Z, Vec3::Z * 2.0), Vec3::ZERO);
        assert_eq!(rotation_axis(Vec3::X, Vec3::Y), Vec3::Z);
    }

    #[test]
    fn test_orientation_rotates_reference_onto_tangent() {
        let reference = Vec3::X;
        let tangent = Vec3::new(0.0, 2.0, 2.0);
        let rot = Orientation::between(reference, tangent).to_mat3();
        let rotated = rot * reference;
        assert!((rotated - tangent.normalize()).length() < 1e-4);
    }

    #[test]
    fn test_orientation_parallel_is_identity() {
        let rot = Orientation::between(Vec3::Y, Vec3::Y).to_mat3();
        assert_eq!(rot, Mat3::IDENTITY);
    }

    #[test]
    fn test_frenet_frame_straight_line_is_none() {
        let seg = [
            Vec3::ZERO,
            Vec3::X,
            Vec3::X * 2.0,
            Vec3::X * 3.0,
        ];
        assert!(frenet_frame(0.5, &seg).is_none());
    }

    #[test]
    fn test_frenet_frame_is_orthogonal() {
        let seg = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(2.0, 0.0, 1.0),
            Vec3::new(3.0, 1.0, 0.0),
        ];
        let frame = frenet_frame(0.3, &seg).expect("curved segment has a frame");
        let (w, u, v) = (
            frame.x_axis.normalize(),
            frame.y_axis.normalize(),
            frame.z_axis.normalize(),
        );
        assert!(w.dot(u).abs() < 1e-4);
        assert!(w.dot(v).abs() < 1e-4);
        assert!(u.dot(v).abs() < 1e-4);
    }
}

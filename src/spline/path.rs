//! Animation context for an object moving along a control point set
//!
//! Owns the control points, the reference axis and the cursor so every
//! operation works on explicit state.

use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};

use super::basis::{Segment, evaluate_position, evaluate_tangent};
use super::cursor::{AnimationCursor, advance, sample_parameter};
use super::orient::{Orientation, frenet_frame};
use crate::consts::SAMPLES_PER_SEGMENT;

/// Number of curve segments for `point_count` control points
#[inline]
pub fn segment_count(point_count: usize) -> usize {
    point_count.saturating_sub(3)
}

/// Window of 4 control points starting at `index`, if it exists
fn window(points: &[Vec3], index: usize) -> Option<Segment> {
    let slice = points.get(index..index + 4)?;
    Some([slice[0], slice[1], slice[2], slice[3]])
}

/// Position on the curve under `cursor`, `None` when the set has no segment
/// at the cursor
pub fn current_position(cursor: AnimationCursor, points: &[Vec3], sample_count: usize) -> Option<Vec3> {
    let seg = window(points, cursor.segment)?;
    Some(evaluate_position(cursor.parameter(sample_count), &seg))
}

/// A curve plus the state of the object animated along it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplinePath {
    points: Vec<Vec3>,
    /// Unit vector from the second control point; baseline for orientation
    reference_axis: Option<Vec3>,
    pub cursor: AnimationCursor,
    samples_per_segment: usize,
}

impl SplinePath {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self::with_samples(points, SAMPLES_PER_SEGMENT)
    }

    pub fn with_samples(points: Vec<Vec3>, samples_per_segment: usize) -> Self {
        let reference_axis = if segment_count(points.len()) > 0 {
            let axis = points[1].try_normalize();
            if axis.is_none() {
                log::warn!("Second control point is at the origin, path has no reference axis");
            }
            axis
        } else {
            log::warn!(
                "{} control points give no curve segment, animation is inert",
                points.len()
            );
            None
        };

        Self {
            points,
            reference_axis,
            cursor: AnimationCursor::START,
            samples_per_segment: samples_per_segment.max(1),
        }
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn reference_axis(&self) -> Option<Vec3> {
        self.reference_axis
    }

    pub fn samples_per_segment(&self) -> usize {
        self.samples_per_segment
    }

    pub fn segment_count(&self) -> usize {
        segment_count(self.points.len())
    }

    /// True when there is nothing to animate
    pub fn is_inert(&self) -> bool {
        self.segment_count() == 0
    }

    /// Control points of segment `index`
    pub fn segment(&self, index: usize) -> Option<Segment> {
        window(&self.points, index)
    }

    pub fn sample_parameter(&self, index: usize) -> f32 {
        sample_parameter(index, self.samples_per_segment)
    }

    pub fn current_position(&self) -> Option<Vec3> {
        current_position(self.cursor, &self.points, self.samples_per_segment)
    }

    pub fn current_tangent(&self) -> Option<Vec3> {
        let seg = self.segment(self.cursor.segment)?;
        Some(evaluate_tangent(self.cursor.parameter(self.samples_per_segment), &seg))
    }

    /// Rotation from the reference axis onto the current tangent
    pub fn orientation(&self) -> Option<Orientation> {
        let reference = self.reference_axis?;
        let tangent = self.current_tangent()?;
        Some(Orientation::between(reference, tangent))
    }

    pub fn frenet_frame(&self) -> Option<Mat3> {
        let seg = self.segment(self.cursor.segment)?;
        frenet_frame(self.cursor.parameter(self.samples_per_segment), &seg)
    }

    /// Advance the animation by one sample
    pub fn tick(&mut self) {
        self.cursor = advance(self.cursor, self.samples_per_segment, self.segment_count());
    }

    /// Sampled points and tangents of one segment, in parameter order
    pub fn sample_segment(&self, index: usize) -> Vec<(Vec3, Vec3)> {
        let Some(seg) = self.segment(index) else {
            return Vec::new();
        };
        (0..self.samples_per_segment)
            .map(|i| {
                let t = self.sample_parameter(i);
                (evaluate_position(t, &seg), evaluate_tangent(t, &seg))
            })
            .collect()
    }

    /// Mean of all control points (origin for an empty set)
    pub fn centroid(&self) -> Vec3 {
        if self.points.is_empty() {
            return Vec3::ZERO;
        }
        self.points.iter().copied().sum::<Vec3>() / self.points.len() as f32
    }
}

/// Look-at camera framing a path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraRig {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl CameraRig {
    /// Offset of the eye from the path centroid
    pub const EYE_OFFSET: Vec3 = Vec3::new(1.0, 1.0, 4.0);

    pub fn looking_at(path: &SplinePath) -> Self {
        let target = path.centroid();
        Self {
            eye: target + Self::EYE_OFFSET,
            target,
            up: Vec3::Z,
        }
    }
}

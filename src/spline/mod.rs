//! Uniform cubic B-spline evaluation and path animation
//!
//! Everything here is pure math over control points:
//! - `basis`: position, tangent and second derivative on a 4-point segment
//! - `cursor`: (segment, sample) stepping with wraparound
//! - `orient`: rotation angle/axis against a reference axis, Frenet frame
//! - `path`: owned animation context over a control point set

pub mod basis;
pub mod cursor;
pub mod orient;
pub mod path;

pub use basis::{Segment, evaluate_position, evaluate_second_derivative, evaluate_tangent};
pub use cursor::{AnimationCursor, advance};
pub use orient::{Orientation, frenet_frame, rotation_angle, rotation_axis};
pub use path::{CameraRig, SplinePath, current_position, segment_count};

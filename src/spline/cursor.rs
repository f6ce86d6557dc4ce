//! Animation cursor over a segmented curve

use serde::{Deserialize, Serialize};

/// Position of the moving object: which segment, which parameter sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnimationCursor {
    pub segment: usize,
    pub sample: usize,
}

impl AnimationCursor {
    pub const START: Self = Self {
        segment: 0,
        sample: 0,
    };

    /// Curve parameter of this cursor's sample for an inclusive partition
    /// of `[0, 1]` into `sample_count` values
    pub fn parameter(&self, sample_count: usize) -> f32 {
        sample_parameter(self.sample, sample_count)
    }
}

/// `index`-th value of `sample_count` equally spaced values covering `[0, 1]`
#[inline]
pub fn sample_parameter(index: usize, sample_count: usize) -> f32 {
    if sample_count < 2 {
        return 0.0;
    }
    index as f32 / (sample_count - 1) as f32
}

/// Step the cursor one sample forward.
///
/// Past the last sample the cursor moves to the start of the next segment,
/// wrapping to segment 0 after the last one. With no segments the cursor
/// is returned unchanged.
pub fn advance(cursor: AnimationCursor, sample_count: usize, segment_count: usize) -> AnimationCursor {
    if segment_count == 0 {
        return cursor;
    }

    let sample = cursor.sample + 1;
    if sample < sample_count {
        return AnimationCursor {
            segment: cursor.segment,
            sample,
        };
    }

    AnimationCursor {
        segment: (cursor.segment + 1) % segment_count,
        sample: 0,
    }
}

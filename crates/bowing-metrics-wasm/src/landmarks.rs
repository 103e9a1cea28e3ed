//! Flat landmark array decoding.
//!
//! Layout: `[x0, y0, v0, x1, y1, v1, ...]` in pose-model landmark order.
//! A negative or NaN visibility means the detector gave none.

use bowing_metrics::{Landmark, PoseFrame};

pub const LANDMARK_STRIDE: usize = 3;

/// Trailing values that do not fill a whole landmark are ignored.
pub fn decode_frame(landmarks: &[f64], timestamp_ms: f64) -> PoseFrame {
    let points = landmarks
        .chunks_exact(LANDMARK_STRIDE)
        .map(|c| {
            let visibility = c[2];
            if visibility.is_nan() || visibility < 0.0 {
                Landmark::new(c[0], c[1])
            } else {
                Landmark::with_visibility(c[0], c[1], visibility)
            }
        })
        .collect();
    PoseFrame::new(timestamp_ms, points)
}

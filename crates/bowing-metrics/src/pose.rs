//! Pose input: one person's landmark set per frame.
//!
//! Landmarks follow the 33-point body layout of the upstream pose detector.
//! Only the subset needed for bowing analysis is read.

use serde::{Deserialize, Serialize};

use crate::geometry::Point2D;

pub const LEFT_EAR: usize = 7;
pub const RIGHT_EAR: usize = 8;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const RIGHT_ELBOW: usize = 14;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;

/// Number of landmarks the upstream detector emits per person
pub const POSE_LANDMARK_COUNT: usize = 33;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            visibility: None,
        }
    }

    pub fn with_visibility(x: f64, y: f64, visibility: f64) -> Self {
        Self {
            x,
            y,
            visibility: Some(visibility),
        }
    }

    pub fn point(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// A landmark without a visibility value counts as visible.
    pub fn is_visible(&self, min_visibility: f64) -> bool {
        self.visibility.map_or(true, |v| v >= min_visibility)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseFrame {
    pub timestamp_ms: f64,
    pub landmarks: Vec<Landmark>,
}

/// The landmarks bowing analysis consumes, already visibility-filtered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BowingLandmarks {
    pub right_shoulder: Point2D,
    pub right_elbow: Point2D,
    pub right_wrist: Point2D,
    pub left_shoulder: Option<Point2D>,
    pub left_ear: Option<Point2D>,
    pub right_ear: Option<Point2D>,
    pub right_hip: Option<Point2D>,
}

impl PoseFrame {
    pub fn new(timestamp_ms: f64, landmarks: Vec<Landmark>) -> Self {
        Self {
            timestamp_ms,
            landmarks,
        }
    }

    fn visible(&self, index: usize, min_visibility: f64) -> Option<Point2D> {
        self.landmarks
            .get(index)
            .filter(|lm| lm.is_finite() && lm.is_visible(min_visibility))
            .map(Landmark::point)
    }

    /// Returns `None` when the bowing arm (right shoulder, elbow, wrist) is not visible.
    pub fn extract(&self, min_visibility: f64) -> Option<BowingLandmarks> {
        Some(BowingLandmarks {
            right_shoulder: self.visible(RIGHT_SHOULDER, min_visibility)?,
            right_elbow: self.visible(RIGHT_ELBOW, min_visibility)?,
            right_wrist: self.visible(RIGHT_WRIST, min_visibility)?,
            left_shoulder: self.visible(LEFT_SHOULDER, min_visibility),
            left_ear: self.visible(LEFT_EAR, min_visibility),
            right_ear: self.visible(RIGHT_EAR, min_visibility),
            right_hip: self.visible(RIGHT_HIP, min_visibility),
        })
    }
}

/// Builder for synthetic frames, mostly used by tests and replay tooling.
#[derive(Debug, Clone)]
pub struct PoseFrameBuilder {
    landmarks: Vec<Landmark>,
}

impl Default for PoseFrameBuilder {
    fn default() -> Self {
        Self {
            landmarks: vec![
                Landmark::with_visibility(0.0, 0.0, 0.0);
                POSE_LANDMARK_COUNT
            ],
        }
    }
}

impl PoseFrameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, index: usize, x: f64, y: f64) -> Self {
        if let Some(slot) = self.landmarks.get_mut(index) {
            *slot = Landmark::with_visibility(x, y, 1.0);
        }
        self
    }

    pub fn build(self, timestamp_ms: f64) -> PoseFrame {
        PoseFrame::new(timestamp_ms, self.landmarks)
    }
}

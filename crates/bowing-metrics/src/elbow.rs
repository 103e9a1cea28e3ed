//! Right elbow height relative to the shoulder, normalized by torso length.

use serde::{Deserialize, Serialize};

use crate::config::ElbowConfig;
use crate::geometry::{round_to, Point2D};
use crate::record::Status;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElbowPosition {
    #[serde(rename = "too high")]
    TooHigh,
    #[serde(rename = "too low")]
    TooLow,
    #[serde(rename = "slightly low")]
    SlightlyLow,
    #[serde(rename = "OK")]
    Ok,
}

impl ElbowPosition {
    pub fn status(self) -> Status {
        match self {
            Self::TooHigh | Self::SlightlyLow => Status::Warn,
            Self::TooLow => Status::Bad,
            Self::Ok => Status::Good,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TooHigh => "too high",
            Self::TooLow => "too low",
            Self::SlightlyLow => "slightly low",
            Self::Ok => "OK",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElbowResult {
    /// (elbow.y − shoulder.y) / body scale; positive means below the shoulder
    pub relative_height: f64,
    pub status: Status,
    pub label: ElbowPosition,
}

impl ElbowResult {
    pub fn from_relative(relative_height: f64, cfg: &ElbowConfig) -> Self {
        let position = classify_elbow(relative_height, cfg);
        Self {
            relative_height: round_to(relative_height, 2),
            status: position.status(),
            label: position,
        }
    }
}

/// Body scale is the shoulder–hip vertical span, or a fixed fallback without a hip.
pub fn body_scale(shoulder: Point2D, hip: Option<Point2D>, cfg: &ElbowConfig) -> f64 {
    hip.map_or(cfg.fallback_body_scale, |h| (h.y - shoulder.y).abs())
        .max(cfg.min_body_scale)
}

pub fn relative_elbow_height(
    shoulder: Point2D,
    elbow: Point2D,
    hip: Option<Point2D>,
    cfg: &ElbowConfig,
) -> f64 {
    (elbow.y - shoulder.y) / body_scale(shoulder, hip, cfg)
}

pub fn classify_elbow(relative_height: f64, cfg: &ElbowConfig) -> ElbowPosition {
    if relative_height < cfg.too_high {
        ElbowPosition::TooHigh
    } else if relative_height > cfg.too_low {
        ElbowPosition::TooLow
    } else if relative_height > cfg.slightly_low {
        ElbowPosition::SlightlyLow
    } else {
        ElbowPosition::Ok
    }
}

pub fn evaluate_elbow(
    shoulder: Point2D,
    elbow: Point2D,
    hip: Option<Point2D>,
    cfg: &ElbowConfig,
) -> ElbowResult {
    ElbowResult::from_relative(relative_elbow_height(shoulder, elbow, hip, cfg), cfg)
}

//! Shoulder tension from shoulder–ear distance.
//!
//! Raised shoulders shorten the shoulder–ear distance. The current mean of
//! both sides is compared to a calibrated relaxed baseline; without a baseline
//! no tension is reported.

use serde::{Deserialize, Serialize};

use crate::config::ShoulderConfig;
use crate::geometry::{round_to, Point2D};
use crate::record::Status;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShoulderLabel {
    #[serde(rename = "calibration pending")]
    CalibrationPending,
    #[serde(rename = "not visible")]
    NotVisible,
    #[serde(rename = "relaxed")]
    Relaxed,
    #[serde(rename = "slightly raised")]
    SlightlyRaised,
    #[serde(rename = "raised")]
    Raised,
    #[serde(rename = "uneven")]
    Uneven,
}

impl ShoulderLabel {
    pub fn label(self) -> &'static str {
        match self {
            Self::CalibrationPending => "calibration pending",
            Self::NotVisible => "not visible",
            Self::Relaxed => "relaxed",
            Self::SlightlyRaised => "slightly raised",
            Self::Raised => "raised",
            Self::Uneven => "uneven",
        }
    }
}

/// Shoulder–ear distance per side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShoulderSides {
    pub left: f64,
    pub right: f64,
}

impl ShoulderSides {
    pub fn measure(
        left_shoulder: Point2D,
        left_ear: Point2D,
        right_shoulder: Point2D,
        right_ear: Point2D,
    ) -> Self {
        Self {
            left: left_shoulder.distance(&left_ear),
            right: right_shoulder.distance(&right_ear),
        }
    }

    pub fn mean(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    /// |L − R| / max(L, R); 0 when both sides are zero.
    pub fn asymmetry(&self) -> f64 {
        let max = self.left.max(self.right);
        if max <= 0.0 {
            return 0.0;
        }
        (self.left - self.right).abs() / max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoulderResult {
    /// Percent drop of shoulder–ear distance below baseline, never negative
    pub tension: f64,
    pub asymmetry: f64,
    pub status: Status,
    pub label: ShoulderLabel,
}

impl ShoulderResult {
    pub fn pending() -> Self {
        Self {
            tension: 0.0,
            asymmetry: 0.0,
            status: Status::Good,
            label: ShoulderLabel::CalibrationPending,
        }
    }

    pub fn not_visible() -> Self {
        Self {
            label: ShoulderLabel::NotVisible,
            ..Self::pending()
        }
    }
}

/// Status for a relative shoulder–ear drop (`0.2` = 20 % shorter than baseline).
pub fn tension_status(change: f64, cfg: &ShoulderConfig) -> (Status, ShoulderLabel) {
    if change > cfg.bad_change {
        (Status::Bad, ShoulderLabel::Raised)
    } else if change > cfg.warn_change {
        (Status::Warn, ShoulderLabel::SlightlyRaised)
    } else {
        (Status::Good, ShoulderLabel::Relaxed)
    }
}

pub fn evaluate_shoulder(
    sides: ShoulderSides,
    baseline: Option<f64>,
    cfg: &ShoulderConfig,
) -> ShoulderResult {
    let Some(baseline) = baseline.filter(|b| *b >= cfg.min_baseline) else {
        return ShoulderResult::pending();
    };

    let change = (baseline - sides.mean()) / baseline;
    let (mut status, mut label) = tension_status(change, cfg);

    let asymmetry = sides.asymmetry();
    if status == Status::Good && asymmetry > cfg.asymmetry_ratio {
        status = Status::Warn;
        label = ShoulderLabel::Uneven;
    }

    ShoulderResult {
        tension: round_to((change * 100.0).max(0.0), 1),
        asymmetry: round_to(asymmetry, 2),
        status,
        label,
    }
}

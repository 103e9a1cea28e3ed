//! Fixed-window diagnostic capture and its aggregate report.
//!
//! While a capture is active every processed frame is flattened into a
//! [`DiagnosticLogEntry`]. At the end of the window the log is consumed once
//! and scored with the same thresholds as the live evaluators, applied to the
//! aggregate values.
//!
//! Overall score weights:
//! - straightness: 3 (skipped when no frame had a score)
//! - elbow: 2 (good 90 / warn 60 / bad 30)
//! - shoulder: 2 (good 95 / warn 60 / bad 30)
//! - bow distribution spread: 1 (good 90 / warn 65 / bad 35)

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::elbow::{classify_elbow, ElbowPosition};
use crate::geometry::round_to;
use crate::record::{MetricsRecord, Status};
use crate::shoulder::{tension_status, ShoulderLabel};
use crate::straightness::curvature_status;
use crate::zone::{
    compute_distribution_percent, distribution_status, BowDistribution, BowZone,
    DistributionPercent,
};

const STRAIGHTNESS_WEIGHT: f64 = 3.0;
const ELBOW_WEIGHT: f64 = 2.0;
const SHOULDER_WEIGHT: f64 = 2.0;
const DISTRIBUTION_WEIGHT: f64 = 1.0;

/// Flattened snapshot of one [`MetricsRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticLogEntry {
    pub timestamp_ms: f64,
    pub straightness_score: Option<u8>,
    pub curvature: Option<f64>,
    pub zone: BowZone,
    pub extension_ratio: f64,
    pub elbow_relative_height: f64,
    pub tension: f64,
    pub calibrated: bool,
}

impl DiagnosticLogEntry {
    pub fn from_record(record: &MetricsRecord, calibrated: bool) -> Self {
        Self {
            timestamp_ms: record.timestamp_ms,
            straightness_score: record.straightness.score,
            curvature: record.straightness.curvature,
            zone: record.bow_zone.zone,
            extension_ratio: record.bow_zone.extension_ratio,
            elbow_relative_height: record.elbow.relative_height,
            tension: record.shoulder.tension,
            calibrated,
        }
    }
}

/// An active capture window. `started_at_ms` and all `now_ms` arguments are
/// wall-clock milliseconds from the caller, independent of frame timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticCapture {
    started_at_ms: f64,
    duration_ms: f64,
    log: Vec<DiagnosticLogEntry>,
}

impl DiagnosticCapture {
    pub fn new(started_at_ms: f64, duration_ms: f64) -> Self {
        Self {
            started_at_ms,
            duration_ms,
            log: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: DiagnosticLogEntry) {
        self.log.push(entry);
    }

    pub fn started_at_ms(&self) -> f64 {
        self.started_at_ms
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    pub fn frame_count(&self) -> usize {
        self.log.len()
    }

    pub fn remaining_ms(&self, now_ms: f64) -> f64 {
        (self.started_at_ms + self.duration_ms - now_ms).max(0.0)
    }

    pub fn is_expired(&self, now_ms: f64) -> bool {
        now_ms >= self.started_at_ms + self.duration_ms
    }

    pub fn log(&self) -> &[DiagnosticLogEntry] {
        &self.log
    }

    /// Consumes the capture. Dropping it instead is how a cancel discards the log.
    pub fn into_report(self, cfg: &EngineConfig) -> DiagnosticReport {
        aggregate(&self.log, cfg)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Commentary {
    #[serde(rename = "Excellent bowing. Keep practicing this way.")]
    Excellent,
    #[serde(rename = "Good bowing with a few details to refine.")]
    Good,
    #[serde(rename = "Needs work: focus on the flagged areas.")]
    NeedsWork,
    #[serde(rename = "Needs significant work: practice slowly in front of a mirror.")]
    NeedsSignificantWork,
}

impl Commentary {
    pub fn for_score(score: u8) -> Self {
        match score {
            s if s >= 85 => Self::Excellent,
            s if s >= 70 => Self::Good,
            s if s >= 50 => Self::NeedsWork,
            _ => Self::NeedsSignificantWork,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StraightnessSummary {
    pub mean_score: Option<f64>,
    pub mean_curvature: Option<f64>,
    pub valid_frames: usize,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElbowSummary {
    pub mean_relative_height: f64,
    pub status: Status,
    pub label: ElbowPosition,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoulderSummary {
    pub mean_tension: f64,
    pub max_tension: f64,
    pub status: Status,
    pub label: ShoulderLabel,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSummary {
    pub percent: DistributionPercent,
    pub status: Status,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallScore {
    pub score: u8,
    pub status: Status,
    pub commentary: Commentary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub frame_count: usize,
    pub duration_ms: f64,
    pub straightness: StraightnessSummary,
    pub elbow: ElbowSummary,
    pub shoulder: ShoulderSummary,
    pub distribution: DistributionSummary,
    pub overall: OverallScore,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum DiagnosticReport {
    /// The pose was never detected during the window
    NoPoseDetected,
    Completed(SessionReport),
}

impl DiagnosticReport {
    pub fn report(&self) -> Option<&SessionReport> {
        match self {
            Self::Completed(report) => Some(report),
            Self::NoPoseDetected => None,
        }
    }
}

fn elbow_channel_score(status: Status) -> u8 {
    match status {
        Status::Good => 90,
        Status::Warn => 60,
        Status::Bad => 30,
    }
}

fn shoulder_channel_score(status: Status) -> u8 {
    match status {
        Status::Good => 95,
        Status::Warn => 60,
        Status::Bad => 30,
    }
}

fn distribution_channel_score(status: Status) -> u8 {
    match status {
        Status::Good => 90,
        Status::Warn => 65,
        Status::Bad => 35,
    }
}

fn overall_status(score: u8) -> Status {
    if score >= 80 {
        Status::Good
    } else if score >= 60 {
        Status::Warn
    } else {
        Status::Bad
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

pub fn aggregate(log: &[DiagnosticLogEntry], cfg: &EngineConfig) -> DiagnosticReport {
    let (Some(first), Some(last)) = (log.first(), log.last()) else {
        return DiagnosticReport::NoPoseDetected;
    };

    // straightness: only frames that had a score
    let scored: Vec<(f64, f64)> = log
        .iter()
        .filter_map(|e| Some((e.straightness_score? as f64, e.curvature?)))
        .collect();
    let mean_score = mean(scored.iter().map(|(s, _)| *s));
    let mean_curvature = mean(scored.iter().map(|(_, c)| *c));
    let straightness = StraightnessSummary {
        mean_score: mean_score.map(|s| round_to(s, 1)),
        mean_curvature: mean_curvature.map(|c| round_to(c, 2)),
        valid_frames: scored.len(),
        status: mean_curvature.map_or(Status::Good, |c| curvature_status(c, &cfg.straightness)),
    };

    // elbow: every frame
    let mean_relative = mean(log.iter().map(|e| e.elbow_relative_height)).unwrap_or(0.0);
    let elbow_position = classify_elbow(mean_relative, &cfg.elbow);
    let elbow = ElbowSummary {
        mean_relative_height: round_to(mean_relative, 2),
        status: elbow_position.status(),
        label: elbow_position,
        score: elbow_channel_score(elbow_position.status()),
    };

    // shoulder: only frames with positive tension
    let tensions: Vec<f64> = log.iter().map(|e| e.tension).filter(|t| *t > 0.0).collect();
    let mean_tension = mean(tensions.iter().copied()).unwrap_or(0.0);
    let max_tension = tensions.iter().copied().fold(0.0, f64::max);
    let (shoulder_status, shoulder_label) = if log.iter().any(|e| e.calibrated) {
        tension_status(mean_tension / 100.0, &cfg.shoulder)
    } else {
        (Status::Good, ShoulderLabel::CalibrationPending)
    };
    let shoulder = ShoulderSummary {
        mean_tension: round_to(mean_tension, 1),
        max_tension: round_to(max_tension, 1),
        status: shoulder_status,
        label: shoulder_label,
        score: shoulder_channel_score(shoulder_status),
    };

    // distribution: whole log
    let counts: BowDistribution = log.iter().map(|e| e.zone).collect();
    let percent = compute_distribution_percent(&counts, &cfg.zone);
    let spread_status = distribution_status(&percent, &cfg.zone);
    let distribution = DistributionSummary {
        percent,
        status: spread_status,
        score: distribution_channel_score(spread_status),
    };

    let mut weighted = 0.0;
    let mut weights = 0.0;
    if let Some(score) = mean_score {
        weighted += score * STRAIGHTNESS_WEIGHT;
        weights += STRAIGHTNESS_WEIGHT;
    }
    weighted += elbow.score as f64 * ELBOW_WEIGHT;
    weighted += shoulder.score as f64 * SHOULDER_WEIGHT;
    weighted += distribution.score as f64 * DISTRIBUTION_WEIGHT;
    weights += ELBOW_WEIGHT + SHOULDER_WEIGHT + DISTRIBUTION_WEIGHT;

    let score = (weighted / weights).round().clamp(0.0, 100.0) as u8;
    let overall = OverallScore {
        score,
        status: overall_status(score),
        commentary: Commentary::for_score(score),
    };

    DiagnosticReport::Completed(SessionReport {
        frame_count: log.len(),
        duration_ms: (last.timestamp_ms - first.timestamp_ms).max(0.0),
        straightness,
        elbow,
        shoulder,
        distribution,
        overall,
    })
}

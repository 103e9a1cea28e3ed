use serde::{Deserialize, Serialize};

use crate::elbow::ElbowResult;
use crate::shoulder::ShoulderResult;
use crate::straightness::StraightnessResult;
use crate::zone::{BowZoneResult, DistributionPercent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Good,
    Warn,
    Bad,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warn => "warn",
            Self::Bad => "bad",
        }
    }

    pub fn is_good(self) -> bool {
        self == Self::Good
    }
}

/// Per-frame engine output.
///
/// `straightness.score == None` with status good means "not enough data yet",
/// not a measured good stroke.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRecord {
    pub timestamp_ms: f64,
    pub straightness: StraightnessResult,
    pub distribution: DistributionPercent,
    pub bow_zone: BowZoneResult,
    pub elbow: ElbowResult,
    pub shoulder: ShoulderResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameOutput {
    pub metrics: MetricsRecord,
    pub advice: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// Timestamp not newer than the last processed frame
    StaleTimestamp,
    /// Right shoulder, elbow or wrist missing or below visibility
    MissingLandmarks,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum FrameOutcome {
    Processed(FrameOutput),
    Skipped { reason: SkipReason },
}

impl FrameOutcome {
    pub fn output(&self) -> Option<&FrameOutput> {
        match self {
            Self::Processed(output) => Some(output),
            Self::Skipped { .. } => None,
        }
    }

    pub fn into_output(self) -> Option<FrameOutput> {
        match self {
            Self::Processed(output) => Some(output),
            Self::Skipped { .. } => None,
        }
    }
}

//! Bow zone (frog / middle / tip) from right-arm extension, plus the rolling
//! usage histogram.

use serde::{Deserialize, Serialize};

use crate::config::ZoneConfig;
use crate::constants::DEFAULT_EXTENSION_RATIO;
use crate::geometry::{angle_between3, round_to, Point2D};
use crate::record::Status;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BowZone {
    Frog,
    #[default]
    Middle,
    Tip,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BowZoneResult {
    pub zone: BowZone,
    /// Shoulder-to-wrist distance over arm length, 2 decimals
    pub extension_ratio: f64,
    /// Shoulder-elbow-wrist angle in degrees, 1 decimal
    pub elbow_angle: f64,
}

/// Straight-line shoulder→wrist distance over upper-arm + forearm length.
/// `None` when the arm is shorter than `min_arm_length`.
pub fn extension_ratio(
    shoulder: Point2D,
    elbow: Point2D,
    wrist: Point2D,
    cfg: &ZoneConfig,
) -> Option<f64> {
    let arm_length = shoulder.distance(&elbow) + elbow.distance(&wrist);
    if arm_length < cfg.min_arm_length {
        return None;
    }
    Some(shoulder.distance(&wrist) / arm_length)
}

pub fn classify_extension(ratio: f64, cfg: &ZoneConfig) -> BowZone {
    if ratio < cfg.frog_max_ratio {
        BowZone::Frog
    } else if ratio < cfg.middle_max_ratio {
        BowZone::Middle
    } else {
        BowZone::Tip
    }
}

pub fn compute_bow_zone(
    shoulder: Point2D,
    elbow: Point2D,
    wrist: Point2D,
    cfg: &ZoneConfig,
) -> BowZoneResult {
    let elbow_angle = round_to(angle_between3(shoulder, elbow, wrist), 1);
    match extension_ratio(shoulder, elbow, wrist, cfg) {
        Some(ratio) => BowZoneResult {
            zone: classify_extension(ratio, cfg),
            extension_ratio: round_to(ratio, 2),
            elbow_angle,
        },
        None => BowZoneResult {
            zone: BowZone::Middle,
            extension_ratio: DEFAULT_EXTENSION_RATIO,
            elbow_angle,
        },
    }
}

/// Per-zone frame counters. All three reset together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BowDistribution {
    pub tip: u32,
    pub middle: u32,
    pub frog: u32,
}

impl BowDistribution {
    pub fn record(&mut self, zone: BowZone) {
        match zone {
            BowZone::Tip => self.tip += 1,
            BowZone::Middle => self.middle += 1,
            BowZone::Frog => self.frog += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.tip as u64 + self.middle as u64 + self.frog as u64
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl FromIterator<BowZone> for BowDistribution {
    fn from_iter<I: IntoIterator<Item = BowZone>>(iter: I) -> Self {
        let mut counts = Self::default();
        for zone in iter {
            counts.record(zone);
        }
        counts
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistributionLabel {
    #[serde(rename = "--")]
    NoData,
    #[serde(rename = "tip-heavy")]
    TipHeavy,
    #[serde(rename = "frog-heavy")]
    FrogHeavy,
    #[serde(rename = "middle-centered")]
    MiddleCentered,
    #[serde(rename = "full bow")]
    FullBow,
    #[serde(rename = "balanced")]
    Balanced,
}

impl DistributionLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoData => "--",
            Self::TipHeavy => "tip-heavy",
            Self::FrogHeavy => "frog-heavy",
            Self::MiddleCentered => "middle-centered",
            Self::FullBow => "full bow",
            Self::Balanced => "balanced",
        }
    }

    /// Even use of the bow: the positive-feedback case for advice.
    pub fn is_even(self) -> bool {
        matches!(self, Self::FullBow | Self::Balanced)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionPercent {
    pub tip: u8,
    pub middle: u8,
    pub frog: u8,
    pub label: DistributionLabel,
}

impl DistributionPercent {
    pub fn max(&self) -> u8 {
        self.tip.max(self.middle).max(self.frog)
    }

    pub fn min(&self) -> u8 {
        self.tip.min(self.middle).min(self.frog)
    }
}

/// Converts counters to whole percentages summing to exactly 100.
///
/// Tip and frog are rounded, middle takes the remainder. If rounding pushes
/// tip + frog above 100 the overflow comes back out of the larger of the two.
pub fn compute_distribution_percent(counts: &BowDistribution, cfg: &ZoneConfig) -> DistributionPercent {
    let total = counts.total();
    if total == 0 {
        return DistributionPercent {
            tip: 33,
            middle: 34,
            frog: 33,
            label: DistributionLabel::NoData,
        };
    }

    let pct = |n: u32| (n as f64 / total as f64 * 100.0).round() as i32;
    let mut tip = pct(counts.tip);
    let mut frog = pct(counts.frog);
    let overflow = tip + frog - 100;
    if overflow > 0 {
        if tip >= frog {
            tip -= overflow;
        } else {
            frog -= overflow;
        }
    }
    let middle = 100 - tip - frog;

    let mut percent = DistributionPercent {
        tip: tip as u8,
        middle: middle as u8,
        frog: frog as u8,
        label: DistributionLabel::Balanced,
    };
    percent.label = label_for(&percent, cfg);
    percent
}

fn label_for(p: &DistributionPercent, cfg: &ZoneConfig) -> DistributionLabel {
    let max = p.max();
    if max >= cfg.dominant_percent {
        if p.tip == max {
            DistributionLabel::TipHeavy
        } else if p.frog == max {
            DistributionLabel::FrogHeavy
        } else {
            DistributionLabel::MiddleCentered
        }
    } else if max - p.min() < cfg.full_bow_spread_percent {
        DistributionLabel::FullBow
    } else {
        DistributionLabel::Balanced
    }
}

/// How evenly the bow was used over a capture.
pub fn distribution_status(p: &DistributionPercent, cfg: &ZoneConfig) -> Status {
    if p.label == DistributionLabel::NoData {
        return Status::Good;
    }
    let max = p.max();
    if max >= cfg.spread_bad_percent {
        Status::Bad
    } else if max >= cfg.dominant_percent {
        Status::Warn
    } else {
        Status::Good
    }
}

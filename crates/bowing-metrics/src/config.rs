use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StraightnessConfig {
    pub min_trail_samples: usize,
    pub noise_floor: f64,
    pub min_stroke_samples: usize,
    pub min_stroke_length: f64,
    pub degenerate_epsilon: f64,
    pub curvature_warn: f64,
    pub curvature_bad: f64,
    /// Score points removed per curvature percent
    pub curvature_penalty: f64,
}

impl Default for StraightnessConfig {
    fn default() -> Self {
        Self {
            min_trail_samples: MIN_TRAIL_SAMPLES,
            noise_floor: STROKE_NOISE_FLOOR,
            min_stroke_samples: MIN_STROKE_SAMPLES,
            min_stroke_length: MIN_STROKE_LENGTH,
            degenerate_epsilon: LINE_FIT_DEGENERATE_EPSILON,
            curvature_warn: CURVATURE_WARN_PERCENT,
            curvature_bad: CURVATURE_BAD_PERCENT,
            curvature_penalty: CURVATURE_SCORE_PENALTY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZoneConfig {
    pub frog_max_ratio: f64,
    pub middle_max_ratio: f64,
    pub min_arm_length: f64,
    pub distribution_window_ms: f64,
    pub dominant_percent: u8,
    pub full_bow_spread_percent: u8,
    pub spread_bad_percent: u8,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            frog_max_ratio: FROG_MAX_RATIO,
            middle_max_ratio: MIDDLE_MAX_RATIO,
            min_arm_length: MIN_ARM_LENGTH,
            distribution_window_ms: DISTRIBUTION_WINDOW_MS,
            dominant_percent: DOMINANT_ZONE_PERCENT,
            full_bow_spread_percent: FULL_BOW_SPREAD_PERCENT,
            spread_bad_percent: SPREAD_BAD_PERCENT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElbowConfig {
    pub too_high: f64,
    pub too_low: f64,
    pub slightly_low: f64,
    pub fallback_body_scale: f64,
    pub min_body_scale: f64,
}

impl Default for ElbowConfig {
    fn default() -> Self {
        Self {
            too_high: ELBOW_TOO_HIGH,
            too_low: ELBOW_TOO_LOW,
            slightly_low: ELBOW_SLIGHTLY_LOW,
            fallback_body_scale: FALLBACK_BODY_SCALE,
            min_body_scale: MIN_BODY_SCALE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShoulderConfig {
    pub warn_change: f64,
    pub bad_change: f64,
    pub asymmetry_ratio: f64,
    pub min_baseline: f64,
}

impl Default for ShoulderConfig {
    fn default() -> Self {
        Self {
            warn_change: TENSION_WARN_CHANGE,
            bad_change: TENSION_BAD_CHANGE,
            asymmetry_ratio: SHOULDER_ASYMMETRY_RATIO,
            min_baseline: MIN_CALIBRATION_BASELINE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SmoothingConfig {
    /// EMA alpha in (0, 1]; larger reacts faster
    pub alpha: f64,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_SMOOTHING_ALPHA,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrailConfig {
    pub capacity: usize,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            capacity: TRAIL_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PoseConfig {
    /// Landmarks reported below this visibility are treated as absent
    pub min_visibility: f64,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            min_visibility: DEFAULT_MIN_VISIBILITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagnosticConfig {
    pub default_duration_ms: f64,
    pub max_duration_ms: f64,
}

impl Default for DiagnosticConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: DEFAULT_DIAGNOSTIC_DURATION_MS,
            max_duration_ms: MAX_DIAGNOSTIC_DURATION_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub straightness: StraightnessConfig,
    pub zone: ZoneConfig,
    pub elbow: ElbowConfig,
    pub shoulder: ShoulderConfig,
    pub smoothing: SmoothingConfig,
    pub trail: TrailConfig,
    pub pose: PoseConfig,
    pub diagnostic: DiagnosticConfig,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        let invalid = |msg: &str| Err(EngineError::InvalidConfig(msg.to_string()));

        let s = &self.straightness;
        if s.min_stroke_samples < 2 {
            return invalid("straightness.min_stroke_samples must be >= 2");
        }
        if s.min_trail_samples < s.min_stroke_samples {
            return invalid("straightness.min_trail_samples must be >= min_stroke_samples");
        }
        if s.noise_floor < 0.0 || s.min_stroke_length <= 0.0 || s.degenerate_epsilon <= 0.0 {
            return invalid("straightness floors must be positive");
        }
        if s.curvature_warn >= s.curvature_bad {
            return invalid("straightness.curvature_warn must be < curvature_bad");
        }
        if s.curvature_penalty <= 0.0 {
            return invalid("straightness.curvature_penalty must be > 0");
        }

        let z = &self.zone;
        if !(0.0 < z.frog_max_ratio && z.frog_max_ratio < z.middle_max_ratio) {
            return invalid("zone ratios must satisfy 0 < frog_max_ratio < middle_max_ratio");
        }
        if z.min_arm_length <= 0.0 || z.distribution_window_ms <= 0.0 {
            return invalid("zone.min_arm_length and distribution_window_ms must be > 0");
        }
        if z.dominant_percent > 100 || z.spread_bad_percent > 100 || z.full_bow_spread_percent > 100 {
            return invalid("zone percentages must be <= 100");
        }
        if z.dominant_percent > z.spread_bad_percent {
            return invalid("zone.dominant_percent must be <= spread_bad_percent");
        }

        let e = &self.elbow;
        if !(e.too_high < e.slightly_low && e.slightly_low < e.too_low) {
            return invalid("elbow thresholds must satisfy too_high < slightly_low < too_low");
        }
        if e.fallback_body_scale <= 0.0 || e.min_body_scale <= 0.0 {
            return invalid("elbow body scales must be > 0");
        }

        let sh = &self.shoulder;
        if !(0.0 <= sh.warn_change && sh.warn_change < sh.bad_change) {
            return invalid("shoulder thresholds must satisfy 0 <= warn_change < bad_change");
        }
        if !(0.0..=1.0).contains(&sh.asymmetry_ratio) {
            return invalid("shoulder.asymmetry_ratio must be in [0,1]");
        }
        if sh.min_baseline <= 0.0 {
            return invalid("shoulder.min_baseline must be > 0");
        }

        if !(self.smoothing.alpha > 0.0 && self.smoothing.alpha <= 1.0) {
            return invalid("smoothing.alpha must be in (0,1]");
        }
        if self.trail.capacity < self.straightness.min_trail_samples {
            return invalid("trail.capacity must be >= straightness.min_trail_samples");
        }
        if !(0.0..=1.0).contains(&self.pose.min_visibility) {
            return invalid("pose.min_visibility must be in [0,1]");
        }

        let d = &self.diagnostic;
        if d.default_duration_ms <= 0.0 || d.default_duration_ms > d.max_duration_ms {
            return invalid("diagnostic.default_duration_ms must be in (0, max_duration_ms]");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn defaults_match_tuned_constants() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.trail.capacity, 60);
        assert_eq!(cfg.straightness.noise_floor, 0.002);
        assert_eq!(cfg.straightness.min_stroke_samples, 8);
        assert_eq!(cfg.straightness.min_stroke_length, 0.03);
        assert_eq!(cfg.zone.frog_max_ratio, 0.55);
        assert_eq!(cfg.zone.middle_max_ratio, 0.78);
        assert_eq!(cfg.zone.distribution_window_ms, 10_000.0);
    }

    #[test]
    fn rejects_inverted_zone_ratios() {
        let mut cfg = EngineConfig::default();
        cfg.zone.frog_max_ratio = 0.9;
        assert!(matches!(cfg.validate(), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_zero_alpha() {
        let mut cfg = EngineConfig::default();
        cfg.smoothing.alpha = 0.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: EngineConfig =
            serde_json::from_str(r#"{"smoothing":{"alpha":0.8},"zone":{"frogMaxRatio":0.5}}"#)
                .expect("parse config");
        assert_eq!(cfg.smoothing.alpha, 0.8);
        assert_eq!(cfg.zone.frog_max_ratio, 0.5);
        assert_eq!(cfg.zone.middle_max_ratio, MIDDLE_MAX_RATIO);
        assert_eq!(cfg.trail.capacity, TRAIL_CAPACITY);
    }
}

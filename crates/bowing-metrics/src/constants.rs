/// Maximum number of wrist samples kept in the trail
pub const TRAIL_CAPACITY: usize = 60;

/// Minimum trail length before straightness is scored
pub const MIN_TRAIL_SAMPLES: usize = 10;

/// Horizontal wrist movement (normalized units) below which a step is noise
pub const STROKE_NOISE_FLOOR: f64 = 0.002;

/// Minimum samples a stroke needs to be kept or scored
pub const MIN_STROKE_SAMPLES: usize = 8;

/// Minimum first-to-last stroke length (normalized units) that is trusted
pub const MIN_STROKE_LENGTH: f64 = 0.03;

/// |n·Σx² − (Σx)²| below this marks a near-vertical stroke
pub const LINE_FIT_DEGENERATE_EPSILON: f64 = 1e-10;

/// Curvature percentage above which straightness is a warning
pub const CURVATURE_WARN_PERCENT: f64 = 2.0;

/// Curvature percentage above which straightness is bad
pub const CURVATURE_BAD_PERCENT: f64 = 5.0;

/// Score points removed per curvature percent
pub const CURVATURE_SCORE_PENALTY: f64 = 5.0;

/// Extension ratio below which the bow is at the frog
pub const FROG_MAX_RATIO: f64 = 0.55;

/// Extension ratio below which the bow is in the middle (tip above)
pub const MIDDLE_MAX_RATIO: f64 = 0.78;

/// Arm length below which extension ratio is not computed
pub const MIN_ARM_LENGTH: f64 = 0.01;

/// Extension ratio reported when the arm is too short to measure
pub const DEFAULT_EXTENSION_RATIO: f64 = 0.5;

/// Wall-clock window (ms of frame timestamps) after which the zone histogram resets
pub const DISTRIBUTION_WINDOW_MS: f64 = 10_000.0;

/// Share (percent) of one zone at which the distribution is labeled by that zone
pub const DOMINANT_ZONE_PERCENT: u8 = 50;

/// Max-minus-min spread (percent) under which the distribution counts as full bow
pub const FULL_BOW_SPREAD_PERCENT: u8 = 15;

/// Share (percent) of one zone at which the spread status is bad
pub const SPREAD_BAD_PERCENT: u8 = 80;

/// Relative elbow height below which the elbow is too high
pub const ELBOW_TOO_HIGH: f64 = -0.15;

/// Relative elbow height above which the elbow is too low
pub const ELBOW_TOO_LOW: f64 = 0.5;

/// Relative elbow height above which the elbow is slightly low
pub const ELBOW_SLIGHTLY_LOW: f64 = 0.35;

/// Body scale used when no hip landmark is available
pub const FALLBACK_BODY_SCALE: f64 = 0.3;

/// Lower clamp for the body scale
pub const MIN_BODY_SCALE: f64 = 0.01;

/// Relative shoulder–ear drop above which tension is a warning
pub const TENSION_WARN_CHANGE: f64 = 0.15;

/// Relative shoulder–ear drop above which tension is bad
pub const TENSION_BAD_CHANGE: f64 = 0.25;

/// Left/right shoulder–ear asymmetry above which shoulders are uneven
pub const SHOULDER_ASYMMETRY_RATIO: f64 = 0.2;

/// Smallest calibration baseline accepted
pub const MIN_CALIBRATION_BASELINE: f64 = 1e-6;

/// Default EMA alpha for per-frame smoothing
pub const DEFAULT_SMOOTHING_ALPHA: f64 = 0.4;

/// Default minimum landmark visibility
pub const DEFAULT_MIN_VISIBILITY: f64 = 0.5;

/// Default diagnostic capture length (ms)
pub const DEFAULT_DIAGNOSTIC_DURATION_MS: f64 = 15_000.0;

/// Longest diagnostic capture accepted (ms)
pub const MAX_DIAGNOSTIC_DURATION_MS: f64 = 120_000.0;

//! Per-performer session: owns every piece of rolling state and runs the
//! per-frame pipeline.

use serde::Serialize;
use tracing::debug;

use crate::advice::select_advice;
use crate::config::EngineConfig;
use crate::diagnostic::{DiagnosticCapture, DiagnosticLogEntry, DiagnosticReport};
use crate::elbow::{relative_elbow_height, ElbowResult};
use crate::error::EngineError;
use crate::geometry::{angle_between3, ema, round_to};
use crate::pose::{BowingLandmarks, PoseFrame};
use crate::record::{FrameOutcome, FrameOutput, MetricsRecord, SkipReason};
use crate::shoulder::{evaluate_shoulder, ShoulderResult, ShoulderSides};
use crate::straightness::analyze_straightness;
use crate::trail::{TrailSample, WristTrail};
use crate::zone::{
    classify_extension, compute_bow_zone, compute_distribution_percent, extension_ratio,
    BowDistribution, BowZoneResult,
};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Smoothed {
    extension: Option<f64>,
    elbow: Option<f64>,
    left_ear_gap: Option<f64>,
    right_ear_gap: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureStatus {
    pub started_at_ms: f64,
    pub duration_ms: f64,
    pub remaining_ms: f64,
    pub frames: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub frames_processed: u64,
    pub trail_len: usize,
    pub calibrated: bool,
    pub baseline: Option<f64>,
    pub last_timestamp_ms: Option<f64>,
    pub capture: Option<CaptureStatus>,
}

/// Rolling state for one performer. Nothing here is shared between sessions.
#[derive(Debug, Clone)]
pub struct BowingSession {
    config: EngineConfig,
    trail: WristTrail,
    distribution: BowDistribution,
    distribution_window_start: Option<f64>,
    smoothed: Smoothed,
    baseline: Option<f64>,
    last_timestamp: Option<f64>,
    last_record: Option<MetricsRecord>,
    capture: Option<DiagnosticCapture>,
    frames_processed: u64,
}

impl BowingSession {
    pub fn new(config: EngineConfig) -> Self {
        let trail = WristTrail::new(config.trail.capacity);
        Self {
            config,
            trail,
            distribution: BowDistribution::default(),
            distribution_window_start: None,
            smoothed: Smoothed::default(),
            baseline: None,
            last_timestamp: None,
            last_record: None,
            capture: None,
            frames_processed: 0,
        }
    }

    /// Validates the config before building the session.
    pub fn try_new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn baseline(&self) -> Option<f64> {
        self.baseline
    }

    pub fn last_record(&self) -> Option<&MetricsRecord> {
        self.last_record.as_ref()
    }

    pub fn is_capturing(&self) -> bool {
        self.capture.is_some()
    }

    pub fn process_frame(&mut self, frame: &PoseFrame) -> FrameOutcome {
        let ts = frame.timestamp_ms;
        if self.last_timestamp.is_some_and(|last| ts <= last) || !ts.is_finite() {
            debug!(timestamp_ms = ts, "frame skipped: stale timestamp");
            return FrameOutcome::Skipped {
                reason: SkipReason::StaleTimestamp,
            };
        }
        self.last_timestamp = Some(ts);

        let Some(landmarks) = frame.extract(self.config.pose.min_visibility) else {
            debug!(timestamp_ms = ts, "frame skipped: bowing arm not visible");
            return FrameOutcome::Skipped {
                reason: SkipReason::MissingLandmarks,
            };
        };

        let record = self.evaluate(ts, &landmarks);
        let advice = select_advice(&record);

        if let Some(capture) = self.capture.as_mut() {
            capture.push(DiagnosticLogEntry::from_record(&record, self.baseline.is_some()));
        }
        self.frames_processed += 1;
        self.last_record = Some(record.clone());

        FrameOutcome::Processed(FrameOutput {
            metrics: record,
            advice,
        })
    }

    fn evaluate(&mut self, ts: f64, lm: &BowingLandmarks) -> MetricsRecord {
        let alpha = self.config.smoothing.alpha;

        self.trail
            .push(TrailSample::new(lm.right_wrist.x, lm.right_wrist.y, ts));
        let straightness = analyze_straightness(self.trail.as_slice(), &self.config.straightness);

        let bow_zone = match extension_ratio(
            lm.right_shoulder,
            lm.right_elbow,
            lm.right_wrist,
            &self.config.zone,
        ) {
            Some(raw) => {
                let ratio = ema(self.smoothed.extension, raw, alpha);
                self.smoothed.extension = Some(ratio);
                BowZoneResult {
                    zone: classify_extension(ratio, &self.config.zone),
                    extension_ratio: round_to(ratio, 2),
                    elbow_angle: round_to(
                        angle_between3(lm.right_shoulder, lm.right_elbow, lm.right_wrist),
                        1,
                    ),
                }
            }
            None => compute_bow_zone(
                lm.right_shoulder,
                lm.right_elbow,
                lm.right_wrist,
                &self.config.zone,
            ),
        };

        self.roll_distribution_window(ts);
        self.distribution.record(bow_zone.zone);
        let distribution = compute_distribution_percent(&self.distribution, &self.config.zone);

        let raw_elbow = relative_elbow_height(
            lm.right_shoulder,
            lm.right_elbow,
            lm.right_hip,
            &self.config.elbow,
        );
        let elbow_height = ema(self.smoothed.elbow, raw_elbow, alpha);
        self.smoothed.elbow = Some(elbow_height);
        let elbow = ElbowResult::from_relative(elbow_height, &self.config.elbow);

        let shoulder = self.evaluate_shoulders(lm);

        MetricsRecord {
            timestamp_ms: ts,
            straightness,
            distribution,
            bow_zone,
            elbow,
            shoulder,
        }
    }

    fn evaluate_shoulders(&mut self, lm: &BowingLandmarks) -> ShoulderResult {
        let (Some(left_shoulder), Some(left_ear), Some(right_ear)) =
            (lm.left_shoulder, lm.left_ear, lm.right_ear)
        else {
            return if self.baseline.is_some() {
                ShoulderResult::not_visible()
            } else {
                ShoulderResult::pending()
            };
        };

        let alpha = self.config.smoothing.alpha;
        let raw = ShoulderSides::measure(left_shoulder, left_ear, lm.right_shoulder, right_ear);
        let sides = ShoulderSides {
            left: ema(self.smoothed.left_ear_gap, raw.left, alpha),
            right: ema(self.smoothed.right_ear_gap, raw.right, alpha),
        };
        self.smoothed.left_ear_gap = Some(sides.left);
        self.smoothed.right_ear_gap = Some(sides.right);

        evaluate_shoulder(sides, self.baseline, &self.config.shoulder)
    }

    fn roll_distribution_window(&mut self, ts: f64) {
        match self.distribution_window_start {
            Some(start) if ts - start < self.config.zone.distribution_window_ms => {}
            Some(_) => {
                debug!(timestamp_ms = ts, "distribution window rolled");
                self.distribution.reset();
                self.distribution_window_start = Some(ts);
            }
            None => self.distribution_window_start = Some(ts),
        }
    }

    /// Records the current smoothed mean shoulder–ear distance as the relaxed baseline.
    pub fn calibrate(&mut self) -> Result<f64, EngineError> {
        let (Some(left), Some(right)) = (self.smoothed.left_ear_gap, self.smoothed.right_ear_gap)
        else {
            debug!("calibration rejected: shoulders and ears not seen yet");
            return Err(EngineError::CalibrationUnavailable);
        };
        let baseline = (left + right) / 2.0;
        if !(baseline >= self.config.shoulder.min_baseline) {
            debug!(baseline, "calibration rejected: degenerate baseline");
            return Err(EngineError::CalibrationUnavailable);
        }
        self.baseline = Some(baseline);
        debug!(baseline, "shoulder baseline calibrated");
        Ok(baseline)
    }

    /// Clears every piece of rolling state at once, including any running capture.
    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
        debug!("session reset");
    }

    pub fn status(&self, now_ms: f64) -> SessionStatus {
        SessionStatus {
            frames_processed: self.frames_processed,
            trail_len: self.trail.len(),
            calibrated: self.baseline.is_some(),
            baseline: self.baseline,
            last_timestamp_ms: self.last_timestamp,
            capture: self.capture.as_ref().map(|c| CaptureStatus {
                started_at_ms: c.started_at_ms(),
                duration_ms: c.duration_ms(),
                remaining_ms: c.remaining_ms(now_ms),
                frames: c.frame_count(),
            }),
        }
    }

    pub fn start_capture(&mut self, now_ms: f64, duration_ms: f64) -> Result<(), EngineError> {
        if self.capture.is_some() {
            return Err(EngineError::CaptureAlreadyActive);
        }
        let max_ms = self.config.diagnostic.max_duration_ms;
        if !(duration_ms > 0.0 && duration_ms <= max_ms) {
            return Err(EngineError::InvalidCaptureDuration {
                duration_ms,
                max_ms,
            });
        }
        self.capture = Some(DiagnosticCapture::new(now_ms, duration_ms));
        debug!(started_at_ms = now_ms, duration_ms, "diagnostic capture started");
        Ok(())
    }

    /// Drops the running capture and its log. Returns whether one was running.
    pub fn cancel_capture(&mut self) -> bool {
        let cancelled = self.capture.take().is_some();
        if cancelled {
            debug!("diagnostic capture cancelled");
        }
        cancelled
    }

    pub fn finish_capture(&mut self) -> Option<DiagnosticReport> {
        let capture = self.capture.take()?;
        debug!(frames = capture.frame_count(), "diagnostic capture finished");
        Some(capture.into_report(&self.config))
    }

    pub fn capture_expired(&self, now_ms: f64) -> bool {
        self.capture.as_ref().is_some_and(|c| c.is_expired(now_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{
        PoseFrameBuilder, LEFT_EAR, LEFT_SHOULDER, RIGHT_EAR, RIGHT_ELBOW, RIGHT_HIP,
        RIGHT_SHOULDER, RIGHT_WRIST,
    };
    use crate::record::Status;
    use crate::shoulder::ShoulderLabel;
    use crate::zone::BowZone;

    fn upper_body(wrist_x: f64, ear_y: f64) -> PoseFrameBuilder {
        PoseFrameBuilder::new()
            .set(LEFT_SHOULDER, 0.6, 0.3)
            .set(RIGHT_SHOULDER, 0.4, 0.3)
            .set(LEFT_EAR, 0.58, ear_y)
            .set(RIGHT_EAR, 0.42, ear_y)
            .set(RIGHT_ELBOW, 0.35, 0.4)
            .set(RIGHT_WRIST, wrist_x, 0.45)
            .set(RIGHT_HIP, 0.42, 0.8)
    }

    fn frame(ts: f64) -> PoseFrame {
        upper_body(0.2, 0.1).build(ts)
    }

    fn processed(outcome: FrameOutcome) -> FrameOutput {
        outcome.into_output().expect("frame processed")
    }

    #[test]
    fn duplicate_timestamps_are_skipped() {
        let mut session = BowingSession::new(EngineConfig::default());
        processed(session.process_frame(&frame(100.0)));
        assert_eq!(
            session.process_frame(&frame(100.0)),
            FrameOutcome::Skipped {
                reason: SkipReason::StaleTimestamp
            }
        );
        assert_eq!(
            session.process_frame(&frame(50.0)),
            FrameOutcome::Skipped {
                reason: SkipReason::StaleTimestamp
            }
        );
        assert_eq!(session.status(0.0).frames_processed, 1);
    }

    #[test]
    fn missing_arm_is_skipped() {
        let mut session = BowingSession::new(EngineConfig::default());
        let frame = PoseFrameBuilder::new().set(RIGHT_SHOULDER, 0.4, 0.3).build(10.0);
        assert_eq!(
            session.process_frame(&frame),
            FrameOutcome::Skipped {
                reason: SkipReason::MissingLandmarks
            }
        );
        assert_eq!(session.status(0.0).trail_len, 0);
    }

    #[test]
    fn first_frames_have_no_straightness_score() {
        let mut session = BowingSession::new(EngineConfig::default());
        for i in 0..9 {
            let out = processed(session.process_frame(&frame(i as f64 * 33.0)));
            assert_eq!(out.metrics.straightness.score, None);
            assert_eq!(out.metrics.shoulder.label, ShoulderLabel::CalibrationPending);
        }
        assert_eq!(session.status(0.0).trail_len, 9);
    }

    #[test]
    fn trail_is_capped() {
        let mut session = BowingSession::new(EngineConfig::default());
        for i in 0..100 {
            session.process_frame(&frame(i as f64));
        }
        assert_eq!(session.status(0.0).trail_len, 60);
    }

    #[test]
    fn calibrate_needs_both_ears() {
        let mut session = BowingSession::new(EngineConfig::default());
        assert_eq!(session.calibrate(), Err(EngineError::CalibrationUnavailable));

        let arm_only = PoseFrameBuilder::new()
            .set(RIGHT_SHOULDER, 0.4, 0.3)
            .set(RIGHT_ELBOW, 0.35, 0.4)
            .set(RIGHT_WRIST, 0.2, 0.45)
            .build(0.0);
        processed(session.process_frame(&arm_only));
        assert_eq!(session.calibrate(), Err(EngineError::CalibrationUnavailable));
    }

    #[test]
    fn raised_shoulders_after_calibration() {
        let mut session = BowingSession::new(EngineConfig::default());
        processed(session.process_frame(&frame(0.0)));
        let baseline = session.calibrate().expect("calibrated");
        assert!(baseline > 0.0);

        // Ears drop to within half the relaxed distance; smoothing converges.
        let mut last = None;
        for i in 1..30 {
            last = Some(processed(
                session.process_frame(&upper_body(0.2, 0.2).build(i as f64 * 33.0)),
            ));
        }
        let shoulder = last.expect("frames").metrics.shoulder;
        assert_eq!(shoulder.status, Status::Bad);
        assert_eq!(shoulder.label, ShoulderLabel::Raised);
        assert!(shoulder.tension > 25.0);
    }

    #[test]
    fn distribution_window_rolls_on_timestamps() {
        let mut session = BowingSession::new(EngineConfig::default());
        // Fully extended arm: tip.
        let tip = |ts| {
            PoseFrameBuilder::new()
                .set(RIGHT_SHOULDER, 0.6, 0.3)
                .set(RIGHT_ELBOW, 0.4, 0.3)
                .set(RIGHT_WRIST, 0.2, 0.3)
                .build(ts)
        };
        for i in 0..5 {
            let out = processed(session.process_frame(&tip(i as f64 * 100.0)));
            assert_eq!(out.metrics.bow_zone.zone, BowZone::Tip);
        }
        let out = processed(session.process_frame(&tip(10_000.0)));
        assert_eq!(out.metrics.distribution.tip, 100);
        assert_eq!(session.distribution.total(), 1);
    }

    #[test]
    fn reset_clears_everything() {
        let mut session = BowingSession::new(EngineConfig::default());
        for i in 0..20 {
            session.process_frame(&frame(i as f64 * 10.0));
        }
        session.calibrate().expect("calibrated");
        session.start_capture(0.0, 15_000.0).expect("started");
        session.reset();

        let status = session.status(0.0);
        assert_eq!(status.frames_processed, 0);
        assert_eq!(status.trail_len, 0);
        assert!(!status.calibrated);
        assert!(status.capture.is_none());
        assert_eq!(status.last_timestamp_ms, None);
        assert_eq!(session.distribution.total(), 0);
        // Earlier timestamps are accepted again after a reset.
        processed(session.process_frame(&frame(0.0)));
    }

    #[test]
    fn capture_lifecycle() {
        let mut session = BowingSession::new(EngineConfig::default());
        assert_eq!(session.finish_capture(), None);

        session.start_capture(1_000.0, 15_000.0).expect("started");
        assert_eq!(
            session.start_capture(1_000.0, 15_000.0),
            Err(EngineError::CaptureAlreadyActive)
        );
        for i in 0..12 {
            session.process_frame(&frame(i as f64 * 33.0));
        }
        assert!(!session.capture_expired(15_999.0));
        assert!(session.capture_expired(16_000.0));
        assert_eq!(session.status(6_000.0).capture.map(|c| c.frames), Some(12));

        let report = session.finish_capture().expect("report");
        let summary = report.report().expect("completed");
        assert_eq!(summary.frame_count, 12);
        assert_eq!(session.finish_capture(), None);
    }

    #[test]
    fn cancel_discards_log() {
        let mut session = BowingSession::new(EngineConfig::default());
        session.start_capture(0.0, 5_000.0).expect("started");
        session.process_frame(&frame(0.0));
        assert!(session.cancel_capture());
        assert!(!session.cancel_capture());
        assert_eq!(session.finish_capture(), None);
    }

    #[test]
    fn capture_without_pose_reports_no_pose() {
        let mut session = BowingSession::new(EngineConfig::default());
        session.start_capture(0.0, 5_000.0).expect("started");
        assert_eq!(session.finish_capture(), Some(DiagnosticReport::NoPoseDetected));
    }

    #[test]
    fn capture_duration_is_bounded() {
        let mut session = BowingSession::new(EngineConfig::default());
        assert!(matches!(
            session.start_capture(0.0, 0.0),
            Err(EngineError::InvalidCaptureDuration { .. })
        ));
        assert!(matches!(
            session.start_capture(0.0, 500_000.0),
            Err(EngineError::InvalidCaptureDuration { .. })
        ));
    }

    #[test]
    fn try_new_rejects_bad_config() {
        let mut config = EngineConfig::default();
        config.smoothing.alpha = 0.0;
        assert!(matches!(
            BowingSession::try_new(config),
            Err(EngineError::InvalidConfig(_))
        ));
    }
}

use std::f64::consts::PI;

use bowing_metrics::pose::{
    PoseFrameBuilder, RIGHT_ELBOW, RIGHT_HIP, RIGHT_SHOULDER, RIGHT_WRIST,
};
use bowing_metrics::{BowingSession, DiagnosticReport, EngineConfig, FrameOutcome, Status};

fn arm(wrist_x: f64, wrist_y: f64, elbow_y: f64) -> PoseFrameBuilder {
    PoseFrameBuilder::new()
        .set(RIGHT_SHOULDER, 0.4, 0.3)
        .set(RIGHT_ELBOW, 0.45, elbow_y)
        .set(RIGHT_WRIST, wrist_x, wrist_y)
        .set(RIGHT_HIP, 0.42, 0.8)
}

#[test]
fn empty_capture_reports_no_pose() {
    let mut session = BowingSession::new(EngineConfig::default());
    session.start_capture(0.0, 15_000.0).expect("start");

    // Only frames without a visible arm arrive.
    for i in 0..10 {
        let frame = PoseFrameBuilder::new().build(i as f64 * 33.0);
        assert!(matches!(
            session.process_frame(&frame),
            FrameOutcome::Skipped { .. }
        ));
    }

    let report = session.finish_capture().expect("capture was active");
    assert_eq!(report, DiagnosticReport::NoPoseDetected);
}

#[test]
fn low_elbow_capture_flags_elbow() {
    let mut session = BowingSession::new(EngineConfig::default());
    session.start_capture(0.0, 15_000.0).expect("start");

    for i in 0..15 {
        let frame = arm(0.55, 0.65, 0.6).build(i as f64 * 33.0);
        session.process_frame(&frame);
    }

    let report = session.finish_capture().expect("capture was active");
    let summary = report.report().expect("completed report");
    assert_eq!(summary.frame_count, 15);
    assert!((summary.elbow.mean_relative_height - 0.6).abs() < 1e-9);
    assert_eq!(summary.elbow.status, Status::Bad);
    assert_eq!(summary.elbow.label.label(), "too low");
    assert_eq!(summary.elbow.score, 30);
}

#[test]
fn zig_zag_bowing_is_never_rated_good() {
    let mut session = BowingSession::new(EngineConfig::default());
    session.start_capture(0.0, 15_000.0).expect("start");

    for i in 0..100 {
        let phi = -PI / 2.0 + i as f64 * 2.0 * PI / 20.0;
        let x = 0.5 + 0.15 * phi.sin();
        let y = 0.5 - 0.2 * phi.cos();
        session.process_frame(&arm(x, y, 0.45).build(i as f64 * 33.0));
    }

    let report = session.finish_capture().expect("capture was active");
    let summary = report.report().expect("completed report");
    assert_eq!(summary.frame_count, 100);
    assert_eq!(summary.straightness.status, Status::Bad);
    assert_ne!(summary.overall.status, Status::Good);
    assert!(summary.overall.score < 80);
}

#[test]
fn report_serializes_with_result_tag() {
    let mut session = BowingSession::new(EngineConfig::default());
    session.start_capture(0.0, 15_000.0).expect("start");
    for i in 0..12 {
        session.process_frame(&arm(0.3 + i as f64 * 0.03, 0.5, 0.45).build(i as f64 * 33.0));
    }
    let report = session.finish_capture().expect("capture was active");
    let json = serde_json::to_value(&report).expect("serialize");
    assert_eq!(json["result"], "completed");
    assert_eq!(json["frameCount"], 12);
    assert!(json["overall"]["score"].is_u64());
    assert!(json["overall"]["commentary"].is_string());
}

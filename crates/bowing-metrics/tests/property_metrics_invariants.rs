use proptest::prelude::*;

use bowing_metrics::config::{ShoulderConfig, StraightnessConfig, ZoneConfig};
use bowing_metrics::geometry::{angle_between3, ema, Point2D};
use bowing_metrics::shoulder::{evaluate_shoulder, ShoulderLabel, ShoulderSides};
use bowing_metrics::straightness::analyze_straightness;
use bowing_metrics::trail::TrailSample;
use bowing_metrics::zone::{classify_extension, compute_distribution_percent, BowDistribution, BowZone};
use bowing_metrics::Status;

fn zone_rank(zone: BowZone) -> u8 {
    match zone {
        BowZone::Frog => 0,
        BowZone::Middle => 1,
        BowZone::Tip => 2,
    }
}

proptest! {
    #[test]
    fn pt_short_trails_have_no_score(
        points in prop::collection::vec((0.0_f64..1.0, 0.0_f64..1.0), 0..10)
    ) {
        let trail: Vec<TrailSample> = points
            .iter()
            .enumerate()
            .map(|(i, (x, y))| TrailSample::new(*x, *y, i as f64 * 33.0))
            .collect();
        let result = analyze_straightness(&trail, &StraightnessConfig::default());
        prop_assert_eq!(result.score, None);
        prop_assert_eq!(result.status, Status::Good);
    }

    #[test]
    fn pt_straightness_score_in_range(
        points in prop::collection::vec((0.0_f64..1.0, 0.0_f64..1.0), 10..60)
    ) {
        let trail: Vec<TrailSample> = points
            .iter()
            .enumerate()
            .map(|(i, (x, y))| TrailSample::new(*x, *y, i as f64 * 33.0))
            .collect();
        let result = analyze_straightness(&trail, &StraightnessConfig::default());
        if let Some(score) = result.score {
            prop_assert!(score <= 100);
            prop_assert!(result.curvature.is_some_and(|c| c >= 0.0));
        }
    }

    #[test]
    fn pt_distribution_percent_sums_to_100(tip in 0_u32..5000, middle in 0_u32..5000, frog in 0_u32..5000) {
        let counts = BowDistribution { tip, middle, frog };
        let p = compute_distribution_percent(&counts, &ZoneConfig::default());
        prop_assert_eq!(p.tip as u32 + p.middle as u32 + p.frog as u32, 100);
    }

    #[test]
    fn pt_no_baseline_means_no_tension(left in 0.0_f64..1.0, right in 0.0_f64..1.0) {
        let result = evaluate_shoulder(ShoulderSides { left, right }, None, &ShoulderConfig::default());
        prop_assert_eq!(result.tension, 0.0);
        prop_assert_eq!(result.status, Status::Good);
        prop_assert_eq!(result.label, ShoulderLabel::CalibrationPending);
    }

    #[test]
    fn pt_tension_is_never_negative(
        left in 0.0_f64..1.0,
        right in 0.0_f64..1.0,
        baseline in 0.01_f64..1.0,
    ) {
        let result = evaluate_shoulder(
            ShoulderSides { left, right },
            Some(baseline),
            &ShoulderConfig::default(),
        );
        prop_assert!(result.tension >= 0.0);
    }

    #[test]
    fn pt_zone_is_monotone_in_extension(a in 0.0_f64..1.0, b in 0.0_f64..1.0) {
        let cfg = ZoneConfig::default();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(zone_rank(classify_extension(lo, &cfg)) <= zone_rank(classify_extension(hi, &cfg)));
    }

    #[test]
    fn pt_angle_is_within_0_and_180(
        ax in -1.0_f64..1.0, ay in -1.0_f64..1.0,
        bx in -1.0_f64..1.0, by in -1.0_f64..1.0,
        cx in -1.0_f64..1.0, cy in -1.0_f64..1.0,
    ) {
        let angle = angle_between3(Point2D::new(ax, ay), Point2D::new(bx, by), Point2D::new(cx, cy));
        prop_assert!((0.0..=180.0).contains(&angle));
    }

    #[test]
    fn pt_ema_stays_between_prev_and_curr(prev in -10.0_f64..10.0, curr in -10.0_f64..10.0, alpha in 0.01_f64..1.0) {
        let v = ema(Some(prev), curr, alpha);
        prop_assert!(v >= prev.min(curr) - 1e-9 && v <= prev.max(curr) + 1e-9);
    }
}

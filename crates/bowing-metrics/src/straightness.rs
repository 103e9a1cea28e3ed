//! Bow-stroke straightness.
//!
//! The wrist trail is split into strokes at horizontal direction reversals and
//! the most recent stroke is scored by how far its points stray from a
//! least-squares line, relative to the stroke's length.
//!
//! Strokes are re-derived from the raw trail on every evaluation; the trail is
//! capped, so the cost stays bounded.

use serde::Serialize;

use crate::config::StraightnessConfig;
use crate::record::Status;
use crate::trail::TrailSample;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StraightnessResult {
    /// 0-100, `None` while there is not enough motion to judge
    pub score: Option<u8>,
    /// RMSE as a percentage of stroke length
    pub curvature: Option<f64>,
    pub status: Status,
}

impl StraightnessResult {
    /// The no-opinion result: no score, status good.
    pub fn insufficient() -> Self {
        Self {
            score: None,
            curvature: None,
            status: Status::Good,
        }
    }
}

/// Strokes found in a trail. `closed` strokes all meet the minimum sample
/// count; `pending` is whatever follows the last reversal.
#[derive(Debug, Clone, PartialEq)]
pub struct Strokes<'a> {
    pub closed: Vec<&'a [TrailSample]>,
    pub pending: &'a [TrailSample],
}

impl<'a> Strokes<'a> {
    /// Most recent stroke with at least `min_samples` samples.
    pub fn latest(&self, min_samples: usize) -> Option<&'a [TrailSample]> {
        if self.pending.len() >= min_samples {
            return Some(self.pending);
        }
        self.closed.last().copied()
    }
}

/// Splits a trail at horizontal direction reversals.
///
/// Steps with |dx| below the noise floor join the current stroke without
/// changing its direction. A new stroke starts at the reversal sample, so
/// adjacent strokes share their turning point.
pub fn segment_strokes<'a>(trail: &'a [TrailSample], cfg: &StraightnessConfig) -> Strokes<'a> {
    let mut closed = Vec::new();
    let mut start = 0;
    let mut last_direction = 0.0_f64;

    for i in 1..trail.len() {
        let dx = trail[i].x - trail[i - 1].x;
        if dx.abs() < cfg.noise_floor {
            continue;
        }
        let direction = dx.signum();
        if last_direction != 0.0 && direction != last_direction {
            let stroke = &trail[start..i];
            if stroke.len() >= cfg.min_stroke_samples {
                closed.push(stroke);
            }
            start = i - 1;
        }
        last_direction = direction;
    }

    Strokes {
        closed,
        pending: trail.get(start..).unwrap_or(&[]),
    }
}

/// RMSE of the samples from their least-squares line (y on x), measured
/// perpendicular to the line. A near-vertical stroke has no usable slope, so
/// its spread of x around the mean is used instead.
pub fn line_fit_rmse(stroke: &[TrailSample], degenerate_epsilon: f64) -> f64 {
    if stroke.is_empty() {
        return 0.0;
    }
    let n = stroke.len() as f64;
    let (mut sx, mut sy, mut sxx, mut sxy) = (0.0, 0.0, 0.0, 0.0);
    for p in stroke {
        sx += p.x;
        sy += p.y;
        sxx += p.x * p.x;
        sxy += p.x * p.y;
    }

    let denom = n * sxx - sx * sx;
    let sum_sq: f64 = if denom.abs() < degenerate_epsilon {
        let mean_x = sx / n;
        stroke.iter().map(|p| (p.x - mean_x).powi(2)).sum()
    } else {
        let slope = (n * sxy - sx * sy) / denom;
        let intercept = (sy - slope * sx) / n;
        let norm = (slope * slope + 1.0).sqrt();
        stroke
            .iter()
            .map(|p| ((p.y - (slope * p.x + intercept)) / norm).powi(2))
            .sum()
    };

    (sum_sq / n).sqrt()
}

pub fn curvature_status(curvature: f64, cfg: &StraightnessConfig) -> Status {
    if curvature > cfg.curvature_bad {
        Status::Bad
    } else if curvature > cfg.curvature_warn {
        Status::Warn
    } else {
        Status::Good
    }
}

pub fn curvature_score(curvature: f64, cfg: &StraightnessConfig) -> u8 {
    (100.0 - curvature * cfg.curvature_penalty)
        .clamp(0.0, 100.0)
        .round() as u8
}

pub fn analyze_straightness(trail: &[TrailSample], cfg: &StraightnessConfig) -> StraightnessResult {
    if trail.len() < cfg.min_trail_samples {
        return StraightnessResult::insufficient();
    }

    let strokes = segment_strokes(trail, cfg);
    let Some(stroke) = strokes.latest(cfg.min_stroke_samples) else {
        return StraightnessResult::insufficient();
    };

    let (first, last) = (stroke[0], stroke[stroke.len() - 1]);
    let length = ((last.x - first.x).powi(2) + (last.y - first.y).powi(2)).sqrt();
    if length < cfg.min_stroke_length {
        return StraightnessResult::insufficient();
    }

    let rmse = line_fit_rmse(stroke, cfg.degenerate_epsilon);
    let curvature = rmse / length * 100.0;

    StraightnessResult {
        score: Some(curvature_score(curvature, cfg)),
        curvature: Some(curvature),
        status: curvature_status(curvature, cfg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> StraightnessConfig {
        StraightnessConfig::default()
    }

    fn line(n: usize, x0: f64, step: f64) -> Vec<TrailSample> {
        (0..n)
            .map(|i| {
                let x = x0 + step * i as f64;
                TrailSample::new(x, 0.5 + 0.1 * x, i as f64 * 33.0)
            })
            .collect()
    }

    #[test]
    fn short_trail_has_no_score() {
        let trail = line(9, 0.3, 0.03);
        let result = analyze_straightness(&trail, &cfg());
        assert_eq!(result, StraightnessResult::insufficient());
    }

    #[test]
    fn straight_stroke_scores_full() {
        let trail = line(12, 0.3, 0.03);
        let result = analyze_straightness(&trail, &cfg());
        assert_eq!(result.score, Some(100));
        assert_eq!(result.status, Status::Good);
        assert!(result.curvature.unwrap() < 1e-6);
    }

    #[test]
    fn arc_stroke_is_bad() {
        // 20 points on a circular arc: chord ~0.35, sagitta ~0.10
        let span = std::f64::consts::PI - 1.0;
        let trail: Vec<TrailSample> = (0..20)
            .map(|k| {
                let theta = std::f64::consts::PI + 0.5 + span * k as f64 / 19.0;
                TrailSample::new(0.5 + 0.2 * theta.cos(), 0.8 + 0.2 * theta.sin(), k as f64)
            })
            .collect();
        let result = analyze_straightness(&trail, &cfg());
        assert_eq!(result.status, Status::Bad);
        assert!(result.curvature.unwrap() > 5.0);
        assert!(result.score.unwrap() < 75);
    }

    #[test]
    fn tiny_stroke_is_not_trusted() {
        // 12 samples, total travel 0.022 < 0.03
        let trail = line(12, 0.5, 0.002);
        assert_eq!(
            analyze_straightness(&trail, &cfg()),
            StraightnessResult::insufficient()
        );
    }

    #[test]
    fn reversal_splits_strokes_and_drops_short_ones() {
        let mut trail = Vec::new();
        // 5 samples right (too short to keep), then 10 left, then 12 right
        let mut x = 0.3;
        let mut t = 0.0;
        for _ in 0..5 {
            trail.push(TrailSample::new(x, 0.5, t));
            x += 0.02;
            t += 1.0;
        }
        for _ in 0..10 {
            x -= 0.02;
            trail.push(TrailSample::new(x, 0.5, t));
            t += 1.0;
        }
        for _ in 0..12 {
            x += 0.02;
            trail.push(TrailSample::new(x, 0.5, t));
            t += 1.0;
        }

        let strokes = segment_strokes(&trail, &cfg());
        assert_eq!(strokes.closed.len(), 1);
        assert_eq!(strokes.closed[0].len(), 11);
        assert_eq!(strokes.pending.len(), 13);
        assert_eq!(strokes.pending[0], strokes.closed[0][10]);
    }

    #[test]
    fn noise_steps_do_not_flip_direction() {
        let mut trail = line(6, 0.3, 0.02);
        let last = *trail.last().unwrap();
        // jitter backwards below the noise floor
        trail.push(TrailSample::new(last.x - 0.001, last.y, last.t + 1.0));
        trail.push(TrailSample::new(last.x + 0.02, last.y, last.t + 2.0));
        let strokes = segment_strokes(&trail, &cfg());
        assert!(strokes.closed.is_empty());
        assert_eq!(strokes.pending.len(), trail.len());
    }

    #[test]
    fn falls_back_to_last_closed_stroke() {
        let mut trail = line(12, 0.3, 0.03);
        let last = *trail.last().unwrap();
        for i in 1..=3 {
            trail.push(TrailSample::new(last.x - 0.03 * i as f64, last.y, last.t + i as f64));
        }
        let strokes = segment_strokes(&trail, &cfg());
        let latest = strokes.latest(8).expect("closed stroke");
        assert_eq!(latest.len(), 12);
    }

    #[test]
    fn vertical_stroke_uses_x_spread() {
        let stroke: Vec<TrailSample> = (0..10)
            .map(|i| TrailSample::new(0.5, 0.1 + 0.05 * i as f64, i as f64))
            .collect();
        let rmse = line_fit_rmse(&stroke, 1e-10);
        assert!(rmse.abs() < 1e-12);
    }

    #[test]
    fn curvature_thresholds() {
        let c = cfg();
        assert_eq!(curvature_status(1.0, &c), Status::Good);
        assert_eq!(curvature_status(2.0, &c), Status::Good);
        assert_eq!(curvature_status(3.5, &c), Status::Warn);
        assert_eq!(curvature_status(5.1, &c), Status::Bad);
        assert_eq!(curvature_score(4.0, &c), 80);
        assert_eq!(curvature_score(30.0, &c), 0);
    }
}

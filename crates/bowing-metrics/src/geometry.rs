//! Planar geometry helpers over normalized image coordinates.

use serde::{Deserialize, Serialize};

/// Normalized image-space point, both axes in [0,1], y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        distance(*self, *other)
    }
}

pub fn distance(a: Point2D, b: Point2D) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Angle at vertex `b` between rays b→a and b→c, in degrees.
///
/// Returns 0 when either ray has zero length. The cosine is clamped to
/// [-1, 1] before `acos` so floating-point overshoot cannot produce NaN.
pub fn angle_between3(a: Point2D, b: Point2D, c: Point2D) -> f64 {
    let (bax, bay) = (a.x - b.x, a.y - b.y);
    let (bcx, bcy) = (c.x - b.x, c.y - b.y);
    let len_ba = (bax * bax + bay * bay).sqrt();
    let len_bc = (bcx * bcx + bcy * bcy).sqrt();
    if len_ba == 0.0 || len_bc == 0.0 {
        return 0.0;
    }
    let cos = ((bax * bcx + bay * bcy) / (len_ba * len_bc)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Exponential moving average step. A cold start (`prev == None`) returns `curr`.
pub fn ema(prev: Option<f64>, curr: f64, alpha: f64) -> f64 {
    match prev {
        Some(p) => p + alpha * (curr - p),
        None => curr,
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let d = distance(Point2D::new(0.0, 0.0), Point2D::new(0.3, 0.4));
        assert!((d - 0.5).abs() < 1e-12);
    }

    #[test]
    fn right_angle_at_vertex() {
        let angle = angle_between3(
            Point2D::new(1.0, 0.0),
            Point2D::new(0.0, 0.0),
            Point2D::new(0.0, 1.0),
        );
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn collinear_rays_do_not_produce_nan() {
        let a = Point2D::new(0.1, 0.1);
        let b = Point2D::new(0.2, 0.2);
        let c = Point2D::new(0.3, 0.3);
        let angle = angle_between3(a, b, c);
        assert!(angle.is_finite());
        assert!((angle - 180.0).abs() < 1e-6);
    }

    #[test]
    fn zero_length_ray_gives_zero() {
        let p = Point2D::new(0.5, 0.5);
        assert_eq!(angle_between3(p, p, Point2D::new(0.9, 0.1)), 0.0);
    }

    #[test]
    fn ema_cold_start_and_step() {
        assert_eq!(ema(None, 0.8, 0.3), 0.8);
        let next = ema(Some(1.0), 2.0, 0.25);
        assert!((next - 1.25).abs() < 1e-12);
        assert_eq!(ema(Some(1.0), 2.0, 1.0), 2.0);
    }

    #[test]
    fn round_to_two_decimals() {
        assert_eq!(round_to(0.456, 2), 0.46);
        assert_eq!(round_to(-0.154, 2), -0.15);
    }
}

use serde_json::{json, Value};

const LEFT_EAR: usize = 7;
const RIGHT_EAR: usize = 8;
const LEFT_SHOULDER: usize = 11;
const RIGHT_SHOULDER: usize = 12;
const RIGHT_ELBOW: usize = 14;
const RIGHT_WRIST: usize = 16;
const RIGHT_HIP: usize = 24;

/// A 33-landmark frame body. Unset landmarks have zero visibility.
pub fn frame(ts: f64, points: &[(usize, f64, f64)]) -> Value {
    let mut landmarks = vec![json!({"x": 0.0, "y": 0.0, "visibility": 0.0}); 33];
    for (index, x, y) in points {
        landmarks[*index] = json!({"x": x, "y": y, "visibility": 0.99});
    }
    json!({"timestampMs": ts, "landmarks": landmarks})
}

/// Relaxed upper body with the wrist at `wrist_x`.
pub fn upper_body(ts: f64, wrist_x: f64) -> Value {
    frame(
        ts,
        &[
            (LEFT_SHOULDER, 0.6, 0.3),
            (RIGHT_SHOULDER, 0.4, 0.3),
            (LEFT_EAR, 0.58, 0.1),
            (RIGHT_EAR, 0.42, 0.1),
            (RIGHT_ELBOW, 0.35, 0.4),
            (RIGHT_WRIST, wrist_x, 0.45),
            (RIGHT_HIP, 0.42, 0.8),
        ],
    )
}

/// Only the bowing arm is visible.
pub fn arm_only(ts: f64) -> Value {
    frame(
        ts,
        &[
            (RIGHT_SHOULDER, 0.4, 0.3),
            (RIGHT_ELBOW, 0.35, 0.4),
            (RIGHT_WRIST, 0.2, 0.45),
        ],
    )
}

pub fn empty(ts: f64) -> Value {
    frame(ts, &[])
}

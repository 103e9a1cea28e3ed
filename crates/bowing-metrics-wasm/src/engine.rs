//! JS-facing session wrapper.

use bowing_metrics::diagnostic::DiagnosticReport;
use bowing_metrics::{BowingSession, EngineConfig};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::landmarks::decode_frame;

/// Result of a capture countdown check.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureTick {
    pub expired: bool,
    pub remaining_ms: f64,
    pub report: Option<DiagnosticReport>,
}

fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

/// One performer's bowing session. Create one per camera stream.
#[wasm_bindgen]
pub struct BowingEngine {
    session: BowingSession,
}

impl Default for BowingEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl BowingEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            session: BowingSession::new(EngineConfig::default()),
        }
    }

    /// Builds an engine from a partial camelCase config object; missing
    /// fields keep their defaults.
    #[wasm_bindgen(js_name = "withConfig")]
    pub fn with_config(config: JsValue) -> Result<BowingEngine, js_sys::Error> {
        let config: EngineConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| js_sys::Error::new(&e.to_string()))?;
        let session =
            BowingSession::try_new(config).map_err(|e| js_sys::Error::new(&e.to_string()))?;
        Ok(Self { session })
    }

    /// Processes one frame.
    ///
    /// `landmarks` is the flat `[x, y, visibility]` array for all pose
    /// landmarks. Returns `{ outcome: "processed", metrics, advice }` or
    /// `{ outcome: "skipped", reason }`.
    #[wasm_bindgen(js_name = "processFrame")]
    pub fn process_frame(&mut self, landmarks: &[f64], timestamp_ms: f64) -> JsValue {
        let frame = decode_frame(landmarks, timestamp_ms);
        to_js(&self.session.process_frame(&frame))
    }

    /// Records the current shoulder posture as relaxed. Returns the baseline.
    pub fn calibrate(&mut self) -> Result<f64, js_sys::Error> {
        self.session
            .calibrate()
            .map_err(|e| js_sys::Error::new(&e.to_string()))
    }

    #[wasm_bindgen(js_name = "isCalibrated")]
    pub fn is_calibrated(&self) -> bool {
        self.session.baseline().is_some()
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    #[wasm_bindgen(js_name = "startCapture")]
    pub fn start_capture(&mut self, now_ms: f64, duration_ms: f64) -> Result<(), js_sys::Error> {
        self.session
            .start_capture(now_ms, duration_ms)
            .map_err(|e| js_sys::Error::new(&e.to_string()))
    }

    #[wasm_bindgen(js_name = "cancelCapture")]
    pub fn cancel_capture(&mut self) -> bool {
        self.session.cancel_capture()
    }

    /// Ends the capture early. `null` when no capture was running.
    #[wasm_bindgen(js_name = "finishCapture")]
    pub fn finish_capture(&mut self) -> JsValue {
        match self.session.finish_capture() {
            Some(report) => to_js(&report),
            None => JsValue::NULL,
        }
    }

    #[wasm_bindgen(js_name = "isCaptureExpired")]
    pub fn is_capture_expired(&self, now_ms: f64) -> bool {
        self.session.capture_expired(now_ms)
    }

    /// Call from a wall-clock timer; finishes the capture once it expires.
    #[wasm_bindgen(js_name = "tickCapture")]
    pub fn tick_capture(&mut self, now_ms: f64) -> JsValue {
        to_js(&self.check_capture(now_ms))
    }

    pub fn status(&self, now_ms: f64) -> JsValue {
        to_js(&self.session.status(now_ms))
    }
}

impl BowingEngine {
    fn check_capture(&mut self, now_ms: f64) -> CaptureTick {
        let remaining_ms = self
            .session
            .status(now_ms)
            .capture
            .map_or(0.0, |c| c.remaining_ms);
        if self.session.capture_expired(now_ms) {
            CaptureTick {
                expired: true,
                remaining_ms: 0.0,
                report: self.session.finish_capture(),
            }
        } else {
            CaptureTick {
                expired: false,
                remaining_ms,
                report: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_finishes_expired_capture_once() {
        let mut engine = BowingEngine::new();
        engine.session.start_capture(0.0, 1_000.0).expect("start");

        let early = engine.check_capture(400.0);
        assert!(!early.expired);
        assert_eq!(early.remaining_ms, 600.0);

        let done = engine.check_capture(1_000.0);
        assert!(done.expired);
        assert_eq!(done.report, Some(DiagnosticReport::NoPoseDetected));

        let after = engine.check_capture(2_000.0);
        assert!(!after.expired);
        assert!(after.report.is_none());
    }
}

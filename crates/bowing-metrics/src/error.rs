use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid engine config: {0}")]
    InvalidConfig(String),
    #[error("calibration unavailable: no frame with both shoulders and ears yet")]
    CalibrationUnavailable,
    #[error("a diagnostic capture is already running")]
    CaptureAlreadyActive,
    #[error("invalid capture duration: {duration_ms} ms (max {max_ms} ms)")]
    InvalidCaptureDuration { duration_ms: f64, max_ms: f64 },
}

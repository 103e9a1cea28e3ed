use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bowing_metrics::EngineError;
use serde::Serialize;

use crate::sessions::SessionError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub success: bool,
    pub code: String,
    pub message: String,
    pub trace_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub is_operational: bool,
}

impl AppError {
    fn operational(status: StatusCode, code: &str, message: &str) -> Self {
        Self {
            status,
            code: code.to_string(),
            message: message.to_string(),
            is_operational: true,
        }
    }

    pub fn bad_request(code: &str, message: &str) -> Self {
        Self::operational(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn not_found(message: &str) -> Self {
        Self::operational(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn conflict(code: &str, message: &str) -> Self {
        Self::operational(StatusCode::CONFLICT, code, message)
    }

    pub fn payload_too_large(message: &str) -> Self {
        Self::operational(StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", message)
    }

    pub fn service_unavailable(code: &str, message: &str) -> Self {
        Self::operational(StatusCode::SERVICE_UNAVAILABLE, code, message)
    }

    pub fn internal(message: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR".to_string(),
            message: message.to_string(),
            is_operational: false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let exposed_message = if self.is_operational {
            self.message.clone()
        } else {
            "Internal server error".to_string()
        };

        if self.is_operational {
            tracing::warn!(status = %self.status, code = %self.code, error = %self.message, "API error");
        } else {
            tracing::error!(status = %self.status, code = %self.code, error = %self.message, "Internal API error");
        }

        (
            self.status,
            Json(ErrorBody {
                success: false,
                code: self.code,
                message: exposed_message,
                trace_id: None,
            }),
        )
            .into_response()
    }
}

impl From<EngineError> for AppError {
    fn from(value: EngineError) -> Self {
        let message = value.to_string();
        match value {
            EngineError::InvalidConfig(_) => AppError::bad_request("INVALID_ENGINE_CONFIG", &message),
            EngineError::CalibrationUnavailable => {
                AppError::conflict("CALIBRATION_UNAVAILABLE", &message)
            }
            EngineError::CaptureAlreadyActive => AppError::conflict("CAPTURE_ACTIVE", &message),
            EngineError::InvalidCaptureDuration { .. } => {
                AppError::bad_request("INVALID_CAPTURE_DURATION", &message)
            }
        }
    }
}

impl From<SessionError> for AppError {
    fn from(value: SessionError) -> Self {
        let message = value.to_string();
        match value {
            SessionError::NotFound(_) => AppError::not_found(&message),
            SessionError::LimitReached(_) => {
                AppError::service_unavailable("SESSION_LIMIT_REACHED", &message)
            }
            SessionError::NoActiveCapture => AppError::conflict("NO_ACTIVE_CAPTURE", &message),
            SessionError::NoReport => AppError::not_found(&message),
            SessionError::Engine(e) => e.into(),
        }
    }
}

pub fn ok<T: Serialize>(data: T) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data,
        }),
    )
}

pub fn created<T: Serialize>(data: T) -> impl IntoResponse {
    (
        StatusCode::CREATED,
        Json(ApiResponse {
            success: true,
            data,
        }),
    )
}

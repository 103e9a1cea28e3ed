use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let registry = state.sessions();
    Json(serde_json::json!({
        "status": "ok",
        "uptimeSecs": state.uptime_secs(),
        "sessions": {
            "active": registry.len().await,
            "capturing": registry.capturing().await,
            "max": registry.max_sessions(),
        }
    }))
}

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// Not ready while the session table is full: new practice sessions would be refused.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    let registry = state.sessions();
    if registry.len().await < registry.max_sessions() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use bowing_metrics::{EngineConfig, PoseFrame};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::MAX_BATCH_FRAMES;
use crate::extractors::{JsonBody, OptionalJsonBody};
use crate::response::{created, ok, AppError};
use crate::sessions::{self, SessionError};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_session))
        .route("/:id", get(get_session).delete(delete_session))
        .route("/:id/frames", post(process_frame))
        .route("/:id/frames/batch", post(process_frames_batch))
        .route("/:id/reset", post(reset_session))
        .route("/:id/calibrate", post(calibrate))
        .route("/:id/diagnostic/start", post(start_diagnostic))
        .route("/:id/diagnostic/cancel", post(cancel_diagnostic))
        .route("/:id/diagnostic/finish", post(finish_diagnostic))
        .route("/:id/diagnostic/report", get(get_report))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionRequest {
    /// Partial override; omitted fields keep engine defaults.
    config: Option<EngineConfig>,
}

async fn create_session(
    State(state): State<AppState>,
    OptionalJsonBody(body): OptionalJsonBody<CreateSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let config = body
        .and_then(|b| b.config)
        .unwrap_or_else(|| state.engine_config().clone());
    let registry = state.sessions();
    let entry = registry.create(config).await?;
    let view = entry.lock().await.view(registry.now_ms());
    Ok(created(view))
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let registry = state.sessions();
    let entry = registry.get(id).await?;
    let view = entry.lock().await.view(registry.now_ms());
    Ok(ok(view))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeletedResponse {
    id: Uuid,
    deleted: bool,
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.sessions().remove(id).await?;
    Ok(ok(DeletedResponse { id, deleted: true }))
}

async fn process_frame(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(frame): JsonBody<PoseFrame>,
) -> Result<impl IntoResponse, AppError> {
    let entry = state.sessions().get(id).await?;
    let outcome = entry.lock().await.process_frame(&frame);
    Ok(ok(outcome))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FrameBatchRequest {
    frames: Vec<PoseFrame>,
}

async fn process_frames_batch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    JsonBody(req): JsonBody<FrameBatchRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.frames.len() > MAX_BATCH_FRAMES {
        return Err(AppError::payload_too_large(&format!(
            "at most {MAX_BATCH_FRAMES} frames per batch"
        )));
    }
    let entry = state.sessions().get(id).await?;
    let mut guard = entry.lock().await;
    let outcomes: Vec<_> = req
        .frames
        .iter()
        .map(|frame| guard.process_frame(frame))
        .collect();
    Ok(ok(outcomes))
}

async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let registry = state.sessions();
    let entry = registry.get(id).await?;
    let mut guard = entry.lock().await;
    guard.reset();
    tracing::info!(session_id = %id, "Session reset");
    Ok(ok(guard.view(registry.now_ms())))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalibrationResponse {
    baseline: f64,
}

async fn calibrate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let entry = state.sessions().get(id).await?;
    let baseline = entry.lock().await.calibrate()?;
    tracing::info!(session_id = %id, baseline, "Shoulder baseline calibrated");
    Ok(ok(CalibrationResponse { baseline }))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartDiagnosticRequest {
    duration_secs: Option<f64>,
}

async fn start_diagnostic(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    OptionalJsonBody(body): OptionalJsonBody<StartDiagnosticRequest>,
) -> Result<impl IntoResponse, AppError> {
    let registry = state.sessions();
    let entry = registry.get(id).await?;
    let default_ms = entry
        .lock()
        .await
        .session()
        .config()
        .diagnostic
        .default_duration_ms;
    let duration_ms = body
        .and_then(|b| b.duration_secs)
        .map_or(default_ms, |secs| secs * 1000.0);

    let started = sessions::start_capture(&entry, registry.now_ms(), duration_ms).await?;
    tracing::info!(session_id = %id, duration_ms, "Diagnostic capture started");
    Ok(ok(started))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CancelResponse {
    cancelled: bool,
}

async fn cancel_diagnostic(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let entry = state.sessions().get(id).await?;
    let cancelled = entry.lock().await.cancel_capture();
    Ok(ok(CancelResponse { cancelled }))
}

async fn finish_diagnostic(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let entry = state.sessions().get(id).await?;
    let report = entry.lock().await.finish_capture()?;
    tracing::info!(session_id = %id, "Diagnostic capture finished early");
    Ok(ok(report))
}

async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let entry = state.sessions().get(id).await?;
    let guard = entry.lock().await;
    let report = guard.last_report().cloned().ok_or(SessionError::NoReport)?;
    Ok(ok(report))
}

//! Workflow control endpoints.
//!
//! Provides HTTP endpoints for:
//! - Attaching a media file (POST /capture/file)
//! - Switching capture mode (POST /capture/mode)
//! - Starting/stopping recording (POST /record/start, POST /record/stop)
//! - Submitting the capture for analysis (POST /submit)
//! - Resetting the workflow (POST /reset)
//! - Reading status and results (GET /status, GET /notes)

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use tokio::sync::{mpsc, oneshot};
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::workflow::{CaptureMode, WorkflowState, WorkflowStatusHandle};

pub type Reply = oneshot::Sender<Result<(), String>>;

/// Commands delivered to the workflow command loop. Each carries a reply
/// channel so handlers can report guard rejections to the caller.
pub enum ApiCommand {
    SelectFile { path: PathBuf, reply: Reply },
    SetMode { mode: CaptureMode, reply: Reply },
    StartRecording { reply: Reply },
    StopRecording { reply: Reply },
    Submit { reply: Reply },
    Reset { reply: Reply },
}

/// Shared state for workflow routes.
#[derive(Clone)]
pub struct WorkflowApiState {
    pub tx: mpsc::Sender<ApiCommand>,
    pub status: WorkflowStatusHandle,
}

#[derive(Debug, serde::Deserialize)]
pub struct SelectFileRequest {
    pub path: PathBuf,
}

#[derive(Debug, serde::Deserialize)]
pub struct SetModeRequest {
    pub mode: CaptureMode,
}

pub fn router(state: WorkflowApiState) -> Router {
    Router::new()
        .route("/capture/file", post(select_file))
        .route("/capture/mode", post(set_mode))
        .route("/record/start", post(start_recording))
        .route("/record/stop", post(stop_recording))
        .route("/submit", post(submit))
        .route("/reset", post(reset))
        .route("/status", get(workflow_status))
        .route("/notes", get(get_notes))
        .with_state(state)
}

async fn select_file(
    State(state): State<WorkflowApiState>,
    Json(req): Json<SelectFileRequest>,
) -> ApiResult<Json<Value>> {
    info!("File capture requested via API: {:?}", req.path);
    dispatch(&state.tx, |reply| ApiCommand::SelectFile {
        path: req.path,
        reply,
    })
    .await?;
    Ok(Json(snapshot_json(&state.status.get().await)))
}

async fn set_mode(
    State(state): State<WorkflowApiState>,
    Json(req): Json<SetModeRequest>,
) -> ApiResult<Json<Value>> {
    info!("Capture mode change requested via API: {}", req.mode.as_str());
    dispatch(&state.tx, |reply| ApiCommand::SetMode {
        mode: req.mode,
        reply,
    })
    .await?;
    Ok(Json(snapshot_json(&state.status.get().await)))
}

async fn start_recording(State(state): State<WorkflowApiState>) -> ApiResult<Json<Value>> {
    info!("Recording start requested via API");
    dispatch(&state.tx, |reply| ApiCommand::StartRecording { reply }).await?;
    Ok(Json(snapshot_json(&state.status.get().await)))
}

async fn stop_recording(State(state): State<WorkflowApiState>) -> ApiResult<Json<Value>> {
    info!("Recording stop requested via API");
    dispatch(&state.tx, |reply| ApiCommand::StopRecording { reply }).await?;
    Ok(Json(snapshot_json(&state.status.get().await)))
}

async fn submit(State(state): State<WorkflowApiState>) -> ApiResult<Json<Value>> {
    info!("Analysis submit requested via API");
    dispatch(&state.tx, |reply| ApiCommand::Submit { reply }).await?;
    Ok(Json(snapshot_json(&state.status.get().await)))
}

async fn reset(State(state): State<WorkflowApiState>) -> ApiResult<Json<Value>> {
    info!("Workflow reset requested via API");
    dispatch(&state.tx, |reply| ApiCommand::Reset { reply }).await?;
    Ok(Json(snapshot_json(&state.status.get().await)))
}

async fn workflow_status(State(state): State<WorkflowApiState>) -> Json<Value> {
    Json(snapshot_json(&state.status.get().await))
}

/// Full notes document, available once an analysis has completed.
async fn get_notes(State(state): State<WorkflowApiState>) -> ApiResult<Json<Value>> {
    let status = state.status.get().await;
    match status.notes {
        Some(notes) => Ok(Json(json!({ "notes": notes }))),
        None => Err(ApiError::not_found("No meeting notes available yet")),
    }
}

async fn dispatch(
    tx: &mpsc::Sender<ApiCommand>,
    make: impl FnOnce(Reply) -> ApiCommand,
) -> ApiResult<()> {
    let (reply_tx, reply_rx) = oneshot::channel();

    tx.send(make(reply_tx))
        .await
        .map_err(|_| ApiError::internal("Workflow loop is not running"))?;

    match reply_rx.await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(message)) => Err(ApiError::conflict(message)),
        Err(_) => Err(ApiError::internal("Workflow loop dropped the command")),
    }
}

fn snapshot_json(state: &WorkflowState) -> Value {
    json!({
        "phase": state.phase.as_str(),
        "mode": state.mode.as_str(),
        "capture": state.capture_name,
        "recording_seconds": state.recording_seconds(),
        "has_notes": state.notes.is_some(),
        "last_error": state.last_error,
    })
}

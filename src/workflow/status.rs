//! Workflow status types and shared state handle.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::analysis::MeetingNotes;

/// Phase of the capture-and-analysis workflow. Exactly one is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowPhase {
    Idle,
    Capturing,
    Analyzing,
    Completed,
    Error,
}

impl WorkflowPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Capturing => "capturing",
            Self::Analyzing => "analyzing",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }
}

/// Input mode within the capturing phase. The two modes are mutually
/// exclusive display modes, not independent workflow states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    Upload,
    Record,
}

impl CaptureMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Record => "record",
        }
    }
}

/// Current workflow state, readable by API handlers.
#[derive(Debug, Clone)]
pub struct WorkflowState {
    pub phase: WorkflowPhase,
    pub mode: CaptureMode,
    pub capture_name: Option<String>,
    pub recording_started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub notes: Option<MeetingNotes>,
    pub last_error: Option<String>,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self {
            phase: WorkflowPhase::Idle,
            mode: CaptureMode::Upload,
            capture_name: None,
            recording_started_at: None,
            notes: None,
            last_error: None,
        }
    }
}

impl WorkflowState {
    /// Elapsed recording time in seconds. Display only.
    pub fn recording_seconds(&self) -> Option<u64> {
        self.recording_started_at.map(|started| {
            let elapsed = chrono::Utc::now() - started;
            elapsed.num_seconds().max(0) as u64
        })
    }
}

/// Thread-safe handle sharing workflow state between the machine, the
/// spawned analysis task and API handlers.
#[derive(Clone, Default)]
pub struct WorkflowStatusHandle {
    inner: Arc<Mutex<WorkflowState>>,
}

impl WorkflowStatusHandle {
    pub async fn get(&self) -> WorkflowState {
        self.inner.lock().await.clone()
    }

    /// Enter the capturing phase, discarding any prior result or error.
    pub async fn begin_capture(&self, mode: CaptureMode) {
        let mut state = self.inner.lock().await;
        state.phase = WorkflowPhase::Capturing;
        state.mode = mode;
        state.capture_name = None;
        state.recording_started_at = None;
        state.notes = None;
        state.last_error = None;
    }

    pub async fn attach_capture(&self, name: String) {
        let mut state = self.inner.lock().await;
        state.phase = WorkflowPhase::Capturing;
        state.capture_name = Some(name);
        state.recording_started_at = None;
    }

    pub async fn start_recording(&self) {
        let mut state = self.inner.lock().await;
        state.phase = WorkflowPhase::Capturing;
        state.mode = CaptureMode::Record;
        state.recording_started_at = Some(chrono::Utc::now());
    }

    pub async fn set_analyzing(&self) {
        let mut state = self.inner.lock().await;
        state.phase = WorkflowPhase::Analyzing;
        state.notes = None;
        state.last_error = None;
    }

    pub async fn complete(&self, notes: MeetingNotes) {
        let mut state = self.inner.lock().await;
        state.phase = WorkflowPhase::Completed;
        state.notes = Some(notes);
    }

    pub async fn set_error(&self, error: String) {
        let mut state = self.inner.lock().await;
        state.phase = WorkflowPhase::Error;
        state.notes = None;
        state.recording_started_at = None;
        state.last_error = Some(error);
    }

    pub async fn reset(&self) {
        let mut state = self.inner.lock().await;
        *state = WorkflowState::default();
    }
}

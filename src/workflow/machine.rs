//! Capture-and-analysis workflow orchestrator.
//!
//! Drives the state machine: idle → capturing → analyzing →
//! completed/error, with reset back to idle. Holds the single pending
//! `MediaCapture` and the single active `RecordingSession`, and guarantees
//! at most one analysis is in flight. The notes provider and the audio
//! source are injected, so tests drive the machine with fakes.

use anyhow::{bail, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::analysis::NotesProvider;
use crate::capture::{AudioSource, MediaCapture, RecordingSession};

use super::status::{CaptureMode, WorkflowPhase, WorkflowStatusHandle};

pub struct WorkflowMachine {
    provider: Arc<dyn NotesProvider>,
    mic: Box<dyn AudioSource>,
    status: WorkflowStatusHandle,
    capture: Option<MediaCapture>,
    session: Option<RecordingSession>,
}

impl WorkflowMachine {
    pub fn new(
        provider: Arc<dyn NotesProvider>,
        mic: Box<dyn AudioSource>,
        status: WorkflowStatusHandle,
    ) -> Self {
        Self {
            provider,
            mic,
            status,
            capture: None,
            session: None,
        }
    }

    /// Attach a user-selected file as the pending capture, replacing any
    /// prior capture and discarding any prior result or error.
    pub async fn select_file(&mut self, path: &Path) -> Result<()> {
        self.ensure_not_analyzing().await?;
        self.teardown_session();

        let capture = MediaCapture::from_path(path).await?;
        info!(
            "Capture attached: {} ({}, {} bytes)",
            capture.name,
            capture.mime_type,
            capture.size_bytes()
        );

        self.status.begin_capture(CaptureMode::Upload).await;
        self.status.attach_capture(capture.name.clone()).await;
        self.capture = Some(capture);

        Ok(())
    }

    /// Switch between upload and record input modes. Switching invalidates
    /// any previously attached capture and clears any shown error.
    pub async fn set_mode(&mut self, mode: CaptureMode) -> Result<()> {
        self.ensure_not_analyzing().await?;
        self.teardown_session();

        self.capture = None;
        self.status.begin_capture(mode).await;

        info!("Capture mode set to {}", mode.as_str());
        Ok(())
    }

    /// Start a live recording session. Fails without creating a session
    /// when the device is unavailable or denied.
    pub async fn start_recording(&mut self) -> Result<()> {
        self.ensure_not_analyzing().await?;
        if self.session.is_some() {
            bail!("A recording session is already active");
        }

        self.capture = None;
        self.status.begin_capture(CaptureMode::Record).await;

        if let Err(e) = self.mic.start() {
            error!("Failed to start recording: {}", e);
            self.status.set_error(e.to_string()).await;
            return Err(e.into());
        }

        self.session = Some(RecordingSession::new());
        self.status.start_recording().await;

        info!("Recording session started");
        Ok(())
    }

    /// Stop the active session and attach the finalized capture. The
    /// device stream is released on success and on every error path.
    pub async fn stop_recording(&mut self) -> Result<()> {
        let Some(session) = self.session.take() else {
            bail!("No recording session is active");
        };

        let samples = match self.mic.stop() {
            Ok(samples) => samples,
            Err(e) => {
                error!("Failed to stop recording: {}", e);
                self.status.set_error(e.to_string()).await;
                return Err(e.into());
            }
        };

        let elapsed = session.elapsed_seconds();
        let capture = match session.into_capture(&samples, self.mic.sample_rate()) {
            Ok(capture) => capture,
            Err(e) => {
                error!("Failed to finalize recording: {}", e);
                self.status.set_error(e.to_string()).await;
                return Err(e.into());
            }
        };

        info!(
            "Recording finalized after {}s: {} ({} bytes)",
            elapsed,
            capture.name,
            capture.size_bytes()
        );

        self.status.attach_capture(capture.name.clone()).await;
        self.capture = Some(capture);

        Ok(())
    }

    /// Submit the pending capture for analysis. Inert without a capture or
    /// while an analysis is already in flight: the provider is never
    /// reached and the workflow state is untouched.
    pub async fn submit(&mut self) -> Result<()> {
        let state = self.status.get().await;
        if state.phase == WorkflowPhase::Analyzing {
            bail!("An analysis is already in progress");
        }

        let Some(capture) = self.capture.take() else {
            bail!("No capture attached. Select a file or record audio first.");
        };

        info!("Submitting '{}' for analysis", capture.name);
        self.status.set_analyzing().await;

        let provider = Arc::clone(&self.provider);
        let status = self.status.clone();

        tokio::spawn(async move {
            match provider.generate(&capture).await {
                Ok(notes) => {
                    info!("Analysis of '{}' complete", capture.name);
                    status.complete(notes).await;
                }
                Err(e) => {
                    error!("Analysis of '{}' failed: {}", capture.name, e);
                    status.set_error(e.to_string()).await;
                }
            }
        });

        Ok(())
    }

    /// Return to idle, discarding the pending capture and any result or
    /// error. An in-flight analysis cannot be aborted; reset is rejected
    /// until it settles.
    pub async fn reset(&mut self) -> Result<()> {
        let state = self.status.get().await;
        if state.phase == WorkflowPhase::Analyzing {
            bail!("Cannot reset while an analysis is in progress");
        }

        self.teardown_session();
        self.capture = None;
        self.status.reset().await;

        info!("Workflow reset to idle");
        Ok(())
    }

    pub fn has_pending_capture(&self) -> bool {
        self.capture.is_some()
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    async fn ensure_not_analyzing(&self) -> Result<()> {
        if self.status.get().await.phase == WorkflowPhase::Analyzing {
            bail!("An analysis is in progress, wait for it to finish");
        }
        Ok(())
    }

    /// Abandonment path: release the device stream and drop session state.
    fn teardown_session(&mut self) {
        if self.session.take().is_some() {
            if let Err(e) = self.mic.stop() {
                warn!("Failed to release recording stream: {}", e);
            }
        }
    }
}

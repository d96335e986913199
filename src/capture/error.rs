//! Error types for media capture.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    /// The host has no usable audio input capability.
    #[error("Recording is not supported in this environment: {0}")]
    UnsupportedEnvironment(String),

    /// The input device exists but the stream could not be opened.
    #[error("Could not access the microphone: {0}")]
    PermissionDenied(String),

    #[error("A recording session is already active")]
    AlreadyRecording,

    #[error("No recording session is active")]
    NoActiveSession,

    #[error("Failed to read media file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode recorded audio: {0}")]
    Encode(String),
}

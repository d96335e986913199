//! Error types for notes generation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotesError {
    /// The capture's declared MIME type is not audio or video. Raised
    /// before any network interaction.
    #[error("Unsupported file type '{0}'. Please provide an audio or video file.")]
    UnsupportedMediaType(String),

    /// The request never produced a usable response (connect, timeout,
    /// body read).
    #[error("Failed to reach the notes service: {0}")]
    Request(#[source] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Notes service error: {0}")]
    Service(String),

    /// The service answered, but the payload failed the shape check.
    #[error("AI response is missing required fields: {0}")]
    MalformedResponse(String),
}

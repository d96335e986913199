//! Remote notes generation.
//!
//! The analysis client takes one finalized `MediaCapture`, submits it to a
//! generative-AI notes service and returns the structured `MeetingNotes`.
//! Speech recognition, diarization and summarization all happen remotely;
//! the local responsibilities are encoding, the single round trip, and
//! validating the response shape.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

pub mod error;
pub mod gemini;
pub mod notes;

pub use error::NotesError;
pub use gemini::GeminiNotesProvider;
pub use notes::{parse_notes, ActionItem, MeetingNotes, TranscriptEntry};

use crate::capture::MediaCapture;
use crate::config::NotesConfig;

#[async_trait]
pub trait NotesProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// One external round trip: submit the capture, return validated notes.
    /// No internal retry; re-invoking the whole operation is the caller's
    /// decision.
    async fn generate(&self, capture: &MediaCapture) -> Result<MeetingNotes, NotesError>;
}

/// Reject captures whose declared type the service cannot analyze, before
/// any network interaction.
pub fn ensure_supported_media(capture: &MediaCapture) -> Result<(), NotesError> {
    let mime = capture.mime_type.as_str();
    if mime.starts_with("audio/") || mime.starts_with("video/") {
        Ok(())
    } else {
        Err(NotesError::UnsupportedMediaType(mime.to_string()))
    }
}

/// Construct the configured notes provider.
pub fn with_provider(provider_name: &str, config: &NotesConfig) -> Result<Arc<dyn NotesProvider>> {
    let provider: Arc<dyn NotesProvider> = match provider_name {
        "gemini" => {
            let api_key = config.resolve_api_key().context(
                "api_key is required for the Gemini provider (set notes.api_key or GEMINI_API_KEY)",
            )?;

            Arc::new(GeminiNotesProvider::new(
                api_key,
                config.model.clone(),
                config.api_endpoint.clone(),
            ))
        }
        _ => bail!(
            "Unknown notes provider '{}'. Supported providers: gemini",
            provider_name
        ),
    };

    info!("Using {} for notes generation", provider.name());

    Ok(provider)
}

/// Construct the provider named in config (default: gemini).
pub fn from_config(config: &NotesConfig) -> Result<Arc<dyn NotesProvider>> {
    let name = config.provider.as_deref().unwrap_or("gemini");
    with_provider(name, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_supported_media_accepts_audio_and_video() {
        let audio = MediaCapture::new(vec![], "audio/webm", "a.webm");
        let video = MediaCapture::new(vec![], "video/mp4", "b.mp4");
        assert!(ensure_supported_media(&audio).is_ok());
        assert!(ensure_supported_media(&video).is_ok());
    }

    #[test]
    fn test_ensure_supported_media_rejects_other_types() {
        let capture = MediaCapture::new(vec![], "application/octet-stream", "c.bin");
        let err = ensure_supported_media(&capture).unwrap_err();
        assert!(matches!(err, NotesError::UnsupportedMediaType(_)));
        assert!(err.to_string().contains("application/octet-stream"));
    }

    #[test]
    fn test_with_provider_unknown_name() {
        let config = NotesConfig {
            api_key: Some("k".to_string()),
            ..NotesConfig::default()
        };
        assert!(with_provider("whisper", &config).is_err());
    }

    #[test]
    fn test_with_provider_requires_api_key() {
        let config = NotesConfig {
            api_key: None,
            ..NotesConfig::default()
        };
        // Only meaningful when the environment does not provide a key.
        if std::env::var(crate::config::API_KEY_ENV).is_err() {
            assert!(with_provider("gemini", &config).is_err());
        }
    }
}

//! Finalized media blobs ready for submission.

use std::path::Path;

use super::error::CaptureError;

/// One finalized audio/video payload with its declared MIME type and a
/// display name. Immutable once created; the workflow controller owns it
/// until it is analyzed, replaced or discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaCapture {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub name: String,
}

impl MediaCapture {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
            name: name.into(),
        }
    }

    /// Load a user-selected file. The only local check is that the file can
    /// be read; type validation is deferred to the analysis client.
    pub async fn from_path(path: &Path) -> Result<Self, CaptureError> {
        let bytes = tokio::fs::read(path).await?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let mime_type = mime_type_for_extension(&ext)
            .unwrap_or("application/octet-stream")
            .to_string();

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "capture".to_string());

        Ok(Self {
            bytes,
            mime_type,
            name,
        })
    }

    pub fn size_bytes(&self) -> usize {
        self.bytes.len()
    }
}

/// MIME type for a known audio/video file extension.
pub fn mime_type_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "wav" => Some("audio/wav"),
        "mp3" => Some("audio/mpeg"),
        "m4a" => Some("audio/mp4"),
        "flac" => Some("audio/flac"),
        "ogg" => Some("audio/ogg"),
        "opus" => Some("audio/opus"),
        "webm" => Some("video/webm"),
        "mp4" => Some("video/mp4"),
        "mkv" => Some("video/x-matroska"),
        "avi" => Some("video/x-msvideo"),
        "mov" => Some("video/quicktime"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_mime_type_for_known_extensions() {
        assert_eq!(mime_type_for_extension("wav"), Some("audio/wav"));
        assert_eq!(mime_type_for_extension("mp4"), Some("video/mp4"));
        assert_eq!(mime_type_for_extension("xyz"), None);
    }

    #[tokio::test]
    async fn test_from_path_infers_mime_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("standup.mp3");
        tokio::fs::write(&path, b"not really audio").await.unwrap();

        let capture = MediaCapture::from_path(&path).await.unwrap();
        assert_eq!(capture.mime_type, "audio/mpeg");
        assert_eq!(capture.name, "standup.mp3");
        assert_eq!(capture.size_bytes(), 16);
    }

    #[tokio::test]
    async fn test_from_path_unknown_extension_is_not_rejected_here() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        tokio::fs::write(&path, b"hello").await.unwrap();

        // Type validation belongs to the analysis client.
        let capture = MediaCapture::from_path(&path).await.unwrap();
        assert_eq!(capture.mime_type, "application/octet-stream");
    }

    #[tokio::test]
    async fn test_from_path_missing_file() {
        let path = PathBuf::from("/nonexistent/recording.wav");
        assert!(MediaCapture::from_path(&path).await.is_err());
    }
}

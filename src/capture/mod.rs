//! Media capture: file selection and live microphone recording.

pub mod audio_source;
pub mod error;
pub mod media;
pub mod mic_source;
pub mod recording;

pub use audio_source::AudioSource;
pub use error::CaptureError;
pub use media::{mime_type_for_extension, MediaCapture};
pub use mic_source::{LazyMicSource, MicAudioSource};
pub use recording::RecordingSession;

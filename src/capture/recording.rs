//! Live recording session state.
//!
//! A `RecordingSession` exists only between "start recording" and "stop
//! recording". The device stream itself lives inside the `AudioSource`
//! (created on start, dropped on stop or drop); the session tracks the
//! start instant for elapsed-time display and finalizes captured samples
//! into a `MediaCapture`.

use hound::{SampleFormat, WavSpec, WavWriter};
use std::io::Cursor;
use std::time::Instant;

use super::error::CaptureError;
use super::media::MediaCapture;

pub struct RecordingSession {
    started_at: Instant,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }

    /// Elapsed seconds since recording started. Display only.
    pub fn elapsed_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Finalize the session: encode the accumulated samples as an
    /// in-memory WAV and assign a synthetic time-derived name.
    pub fn into_capture(self, samples: &[f32], sample_rate: u32) -> Result<MediaCapture, CaptureError> {
        let bytes = encode_wav(samples, sample_rate)?;

        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let name = format!("recording-{}.wav", timestamp);

        Ok(MediaCapture::new(bytes, "audio/wav", name))
    }
}

impl Default for RecordingSession {
    fn default() -> Self {
        Self::new()
    }
}

fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>, CaptureError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer =
            WavWriter::new(&mut cursor, spec).map_err(|e| CaptureError::Encode(e.to_string()))?;
        for &sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| CaptureError::Encode(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| CaptureError::Encode(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_capture_produces_wav() {
        let session = RecordingSession::new();
        let samples = vec![0.0f32, 0.25, -0.25, 0.5];

        let capture = session.into_capture(&samples, 16000).unwrap();

        assert_eq!(capture.mime_type, "audio/wav");
        assert!(capture.name.starts_with("recording-"));
        assert!(capture.name.ends_with(".wav"));
        assert_eq!(&capture.bytes[0..4], b"RIFF");
        assert_eq!(&capture.bytes[8..12], b"WAVE");
    }

    #[test]
    fn test_into_capture_empty_recording_still_encodes() {
        let session = RecordingSession::new();
        let capture = session.into_capture(&[], 16000).unwrap();
        assert_eq!(capture.mime_type, "audio/wav");
        assert_eq!(&capture.bytes[0..4], b"RIFF");
    }

    #[test]
    fn test_elapsed_seconds_starts_at_zero() {
        let session = RecordingSession::new();
        assert_eq!(session.elapsed_seconds(), 0);
    }
}

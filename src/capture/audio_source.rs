//! Audio source abstraction for capturing audio input.

use super::error::CaptureError;

/// Trait for audio capture sources (microphone, test fakes).
///
/// A source accumulates samples while started and returns them when
/// stopped. The underlying device handle must exist only between `start`
/// and `stop`; implementations release it on `stop` and on drop.
pub trait AudioSource {
    /// Start capturing audio.
    fn start(&mut self) -> Result<(), CaptureError>;

    /// Stop capturing and return all captured samples.
    fn stop(&mut self) -> Result<Vec<f32>, CaptureError>;

    /// Whether this source is currently capturing.
    fn is_active(&self) -> bool;

    /// The sample rate of captured audio.
    fn sample_rate(&self) -> u32;
}

//! Microphone audio capture via cpal.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

use super::audio_source::AudioSource;
use super::error::CaptureError;

pub struct MicAudioSource {
    device: cpal::Device,
    config: cpal::StreamConfig,
    samples: Arc<Mutex<Vec<f32>>>,
    stream: Option<cpal::Stream>,
    active: bool,
    target_sample_rate: u32,
}

impl MicAudioSource {
    /// Create a new mic source using the default input device.
    ///
    /// Fails with `UnsupportedEnvironment` when the host exposes no audio
    /// input capability at all.
    pub fn new(sample_rate: u32) -> Result<Self, CaptureError> {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or_else(|| {
            CaptureError::UnsupportedEnvironment("no audio input device available".to_string())
        })?;

        info!(
            "Mic source using device: {}",
            device.name().unwrap_or_else(|_| "unknown".to_string())
        );

        let config = cpal::StreamConfig {
            channels: 1,
            sample_rate: cpal::SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        Ok(Self {
            device,
            config,
            samples: Arc::new(Mutex::new(Vec::new())),
            stream: None,
            active: false,
            target_sample_rate: sample_rate,
        })
    }
}

impl AudioSource for MicAudioSource {
    fn start(&mut self) -> Result<(), CaptureError> {
        if self.active {
            return Err(CaptureError::AlreadyRecording);
        }

        // Clear previous samples
        {
            let mut samples = self.samples.lock().unwrap();
            samples.clear();
            samples.shrink_to_fit();
        }

        let samples_clone = self.samples.clone();
        let err_fn = |err| error!("Mic stream error: {}", err);

        let stream = self
            .device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut samples) = samples_clone.lock() {
                        samples.extend_from_slice(data);
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| CaptureError::PermissionDenied(e.to_string()))?;

        stream
            .play()
            .map_err(|e| CaptureError::PermissionDenied(e.to_string()))?;
        self.stream = Some(stream);
        self.active = true;

        info!("Mic recording started");
        Ok(())
    }

    fn stop(&mut self) -> Result<Vec<f32>, CaptureError> {
        if !self.active {
            return Err(CaptureError::NoActiveSession);
        }

        // Drop stream to release the device
        if let Some(stream) = self.stream.take() {
            debug!("Stopping mic stream");
            drop(stream);
        }

        self.active = false;

        let samples = {
            let mut guard = self.samples.lock().unwrap();
            let s = guard.clone();
            guard.clear();
            guard.shrink_to_fit();
            s
        };

        info!("Mic stopped, {} samples captured", samples.len());
        Ok(samples)
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn sample_rate(&self) -> u32 {
        self.target_sample_rate
    }
}

impl Drop for MicAudioSource {
    fn drop(&mut self) {
        if self.active {
            debug!("Dropping active MicAudioSource, cleaning up");
            let _ = self.stop();
        }
    }
}

/// Defers opening the input device until recording actually starts, so
/// upload-only use works on hosts without any audio input. Device and
/// permission failures surface from `start`, where the workflow reports
/// them.
pub struct LazyMicSource {
    sample_rate: u32,
    inner: Option<MicAudioSource>,
}

impl LazyMicSource {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            inner: None,
        }
    }
}

impl AudioSource for LazyMicSource {
    fn start(&mut self) -> Result<(), CaptureError> {
        let source = match &mut self.inner {
            Some(source) => source,
            inner @ None => inner.insert(MicAudioSource::new(self.sample_rate)?),
        };
        source.start()
    }

    fn stop(&mut self) -> Result<Vec<f32>, CaptureError> {
        match &mut self.inner {
            Some(source) => source.stop(),
            None => Err(CaptureError::NoActiveSession),
        }
    }

    fn is_active(&self) -> bool {
        self.inner.as_ref().map(|s| s.is_active()).unwrap_or(false)
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

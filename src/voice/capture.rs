//! Audio capture from the microphone
//!
//! Owns the single resident cpal input stream. The driver callback appends
//! samples to a shared buffer only while the recording flag is armed; the
//! callback never blocks, performs no I/O, and never grows the buffer past
//! the configured window cap.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{BufferSize, SampleRate, Stream, StreamConfig};

use crate::{Error, Result};

/// Sample rate for audio capture (16kHz for speech)
pub const SAMPLE_RATE: u32 = 16000;

/// Frames per hardware-delivered block
pub const BLOCK_SIZE: u32 = 1024;

/// Sample buffer shared between the capture callback and the cycle controller
///
/// The callback is the only writer; the cycle controller reads by taking a
/// full copy under the lock, never by holding the live buffer across threads.
#[derive(Clone)]
pub struct SampleBuffer {
    samples: Arc<Mutex<Vec<f32>>>,
    max_samples: usize,
}

impl SampleBuffer {
    /// Create a buffer that holds at most `max_samples` samples
    #[must_use]
    pub fn new(max_samples: usize) -> Self {
        Self {
            samples: Arc::new(Mutex::new(Vec::new())),
            max_samples,
        }
    }

    /// Append a block of samples, truncating at the configured cap
    ///
    /// Called from the capture callback; the reserved capacity means no
    /// allocation happens on the real-time path after the first cycle.
    pub fn append(&self, data: &[f32]) {
        if let Ok(mut samples) = self.samples.lock() {
            let room = self.max_samples.saturating_sub(samples.len());
            let take = room.min(data.len());
            samples.extend_from_slice(&data[..take]);
        }
    }

    /// Clear the buffer and reserve the full window capacity
    pub fn clear(&self) {
        if let Ok(mut samples) = self.samples.lock() {
            samples.clear();
            let additional = self.max_samples.saturating_sub(samples.capacity());
            samples.reserve(additional);
        }
    }

    /// Take a consistent copy of the buffered samples
    #[must_use]
    pub fn snapshot(&self) -> Vec<f32> {
        self.samples
            .lock()
            .map(|samples| samples.clone())
            .unwrap_or_default()
    }

    /// Number of buffered samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.lock().map(|samples| samples.len()).unwrap_or(0)
    }

    /// Whether the buffer is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of samples the buffer will hold
    #[must_use]
    pub const fn max_samples(&self) -> usize {
        self.max_samples
    }
}

/// Captures audio from the default input device
pub struct AudioCapture {
    config: StreamConfig,
    buffer: SampleBuffer,
    recording: Arc<AtomicBool>,
    stream: Option<Stream>,
}

impl AudioCapture {
    /// Create a new audio capture instance
    ///
    /// Opens the default input device at 16 kHz mono f32 with fixed
    /// 1024-frame blocks. `max_samples` caps the shared buffer at the
    /// recording window size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AudioDeviceUnavailable`] if no device offers the
    /// required configuration. Surfaced once at construction, not retried.
    pub fn new(max_samples: usize) -> Result<Self> {
        let host = cpal::default_host();

        let device = host.default_input_device().ok_or_else(|| {
            Error::AudioDeviceUnavailable("no default input device".to_string())
        })?;

        let supported_config = device
            .supported_input_configs()
            .map_err(|e| Error::AudioDeviceUnavailable(e.to_string()))?
            .find(|c| {
                c.channels() == 1
                    && c.min_sample_rate() <= SampleRate(SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(SAMPLE_RATE)
            })
            .ok_or_else(|| {
                Error::AudioDeviceUnavailable(
                    "no mono 16 kHz input configuration".to_string(),
                )
            })?;

        let mut config = supported_config
            .with_sample_rate(SampleRate(SAMPLE_RATE))
            .config();
        config.buffer_size = BufferSize::Fixed(BLOCK_SIZE);

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = SAMPLE_RATE,
            block_size = BLOCK_SIZE,
            "audio capture initialized"
        );

        Ok(Self {
            config,
            buffer: SampleBuffer::new(max_samples),
            recording: Arc::new(AtomicBool::new(false)),
            stream: None,
        })
    }

    /// Start the capture stream
    ///
    /// Idempotent while a stream is already running. The callback appends to
    /// the shared buffer only while the recording flag is set.
    ///
    /// # Errors
    ///
    /// Returns error if the stream cannot be built or started
    pub fn start(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }

        let host = cpal::default_host();
        let device = host.default_input_device().ok_or_else(|| {
            Error::AudioDeviceUnavailable("no default input device".to_string())
        })?;

        let buffer = self.buffer.clone();
        let recording = Arc::clone(&self.recording);

        let stream = device
            .build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if recording.load(Ordering::Acquire) {
                        buffer.append(data);
                    }
                },
                |err| {
                    tracing::error!(error = %err, "audio capture error");
                },
                None,
            )
            .map_err(|e| Error::AudioDeviceUnavailable(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;
        self.stream = Some(stream);

        tracing::debug!("audio capture started");
        Ok(())
    }

    /// Stop the capture stream
    ///
    /// Stop failures are logged and shutdown continues; the stream is dropped
    /// either way.
    pub fn stop(&mut self) {
        self.recording.store(false, Ordering::Release);
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                tracing::warn!(error = %e, "failed to stop capture stream");
            }
            drop(stream);
            tracing::debug!("audio capture stopped");
        }
    }

    /// Check if the stream is currently running
    #[must_use]
    pub const fn is_capturing(&self) -> bool {
        self.stream.is_some()
    }

    /// Shared handle to the sample buffer
    #[must_use]
    pub fn buffer(&self) -> SampleBuffer {
        self.buffer.clone()
    }

    /// Shared handle to the recording flag
    #[must_use]
    pub fn recording_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.recording)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_a_copy() {
        let buffer = SampleBuffer::new(16);
        buffer.append(&[0.1, 0.2, 0.3]);

        let snapshot = buffer.snapshot();
        buffer.append(&[0.4, 0.5]);

        assert_eq!(snapshot, vec![0.1, 0.2, 0.3]);
        assert_eq!(buffer.len(), 5);
    }

    #[test]
    fn test_append_respects_cap() {
        let buffer = SampleBuffer::new(4);
        buffer.append(&[0.0; 3]);
        buffer.append(&[1.0; 3]);

        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.snapshot(), vec![0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_clear_empties_buffer() {
        let buffer = SampleBuffer::new(8);
        buffer.append(&[0.5; 8]);
        buffer.clear();

        assert!(buffer.is_empty());
        assert!(buffer.snapshot().is_empty());
    }
}

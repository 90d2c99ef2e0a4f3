//! Voice command processor facade
//!
//! Composes capture, transcription, and the command registry, and owns the
//! cycle worker thread. Hosts construct one processor, register commands,
//! then start and stop listening; drop guarantees the worker is joined and
//! the stream torn down.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::VoiceConfig;
use crate::{Error, Result};

use super::capture::{AudioCapture, SAMPLE_RATE};
use super::commands::CommandRegistry;
use super::cycle::CycleController;
use super::stt::SpeechToText;

/// Voice command processor
///
/// Not `Send`: the cpal stream must stay on the thread that created it.
/// Registered actions run on the cycle thread, so they must confine
/// themselves to thread-safe state such as atomics.
pub struct VoiceCommandProcessor {
    capture: AudioCapture,
    stt: Arc<SpeechToText>,
    registry: Arc<Mutex<CommandRegistry>>,
    listening: Arc<AtomicBool>,
    window: Duration,
    cooldown: Duration,
    worker: Option<JoinHandle<()>>,
}

impl VoiceCommandProcessor {
    /// Create a processor from the voice configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredential`] if no API key is configured and
    /// [`Error::AudioDeviceUnavailable`] if no capture device offers the
    /// required configuration. Either failure disables the voice subsystem
    /// only; the host carries on without it.
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(config: &VoiceConfig) -> Result<Self> {
        let api_key = config.api_key.clone().unwrap_or_default();
        let stt = SpeechToText::new(api_key, config.model.clone())?;

        let max_samples =
            (config.record_window.as_millis() as usize) * (SAMPLE_RATE as usize) / 1000;
        let capture = AudioCapture::new(max_samples)?;

        Ok(Self {
            capture,
            stt: Arc::new(stt),
            registry: Arc::new(Mutex::new(CommandRegistry::new())),
            listening: Arc::new(AtomicBool::new(false)),
            window: config.record_window,
            cooldown: config.cooldown,
            worker: None,
        })
    }

    /// Register an action for a phrase
    ///
    /// The registry is meant to be populated before listening starts.
    pub fn register_command(&self, phrase: &str, action: impl Fn() + Send + 'static) {
        if let Ok(mut registry) = self.registry.lock() {
            registry.register(phrase, action);
        }
    }

    /// Start the capture stream and the cycle worker thread
    ///
    /// Idempotent no-op while already listening.
    ///
    /// # Errors
    ///
    /// Returns error if the capture stream cannot be started
    pub fn start_listening(&mut self) -> Result<()> {
        if self.is_listening() {
            return Ok(());
        }

        self.capture.start()?;
        self.listening.store(true, Ordering::Release);

        let controller = CycleController {
            listening: Arc::clone(&self.listening),
            recording: self.capture.recording_flag(),
            buffer: self.capture.buffer(),
            transcriber: Arc::clone(&self.stt),
            registry: Arc::clone(&self.registry),
            window: self.window,
            cooldown: self.cooldown,
        };

        let spawned = std::thread::Builder::new()
            .name("voice-cycle".to_string())
            .spawn(move || controller.run());

        match spawned {
            Ok(handle) => {
                self.worker = Some(handle);
                tracing::info!("voice command listening started");
                Ok(())
            }
            Err(e) => {
                self.listening.store(false, Ordering::Release);
                self.capture.stop();
                Err(Error::Io(e))
            }
        }
    }

    /// Stop listening and join the cycle thread
    ///
    /// Idempotent no-op while not listening. Cancellation is cooperative:
    /// the worker notices the cleared flag at its next loop boundary, so
    /// this blocks for at most one window plus processing plus cooldown.
    pub fn stop_listening(&mut self) {
        if !self.is_listening() && self.worker.is_none() {
            return;
        }

        self.listening.store(false, Ordering::Release);
        self.capture.stop();

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("cycle thread panicked");
            }
        }

        tracing::info!("voice command listening stopped");
    }

    /// Whether the processor is currently listening
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Acquire)
    }
}

impl Drop for VoiceCommandProcessor {
    fn drop(&mut self) {
        self.stop_listening();
    }
}

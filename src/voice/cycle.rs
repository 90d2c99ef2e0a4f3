//! Recording cycle controller
//!
//! Drives the armed-record, transcribe, dispatch, cooldown loop on a
//! dedicated worker thread. The cycle walks four phases: idle (not
//! listening), armed (recording flag set, samples accumulating for a fixed
//! window), processing (flag cleared, snapshot transcribed and dispatched),
//! and cooldown (short pause before re-arming). Keeping the blocking
//! transcription call here decouples it from the real-time capture callback,
//! which only ever appends to the shared buffer.
//!
//! Shutdown is cooperative: the facade clears the listening flag and joins;
//! the loop notices at the next top-of-loop check, so an in-flight cycle
//! finishes before the thread exits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::capture::SampleBuffer;
use super::commands::CommandRegistry;
use super::stt::Transcriber;

/// Default length of one armed recording window
pub const RECORD_WINDOW: Duration = Duration::from_secs(3);

/// Default pause between recording cycles
pub const COOLDOWN: Duration = Duration::from_millis(500);

/// State shared with one cycle worker thread
pub(crate) struct CycleController<T> {
    /// Overall on/off state; cleared by the facade to wind the loop down
    pub listening: Arc<AtomicBool>,
    /// Gates appends in the capture callback; true only while armed
    pub recording: Arc<AtomicBool>,
    /// Buffer written by the capture callback
    pub buffer: SampleBuffer,
    pub transcriber: Arc<T>,
    pub registry: Arc<Mutex<CommandRegistry>>,
    pub window: Duration,
    pub cooldown: Duration,
}

impl<T: Transcriber> CycleController<T> {
    /// Run cycles until the listening flag is cleared
    pub fn run(&self) {
        tracing::debug!("cycle controller started");

        while self.listening.load(Ordering::Acquire) {
            self.arm();
            std::thread::sleep(self.window);
            let snapshot = self.disarm();

            self.process(&snapshot);

            std::thread::sleep(self.cooldown);
        }

        self.recording.store(false, Ordering::Release);
        tracing::debug!("cycle controller stopped");
    }

    /// Enter the armed window: fresh buffer, capture callback unblocked
    fn arm(&self) {
        self.buffer.clear();
        self.recording.store(true, Ordering::Release);
        tracing::trace!("recording window armed");
    }

    /// Leave the armed window and take a consistent copy of the samples
    fn disarm(&self) -> Vec<f32> {
        self.recording.store(false, Ordering::Release);
        self.buffer.snapshot()
    }

    /// Transcribe a snapshot and dispatch any matched command
    ///
    /// Every failure is recovered here; nothing may escape and kill the
    /// loop or the host.
    fn process(&self, snapshot: &[f32]) {
        if snapshot.is_empty() {
            tracing::trace!("no samples captured, skipping transcription");
            return;
        }

        let transcript = match self.transcriber.transcribe(snapshot) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "transcription failed");
                return;
            }
        };

        if transcript.trim().is_empty() {
            tracing::debug!("no speech recognized");
            return;
        }

        tracing::info!(transcript = %transcript, "heard");
        if let Ok(registry) = self.registry.lock() {
            registry.dispatch(&transcript);
        }
    }
}

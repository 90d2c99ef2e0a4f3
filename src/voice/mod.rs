//! Voice command processing
//!
//! A background capture stream feeds a shared sample buffer, a cycle thread
//! records fixed windows, ships them to a remote transcription API, and
//! dispatches matched phrases to registered actions.

mod capture;
mod commands;
mod cycle;
mod processor;
mod stt;

pub use capture::{AudioCapture, BLOCK_SIZE, SAMPLE_RATE, SampleBuffer};
pub use commands::CommandRegistry;
pub use cycle::{COOLDOWN, RECORD_WINDOW};
pub use processor::VoiceCommandProcessor;
pub use stt::{SpeechToText, TRANSCRIPTION_URL, Transcriber, samples_to_wav};

//! Visage - webcam face-detection demo with voice command control
//!
//! The demo pairs a face-detection video loop with a voice command channel:
//! a background capture stream feeds a shared sample buffer, a cycle thread
//! records fixed windows, ships them to a remote transcription API, and
//! dispatches matched phrases to registered actions.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ capture callback (driver thread)                     │
//! │   recording flag set? ──append──▶ sample buffer      │
//! └──────────────────────────┬───────────────────────────┘
//!                            │ snapshot (copy under lock)
//! ┌──────────────────────────▼───────────────────────────┐
//! │ cycle thread                                         │
//! │   arm ▶ record ▶ transcribe ▶ dispatch ▶ cooldown    │
//! └──────────────────────────┬───────────────────────────┘
//!                            │ actions (atomics only)
//! ┌──────────────────────────▼───────────────────────────┐
//! │ host thread                                          │
//! │   frames ▶ detect ▶ overlay ▶ screenshot ▶ present   │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Camera and cascade-detector integrations live behind the [`vision`]
//! traits; the voice subsystem degrades gracefully when no credential or
//! capture device is available.

pub mod app;
pub mod config;
pub mod error;
pub mod vision;
pub mod voice;

pub use app::{AppState, FpsCounter, LoopOptions, register_voice_commands, run_detection_loop};
pub use config::{Config, VoiceConfig};
pub use error::{Error, Result};
pub use vision::{FaceDetector, Frame, FrameSource, Region};
pub use voice::{
    CommandRegistry, SAMPLE_RATE, SpeechToText, Transcriber, VoiceCommandProcessor,
    samples_to_wav,
};

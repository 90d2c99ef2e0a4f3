//! Error types for visage

use thiserror::Error;

/// Result type alias for visage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in visage
#[derive(Debug, Error)]
pub enum Error {
    /// Transcription credential not provided; disables the voice subsystem
    #[error("transcription API credential not provided")]
    MissingCredential,

    /// No usable capture device; fatal to the voice subsystem only
    #[error("audio device unavailable: {0}")]
    AudioDeviceUnavailable(String),

    /// Audio stream runtime error
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech-to-text error; recovered to an empty transcript by the cycle
    #[error("STT error: {0}")]
    Stt(String),

    /// Frame source or detector error
    #[error("vision error: {0}")]
    Vision(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Image encoding error
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

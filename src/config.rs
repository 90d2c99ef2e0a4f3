//! Configuration for the visage demo

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::voice::{COOLDOWN, RECORD_WINDOW};

/// Demo configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Voice subsystem configuration
    pub voice: VoiceConfig,

    /// Directory screenshots are written to
    pub screenshot_dir: PathBuf,
}

/// Voice subsystem configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Bearer credential for the transcription API
    pub api_key: Option<String>,

    /// Transcription model identifier (e.g. "whisper-1")
    pub model: String,

    /// Length of one armed recording window
    pub record_window: Duration,

    /// Pause between recording cycles
    pub cooldown: Duration,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "whisper-1".to_string(),
            record_window: RECORD_WINDOW,
            cooldown: COOLDOWN,
        }
    }
}

impl Config {
    /// Load configuration from the environment
    ///
    /// The credential comes from `OPENAI_API_KEY`; a blank value counts as
    /// absent so the voice subsystem degrades instead of failing mid-request.
    #[must_use]
    pub fn from_env() -> Self {
        let voice = VoiceConfig {
            api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            model: std::env::var("VISAGE_STT_MODEL")
                .unwrap_or_else(|_| VoiceConfig::default().model),
            ..VoiceConfig::default()
        };

        let screenshot_dir = std::env::var("VISAGE_SCREENSHOT_DIR")
            .map_or_else(|_| default_screenshot_dir(), PathBuf::from);

        Self {
            voice,
            screenshot_dir,
        }
    }
}

/// Default directory for screenshots
///
/// Uses the platform pictures directory when available, falling back to the
/// current directory.
#[must_use]
pub fn default_screenshot_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.picture_dir().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_config_defaults() {
        let config = VoiceConfig::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.model, "whisper-1");
        assert_eq!(config.record_window, Duration::from_secs(3));
        assert_eq!(config.cooldown, Duration::from_millis(500));
    }
}

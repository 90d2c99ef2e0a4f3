//! Speech-to-text client and WAV container encoding

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::blocking::multipart::{Form, Part};
use serde::Deserialize;

use crate::{Error, Result};

/// Remote transcription endpoint
pub const TRANSCRIPTION_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Upper bound on one transcription request; a hung call otherwise stalls
/// the whole recording cycle.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Response from the transcription API
#[derive(Deserialize)]
struct WhisperResponse {
    text: String,
}

/// Turns a recorded sample buffer into text
///
/// Seam between the cycle controller and the remote call; tests inject
/// scripted implementations.
pub trait Transcriber: Send + Sync {
    /// Transcribe audio samples to text
    ///
    /// # Errors
    ///
    /// Returns error if transcription fails; callers treat any failure as
    /// "no text recognized" and continue.
    fn transcribe(&self, samples: &[f32]) -> Result<String>;
}

/// Transcribes speech via the remote Whisper API
pub struct SpeechToText {
    client: Client,
    api_key: String,
    model: String,
}

impl SpeechToText {
    /// Create a new transcription client
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredential`] if the API key is empty
    pub fn new(api_key: String, model: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(Error::MissingCredential);
        }

        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            api_key,
            model,
        })
    }
}

impl Transcriber for SpeechToText {
    fn transcribe(&self, samples: &[f32]) -> Result<String> {
        let wav = samples_to_wav(samples, super::SAMPLE_RATE);
        tracing::debug!(
            samples = samples.len(),
            wav_bytes = wav.len(),
            "starting transcription"
        );

        let part = Part::bytes(wav)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| Error::Stt(e.to_string()))?;

        let form = Form::new()
            .text("model", self.model.clone())
            .part("file", part);

        let response = self
            .client
            .post(TRANSCRIPTION_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .multipart(form)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(Error::Stt(format!(
                "transcription API error {status}: {body}"
            )));
        }

        // A malformed body is a transcription failure like any other
        let result: WhisperResponse = serde_json::from_str(&body)?;
        tracing::debug!(transcript = %result.text, "transcription complete");
        Ok(result.text)
    }
}

/// Encode f32 samples as an IEEE-float WAV container
///
/// The remote service rejects payloads whose declared chunk sizes disagree
/// with the data length, so the 44-byte header is built field by field from
/// the sample count: format tag 3, mono, 32 bits per sample, data size
/// N x 4, declared total size 36 + data size.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> Vec<u8> {
    const CHANNELS: u16 = 1;
    const BITS_PER_SAMPLE: u16 = 32;
    const BYTES_PER_SAMPLE: u32 = 4;

    let data_size = samples.len() as u32 * BYTES_PER_SAMPLE;
    let byte_rate = sample_rate * u32::from(CHANNELS) * BYTES_PER_SAMPLE;
    let block_align = CHANNELS * (BITS_PER_SAMPLE / 8);

    let mut wav = Vec::with_capacity(44 + data_size as usize);

    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_size).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&3u16.to_le_bytes()); // IEEE float
    wav.extend_from_slice(&CHANNELS.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());

    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    for sample in samples {
        wav.extend_from_slice(&sample.to_le_bytes());
    }

    wav
}

//! Voice pipeline integration tests
//!
//! Tests voice components without requiring audio hardware

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use visage::voice::SampleBuffer;
use visage::{
    CommandRegistry, Error, SAMPLE_RATE, SpeechToText, VoiceCommandProcessor, VoiceConfig,
    samples_to_wav,
};

mod common;

use common::{generate_silence, generate_sine_samples};

#[test]
fn test_wav_header_magic_and_sizes() {
    let samples = generate_sine_samples(440.0, 0.1, 0.5);
    let wav = samples_to_wav(&samples, SAMPLE_RATE);

    let data_size = u32::try_from(samples.len() * 4).unwrap();
    assert_eq!(&wav[0..4], b"RIFF");
    assert_eq!(&wav[8..12], b"WAVE");
    assert_eq!(
        u32::from_le_bytes(wav[4..8].try_into().unwrap()),
        36 + data_size
    );
    assert_eq!(
        u32::from_le_bytes(wav[40..44].try_into().unwrap()),
        data_size
    );
    assert_eq!(wav.len() as u32, 44 + data_size);
}

#[test]
fn test_wav_roundtrip_preserves_samples() {
    let original: Vec<f32> = vec![0.0, 0.5, -0.5, 1.0, -1.0, 0.25];
    let wav = samples_to_wav(&original, SAMPLE_RATE);

    let mut reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.sample_rate, SAMPLE_RATE);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 32);
    assert_eq!(spec.sample_format, hound::SampleFormat::Float);

    let read_back: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
    assert_eq!(read_back, original);
}

#[test]
fn test_wav_of_silence_is_well_formed() {
    let samples = generate_silence(3.0);
    let wav = samples_to_wav(&samples, SAMPLE_RATE);

    let reader = hound::WavReader::new(Cursor::new(wav)).unwrap();
    assert_eq!(reader.len() as usize, samples.len());
}

#[test]
fn test_registry_scenario_screenshot_and_exit() {
    let screenshots = Arc::new(AtomicUsize::new(0));
    let exits = Arc::new(AtomicUsize::new(0));

    let mut registry = CommandRegistry::new();
    {
        let screenshots = Arc::clone(&screenshots);
        registry.register("screenshot", move || {
            screenshots.fetch_add(1, Ordering::SeqCst);
        });
    }
    {
        let exits = Arc::clone(&exits);
        registry.register("exit", move || {
            exits.fetch_add(1, Ordering::SeqCst);
        });
    }

    assert_eq!(
        registry.dispatch("please take a screenshot now"),
        Some("screenshot")
    );
    assert_eq!(screenshots.load(Ordering::SeqCst), 1);
    assert_eq!(exits.load(Ordering::SeqCst), 0);
}

#[test]
fn test_registry_reports_no_match() {
    let mut registry = CommandRegistry::new();
    registry.register("exit", || {});

    assert_eq!(registry.dispatch("what a lovely day"), None);
}

#[test]
fn test_missing_credential_disables_voice_only() {
    // The credential check precedes any device access, so this passes on
    // machines without audio hardware too.
    assert!(matches!(
        SpeechToText::new(String::new(), "whisper-1".to_string()),
        Err(Error::MissingCredential)
    ));

    let config = VoiceConfig::default();
    assert!(config.api_key.is_none());
    assert!(matches!(
        VoiceCommandProcessor::new(&config),
        Err(Error::MissingCredential)
    ));

    // The host carries on after the failure; nothing has panicked or
    // spawned a thread, there is simply no voice subsystem.
}

#[test]
fn test_sample_buffer_snapshot_is_bounded_copy() {
    let window_secs = 3;
    let cap = window_secs * SAMPLE_RATE as usize;
    let buffer = SampleBuffer::new(cap);

    // Feed more than a full window of audio
    let block = generate_sine_samples(440.0, 0.5, 0.3);
    for _ in 0..8 {
        buffer.append(&block);
    }

    let snapshot = buffer.snapshot();
    assert!(snapshot.len() <= cap);

    // Later appends do not affect the snapshot
    let before = snapshot.len();
    buffer.clear();
    buffer.append(&block);
    assert_eq!(snapshot.len(), before);
    assert!(buffer.len() < before);
}

//! Host loop integration tests
//!
//! Drives the detection loop with synthetic sources and detectors standing
//! in for the external camera and cascade collaborators.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use visage::app::{AppState, LoopOptions, run_detection_loop, save_screenshot};
use visage::{Error, FaceDetector, Frame, FrameSource, Region, Result};

/// Serves a fixed number of black frames, then ends the stream
struct SyntheticSource {
    remaining: usize,
    width: u32,
    height: u32,
}

impl SyntheticSource {
    fn with_frames(count: usize) -> Self {
        Self {
            remaining: count,
            width: 64,
            height: 48,
        }
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        self.remaining -= 1;
        Ok(Some(Frame::new(self.width, self.height)))
    }
}

/// Fails on the first pull
struct FailingSource;

impl FrameSource for FailingSource {
    fn next_frame(&mut self) -> Result<Option<Frame>> {
        Err(Error::Vision("camera unplugged".to_string()))
    }
}

/// Reports one fixed region per frame and counts invocations
struct StaticDetector {
    region: Region,
    calls: Arc<AtomicUsize>,
}

impl StaticDetector {
    fn new() -> Self {
        Self {
            region: Region {
                x: 8,
                y: 8,
                width: 24,
                height: 24,
            },
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl FaceDetector for StaticDetector {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<Region>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![self.region])
    }
}

/// Always fails
struct FailingDetector;

impl FaceDetector for FailingDetector {
    fn detect(&mut self, _frame: &Frame) -> Result<Vec<Region>> {
        Err(Error::Vision("cascade not loaded".to_string()))
    }
}

fn options(dir: &std::path::Path) -> LoopOptions {
    LoopOptions {
        screenshot_dir: dir.to_path_buf(),
    }
}

#[test]
fn test_loop_runs_until_source_ends() {
    let state = AppState::new();
    let mut source = SyntheticSource::with_frames(5);
    let mut detector = StaticDetector::new();
    let calls = Arc::clone(&detector.calls);
    let dir = tempfile::tempdir().unwrap();

    let mut presented = 0;
    run_detection_loop(&mut source, &mut detector, &state, &options(dir.path()), |_| {
        presented += 1;
    })
    .unwrap();

    assert_eq!(presented, 5);
    assert_eq!(calls.load(Ordering::SeqCst), 5);
}

#[test]
fn test_detector_skipped_while_disabled() {
    let state = AppState::new();
    state.toggle_detection();
    assert!(!state.detection_enabled());

    let mut source = SyntheticSource::with_frames(3);
    let mut detector = StaticDetector::new();
    let calls = Arc::clone(&detector.calls);
    let dir = tempfile::tempdir().unwrap();

    run_detection_loop(&mut source, &mut detector, &state, &options(dir.path()), |_| {})
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_overlay_drawn_on_detected_region() {
    let state = AppState::new();
    let mut source = SyntheticSource::with_frames(1);
    let mut detector = StaticDetector::new();
    let dir = tempfile::tempdir().unwrap();

    let mut corner = None;
    let mut interior = None;
    run_detection_loop(
        &mut source,
        &mut detector,
        &state,
        &options(dir.path()),
        |frame| {
            corner = frame.pixel(8, 8);
            interior = frame.pixel(20, 20);
        },
    )
    .unwrap();

    // Border colored, interior left black
    assert_ne!(corner.unwrap(), [0, 0, 0]);
    assert_eq!(interior.unwrap(), [0, 0, 0]);
}

#[test]
fn test_detector_failure_skips_frame_but_continues() {
    let state = AppState::new();
    let mut source = SyntheticSource::with_frames(4);
    let mut detector = FailingDetector;
    let dir = tempfile::tempdir().unwrap();

    let mut presented = 0;
    run_detection_loop(&mut source, &mut detector, &state, &options(dir.path()), |_| {
        presented += 1;
    })
    .unwrap();

    assert_eq!(presented, 4);
}

#[test]
fn test_source_failure_propagates() {
    let state = AppState::new();
    let mut source = FailingSource;
    let mut detector = StaticDetector::new();
    let dir = tempfile::tempdir().unwrap();

    let result =
        run_detection_loop(&mut source, &mut detector, &state, &options(dir.path()), |_| {});
    assert!(matches!(result, Err(Error::Vision(_))));
}

#[test]
fn test_exit_request_stops_loop() {
    let state = AppState::new();
    let mut source = SyntheticSource::with_frames(usize::MAX);
    let mut detector = StaticDetector::new();
    let dir = tempfile::tempdir().unwrap();

    let mut presented = 0;
    run_detection_loop(
        &mut source,
        &mut detector,
        &state,
        &options(dir.path()),
        |_| {
            presented += 1;
            if presented == 3 {
                state.request_exit();
            }
        },
    )
    .unwrap();

    assert_eq!(presented, 3);
}

#[test]
fn test_screenshot_request_writes_png() {
    let state = AppState::new();
    let mut source = SyntheticSource::with_frames(2);
    let mut detector = StaticDetector::new();
    let dir = tempfile::tempdir().unwrap();

    state.request_screenshot();
    run_detection_loop(&mut source, &mut detector, &state, &options(dir.path()), |_| {})
        .unwrap();

    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
    let path = entries[0].as_ref().unwrap().path();
    assert_eq!(path.extension().unwrap(), "png");

    let decoded = image::open(&path).unwrap();
    assert_eq!(decoded.width(), 64);
    assert_eq!(decoded.height(), 48);
}

#[test]
fn test_save_screenshot_creates_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("shots").join("today");
    let frame = Frame::new(16, 16);

    let path = save_screenshot(&frame, &nested).unwrap();
    assert!(path.exists());
    assert!(path.starts_with(&nested));
}

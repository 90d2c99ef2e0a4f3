//! Host application state and detection loop
//!
//! All toggles live in one shared state struct mutated only through atomics,
//! so voice actions (which run on the cycle thread) and the host's own input
//! handling stay thread-safe.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::Result;
use crate::vision::{FaceDetector, Frame, FrameSource};
use crate::voice::VoiceCommandProcessor;

/// Overlay color for face boxes (cyan)
const FACE_BOX_COLOR: [u8; 3] = [0, 255, 255];

/// Shared host state toggled by voice commands and keyboard shortcuts
pub struct AppState {
    detection_enabled: AtomicBool,
    show_fps: AtomicBool,
    screenshot_requested: AtomicBool,
    exit_requested: AtomicBool,
}

impl AppState {
    /// Create the default state: detection on, FPS overlay off
    #[must_use]
    pub fn new() -> Self {
        Self {
            detection_enabled: AtomicBool::new(true),
            show_fps: AtomicBool::new(false),
            screenshot_requested: AtomicBool::new(false),
            exit_requested: AtomicBool::new(false),
        }
    }

    /// Toggle face detection, returning the new value
    pub fn toggle_detection(&self) -> bool {
        let enabled = !self.detection_enabled.fetch_xor(true, Ordering::AcqRel);
        tracing::info!(enabled, "face detection toggled");
        enabled
    }

    /// Whether face detection is enabled
    #[must_use]
    pub fn detection_enabled(&self) -> bool {
        self.detection_enabled.load(Ordering::Acquire)
    }

    /// Toggle the FPS overlay, returning the new value
    pub fn toggle_fps(&self) -> bool {
        let shown = !self.show_fps.fetch_xor(true, Ordering::AcqRel);
        tracing::info!(shown, "FPS display toggled");
        shown
    }

    /// Whether the FPS overlay is enabled
    #[must_use]
    pub fn fps_shown(&self) -> bool {
        self.show_fps.load(Ordering::Acquire)
    }

    /// Ask the video loop to save the next frame
    pub fn request_screenshot(&self) {
        self.screenshot_requested.store(true, Ordering::Release);
        tracing::info!("screenshot requested");
    }

    /// Consume a pending screenshot request, if any
    pub fn take_screenshot_request(&self) -> bool {
        self.screenshot_requested.swap(false, Ordering::AcqRel)
    }

    /// Ask the application to shut down
    pub fn request_exit(&self) {
        self.exit_requested.store(true, Ordering::Release);
        tracing::info!("exit requested");
    }

    /// Whether shutdown was requested
    #[must_use]
    pub fn exit_requested(&self) -> bool {
        self.exit_requested.load(Ordering::Acquire)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Wire the demo's voice command set to shared host state
///
/// Actions run on the voice cycle thread, so they only touch atomics.
pub fn register_voice_commands(processor: &VoiceCommandProcessor, state: &Arc<AppState>) {
    for phrase in ["start detection", "stop detection", "toggle detection"] {
        let state = Arc::clone(state);
        processor.register_command(phrase, move || {
            state.toggle_detection();
        });
    }
    for phrase in ["show fps", "hide fps"] {
        let state = Arc::clone(state);
        processor.register_command(phrase, move || {
            state.toggle_fps();
        });
    }
    for phrase in ["exit", "quit", "close"] {
        let state = Arc::clone(state);
        processor.register_command(phrase, move || state.request_exit());
    }
    for phrase in ["screenshot", "capture"] {
        let state = Arc::clone(state);
        processor.register_command(phrase, move || state.request_screenshot());
    }
}

/// Rolling frames-per-second counter
pub struct FpsCounter {
    frames: u32,
    started: Instant,
}

impl FpsCounter {
    /// Start counting from now
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: 0,
            started: Instant::now(),
        }
    }

    /// Record one frame and return the average rate so far
    pub fn tick(&mut self) -> f64 {
        self.frames += 1;
        let elapsed = self.started.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            f64::from(self.frames) / elapsed
        } else {
            0.0
        }
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Options for the detection loop
#[derive(Debug, Clone)]
pub struct LoopOptions {
    /// Directory screenshots are written to
    pub screenshot_dir: PathBuf,
}

/// Run the host video loop against the vision boundary
///
/// Pulls frames until the source ends or exit is requested; detects and
/// overlays faces while detection is enabled; services screenshot requests.
/// `on_frame` is the display seam: hosts present the annotated frame there
/// and flip [`AppState`] flags from their own input handling. Voice failures
/// never reach this loop, and detector or screenshot failures are logged and
/// skipped rather than propagated.
///
/// # Errors
///
/// Returns error only if the frame source fails.
pub fn run_detection_loop<S, D, F>(
    source: &mut S,
    detector: &mut D,
    state: &AppState,
    opts: &LoopOptions,
    mut on_frame: F,
) -> Result<()>
where
    S: FrameSource + ?Sized,
    D: FaceDetector + ?Sized,
    F: FnMut(&Frame),
{
    let mut fps = FpsCounter::new();

    while !state.exit_requested() {
        let Some(mut frame) = source.next_frame()? else {
            break;
        };

        if state.detection_enabled() {
            match detector.detect(&frame) {
                Ok(faces) => {
                    for face in &faces {
                        frame.draw_region(*face, FACE_BOX_COLOR);
                    }
                    tracing::trace!(faces = faces.len(), "frame processed");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "face detection failed on frame");
                }
            }
        }

        let rate = fps.tick();
        if state.fps_shown() {
            tracing::debug!(fps = rate, "frame rate");
        }

        if state.take_screenshot_request() {
            match save_screenshot(&frame, &opts.screenshot_dir) {
                Ok(path) => tracing::info!(path = %path.display(), "screenshot saved"),
                Err(e) => tracing::warn!(error = %e, "failed to save screenshot"),
            }
        }

        on_frame(&frame);
    }

    Ok(())
}

/// Save a frame to the screenshot directory with a timestamped name
///
/// # Errors
///
/// Returns error if the directory cannot be created or the PNG write fails
pub fn save_screenshot(frame: &Frame, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let name = format!(
        "visage-{}.png",
        chrono::Local::now().format("%Y%m%d-%H%M%S%.3f")
    );
    let path = dir.join(name);
    frame.save_png(&path)?;
    Ok(path)
}

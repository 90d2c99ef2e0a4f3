//! Integration traits for the video pipeline
//!
//! Cameras and cascade detectors plug in behind these traits; the crate
//! only composes them in the host loop.

use crate::Result;

use super::frame::{Frame, Region};

/// Produces frames from a camera or other video source
pub trait FrameSource: Send {
    /// Pull the next frame; `None` signals the end of the stream
    ///
    /// # Errors
    ///
    /// Returns error if the source fails
    fn next_frame(&mut self) -> Result<Option<Frame>>;
}

/// Locates face-like regions in a frame
///
/// Implementations may be stateful (e.g. tracking across frames), hence
/// `&mut self`.
pub trait FaceDetector: Send {
    /// Detect faces in the frame
    ///
    /// # Errors
    ///
    /// Returns error if detection fails; the host loop logs and skips the
    /// frame
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Region>>;
}

//! Vision boundary
//!
//! Frame and region types plus the traits external camera and detector
//! integrations implement.

mod detector;
mod frame;

pub use detector::{FaceDetector, FrameSource};
pub use frame::{Frame, Region};

#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Frame rate counter for video processing.
///
/// Track and measure frames per second (FPS) during video capture and processing.
pub mod fps_counter;

/// Video4Linux2 (V4L2) camera capture (Linux only).
///
/// Direct access to Linux camera devices via the V4L2 API.
#[cfg(target_os = "linux")]
pub mod v4l;

//! # Frame Source
//!
//! The camera seam: the session pulls greyscale frames through the
//! [`FrameSource`] trait and never talks to capture hardware directly.
//!
//! ## Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      FrameSource Contract                               │
//! │                                                                         │
//! │  next_frame() ──► Some(frame)   frame available, hand it to the codec   │
//! │  next_frame() ──► None          nothing right now (camera warming up,   │
//! │                                 obscured, transiently failing)          │
//! │                                                                         │
//! │  None is NOT an error and NOT end-of-stream: the session keeps          │
//! │  polling on its interval indefinitely. A source that never produces     │
//! │  a frame just yields an endless stream of "no QR" ticks.                │
//! │                                                                         │
//! │  release() is called exactly once, at session close.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use image::GrayImage;

// =============================================================================
// Frame
// =============================================================================

/// A single greyscale camera frame.
#[derive(Debug, Clone)]
pub struct Frame {
    image: GrayImage,
}

impl Frame {
    /// Wraps a greyscale image as a frame.
    pub fn new(image: GrayImage) -> Self {
        Frame { image }
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Luma value at (x, y).
    pub fn luma(&self, x: u32, y: u32) -> u8 {
        self.image.get_pixel(x, y).0[0]
    }

    /// Borrows the underlying image.
    pub fn image(&self) -> &GrayImage {
        &self.image
    }
}

impl From<GrayImage> for Frame {
    fn from(image: GrayImage) -> Self {
        Frame::new(image)
    }
}

// =============================================================================
// FrameSource
// =============================================================================

/// Supplier of camera frames.
///
/// Implementations wrap real capture devices; tests use scripted sources.
pub trait FrameSource: Send + Sync {
    /// Returns the next frame, or `None` if no frame is available right
    /// now. Returning `None` forever is allowed.
    fn next_frame(&mut self) -> Option<Frame>;

    /// Releases the underlying device. Called once when the session
    /// closes. Default is a no-op for sources with nothing to release.
    fn release(&mut self) {}
}

/// A source that never produces a frame.
///
/// Useful as a placeholder and in tests: the session runs its polling
/// loop normally and reports "no QR" every tick.
#[derive(Debug, Default)]
pub struct EmptyFrameSource;

impl FrameSource for EmptyFrameSource {
    fn next_frame(&mut self) -> Option<Frame> {
        None
    }
}

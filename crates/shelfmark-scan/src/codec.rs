//! # QR Codec
//!
//! Decodes QR codes out of camera frames and renders label payloads into
//! QR images.
//!
//! ## Decode Outcomes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Decode Outcome Mapping                             │
//! │                                                                         │
//! │  Frame ──► rqrr grid detection                                          │
//! │               │                                                         │
//! │               ├── no grids            ──► NotFound   (routine)          │
//! │               ├── grid, decode error  ──► DecodeError (transient)       │
//! │               ├── grid, empty text    ──► NotFound   (nothing usable)   │
//! │               └── grid, decoded text  ──► Decoded(text)                 │
//! │                                                                         │
//! │  NotFound and DecodeError are both non-fatal: the session keeps         │
//! │  polling. The distinction only changes what gets reported upstream.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use image::{GrayImage, Luma};
use qrcode::{Color, QrCode};
use tracing::debug;

use crate::error::{ScanError, ScanResult};
use crate::frame::Frame;

// =============================================================================
// Constants
// =============================================================================

/// Default rendered QR image size in pixels (square).
pub const DEFAULT_QR_SIZE: u32 = 250;

/// Quiet-zone width around the rendered code, in modules.
const QUIET_ZONE_MODULES: u32 = 4;

// =============================================================================
// Decode
// =============================================================================

/// Outcome of attempting to decode a QR code from a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// A QR code was found and decoded to non-empty text.
    Decoded(String),

    /// No QR code in this frame. Routine; most frames are like this.
    NotFound,

    /// A code-like region was found but could not be decoded
    /// (blur, glare, partial occlusion). Transient.
    DecodeError(String),
}

/// Decoder seam between the session and a concrete QR library.
pub trait QrDecoder: Send + Sync {
    /// Attempts to decode a QR code from the frame.
    fn decode(&self, frame: &Frame) -> DecodeOutcome;
}

// =============================================================================
// ImageQrCodec
// =============================================================================

/// QR codec backed by `rqrr` (decode) and `qrcode` (encode).
#[derive(Debug, Clone, Default)]
pub struct ImageQrCodec;

impl ImageQrCodec {
    /// Creates a new codec.
    pub fn new() -> Self {
        ImageQrCodec
    }

    /// Renders a payload into a greyscale QR image.
    ///
    /// ## Sizing
    /// - `size` of 0 falls back to [`DEFAULT_QR_SIZE`]
    /// - Modules are scaled up to whole pixels, so the output is at
    ///   least `size` pixels square (never scaled down below one pixel
    ///   per module)
    /// - A 4-module quiet zone surrounds the code
    pub fn encode(&self, payload: &str, size: u32) -> ScanResult<GrayImage> {
        let size = if size == 0 { DEFAULT_QR_SIZE } else { size };

        let code = QrCode::new(payload.as_bytes())
            .map_err(|e| ScanError::EncodeFailed(e.to_string()))?;

        let modules = code.width() as u32;
        let total_modules = modules + 2 * QUIET_ZONE_MODULES;

        // ceil division so the image is >= the requested size
        let scale = size.div_ceil(total_modules).max(1);
        let pixels = total_modules * scale;

        debug!(
            payload_len = payload.len(),
            modules = modules,
            pixels = pixels,
            "Rendering QR label"
        );

        let mut image = GrayImage::from_pixel(pixels, pixels, Luma([255u8]));

        for y in 0..modules {
            for x in 0..modules {
                if code[(x as usize, y as usize)] == Color::Dark {
                    let px = (x + QUIET_ZONE_MODULES) * scale;
                    let py = (y + QUIET_ZONE_MODULES) * scale;
                    for dy in 0..scale {
                        for dx in 0..scale {
                            image.put_pixel(px + dx, py + dy, Luma([0u8]));
                        }
                    }
                }
            }
        }

        Ok(image)
    }
}

impl QrDecoder for ImageQrCodec {
    fn decode(&self, frame: &Frame) -> DecodeOutcome {
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            frame.width() as usize,
            frame.height() as usize,
            |x, y| frame.luma(x as u32, y as u32),
        );

        let grids = prepared.detect_grids();
        let Some(grid) = grids.first() else {
            return DecodeOutcome::NotFound;
        };

        match grid.decode() {
            Ok((_meta, content)) => {
                // a decoded-but-empty payload carries nothing usable
                if content.is_empty() {
                    DecodeOutcome::NotFound
                } else {
                    DecodeOutcome::Decoded(content)
                }
            }
            Err(e) => DecodeOutcome::DecodeError(e.to_string()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use shelfmark_core::BookLabel;

    #[test]
    fn test_encode_decode_roundtrip() {
        let codec = ImageQrCodec::new();
        let label = BookLabel {
            book_id: 12,
            book_name: "Atlas".to_string(),
            borrowed: false,
        };

        let image = codec.encode(&label.payload(), 250).unwrap();
        let frame = Frame::new(image);

        match codec.decode(&frame) {
            DecodeOutcome::Decoded(text) => assert_eq!(text, "12|Atlas|0"),
            other => panic!("expected decode, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_size_zero_uses_default() {
        let codec = ImageQrCodec::new();
        let image = codec.encode("42", 0).unwrap();
        assert!(image.width() >= DEFAULT_QR_SIZE);
        assert_eq!(image.width(), image.height());
    }

    #[test]
    fn test_encode_never_undershoots_requested_size() {
        let codec = ImageQrCodec::new();
        for size in [1, 33, 100, 250, 300] {
            let image = codec.encode("12|Atlas|0", size).unwrap();
            assert!(image.width() >= size, "size {} got {}", size, image.width());
        }
    }

    #[test]
    fn test_decode_blank_frame_is_not_found() {
        let codec = ImageQrCodec::new();
        let frame = Frame::new(GrayImage::from_pixel(100, 100, Luma([255u8])));
        assert_eq!(codec.decode(&frame), DecodeOutcome::NotFound);
    }

    #[test]
    fn test_decode_noise_is_not_decoded() {
        let codec = ImageQrCodec::new();

        // deterministic speckle, no actual QR structure
        let mut img = GrayImage::new(64, 64);
        for (x, y, px) in img.enumerate_pixels_mut() {
            px.0[0] = if (x * 31 + y * 17) % 7 < 3 { 0 } else { 255 };
        }

        match codec.decode(&Frame::new(img)) {
            DecodeOutcome::Decoded(text) => panic!("noise decoded to {:?}", text),
            DecodeOutcome::NotFound | DecodeOutcome::DecodeError(_) => {}
        }
    }
}

//! # shelfmark-scan: Scan Session Engine for Shelfmark
//!
//! This crate runs the QR borrow scan: a single background worker polls
//! camera frames, decodes QR codes, classifies the content with
//! `shelfmark-core`, and drives the session state machine.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Shelfmark Scan Flow                                │
//! │                                                                         │
//! │  Presentation layer                                                     │
//! │    │ spawn / confirm / reject / cancel            ▲ ScanEvent stream    │
//! │    ▼                                              │                     │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                 shelfmark-scan (THIS CRATE)                     │    │
//! │  │                                                                 │    │
//! │  │  ScanSessionHandle ──commands──► ScanSession worker task        │    │
//! │  │                                    │                            │    │
//! │  │                                    │ every poll tick:           │    │
//! │  │                                    ▼                            │    │
//! │  │     FrameSource::next_frame ──► QrDecoder::decode ──► classify  │    │
//! │  │     (camera seam)               (rqrr)               (core)     │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │                                                                         │
//! │  Confirmed borrows come back as `BorrowIntent`; persistence is the      │
//! │  caller's job (shelfmark-db).                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shelfmark_scan::{ImageQrCodec, ScanConfig, ScanSession};
//!
//! let config = ScanConfig::load_or_default(None);
//! let (handle, mut events) = ScanSession::spawn(
//!     Box::new(camera),
//!     Box::new(ImageQrCodec::new()),
//!     config,
//! );
//!
//! while let Some(event) = events.recv().await {
//!     // surface NoQr / QrDetected / ScanFailed to the operator
//! }
//!
//! let intent = handle.confirm("sam").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod codec;
pub mod config;
pub mod error;
pub mod frame;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use codec::{DecodeOutcome, ImageQrCodec, QrDecoder, DEFAULT_QR_SIZE};
pub use config::ScanConfig;
pub use error::{ScanError, ScanResult};
pub use frame::{EmptyFrameSource, Frame, FrameSource};
pub use session::{Detection, ScanEvent, ScanSession, ScanSessionHandle, SessionState};

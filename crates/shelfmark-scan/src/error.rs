//! # Scan Error Types
//!
//! Error types for scan session operations.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Scan Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐  │
//! │  │    Session      │  │     Codec       │  │     Configuration       │  │
//! │  │                 │  │                 │  │                         │  │
//! │  │  NotDetected    │  │  EncodeFailed   │  │  InvalidConfig          │  │
//! │  │  NoBookInfo     │  │                 │  │  ConfigLoadFailed       │  │
//! │  │  SessionClosed  │  │                 │  │  ConfigSaveFailed       │  │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Scan error type covering session and codec failures.
#[derive(Debug, Error)]
pub enum ScanError {
    // =========================================================================
    // Session Errors
    // =========================================================================
    /// Confirm was called while nothing is detected.
    #[error("no detection to confirm")]
    NotDetected,

    /// The detected content carries no usable book information.
    ///
    /// ## When This Occurs
    /// - A QR code decoded cleanly but failed classification
    ///   (e.g. `"7|"` or free text). The session stays in Detected;
    ///   the operator can reject and rescan.
    #[error("scanned content is not a book reference: {raw:?}")]
    NoBookInfo { raw: String },

    /// The session has already closed.
    ///
    /// ## When This Occurs
    /// - Confirm/reject after cancel or a completed confirm
    /// - The worker task ended because the event receiver was dropped
    #[error("scan session is closed")]
    SessionClosed,

    // =========================================================================
    // Codec Errors
    // =========================================================================
    /// Failed to encode a payload into a QR image.
    #[error("QR encoding failed: {0}")]
    EncodeFailed(String),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid scan configuration.
    #[error("Invalid scan configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        ScanError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ScanError {
    fn from(err: toml::de::Error) -> Self {
        ScanError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ScanError {
    fn from(err: toml::ser::Error) -> Self {
        ScanError::ConfigSaveFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ScanError::NoBookInfo {
            raw: "7|".to_string(),
        };
        assert!(err.to_string().contains("7|"));

        assert_eq!(
            ScanError::SessionClosed.to_string(),
            "scan session is closed"
        );
    }
}

//! # shelfmark-core: Pure Business Logic for Shelfmark
//!
//! This crate is the **heart** of Shelfmark, a small library-logging system.
//! It contains all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Shelfmark Architecture                          │
//! │                                                                     │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │              Presentation Layer (external)                    │  │
//! │  │   Login ──► Catalog UI ──► Scanner UI ──► Borrow Confirm      │  │
//! │  └──────────────────────────────┬────────────────────────────────┘  │
//! │                                 │                                   │
//! │  ┌──────────────────────────────▼────────────────────────────────┐  │
//! │  │            ★ shelfmark-core (THIS CRATE) ★                    │  │
//! │  │                                                               │  │
//! │  │  ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌────────────┐    │  │
//! │  │  │  types   │  │ classify │  │  label   │  │ validation │    │  │
//! │  │  │  Book    │  │ QR text  │  │ payload  │  │   rules    │    │  │
//! │  │  │  Role    │  │  rules   │  │ formats  │  │   checks   │    │  │
//! │  │  └──────────┘  └──────────┘  └──────────┘  └────────────┘    │  │
//! │  │                                                               │  │
//! │  │  NO I/O • NO DATABASE • NO CAMERA • PURE FUNCTIONS            │  │
//! │  └──────────────────────────────┬────────────────────────────────┘  │
//! │                                 │                                   │
//! │  ┌──────────────┐  ┌────────────▼──────────┐                        │
//! │  │ shelfmark-db │  │    shelfmark-scan     │                        │
//! │  │ Catalog/SQL  │  │  Camera polling loop  │                        │
//! │  └──────────────┘  └───────────────────────┘                        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Book, Role, User, BorrowIntent, ...)
//! - [`classify`] - QR content classification (is this a book reference?)
//! - [`label`] - QR label payload encoding and parsing
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, camera, file system access is FORBIDDEN here
//! 3. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod classify;
pub mod error;
pub mod label;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use shelfmark_core::Book` instead of
// `use shelfmark_core::types::Book`

pub use classify::{classify, BookRef, Classification};
pub use error::{CoreError, ValidationError};
pub use label::BookLabel;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Field delimiter inside scannable QR content (`book_id|book_name|extra`).
///
/// ## Why a constant?
/// The classifier and the label generator must agree on this character,
/// and book names are validated to never contain it.
pub const LABEL_DELIMITER: char = '|';

/// Name shown when a scanned reference carries no name segment.
///
/// A purely numeric QR payload identifies a book by id only; the
/// presentation layer still needs something to display.
pub const UNKNOWN_BOOK_NAME: &str = "Unknown";

/// Maximum length of a book name.
///
/// ## Business Reason
/// Keeps catalog rows and QR payloads at a sane size. The legacy UI
/// truncated anything longer than 30 characters for display; storage
/// allows more.
pub const MAX_BOOK_NAME_LEN: usize = 200;

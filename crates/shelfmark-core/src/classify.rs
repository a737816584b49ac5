//! # QR Content Classification
//!
//! Decides whether decoded QR text identifies a book, and extracts the
//! fields if it does.
//!
//! ## Accepted Formats
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Classification Rules                             │
//! │                                                                     │
//! │  "12|Atlas"         ──► Book { id: "12", name: "Atlas" }            │
//! │  "12|Atlas|extra"   ──► Book { id: "12", name: "Atlas",             │
//! │                                extra: "extra" }                     │
//! │  "42"               ──► Book { id: "42", name: "Unknown" }          │
//! │                                                                     │
//! │  ""                 ──► Invalid  (nothing scanned)                  │
//! │  "|"                ──► Invalid  (both segments empty)              │
//! │  "7|"               ──► Invalid  (name segment empty)               │
//! │  "|Atlas"           ──► Invalid  (id segment empty)                 │
//! │  "abc"              ──► Invalid  (not delimited, not numeric)       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This function is pure: the scan worker calls it on every decode, and
//! tests call it with plain strings. No camera, no UI.

use serde::{Deserialize, Serialize};

use crate::{LABEL_DELIMITER, UNKNOWN_BOOK_NAME};

// =============================================================================
// Types
// =============================================================================

/// A book reference extracted from scanned QR content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRef {
    /// Id segment. Kept as a string: pipe-delimited payloads are not
    /// required to carry numeric ids.
    pub book_id: String,

    /// Name segment, or [`UNKNOWN_BOOK_NAME`] for numeric-only payloads.
    pub book_name: String,

    /// Third segment, if the payload carried one.
    pub extra: Option<String>,
}

/// Outcome of classifying decoded QR text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classification {
    /// The content identifies a book.
    Book(BookRef),

    /// The content carries no usable book information.
    Invalid,
}

impl Classification {
    /// Whether the content classified as a usable book reference.
    pub fn is_valid(&self) -> bool {
        matches!(self, Classification::Book(_))
    }

    /// Returns the book reference, if valid.
    pub fn as_book(&self) -> Option<&BookRef> {
        match self {
            Classification::Book(book_ref) => Some(book_ref),
            Classification::Invalid => None,
        }
    }
}

// =============================================================================
// Classifier
// =============================================================================

/// Classifies decoded QR text.
///
/// ## Rules
/// - Empty text is `Invalid`.
/// - Text containing `|` is split on *every* occurrence (empty segments
///   are kept, including trailing ones). Valid iff there are at least two
///   segments and the first two are both non-empty.
/// - Otherwise, text of one or more ASCII digits is a bare book id with
///   the name reported as "Unknown".
/// - Everything else is `Invalid`.
///
/// Segments are not trimmed: the payload is machine-generated, and a
/// payload of `" |x"` differs from `"|x"` on purpose.
pub fn classify(text: &str) -> Classification {
    if text.is_empty() {
        return Classification::Invalid;
    }

    if text.contains(LABEL_DELIMITER) {
        // split() keeps empty segments, so "7|" yields ["7", ""] and the
        // empty name segment fails the check below.
        let segments: Vec<&str> = text.split(LABEL_DELIMITER).collect();

        if segments.len() < 2 || segments[0].is_empty() || segments[1].is_empty() {
            return Classification::Invalid;
        }

        return Classification::Book(BookRef {
            book_id: segments[0].to_string(),
            book_name: segments[1].to_string(),
            extra: segments.get(2).map(|s| s.to_string()),
        });
    }

    if text.bytes().all(|b| b.is_ascii_digit()) {
        return Classification::Book(BookRef {
            book_id: text.to_string(),
            book_name: UNKNOWN_BOOK_NAME.to_string(),
            extra: None,
        });
    }

    Classification::Invalid
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_book(text: &str) -> BookRef {
        match classify(text) {
            Classification::Book(book_ref) => book_ref,
            Classification::Invalid => panic!("expected {:?} to classify as a book", text),
        }
    }

    #[test]
    fn test_delimited_content_extracts_segments() {
        let book = expect_book("12|Atlas");
        assert_eq!(book.book_id, "12");
        assert_eq!(book.book_name, "Atlas");
        assert_eq!(book.extra, None);

        let book = expect_book("12|Atlas|first edition");
        assert_eq!(book.book_id, "12");
        assert_eq!(book.book_name, "Atlas");
        assert_eq!(book.extra.as_deref(), Some("first edition"));
    }

    #[test]
    fn test_delimited_id_need_not_be_numeric() {
        let book = expect_book("shelf-9|Moby Dick");
        assert_eq!(book.book_id, "shelf-9");
        assert_eq!(book.book_name, "Moby Dick");
    }

    #[test]
    fn test_trailing_segments_do_not_affect_validity() {
        // extra empties are kept but only the first two segments matter
        let book = expect_book("5|Dune||");
        assert_eq!(book.book_id, "5");
        assert_eq!(book.book_name, "Dune");
        assert_eq!(book.extra.as_deref(), Some(""));
    }

    #[test]
    fn test_numeric_only_content_is_a_bare_id() {
        let book = expect_book("42");
        assert_eq!(book.book_id, "42");
        assert_eq!(book.book_name, "Unknown");
        assert_eq!(book.extra, None);

        let book = expect_book("0");
        assert_eq!(book.book_id, "0");
    }

    #[test]
    fn test_invalid_content() {
        assert_eq!(classify(""), Classification::Invalid);
        assert_eq!(classify("abc"), Classification::Invalid);
        assert_eq!(classify("12a"), Classification::Invalid);
        assert_eq!(classify("4 2"), Classification::Invalid);
    }

    #[test]
    fn test_bare_delimiter_is_invalid() {
        assert_eq!(classify("|"), Classification::Invalid);
        assert_eq!(classify("||"), Classification::Invalid);
    }

    #[test]
    fn test_empty_segments_are_invalid() {
        // empty name segment
        assert_eq!(classify("7|"), Classification::Invalid);
        // empty id segment
        assert_eq!(classify("|Atlas"), Classification::Invalid);
    }

    #[test]
    fn test_segments_are_not_trimmed() {
        let book = expect_book(" 7 | Atlas ");
        assert_eq!(book.book_id, " 7 ");
        assert_eq!(book.book_name, " Atlas ");
    }

    #[test]
    fn test_classification_accessors() {
        assert!(classify("42").is_valid());
        assert!(!classify("|").is_valid());
        assert_eq!(classify("abc").as_book(), None);
        assert_eq!(classify("42").as_book().unwrap().book_id, "42");
    }
}

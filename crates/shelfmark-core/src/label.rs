//! # QR Label Payloads
//!
//! Encoding and parsing of the text embedded in printed book labels.
//!
//! ## Payload Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Label Payload Formats                          │
//! │                                                                     │
//! │  AUTHORITATIVE (generated and scanned):                             │
//! │      12|Atlas|0                                                     │
//! │      └┬┘ └─┬─┘ └┬┘                                                  │
//! │    book_id │  borrowed flag (carried as the "extra" segment)        │
//! │        book_name                                                    │
//! │                                                                     │
//! │  LEGACY (parsed only, never generated):                             │
//! │      book_id=12;book_name=Atlas;borrowed=0                          │
//! │                                                                     │
//! │  The legacy generator and the scanner disagreed about the payload   │
//! │  format: labels were printed as key=value pairs that the scanner's  │
//! │  classifier could never match. The pipe form is now the single      │
//! │  authoritative contract; old printed labels remain parseable here   │
//! │  so stock can be re-labelled from a scan of the old code.           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::Book;
use crate::LABEL_DELIMITER;

// =============================================================================
// Book Label
// =============================================================================

/// The data printed into a book's QR label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLabel {
    /// Catalog row id of the book.
    pub book_id: i64,

    /// Book name at the time the label was generated.
    pub book_name: String,

    /// Borrowed flag at the time the label was generated.
    pub borrowed: bool,
}

impl BookLabel {
    /// Builds a label for a catalog book.
    pub fn for_book(book: &Book) -> Self {
        BookLabel {
            book_id: book.id,
            book_name: book.name.clone(),
            borrowed: book.borrowed,
        }
    }

    /// Renders the authoritative payload (`id|name|flag`).
    ///
    /// The result always classifies as a valid book reference, because
    /// catalog ids are non-empty and book names are validated to be
    /// non-empty and delimiter-free before they reach the store.
    pub fn payload(&self) -> String {
        format!(
            "{}{delim}{}{delim}{}",
            self.book_id,
            self.book_name,
            if self.borrowed { 1 } else { 0 },
            delim = LABEL_DELIMITER,
        )
    }

    /// Parses a payload in either the authoritative or the legacy format.
    pub fn parse(payload: &str) -> CoreResult<Self> {
        if payload.contains('=') {
            Self::parse_legacy(payload)
        } else {
            Self::parse_piped(payload)
        }
    }

    /// Parses the authoritative `id|name|flag` form.
    fn parse_piped(payload: &str) -> CoreResult<Self> {
        let mut segments = payload.split(LABEL_DELIMITER);

        let id_segment = segments.next().unwrap_or_default();
        let book_id: i64 = id_segment
            .parse()
            .map_err(|_| CoreError::MalformedLabel(payload.to_string()))?;

        let book_name = match segments.next() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(CoreError::MalformedLabel(payload.to_string())),
        };

        let borrowed = matches!(segments.next(), Some("1"));

        Ok(BookLabel {
            book_id,
            book_name,
            borrowed,
        })
    }

    /// Parses the legacy `book_id=..;book_name=..;borrowed=..` form.
    fn parse_legacy(payload: &str) -> CoreResult<Self> {
        let mut book_id: Option<i64> = None;
        let mut book_name: Option<String> = None;
        let mut borrowed = false;

        for pair in payload.split(';') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            match key {
                "book_id" => {
                    book_id = Some(
                        value
                            .parse()
                            .map_err(|_| CoreError::MalformedLabel(payload.to_string()))?,
                    );
                }
                "book_name" => book_name = Some(value.to_string()),
                "borrowed" => borrowed = value == "1",
                _ => {}
            }
        }

        match (book_id, book_name) {
            (Some(book_id), Some(book_name)) if !book_name.is_empty() => Ok(BookLabel {
                book_id,
                book_name,
                borrowed,
            }),
            _ => Err(CoreError::MalformedLabel(payload.to_string())),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Validation Module
//!
//! Input validation utilities for Shelfmark.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                              │
//! │                                                                     │
//! │  Layer 1: Presentation (dialogs)                                    │
//! │  ├── Basic format checks (empty, length)                            │
//! │  └── Immediate user feedback                                        │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 2: THIS MODULE - business rule validation                    │
//! │           │                                                         │
//! │           ▼                                                         │
//! │  Layer 3: Database (SQLite)                                         │
//! │  ├── NOT NULL constraints                                           │
//! │  ├── UNIQUE constraints                                             │
//! │  └── CHECK constraints (borrowed flag, role values)                 │
//! │                                                                     │
//! │  Defense in depth: multiple layers catch different errors           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{LABEL_DELIMITER, MAX_BOOK_NAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a book name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most 200 characters
/// - Must not contain the label delimiter `|` or `;`
///
/// The delimiter rule keeps QR payloads unambiguous: a name containing
/// `|` would shift the segment layout of every label printed for it.
///
/// ## Returns
/// The trimmed name.
pub fn validate_book_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "book name".to_string(),
        });
    }

    if name.chars().count() > MAX_BOOK_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "book name".to_string(),
            max: MAX_BOOK_NAME_LEN,
        });
    }

    if name.contains(LABEL_DELIMITER) || name.contains(';') {
        return Err(ValidationError::InvalidFormat {
            field: "book name".to_string(),
            reason: "must not contain '|' or ';'".to_string(),
        });
    }

    Ok(name.to_string())
}

/// Validates a login name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Alphanumeric plus hyphen/underscore only
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        });
    }

    if username.chars().count() > 50 {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: 50,
        });
    }

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a password before hashing.
///
/// ## Rules
/// - At least 8 characters (the legacy system shipped with hardcoded
///   4-character passwords; this floor is part of replacing them)
/// - At most 128 characters
pub fn validate_password(password: &str) -> ValidationResult<()> {
    let chars = password.chars().count();

    if chars < 8 {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 8,
        });
    }

    if chars > 128 {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: 128,
        });
    }

    Ok(())
}

/// Validates a catalog search query.
///
/// ## Rules
/// - Can be empty (returns all books)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Unit Tests
// =============================================================================

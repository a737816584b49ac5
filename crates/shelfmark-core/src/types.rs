//! # Domain Types
//!
//! Core domain types used throughout Shelfmark.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐   ┌─────────────────┐        │
//! │  │     Book      │   │     User      │   │  BorrowIntent   │        │
//! │  │  ───────────  │   │  ───────────  │   │  ─────────────  │        │
//! │  │  id (row id)  │   │  id (row id)  │   │  book_id (str)  │        │
//! │  │  name         │   │  username     │   │  book_name      │        │
//! │  │  borrowed     │   │  role         │   │  borrower       │        │
//! │  └───────────────┘   └───────────────┘   └─────────────────┘        │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐                              │
//! │  │     Role      │   │  BorrowRecord │                              │
//! │  │  ───────────  │   │  ───────────  │                              │
//! │  │ Administrator │   │ persisted row │                              │
//! │  │ Librarian     │   │ of an intent  │                              │
//! │  │ Member        │   │               │                              │
//! │  └───────────────┘   └───────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Note the split between `BorrowIntent` (what the scan session produces,
//! book id still a raw string from the QR payload) and `BorrowRecord`
//! (what the store persisted, with its own row id and timestamp).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Book
// =============================================================================

/// A book in the catalog.
///
/// The id is an INTEGER assigned by the store on insert; callers never
/// choose ids. `borrowed` is a strict two-valued flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Book {
    /// Row id assigned by the catalog store.
    pub id: i64,

    /// Display name of the book.
    pub name: String,

    /// Whether the book is currently borrowed.
    pub borrowed: bool,

    /// When the record was created.
    pub created_at: DateTime<Utc>,

    /// When the record was last modified.
    pub updated_at: DateTime<Utc>,
}

/// Normalizes a raw borrowed flag coming from outside the type system.
///
/// The legacy data entry path accepted arbitrary integers for the flag;
/// anything that is not exactly `1` is stored as not-borrowed.
pub fn normalize_borrowed_flag(raw: i64) -> bool {
    raw == 1
}

// =============================================================================
// Role
// =============================================================================

/// User role, as a closed enumeration.
///
/// ## Why an enum?
/// The legacy system branched on raw strings ("ADMINISTRATOR",
/// "LIBRARIAN", ...) which silently treated typos as unprivileged users.
/// A closed enum forces exhaustive handling at the presentation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full access: catalog management, account creation, label generation.
    Administrator,

    /// Catalog management: add, remove, update books.
    Librarian,

    /// Borrow-only access.
    Member,
}

impl Role {
    /// Whether this role may modify the catalog.
    pub fn can_manage_catalog(&self) -> bool {
        match self {
            Role::Administrator | Role::Librarian => true,
            Role::Member => false,
        }
    }

    /// Whether this role may create accounts and generate labels.
    pub fn is_administrator(&self) -> bool {
        matches!(self, Role::Administrator)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Administrator => write!(f, "ADMINISTRATOR"),
            Role::Librarian => write!(f, "LIBRARIAN"),
            Role::Member => write!(f, "MEMBER"),
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// An account in the credential store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    /// Row id assigned by the store.
    pub id: i64,

    /// Unique login name.
    pub username: String,

    /// Argon2 hash of the password. Never the password itself.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Account role.
    pub role: Role,

    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Borrow Intent / Record
// =============================================================================

/// The tuple produced when a scan is confirmed.
///
/// The scan session only *produces* this value; persisting it through the
/// catalog store is the caller's job. `book_id` stays a string because it
/// is lifted straight out of the QR payload and may refer to a book this
/// store has never seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowIntent {
    /// Book id segment of the scanned reference.
    pub book_id: String,

    /// Book name segment of the scanned reference.
    pub book_name: String,

    /// Identity of the user who confirmed the borrow.
    pub borrower: String,
}

/// A persisted borrow event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct BorrowRecord {
    /// Row id assigned by the store.
    pub id: i64,

    /// Book id as scanned (string; not necessarily a catalog row id).
    pub book_id: String,

    /// Book name as scanned.
    pub book_name: String,

    /// Who borrowed the book.
    pub borrower: String,

    /// When the borrow was confirmed.
    pub borrowed_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_borrowed_flag() {
        assert!(normalize_borrowed_flag(1));
        assert!(!normalize_borrowed_flag(0));
        // anything out of range defaults to not-borrowed
        assert!(!normalize_borrowed_flag(2));
        assert!(!normalize_borrowed_flag(-1));
        assert!(!normalize_borrowed_flag(99));
    }

    #[test]
    fn test_role_permissions() {
        assert!(Role::Administrator.can_manage_catalog());
        assert!(Role::Librarian.can_manage_catalog());
        assert!(!Role::Member.can_manage_catalog());

        assert!(Role::Administrator.is_administrator());
        assert!(!Role::Librarian.is_administrator());
    }

    #[test]
    fn test_role_display_matches_store_format() {
        assert_eq!(Role::Administrator.to_string(), "ADMINISTRATOR");
        assert_eq!(Role::Librarian.to_string(), "LIBRARIAN");
        assert_eq!(Role::Member.to_string(), "MEMBER");
    }
}

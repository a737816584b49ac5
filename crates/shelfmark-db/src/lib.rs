//! # shelfmark-db: Database Layer for Shelfmark
//!
//! This crate provides database access for the Shelfmark library system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Shelfmark Data Flow                            │
//! │                                                                     │
//! │  Presentation action (add book, confirm borrow, login)              │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌───────────────────────────────────────────────────────────────┐  │
//! │  │                  shelfmark-db (THIS CRATE)                    │  │
//! │  │                                                               │  │
//! │  │  ┌──────────────┐   ┌────────────────┐   ┌────────────────┐  │  │
//! │  │  │   Database   │   │  Repositories  │   │   Migrations   │  │  │
//! │  │  │  (pool.rs)   │   │  book / user   │   │   (embedded)   │  │  │
//! │  │  │              │◄──│  borrow        │   │  001_init.sql  │  │  │
//! │  │  │  SqlitePool  │   │                │   │  002_log.sql   │  │  │
//! │  │  └──────────────┘   └────────────────┘   └────────────────┘  │  │
//! │  └───────────────────────────────────────────────────────────────┘  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  SQLite database file (WAL mode)                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The scan session never touches this crate: it only *produces* a
//! `BorrowIntent`, and the presentation layer persists it through
//! [`repository::borrow::BorrowRepository`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shelfmark_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("shelfmark.db")).await?;
//! let books = db.books().find(Some("atlas")).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::DbError;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::book::BookRepository;
pub use repository::borrow::BorrowRepository;
pub use repository::user::UserRepository;

//! # Repository Module
//!
//! Database repository implementations for Shelfmark.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Presentation action                                                    │
//! │       │                                                                 │
//! │       │  db.books().find(Some("atlas"))                                 │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  BookRepository                                                         │
//! │  ├── find(&self, filter)                                                │
//! │  ├── get(&self, id)                                                     │
//! │  ├── add(&self, name, borrowed)                                         │
//! │  ├── update(&self, id, name, borrowed)                                  │
//! │  └── remove(&self, id)                                                  │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                        │
//! │  • Easy to test (in-memory database per test)                          │
//! │  • SQL is isolated in one place                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`book::BookRepository`] - Catalog CRUD and name search
//! - [`user::UserRepository`] - Accounts and credential verification
//! - [`borrow::BorrowRepository`] - Append-only borrow log

pub mod book;
pub mod borrow;
pub mod user;

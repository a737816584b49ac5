//! # Book Repository
//!
//! Database operations for the book catalog.
//!
//! ## Key Operations
//! - Name search using `LIKE '%query%'`
//! - CRUD operations
//! - Borrowed-flag normalization on write
//!
//! ## Name Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Catalog Search Works                             │
//! │                                                                         │
//! │  User types: "atlas"                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  WHERE book_name LIKE '%atlas%'                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                            │
//! │  │ book_record                             │                            │
//! │  │                                         │                            │
//! │  │  3 | Atlas Shrugged      | 0            │ ← MATCH!                   │
//! │  │  7 | World Atlas         | 1            │ ← MATCH!                   │
//! │  │  9 | The Pragmatic Prog. | 0            │                            │
//! │  └─────────────────────────────────────────┘                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Results: [3, 7]   (no filter ⇒ whole catalog)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use shelfmark_core::{normalize_borrowed_flag, Book};

/// Columns every book query selects, aliased to the [`Book`] field names.
const BOOK_COLUMNS: &str = "book_id AS id, book_name AS name, \
     borrowed, created_at, updated_at";

/// Repository for book catalog operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = BookRepository::new(pool);
///
/// // Search by name fragment
/// let results = repo.find(Some("atlas")).await?;
///
/// // Full catalog
/// let all = repo.find(None).await?;
/// ```
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    /// Creates a new BookRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookRepository { pool }
    }

    /// Lists books, optionally filtered by a name fragment.
    ///
    /// ## Behavior
    /// - `None` or an all-whitespace filter returns the whole catalog
    /// - Otherwise matches `book_name LIKE '%fragment%'` (case-insensitive
    ///   for ASCII, per SQLite's LIKE)
    /// - Always ordered by id so results are stable across calls
    pub async fn find(&self, filter: Option<&str>) -> DbResult<Vec<Book>> {
        let filter = filter.map(str::trim).filter(|f| !f.is_empty());

        debug!(filter = ?filter, "Listing books");

        let books = match filter {
            Some(fragment) => {
                let pattern = format!("%{}%", fragment);
                sqlx::query_as::<_, Book>(&format!(
                    "SELECT {BOOK_COLUMNS} FROM book_record \
                     WHERE book_name LIKE ?1 ORDER BY book_id"
                ))
                .bind(pattern)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Book>(&format!(
                    "SELECT {BOOK_COLUMNS} FROM book_record ORDER BY book_id"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        debug!(count = books.len(), "Book search returned");
        Ok(books)
    }

    /// Fetches a single book by id.
    pub async fn get(&self, id: i64) -> DbResult<Book> {
        sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM book_record WHERE book_id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("book", id))
    }

    /// Inserts a new book and returns it with its generated id.
    ///
    /// ## Behavior
    /// - Ids are assigned by SQLite (AUTOINCREMENT); callers never pick them
    /// - `borrowed_flag` is normalized: only exactly 1 means borrowed,
    ///   anything else is stored as available
    pub async fn add(&self, name: &str, borrowed_flag: i64) -> DbResult<Book> {
        let borrowed = normalize_borrowed_flag(borrowed_flag);
        let now = Utc::now();

        debug!(name = %name, borrowed = borrowed, "Adding book");

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO book_record (book_name, borrowed, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?3) RETURNING book_id",
        )
        .bind(name)
        .bind(borrowed)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(Book {
            id,
            name: name.to_string(),
            borrowed,
            created_at: now,
            updated_at: now,
        })
    }

    /// Updates a book's name and/or borrowed flag.
    ///
    /// Fields passed as `None` keep their current value. Errors with
    /// [`DbError::NotFound`] when the id doesn't exist.
    pub async fn update(
        &self,
        id: i64,
        name: Option<&str>,
        borrowed: Option<bool>,
    ) -> DbResult<Book> {
        let now = Utc::now();

        debug!(id = id, name = ?name, borrowed = ?borrowed, "Updating book");

        let result = sqlx::query(
            "UPDATE book_record SET \
                book_name = COALESCE(?2, book_name), \
                borrowed  = COALESCE(?3, borrowed), \
                updated_at = ?4 \
             WHERE book_id = ?1",
        )
        .bind(id)
        .bind(name)
        .bind(borrowed)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("book", id));
        }

        self.get(id).await
    }

    /// Marks a book as borrowed or returned.
    pub async fn set_borrowed(&self, id: i64, borrowed: bool) -> DbResult<Book> {
        self.update(id, None, Some(borrowed)).await
    }

    /// Deletes a book by id.
    ///
    /// Errors with [`DbError::NotFound`] when the id doesn't exist, so the
    /// caller can tell a deletion from a no-op.
    pub async fn remove(&self, id: i64) -> DbResult<()> {
        debug!(id = id, "Removing book");

        let result = sqlx::query("DELETE FROM book_record WHERE book_id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("book", id));
        }

        Ok(())
    }

    /// Returns the number of books in the catalog.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_record")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_add_assigns_sequential_ids() {
        let db = test_db().await;
        let repo = db.books();

        let a = repo.add("Atlas Shrugged", 0).await.unwrap();
        let b = repo.add("World Atlas", 0).await.unwrap();

        assert!(b.id > a.id);
    }

    #[tokio::test]
    async fn test_add_normalizes_borrowed_flag() {
        let db = test_db().await;
        let repo = db.books();

        let stray = repo.add("Dune", 7).await.unwrap();
        assert!(!stray.borrowed);

        let negative = repo.add("Hyperion", -1).await.unwrap();
        assert!(!negative.borrowed);

        let borrowed = repo.add("Foundation", 1).await.unwrap();
        assert!(borrowed.borrowed);
    }

    #[tokio::test]
    async fn test_find_with_fragment() {
        let db = test_db().await;
        let repo = db.books();

        repo.add("Atlas Shrugged", 0).await.unwrap();
        repo.add("World Atlas", 1).await.unwrap();
        repo.add("The Pragmatic Programmer", 0).await.unwrap();

        let hits = repo.find(Some("atlas")).await.unwrap();
        assert_eq!(hits.len(), 2);

        let all = repo.find(None).await.unwrap();
        assert_eq!(all.len(), 3);

        // whitespace-only filter behaves like no filter
        let blank = repo.find(Some("   ")).await.unwrap();
        assert_eq!(blank.len(), 3);
    }

    #[tokio::test]
    async fn test_find_no_match_returns_empty() {
        let db = test_db().await;
        let repo = db.books();

        repo.add("Dune", 0).await.unwrap();

        let hits = repo.find(Some("zzz")).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_update_partial_fields() {
        let db = test_db().await;
        let repo = db.books();

        let book = repo.add("Dnue", 0).await.unwrap();

        // fix the name, leave the flag
        let renamed = repo.update(book.id, Some("Dune"), None).await.unwrap();
        assert_eq!(renamed.name, "Dune");
        assert!(!renamed.borrowed);

        // flip the flag, leave the name
        let flipped = repo.update(book.id, None, Some(true)).await.unwrap();
        assert_eq!(flipped.name, "Dune");
        assert!(flipped.borrowed);
    }

    #[tokio::test]
    async fn test_update_missing_id_is_not_found() {
        let db = test_db().await;
        let repo = db.books();

        let err = repo.update(999, Some("Ghost"), None).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_remove() {
        let db = test_db().await;
        let repo = db.books();

        let book = repo.add("Dune", 0).await.unwrap();
        repo.remove(book.id).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 0);

        let err = repo.remove(book.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_roundtrip() {
        let db = test_db().await;
        let repo = db.books();

        let added = repo.add("Foundation", 1).await.unwrap();
        let fetched = repo.get(added.id).await.unwrap();

        assert_eq!(fetched.id, added.id);
        assert_eq!(fetched.name, "Foundation");
        assert!(fetched.borrowed);
    }
}

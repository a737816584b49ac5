//! # Borrow Repository
//!
//! Persists confirmed borrows and keeps the catalog flag in step.
//!
//! ## Record Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Confirm → Persist                                    │
//! │                                                                         │
//! │  Scan session yields BorrowIntent { book_id: "12", name, borrower }     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  record(intent)                       (one transaction)                 │
//! │       │                                                                 │
//! │       ├── book_id parses as i64 AND row exists?                         │
//! │       │        └── UPDATE book_record SET borrowed = 1                  │
//! │       │                                                                 │
//! │       └── INSERT INTO borrow_log   (always, even for foreign ids)       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ids scanned off a label are strings and may not belong to this catalog
//! at all. The log keeps them verbatim; only ids we actually hold get their
//! catalog flag flipped.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use shelfmark_core::{BorrowIntent, BorrowRecord};

/// Repository for the append-only borrow log.
#[derive(Debug, Clone)]
pub struct BorrowRepository {
    pool: SqlitePool,
}

impl BorrowRepository {
    /// Creates a new BorrowRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BorrowRepository { pool }
    }

    /// Records a confirmed borrow.
    ///
    /// Runs in a single transaction: the log row and the catalog flag
    /// either both land or neither does. An intent whose id isn't in the
    /// catalog is still logged; it just doesn't touch `book_record`.
    pub async fn record(&self, intent: &BorrowIntent) -> DbResult<BorrowRecord> {
        let now = Utc::now();

        debug!(
            book_id = %intent.book_id,
            borrower = %intent.borrower,
            "Recording borrow"
        );

        let mut tx = self.pool.begin().await?;

        if let Ok(catalog_id) = intent.book_id.parse::<i64>() {
            let result = sqlx::query(
                "UPDATE book_record SET borrowed = 1, updated_at = ?2 WHERE book_id = ?1",
            )
            .bind(catalog_id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                debug!(book_id = catalog_id, "Borrowed id not in catalog, logging only");
            }
        }

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO borrow_log (book_id, book_name, borrower, borrowed_at) \
             VALUES (?1, ?2, ?3, ?4) RETURNING id",
        )
        .bind(&intent.book_id)
        .bind(&intent.book_name)
        .bind(&intent.borrower)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            book_id = %intent.book_id,
            book_name = %intent.book_name,
            borrower = %intent.borrower,
            "Borrow recorded"
        );

        Ok(BorrowRecord {
            id,
            book_id: intent.book_id.clone(),
            book_name: intent.book_name.clone(),
            borrower: intent.borrower.clone(),
            borrowed_at: now,
        })
    }

    /// Returns the most recent borrows, newest first.
    pub async fn history(&self, limit: u32) -> DbResult<Vec<BorrowRecord>> {
        let records = sqlx::query_as::<_, BorrowRecord>(
            "SELECT id, book_id, book_name, borrower, borrowed_at \
             FROM borrow_log ORDER BY id DESC LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Returns borrows made by a single borrower, newest first.
    pub async fn history_for(&self, borrower: &str, limit: u32) -> DbResult<Vec<BorrowRecord>> {
        let records = sqlx::query_as::<_, BorrowRecord>(
            "SELECT id, book_id, book_name, borrower, borrowed_at \
             FROM borrow_log WHERE borrower = ?1 ORDER BY id DESC LIMIT ?2",
        )
        .bind(borrower)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
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

    fn intent(book_id: &str, book_name: &str, borrower: &str) -> BorrowIntent {
        BorrowIntent {
            book_id: book_id.to_string(),
            book_name: book_name.to_string(),
            borrower: borrower.to_string(),
        }
    }

    #[tokio::test]
    async fn test_record_flips_catalog_flag() {
        let db = test_db().await;

        let book = db.books().add("Dune", 0).await.unwrap();
        assert!(!book.borrowed);

        let record = db
            .borrows()
            .record(&intent(&book.id.to_string(), "Dune", "sam"))
            .await
            .unwrap();
        assert_eq!(record.borrower, "sam");

        let after = db.books().get(book.id).await.unwrap();
        assert!(after.borrowed);
    }

    #[tokio::test]
    async fn test_record_foreign_id_logs_without_catalog_change() {
        let db = test_db().await;

        db.books().add("Dune", 0).await.unwrap();

        // id 9999 is not in the catalog, and "X-42" isn't even numeric
        db.borrows()
            .record(&intent("9999", "Ghost Book", "sam"))
            .await
            .unwrap();
        db.borrows()
            .record(&intent("X-42", "Alien Label", "sam"))
            .await
            .unwrap();

        let history = db.borrows().history(10).await.unwrap();
        assert_eq!(history.len(), 2);

        // catalog untouched
        let catalog = db.books().find(None).await.unwrap();
        assert!(catalog.iter().all(|b| !b.borrowed));
    }

    #[tokio::test]
    async fn test_history_is_newest_first() {
        let db = test_db().await;
        let repo = db.borrows();

        repo.record(&intent("1", "First", "sam")).await.unwrap();
        repo.record(&intent("2", "Second", "kim")).await.unwrap();
        repo.record(&intent("3", "Third", "sam")).await.unwrap();

        let all = repo.history(10).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].book_name, "Third");
        assert_eq!(all[2].book_name, "First");

        let sams = repo.history_for("sam", 10).await.unwrap();
        assert_eq!(sams.len(), 2);
        assert!(sams.iter().all(|r| r.borrower == "sam"));
    }
}

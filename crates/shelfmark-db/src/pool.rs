//! # Database Handle
//!
//! Owns the SQLite connection pool and hands out repositories.
//!
//! ## Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     One Database, Three Doors                       │
//! │                                                                     │
//! │   Database::new(DbConfig) ── connect, WAL, migrate ──┐              │
//! │                                                      ▼              │
//! │                                        ┌──────────────────────┐     │
//! │   db.books()   ── BookRepository   ──► │                      │     │
//! │   db.users()   ── UserRepository   ──► │     SqlitePool       │     │
//! │   db.borrows() ── BorrowRepository ──► │  (shared, cloned)    │     │
//! │                                        └──────────────────────┘     │
//! │                                                      │              │
//! │                                                      ▼              │
//! │                                        shelfmark.db (file, WAL)     │
//! │                                        or :memory: (tests, 1 conn)  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A library desk is a low-traffic workload: one operator, occasional
//! catalog searches while a borrow is being confirmed. The pool exists
//! so the borrow transaction and a concurrent catalog read don't queue
//! behind each other, not for throughput. WAL journal mode is what makes
//! that pairing safe: a reader never blocks the writer and vice versa.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::book::BookRepository;
use crate::repository::borrow::BorrowRepository;
use crate::repository::user::UserRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Where the database lives and how many connections serve it.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file. Created on first connect.
    pub database_path: PathBuf,

    /// Connections in the pool. A single desk never needs many; the
    /// default of 5 leaves headroom for the seed binary and tests.
    pub max_connections: u32,

    /// Connections kept warm between bursts.
    pub min_connections: u32,
}

impl DbConfig {
    /// Configuration for an on-disk catalog at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
        }
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Configuration for an in-memory catalog.
    ///
    /// Every test gets its own isolated database this way. Capped at a
    /// single connection: each connection to `:memory:` would otherwise
    /// see its own empty database.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// Entry point to the catalog: pool plus repository accessors.
///
/// Cloning is cheap (the pool is internally shared), so the presentation
/// layer can hold one `Database` per window without coordination.
///
/// ```rust,ignore
/// let db = Database::new(DbConfig::new("./shelfmark.db")).await?;
/// let overdue_candidates = db.books().find(Some("atlas")).await?;
/// let user = db.users().verify_credentials("librarian", &entered).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (creating if needed) the database and brings the schema up
    /// to date.
    ///
    /// Connection settings, in order of consequence:
    /// - WAL journal mode, so catalog reads and the borrow transaction
    ///   don't serialize against each other
    /// - NORMAL synchronous: survives corruption on crash, may lose the
    ///   last transaction (acceptable for a desk log)
    /// - foreign keys on (SQLite leaves them off unless asked)
    ///
    /// Migrations run before this returns; a `Database` you can hold is
    /// always at the current schema.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening catalog database"
        );

        // mode=rwc: read/write, create when missing
        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Some(Duration::from_secs(600)))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        debug!(
            max_connections = config.max_connections,
            "Catalog pool ready"
        );

        let db = Database { pool };
        migrations::run_migrations(&db.pool).await?;

        Ok(db)
    }

    /// The raw pool, for the odd query no repository covers.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Book catalog operations.
    pub fn books(&self) -> BookRepository {
        BookRepository::new(self.pool.clone())
    }

    /// Account and credential operations.
    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    /// Borrow log operations.
    pub fn borrows(&self) -> BorrowRepository {
        BorrowRepository::new(self.pool.clone())
    }

    /// Closes the pool. Repository calls fail afterwards.
    pub async fn close(&self) {
        info!("Closing catalog database");
        self.pool.close().await;
    }

    /// True when the database still answers queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
    }

    #[tokio::test]
    async fn test_config_builder() {
        let config = DbConfig::new("/tmp/test.db")
            .max_connections(10)
            .min_connections(2);

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
    }

    #[tokio::test]
    async fn test_schema_is_current_after_open() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let (total, applied) = migrations::migration_status(db.pool()).await.unwrap();
        assert_eq!(total, applied);
    }

    #[tokio::test]
    async fn test_closed_pool_fails_health_check() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(!db.health_check().await);
    }
}

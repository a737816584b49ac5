//! # Schema Migrations
//!
//! The catalog schema ships inside the binary. `sqlx::migrate!` embeds
//! every SQL file from `migrations/sqlite/` at compile time, so a fresh
//! `shelfmark.db` needs nothing on disk besides the executable, and an
//! old one is upgraded in place the next time it is opened.
//!
//! Schema changes are additive: a new `NNN_description.sql` file with
//! the next sequence number. Shipped files are never edited, sqlx
//! checksums them and refuses to open a database whose applied
//! migrations no longer match.

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Applies any migrations the database has not seen yet.
///
/// Called by `Database::new` on every open. Each migration runs in its
/// own transaction and already-applied ones are skipped, so repeated
/// calls are harmless.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("catalog schema is current");
    Ok(())
}

/// Counts of (shipped, applied) migrations, for diagnostics.
///
/// The two differ only between open and the `run_migrations` call that
/// follows it, or when the binary is older than the database.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    // The bookkeeping table does not exist before the first migration
    // has run. Treat that as zero applied.
    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
        .unwrap_or(0);

    Ok((total, applied as usize))
}

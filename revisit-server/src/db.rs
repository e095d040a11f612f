//! Visitor record storage
//!
//! SQLite-backed store for remembered names. One live record per strong
//! fingerprint (upsert on store); `soft_fp` is indexed as the fallback
//! lookup key.

use std::path::Path;

use revisit_common::{Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// A stored visitor row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct VisitorRow {
    pub strong_fp: String,
    pub soft_fp: String,
    pub name: String,
}

/// Open (creating if missing) the visitor database at `path`.
pub async fn connect(path: &Path) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .map_err(db_err)?;

    init_schema(&pool).await?;
    Ok(pool)
}

/// In-memory database for tests. Single connection, so every query sees the
/// same database.
pub async fn connect_memory() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .map_err(db_err)?;

    init_schema(&pool).await?;
    Ok(pool)
}

/// Create the schema if it does not exist yet.
async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS visitors (
            strong_fp  TEXT PRIMARY KEY,
            soft_fp    TEXT NOT NULL,
            name       TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await
    .map_err(db_err)?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_visitors_soft_fp ON visitors (soft_fp)")
        .execute(pool)
        .await
        .map_err(db_err)?;

    Ok(())
}

/// Find the record owning a strong fingerprint.
pub async fn find_by_strong(pool: &SqlitePool, strong_fp: &str) -> Result<Option<VisitorRow>> {
    sqlx::query_as::<_, VisitorRow>(
        "SELECT strong_fp, soft_fp, name FROM visitors WHERE strong_fp = ?",
    )
    .bind(strong_fp)
    .fetch_optional(pool)
    .await
    .map_err(db_err)
}

/// Find a record by soft fingerprint. Collisions are expected; the most
/// recently updated record wins so the answer is deterministic.
pub async fn find_by_soft(pool: &SqlitePool, soft_fp: &str) -> Result<Option<VisitorRow>> {
    sqlx::query_as::<_, VisitorRow>(
        "SELECT strong_fp, soft_fp, name FROM visitors
         WHERE soft_fp = ?
         ORDER BY updated_at DESC
         LIMIT 1",
    )
    .bind(soft_fp)
    .fetch_optional(pool)
    .await
    .map_err(db_err)
}

/// Insert or replace the record for a strong fingerprint.
pub async fn upsert(pool: &SqlitePool, strong_fp: &str, soft_fp: &str, name: &str) -> Result<()> {
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO visitors (strong_fp, soft_fp, name, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT(strong_fp) DO UPDATE SET
            soft_fp = excluded.soft_fp,
            name = excluded.name,
            updated_at = excluded.updated_at",
    )
    .bind(strong_fp)
    .bind(soft_fp)
    .bind(name)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await
    .map_err(db_err)?;

    Ok(())
}

/// Delete the record owning a strong fingerprint. Returns the number of rows
/// removed; deleting an absent record is not an error.
pub async fn delete_by_strong(pool: &SqlitePool, strong_fp: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM visitors WHERE strong_fp = ?")
        .bind(strong_fp)
        .execute(pool)
        .await
        .map_err(db_err)?;

    Ok(result.rows_affected())
}

fn db_err(err: sqlx::Error) -> Error {
    Error::Internal(format!("database error: {}", err))
}

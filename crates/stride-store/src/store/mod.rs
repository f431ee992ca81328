//! SQLite-backed store.
//!
//! Split into focused submodules:
//! - `ledger` — the activity ledger (per-day completion upserts and range queries)
//! - `streaks` — per-(user, task) streak counter rows
//! - `users` — user profiles: task selection, threshold, global streak fields
//! - `polls` — inbound poll-response audit rows

mod ledger;
mod polls;
mod streaks;
mod users;

pub use polls::PollResponse;
pub use users::NewUser;

use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use stride_core::config::{shellexpand, StoreConfig};
use stride_core::error::StrideError;
use tracing::info;

/// Calendar-day storage format; dates live as `YYYY-MM-DD` TEXT in SQLite.
const DAY_FORMAT: &str = "%Y-%m-%d";

/// Persistent store backed by SQLite.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Create a new store, running migrations on first use.
    pub async fn new(config: &StoreConfig) -> Result<Self, StrideError> {
        let db_path = shellexpand(&config.db_path);

        // Ensure parent directory exists.
        if let Some(parent) = std::path::Path::new(&db_path).parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StrideError::Storage(format!("failed to create data dir: {e}")))?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| StrideError::Storage(format!("invalid db path: {e}")))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(opts)
            .await
            .map_err(|e| StrideError::Storage(format!("failed to connect to sqlite: {e}")))?;

        Self::run_migrations(&pool).await?;

        info!("Store initialized at {db_path}");

        Ok(Self { pool })
    }

    /// An ephemeral in-memory store, for tests and dry runs.
    pub async fn in_memory() -> Result<Self, StrideError> {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| StrideError::Storage(format!("invalid db options: {e}")))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts)
            .await
            .map_err(|e| StrideError::Storage(format!("failed to open in-memory db: {e}")))?;

        Self::run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// Get a reference to the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run SQL migrations, tracking which have already been applied.
    async fn run_migrations(pool: &SqlitePool) -> Result<(), StrideError> {
        sqlx::raw_sql(
            "CREATE TABLE IF NOT EXISTS _migrations (
                name TEXT PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )
        .execute(pool)
        .await
        .map_err(|e| StrideError::Storage(format!("failed to create migrations table: {e}")))?;

        let migrations: &[(&str, &str)] = &[
            ("001_init", include_str!("../../migrations/001_init.sql")),
            (
                "002_poll_responses",
                include_str!("../../migrations/002_poll_responses.sql"),
            ),
        ];

        for (name, sql) in migrations {
            let applied: Option<(String,)> =
                sqlx::query_as("SELECT name FROM _migrations WHERE name = ?")
                    .bind(name)
                    .fetch_optional(pool)
                    .await
                    .map_err(|e| {
                        StrideError::Storage(format!("failed to check migration {name}: {e}"))
                    })?;

            if applied.is_some() {
                continue;
            }

            sqlx::raw_sql(sql)
                .execute(pool)
                .await
                .map_err(|e| StrideError::Storage(format!("migration {name} failed: {e}")))?;

            sqlx::query("INSERT INTO _migrations (name) VALUES (?)")
                .bind(name)
                .execute(pool)
                .await
                .map_err(|e| {
                    StrideError::Storage(format!("failed to record migration {name}: {e}"))
                })?;
        }
        Ok(())
    }
}

/// Format a calendar day for storage.
pub(crate) fn day_to_sql(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}

/// Parse a stored calendar day back into a date.
pub(crate) fn day_from_sql(s: &str) -> Result<NaiveDate, StrideError> {
    NaiveDate::parse_from_str(s, DAY_FORMAT)
        .map_err(|e| StrideError::Storage(format!("bad stored date '{s}': {e}")))
}

#[cfg(test)]
mod tests;

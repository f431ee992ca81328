//! Activity ledger — the single source of truth for per-day completion.

use super::{day_from_sql, day_to_sql, Store};
use chrono::NaiveDate;
use stride_core::error::StrideError;
use stride_core::types::{ActivityRecord, Source};
use uuid::Uuid;

/// Row shape shared by the ledger queries.
type ActivityRow = (String, String, String, String, i64, Option<String>, String);

fn row_to_record(row: ActivityRow) -> Result<ActivityRecord, StrideError> {
    let (id, user_id, task_id, date, completed, value, source) = row;
    Ok(ActivityRecord {
        id,
        user_id,
        task_id,
        date: day_from_sql(&date)?,
        completed: completed != 0,
        value,
        source: Source::from_str_lossy(&source),
    })
}

impl Store {
    /// Upsert the unique `(user, task, date)` completion record.
    ///
    /// Creates the row on first toggle for that task/day, otherwise
    /// overwrites `completed` and `source` in place. The uniqueness
    /// constraint makes concurrent toggles of the same key last-write-wins
    /// rather than duplicating rows.
    pub async fn set_completion(
        &self,
        user_id: &str,
        task_id: &str,
        date: NaiveDate,
        completed: bool,
        source: Source,
    ) -> Result<ActivityRecord, StrideError> {
        if task_id.trim().is_empty() {
            return Err(StrideError::Validation("task id must not be empty".into()));
        }

        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO activities (id, user_id, task_id, date, completed, source) \
             VALUES (?, ?, ?, ?, ?, ?) \
             ON CONFLICT(user_id, task_id, date) DO UPDATE \
             SET completed = excluded.completed, source = excluded.source, \
                 updated_at = datetime('now')",
        )
        .bind(&id)
        .bind(user_id)
        .bind(task_id)
        .bind(day_to_sql(date))
        .bind(completed as i64)
        .bind(source.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| StrideError::Storage(format!("set completion failed: {e}")))?;

        // Read the surviving row back; on conflict the original id wins.
        let row: ActivityRow = sqlx::query_as(
            "SELECT id, user_id, task_id, date, completed, value, source \
             FROM activities WHERE user_id = ? AND task_id = ? AND date = ?",
        )
        .bind(user_id)
        .bind(task_id)
        .bind(day_to_sql(date))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StrideError::Storage(format!("fetch completion failed: {e}")))?;

        row_to_record(row)
    }

    /// All ledger records for a user within `[start, end]`, inclusive,
    /// ordered by date then task id.
    pub async fn find_by_user_and_date_range(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ActivityRecord>, StrideError> {
        let rows: Vec<ActivityRow> = sqlx::query_as(
            "SELECT id, user_id, task_id, date, completed, value, source \
             FROM activities \
             WHERE user_id = ? AND date >= ? AND date <= ? \
             ORDER BY date ASC, task_id ASC",
        )
        .bind(user_id)
        .bind(day_to_sql(start))
        .bind(day_to_sql(end))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StrideError::Storage(format!("range query failed: {e}")))?;

        rows.into_iter().map(row_to_record).collect()
    }

    /// How many of the user's tasks are marked complete on `date`.
    pub async fn count_completed(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<i64, StrideError> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM activities \
             WHERE user_id = ? AND date = ? AND completed = 1",
        )
        .bind(user_id)
        .bind(day_to_sql(date))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StrideError::Storage(format!("count query failed: {e}")))?;

        Ok(row.0)
    }
}

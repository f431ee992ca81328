//! Per-(user, task) streak counter rows.

use super::{day_from_sql, day_to_sql, Store};
use stride_core::error::StrideError;
use stride_core::types::TaskStreakState;
use uuid::Uuid;

type StreakRow = (i64, i64, i64, Option<String>);

fn row_to_state(row: StreakRow) -> Result<TaskStreakState, StrideError> {
    let (current_streak, best_streak, total_days, last_completed) = row;
    Ok(TaskStreakState {
        current_streak,
        best_streak,
        total_days,
        last_completed: last_completed.as_deref().map(day_from_sql).transpose()?,
    })
}

impl Store {
    /// Load the streak state for a (user, task), zeros when no row exists yet.
    pub async fn get_task_streak(
        &self,
        user_id: &str,
        task_id: &str,
    ) -> Result<TaskStreakState, StrideError> {
        let row: Option<StreakRow> = sqlx::query_as(
            "SELECT current_streak, best_streak, total_days, last_completed \
             FROM streaks WHERE user_id = ? AND task_id = ?",
        )
        .bind(user_id)
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StrideError::Storage(format!("streak query failed: {e}")))?;

        row.map(row_to_state)
            .transpose()
            .map(|s| s.unwrap_or_default())
    }

    /// Persist streak state (upsert by user + task).
    pub async fn save_task_streak(
        &self,
        user_id: &str,
        task_id: &str,
        state: &TaskStreakState,
    ) -> Result<(), StrideError> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO streaks \
             (id, user_id, task_id, current_streak, best_streak, total_days, last_completed) \
             VALUES (?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT(user_id, task_id) DO UPDATE \
             SET current_streak = excluded.current_streak, \
                 best_streak = excluded.best_streak, \
                 total_days = excluded.total_days, \
                 last_completed = excluded.last_completed, \
                 updated_at = datetime('now')",
        )
        .bind(&id)
        .bind(user_id)
        .bind(task_id)
        .bind(state.current_streak)
        .bind(state.best_streak)
        .bind(state.total_days)
        .bind(state.last_completed.map(day_to_sql))
        .execute(&self.pool)
        .await
        .map_err(|e| StrideError::Storage(format!("save streak failed: {e}")))?;

        Ok(())
    }

    /// All streak rows for a user, keyed by task id.
    pub async fn get_all_task_streaks(
        &self,
        user_id: &str,
    ) -> Result<Vec<(String, TaskStreakState)>, StrideError> {
        let rows: Vec<(String, i64, i64, i64, Option<String>)> = sqlx::query_as(
            "SELECT task_id, current_streak, best_streak, total_days, last_completed \
             FROM streaks WHERE user_id = ? ORDER BY task_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StrideError::Storage(format!("streaks query failed: {e}")))?;

        rows.into_iter()
            .map(|(task_id, c, b, t, l)| Ok((task_id, row_to_state((c, b, t, l))?)))
            .collect()
    }
}

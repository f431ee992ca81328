//! User profile rows.
//!
//! Registration and authentication live with a collaborator; this module
//! only covers the slice the engine needs: task selection, threshold,
//! phone lookup, and the profile-embedded global streak fields. The global
//! streak columns are written exclusively through `save_global_streak`.

use super::{day_from_sql, day_to_sql, Store};
use stride_core::error::StrideError;
use stride_core::types::{GlobalStreakState, TaskSelection, User};
use uuid::Uuid;

/// Fields needed to seed a user row (used by tests and the CLI).
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub selection: TaskSelection,
    pub min_tasks_required: i64,
}

type UserRow = (
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    i64,
    i64,
    i64,
    Option<String>,
);

fn row_to_user(row: UserRow) -> Result<User, StrideError> {
    let (
        id,
        first_name,
        last_name,
        email,
        phone,
        career,
        personal,
        custom,
        min_tasks_required,
        global_current,
        global_best,
        global_last,
    ) = row;

    let selection = TaskSelection {
        career: serde_json::from_str(&career)?,
        personal: serde_json::from_str(&personal)?,
        custom: serde_json::from_str(&custom)?,
    };

    Ok(User {
        id,
        first_name,
        last_name,
        email,
        phone,
        selection,
        min_tasks_required,
        global_streak: GlobalStreakState {
            current_streak: global_current,
            best_streak: global_best,
            last_completed: global_last.as_deref().map(day_from_sql).transpose()?,
        },
    })
}

const USER_COLUMNS: &str = "id, first_name, last_name, email, phone, \
     career_tasks, personal_tasks, custom_tasks, min_tasks_required, \
     global_current, global_best, global_last_completed";

impl Store {
    /// Insert a user row, returning its id.
    pub async fn create_user(&self, new: &NewUser) -> Result<String, StrideError> {
        if new.min_tasks_required < 1 {
            return Err(StrideError::Validation(
                "min_tasks_required must be at least 1".into(),
            ));
        }

        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO users \
             (id, first_name, last_name, email, phone, career_tasks, personal_tasks, \
              custom_tasks, min_tasks_required) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(serde_json::to_string(&new.selection.career)?)
        .bind(serde_json::to_string(&new.selection.personal)?)
        .bind(serde_json::to_string(&new.selection.custom)?)
        .bind(new.min_tasks_required)
        .execute(&self.pool)
        .await
        .map_err(|e| StrideError::Storage(format!("create user failed: {e}")))?;

        Ok(id)
    }

    /// Load a user by id.
    pub async fn get_user(&self, user_id: &str) -> Result<User, StrideError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StrideError::Storage(format!("user query failed: {e}")))?;

        match row {
            Some(row) => row_to_user(row),
            None => Err(StrideError::NotFound(format!("user {user_id}"))),
        }
    }

    /// Resolve a user by messaging address. Matches with or without a
    /// channel prefix (e.g. `whatsapp:+15551234`).
    pub async fn find_user_by_phone(&self, address: &str) -> Result<Option<User>, StrideError> {
        let clean = address
            .split_once(':')
            .map(|(_, rest)| rest)
            .unwrap_or(address);

        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE phone = ? OR phone = ? LIMIT 1"
        ))
        .bind(clean)
        .bind(address)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StrideError::Storage(format!("phone lookup failed: {e}")))?;

        row.map(row_to_user).transpose()
    }

    /// All users with a phone on file, for reminder fan-out.
    pub async fn users_with_phone(&self) -> Result<Vec<User>, StrideError> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE phone != '' ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StrideError::Storage(format!("users query failed: {e}")))?;

        rows.into_iter().map(row_to_user).collect()
    }

    /// Replace a user's task selection groups.
    pub async fn set_task_selection(
        &self,
        user_id: &str,
        selection: &TaskSelection,
    ) -> Result<(), StrideError> {
        let result = sqlx::query(
            "UPDATE users SET career_tasks = ?, personal_tasks = ?, custom_tasks = ? \
             WHERE id = ?",
        )
        .bind(serde_json::to_string(&selection.career)?)
        .bind(serde_json::to_string(&selection.personal)?)
        .bind(serde_json::to_string(&selection.custom)?)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| StrideError::Storage(format!("selection update failed: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(StrideError::NotFound(format!("user {user_id}")));
        }
        Ok(())
    }

    /// Update the global-streak threshold. Past days are not re-evaluated.
    pub async fn set_min_tasks_required(&self, user_id: &str, n: i64) -> Result<(), StrideError> {
        if n < 1 {
            return Err(StrideError::Validation(
                "minimum tasks required must be at least 1".into(),
            ));
        }

        let result = sqlx::query("UPDATE users SET min_tasks_required = ? WHERE id = ?")
            .bind(n)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| StrideError::Storage(format!("settings update failed: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(StrideError::NotFound(format!("user {user_id}")));
        }
        Ok(())
    }

    /// Persist the profile-embedded global streak fields.
    pub async fn save_global_streak(
        &self,
        user_id: &str,
        state: &GlobalStreakState,
    ) -> Result<(), StrideError> {
        let result = sqlx::query(
            "UPDATE users SET global_current = ?, global_best = ?, global_last_completed = ? \
             WHERE id = ?",
        )
        .bind(state.current_streak)
        .bind(state.best_streak)
        .bind(state.last_completed.map(day_to_sql))
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| StrideError::Storage(format!("global streak update failed: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(StrideError::NotFound(format!("user {user_id}")));
        }
        Ok(())
    }
}

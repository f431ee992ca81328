//! Poll-response audit — every interpreted inbound message, raw and parsed.

use super::{day_from_sql, day_to_sql, Store};
use chrono::NaiveDate;
use stride_core::error::StrideError;
use uuid::Uuid;

/// One recorded inbound poll answer.
#[derive(Debug, Clone)]
pub struct PollResponse {
    pub user_id: String,
    pub date: NaiveDate,
    /// Task ids the message resolved to (empty for status/acknowledged).
    pub responses: Vec<String>,
    pub raw_message: String,
}

impl Store {
    /// Record one interpreted inbound message.
    pub async fn record_poll_response(
        &self,
        user_id: &str,
        date: NaiveDate,
        responses: &[String],
        raw_message: &str,
    ) -> Result<(), StrideError> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO poll_responses (id, user_id, date, responses, raw_message) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(day_to_sql(date))
        .bind(serde_json::to_string(responses)?)
        .bind(raw_message)
        .execute(&self.pool)
        .await
        .map_err(|e| StrideError::Storage(format!("record poll response failed: {e}")))?;

        Ok(())
    }

    /// Recorded responses for a user on a day, oldest first.
    pub async fn poll_responses_for_day(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<PollResponse>, StrideError> {
        let rows: Vec<(String, String, String)> = sqlx::query_as(
            "SELECT date, responses, raw_message FROM poll_responses \
             WHERE user_id = ? AND date = ? ORDER BY created_at ASC",
        )
        .bind(user_id)
        .bind(day_to_sql(date))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StrideError::Storage(format!("poll responses query failed: {e}")))?;

        rows.into_iter()
            .map(|(date, responses, raw_message)| {
                Ok(PollResponse {
                    user_id: user_id.to_string(),
                    date: day_from_sql(&date)?,
                    responses: serde_json::from_str(&responses)?,
                    raw_message,
                })
            })
            .collect()
    }
}

//! Streak state machine.
//!
//! One continuation rule, applied at two granularities: per (user, task)
//! on every completion, and per user once a day's completed count reaches
//! the configured threshold. Both updates are idempotent per calendar day
//! (a day already recorded as `last_completed` is never counted twice), so
//! a crash between the two writes heals on the next qualifying event.

use crate::Engine;
use chrono::NaiveDate;
use stride_core::error::StrideError;
use stride_core::types::{CompletionOutcome, Source};
use tracing::debug;

/// The continuation rule: completing the day after `last_completed` (or
/// starting from zero) extends the streak; any gap of one or more missed
/// days restarts it at 1.
fn continue_streak(current: i64, last_completed: Option<NaiveDate>, date: NaiveDate) -> i64 {
    let yesterday = date.pred_opt();
    if (last_completed.is_some() && last_completed == yesterday) || current == 0 {
        current + 1
    } else {
        1
    }
}

impl Engine {
    /// Apply one completion toggle: upsert the ledger row, advance the
    /// per-task streak (on completion only), then re-evaluate the global
    /// streak for that date.
    ///
    /// Streak counters are advance-only: setting `completed = false` writes
    /// the ledger but never rolls back streak state already recorded for
    /// that day, and a completion backfilled for a date before
    /// `last_completed` updates the ledger without touching the counters.
    /// That asymmetry is intentional and relied upon.
    pub async fn apply_completion(
        &self,
        user_id: &str,
        task_id: &str,
        date: NaiveDate,
        completed: bool,
        source: Source,
    ) -> Result<CompletionOutcome, StrideError> {
        let user = self.store.get_user(user_id).await?;

        self.store
            .set_completion(user_id, task_id, date, completed, source)
            .await?;

        if completed {
            self.advance_task_streak(user_id, task_id, date).await?;
        }

        let completed_count = self.store.count_completed(user_id, date).await?;
        let min_required = user.min_tasks_required;
        let streak_updated = completed_count >= min_required;

        // Below threshold nothing changes, even if the day was previously
        // counted: an uncompletion that drops the count does not undo an
        // already-recorded global-streak day.
        if streak_updated {
            self.advance_global_streak(user_id, date).await?;
        }

        Ok(CompletionOutcome {
            completed_count,
            min_required,
            streak_updated,
        })
    }

    /// Update the global-streak threshold. `Validation` if `n < 1`; past
    /// days are never re-evaluated against the new value.
    pub async fn update_min_tasks_required(
        &self,
        user_id: &str,
        n: i64,
    ) -> Result<(), StrideError> {
        self.store.set_min_tasks_required(user_id, n).await
    }

    /// Advance the per-task streak for a completed day. No-op when the day
    /// is already counted.
    async fn advance_task_streak(
        &self,
        user_id: &str,
        task_id: &str,
        date: NaiveDate,
    ) -> Result<(), StrideError> {
        let mut state = self.store.get_task_streak(user_id, task_id).await?;

        // Idempotent per day, and last_completed never moves backwards: a
        // backfilled completion for an earlier date updates the ledger but
        // leaves streak state where it is.
        if state.last_completed >= Some(date) {
            return Ok(());
        }

        state.current_streak = continue_streak(state.current_streak, state.last_completed, date);
        state.best_streak = state.best_streak.max(state.current_streak);
        state.total_days += 1;
        state.last_completed = Some(date);

        debug!(
            "task streak {user_id}/{task_id}: current={} best={}",
            state.current_streak, state.best_streak
        );
        self.store.save_task_streak(user_id, task_id, &state).await
    }

    /// Advance the global streak for a date whose completed count met the
    /// threshold. At most once per calendar day.
    async fn advance_global_streak(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<(), StrideError> {
        // Re-read so repeated calls within the same event see the latest
        // last_completed and stay no-ops.
        let mut state = self.store.get_user(user_id).await?.global_streak;

        // Same monotonicity rule as the per-task counters: a qualifying
        // count on an already-passed date never rewinds the streak.
        if state.last_completed >= Some(date) {
            return Ok(());
        }

        state.current_streak = continue_streak(state.current_streak, state.last_completed, date);
        state.best_streak = state.best_streak.max(state.current_streak);
        state.last_completed = Some(date);

        debug!(
            "global streak {user_id}: current={} best={}",
            state.current_streak, state.best_streak
        );
        self.store.save_global_streak(user_id, &state).await
    }
}

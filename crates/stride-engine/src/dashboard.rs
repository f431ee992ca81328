//! Dashboard aggregation — a pure read path over ledger and streak state.

use crate::Engine;
use chrono::Duration;
use std::collections::HashMap;
use stride_core::catalog::task_name;
use stride_core::error::StrideError;
use stride_core::types::{
    Dashboard, DashboardStats, StreakSettings, TaskKind, TaskSummary, TrendPoint,
};

/// Rounded percentage, zero when the denominator is zero.
fn rounded_pct(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        0
    } else {
        ((part as f64 / whole as f64) * 100.0).round() as u32
    }
}

impl Engine {
    /// Build the full dashboard view for a user. Never mutates state; safe
    /// to call concurrently and repeatedly.
    pub async fn get_dashboard(&self, user_id: &str) -> Result<Dashboard, StrideError> {
        let user = self.store.get_user(user_id).await?;
        let today = self.clock.today();
        let month_start = today - Duration::days(29);
        let week_start = today - Duration::days(6);

        // One range query covers today, the 7-day window, the 30-day
        // window, and the trend series.
        let records = self
            .store
            .find_by_user_and_date_range(user_id, month_start, today)
            .await?;
        let streaks: HashMap<_, _> = self
            .store
            .get_all_task_streaks(user_id)
            .await?
            .into_iter()
            .collect();

        let mut all_tasks: Vec<(String, TaskKind)> = Vec::new();
        for id in &user.selection.career {
            all_tasks.push((id.clone(), TaskKind::Career));
        }
        for id in &user.selection.personal {
            all_tasks.push((id.clone(), TaskKind::Personal));
        }
        for id in &user.selection.custom {
            all_tasks.push((id.clone(), TaskKind::Custom));
        }

        let tasks: Vec<TaskSummary> = all_tasks
            .iter()
            .map(|(id, kind)| {
                let completed = records
                    .iter()
                    .any(|r| r.task_id == *id && r.date == today && r.completed);
                let week_completed = records
                    .iter()
                    .filter(|r| r.task_id == *id && r.completed && r.date >= week_start)
                    .count();
                let month_completed = records
                    .iter()
                    .filter(|r| r.task_id == *id && r.completed)
                    .count();
                let streak = streaks.get(id).cloned().unwrap_or_default();

                TaskSummary {
                    id: id.clone(),
                    kind: *kind,
                    name: task_name(id).to_string(),
                    completed,
                    week_completed,
                    month_completed,
                    current_streak: streak.current_streak,
                    best_streak: streak.best_streak,
                }
            })
            .collect();

        let total_tasks = tasks.len();
        let completed_today = tasks.iter().filter(|t| t.completed).count();
        let min_required = user.min_tasks_required;
        let streak_earned = completed_today as i64 >= min_required;

        // Trend series: every historical day is judged against the current
        // threshold, not the value in effect back then.
        let chart_data: Vec<TrendPoint> = (0..30)
            .map(|i| {
                let date = month_start + Duration::days(i);
                let completed = records
                    .iter()
                    .filter(|r| r.date == date && r.completed)
                    .count();
                TrendPoint {
                    date,
                    completed,
                    total: total_tasks,
                    percentage: rounded_pct(completed, total_tasks),
                    threshold_met: completed as i64 >= min_required,
                }
            })
            .collect();

        Ok(Dashboard {
            tasks,
            global_streak: user.global_streak,
            streak_settings: StreakSettings {
                min_tasks_required: min_required,
            },
            stats: DashboardStats {
                total_tasks,
                completed_today,
                completion_rate: rounded_pct(completed_today, total_tasks),
                streak_earned,
                progress_to_streak: format!("{completed_today}/{min_required}"),
            },
            chart_data,
        })
    }
}

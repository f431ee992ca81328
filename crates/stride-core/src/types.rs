use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which input channel produced a ledger write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Interactive,
    Messaging,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Interactive => "interactive",
            Self::Messaging => "messaging",
        }
    }

    /// Parse a stored source tag. Unknown tags fall back to `Interactive`.
    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "messaging" => Self::Messaging,
            _ => Self::Interactive,
        }
    }
}

/// One ledger row: a (user, task, calendar day) completion state.
///
/// At most one record exists per `(user_id, task_id, date)`; writes are
/// upserts on that key, never appended duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: String,
    pub user_id: String,
    pub task_id: String,
    pub date: NaiveDate,
    pub completed: bool,
    /// Free-form payload carried alongside the flag; unused by streak logic.
    pub value: Option<String>,
    pub source: Source,
}

/// Per-(user, task) streak counters, derived incrementally from the ledger.
///
/// Advance-only: counters move forward on completions and are never rolled
/// back when a day is later un-completed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskStreakState {
    pub current_streak: i64,
    pub best_streak: i64,
    /// Cumulative count of days ever marked complete.
    pub total_days: i64,
    pub last_completed: Option<NaiveDate>,
}

/// The single aggregate streak per user, gated on how many tasks were
/// completed that day versus `min_tasks_required`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalStreakState {
    pub current_streak: i64,
    pub best_streak: i64,
    pub last_completed: Option<NaiveDate>,
}

/// A user's chosen tasks, in three named groups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskSelection {
    #[serde(default)]
    pub career: Vec<String>,
    #[serde(default)]
    pub personal: Vec<String>,
    #[serde(default)]
    pub custom: Vec<String>,
}

impl TaskSelection {
    /// The ordinal task list: career, then personal, then custom, in stored
    /// order. Numeric references in free-text messages are 1-based indices
    /// into this list.
    pub fn ordinal_tasks(&self) -> Vec<String> {
        self.career
            .iter()
            .chain(self.personal.iter())
            .chain(self.custom.iter())
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.career.is_empty() && self.personal.is_empty() && self.custom.is_empty()
    }
}

/// Which selection group a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    Career,
    Personal,
    Custom,
}

/// A user profile as the engine sees it. Registration and authentication
/// live with a collaborator; this is the slice the core reads and the
/// narrow set of fields (global streak, threshold) it may write back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Messaging address; empty string when the user has no phone on file.
    pub phone: String,
    pub selection: TaskSelection,
    pub min_tasks_required: i64,
    pub global_streak: GlobalStreakState,
}

/// Result of applying a completion toggle, returned to the caller so the
/// updated streak evaluation is visible without a second query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionOutcome {
    /// Completed tasks counted for that user on that date, post-write.
    pub completed_count: i64,
    pub min_required: i64,
    /// Whether the day met the global-streak threshold.
    pub streak_updated: bool,
}

/// Per-task line on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSummary {
    pub id: String,
    pub kind: TaskKind,
    pub name: String,
    /// Today's completion flag.
    pub completed: bool,
    /// Completed days among the 7 calendar days ending today, inclusive.
    pub week_completed: usize,
    /// Completed days among the 30 calendar days ending today, inclusive.
    pub month_completed: usize,
    pub current_streak: i64,
    pub best_streak: i64,
}

/// User-facing streak settings block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakSettings {
    pub min_tasks_required: i64,
}

/// Aggregate numbers for the dashboard header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_tasks: usize,
    pub completed_today: usize,
    /// Rounded percentage of tasks completed today.
    pub completion_rate: u32,
    pub streak_earned: bool,
    /// e.g. "2/3" — completed today versus the threshold.
    pub progress_to_streak: String,
}

/// One point of the 30-day trend series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub completed: usize,
    pub total: usize,
    /// Rounded percentage of the user's tasks completed that day.
    pub percentage: u32,
    /// Whether that day's count meets the *current* threshold. Historical
    /// days are judged against today's setting, not the value in effect
    /// back then.
    pub threshold_met: bool,
}

/// Everything the dashboard view needs, built in one read pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub tasks: Vec<TaskSummary>,
    pub global_streak: GlobalStreakState,
    pub streak_settings: StreakSettings,
    pub stats: DashboardStats,
    pub chart_data: Vec<TrendPoint>,
}

/// Outcome of interpreting one inbound free-text message.
#[derive(Debug, Clone)]
pub enum MessageOutcome {
    /// A read-only status report; the ledger was not touched.
    Status { report: String },
    /// One or more tasks were marked complete for today.
    Completion { tasks: Vec<String>, reply: String },
    /// Nothing to record; acknowledged anyway.
    Empty { reply: String },
}

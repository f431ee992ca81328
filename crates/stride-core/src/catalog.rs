//! Built-in task catalog.
//!
//! Display names for the stock task ids users can pick from. Custom task
//! ids are displayed as-is.

use crate::types::TaskKind;

/// The stock tasks offered at selection time: (id, kind, display name).
pub const TASK_OPTIONS: &[(&str, TaskKind, &str)] = &[
    ("github", TaskKind::Career, "GitHub Commits"),
    ("leetcode", TaskKind::Career, "LeetCode Problems"),
    ("gfg", TaskKind::Career, "GeeksforGeeks Practice"),
    ("chess", TaskKind::Career, "Chess Games"),
    ("detox", TaskKind::Personal, "Digital Detox"),
    ("screentime", TaskKind::Personal, "Screen Time Limit"),
    ("running", TaskKind::Personal, "Running"),
    ("gym", TaskKind::Personal, "Gym Workout"),
    ("yoga", TaskKind::Personal, "Yoga Practice"),
    ("swimming", TaskKind::Personal, "Swimming"),
    ("productivity", TaskKind::Personal, "Daily Productivity Rating"),
];

/// Display name for a task id; unknown (custom) ids display as themselves.
pub fn task_name(id: &str) -> &str {
    TASK_OPTIONS
        .iter()
        .find(|(tid, _, _)| *tid == id)
        .map(|(_, _, name)| *name)
        .unwrap_or(id)
}

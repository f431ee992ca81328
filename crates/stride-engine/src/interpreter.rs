//! Command interpreter — turns free-text poll replies into completion
//! intents against the ordinal task list.

use crate::Engine;
use std::collections::HashMap;
use stride_core::catalog::task_name;
use stride_core::error::StrideError;
use stride_core::traits::Messenger;
use stride_core::types::{MessageOutcome, Source, User};
use tracing::info;

/// Reply sent when an inbound address resolves to no user.
pub const REGISTRATION_PROMPT: &str =
    "❌ This number is not registered. Please sign up in the app first.";

/// What a lower-cased, trimmed message resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedMessage {
    /// Nothing to record (explicit "none"/"no"/"0", or the catch-all for
    /// unrecognized text). Acknowledged, ledger untouched.
    Empty,
    /// The full ordinal task list.
    All,
    /// Read-only status request; no mutation.
    Status,
    /// Valid 1-based indices into the ordinal task list, in order of first
    /// appearance, deduplicated.
    Picks(Vec<usize>),
}

impl ParsedMessage {
    /// Parse a message against a task list of `task_count` entries.
    ///
    /// Keyword branches are checked first; otherwise every maximal digit
    /// run becomes a candidate index and out-of-range ones are discarded.
    /// A message yielding no valid index is treated as `Empty`, not an
    /// error.
    pub fn parse(text: &str, task_count: usize) -> Self {
        let msg = text.trim().to_lowercase();
        match msg.as_str() {
            "none" | "no" | "0" => return Self::Empty,
            "all" | "done all" => return Self::All,
            "status" => return Self::Status,
            _ => {}
        }

        let mut picks: Vec<usize> = Vec::new();
        let mut run = String::new();
        for ch in msg.chars().chain(std::iter::once(' ')) {
            if ch.is_ascii_digit() {
                run.push(ch);
                continue;
            }
            if !run.is_empty() {
                if let Ok(n) = run.parse::<usize>() {
                    if (1..=task_count).contains(&n) && !picks.contains(&n) {
                        picks.push(n);
                    }
                }
                run.clear();
            }
        }

        if picks.is_empty() {
            Self::Empty
        } else {
            Self::Picks(picks)
        }
    }
}

impl Engine {
    /// Interpret one inbound message from a messaging address.
    ///
    /// Resolves the sender by phone (`NotFound` when unregistered),
    /// applies any resolved completions for today through
    /// [`Engine::apply_completion`] with `Source::Messaging`, records the
    /// raw message as a poll response, and returns the outcome with the
    /// composed reply text. Sending the reply is the caller's job.
    pub async fn interpret_message(
        &self,
        address: &str,
        text: &str,
    ) -> Result<MessageOutcome, StrideError> {
        let user = self
            .store
            .find_user_by_phone(address)
            .await?
            .ok_or_else(|| StrideError::NotFound(format!("no user registered for {address}")))?;

        let today = self.clock.today();
        let tasks = user.selection.ordinal_tasks();

        let resolved: Vec<String> = match ParsedMessage::parse(text, tasks.len()) {
            ParsedMessage::Status => {
                let report = self.build_status_report(&user).await?;
                self.store
                    .record_poll_response(&user.id, today, &[], text)
                    .await?;
                return Ok(MessageOutcome::Status { report });
            }
            ParsedMessage::All => tasks.clone(),
            ParsedMessage::Picks(indices) => {
                indices.iter().map(|&i| tasks[i - 1].clone()).collect()
            }
            ParsedMessage::Empty => Vec::new(),
        };

        for task_id in &resolved {
            self.apply_completion(&user.id, task_id, today, true, Source::Messaging)
                .await?;
        }

        self.store
            .record_poll_response(&user.id, today, &resolved, text)
            .await?;

        if resolved.is_empty() {
            return Ok(MessageOutcome::Empty {
                reply: "👍 Got it! Reply with task numbers anytime to log progress.".to_string(),
            });
        }

        info!(
            "recorded {} completion(s) for {} via messaging",
            resolved.len(),
            user.id
        );

        let names: Vec<String> = resolved
            .iter()
            .map(|id| format!("• {}", task_name(id)))
            .collect();
        let reply = format!(
            "✅ Recorded {} task(s):\n{}\n\n🔥 Keep it up!",
            resolved.len(),
            names.join("\n")
        );

        Ok(MessageOutcome::Completion {
            tasks: resolved,
            reply,
        })
    }

    /// Interpret an inbound message and deliver the reply through the
    /// given channel. Unknown senders get the canned registration prompt
    /// and the `NotFound` error still surfaces to the caller.
    pub async fn handle_inbound(
        &self,
        messenger: &dyn Messenger,
        address: &str,
        text: &str,
    ) -> Result<MessageOutcome, StrideError> {
        match self.interpret_message(address, text).await {
            Ok(outcome) => {
                let reply = match &outcome {
                    MessageOutcome::Status { report } => report,
                    MessageOutcome::Completion { reply, .. } => reply,
                    MessageOutcome::Empty { reply } => reply,
                };
                messenger.send(address, reply).await?;
                Ok(outcome)
            }
            Err(StrideError::NotFound(reason)) => {
                messenger.send(address, REGISTRATION_PROMPT).await?;
                Err(StrideError::NotFound(reason))
            }
            Err(e) => Err(e),
        }
    }

    /// Today's per-task completion flags and current streaks, as reply text.
    async fn build_status_report(&self, user: &User) -> Result<String, StrideError> {
        let today = self.clock.today();
        let today_records = self
            .store
            .find_by_user_and_date_range(&user.id, today, today)
            .await?;
        let streaks: HashMap<_, _> = self
            .store
            .get_all_task_streaks(&user.id)
            .await?
            .into_iter()
            .collect();

        let mut report = String::from("📊 Your Status for Today\n\n");
        for id in user.selection.ordinal_tasks() {
            let done = today_records
                .iter()
                .any(|r| r.task_id == id && r.completed);
            let marker = if done { "✅" } else { "⬜" };
            let current = streaks.get(&id).map(|s| s.current_streak).unwrap_or(0);
            report.push_str(&format!("{marker} {} (🔥{current})\n", task_name(&id)));
        }
        Ok(report)
    }
}

#[cfg(test)]
mod parse_tests {
    use super::ParsedMessage;

    #[test]
    fn keywords_take_priority() {
        assert_eq!(ParsedMessage::parse("  None ", 3), ParsedMessage::Empty);
        assert_eq!(ParsedMessage::parse("no", 3), ParsedMessage::Empty);
        assert_eq!(ParsedMessage::parse("0", 3), ParsedMessage::Empty);
        assert_eq!(ParsedMessage::parse("ALL", 3), ParsedMessage::All);
        assert_eq!(ParsedMessage::parse("done all", 3), ParsedMessage::All);
        assert_eq!(ParsedMessage::parse("Status", 3), ParsedMessage::Status);
    }

    #[test]
    fn digit_runs_become_one_based_indices() {
        assert_eq!(
            ParsedMessage::parse("1,3", 3),
            ParsedMessage::Picks(vec![1, 3])
        );
        assert_eq!(
            ParsedMessage::parse("did 2 and 1 today", 3),
            ParsedMessage::Picks(vec![2, 1])
        );
    }

    #[test]
    fn out_of_range_and_duplicate_indices_are_dropped() {
        assert_eq!(
            ParsedMessage::parse("1, 99, 1", 3),
            ParsedMessage::Picks(vec![1])
        );
        // "12" is one maximal run, not two indices.
        assert_eq!(ParsedMessage::parse("12", 3), ParsedMessage::Empty);
    }

    #[test]
    fn unrecognized_text_falls_back_to_empty() {
        assert_eq!(
            ParsedMessage::parse("hello there!", 3),
            ParsedMessage::Empty
        );
        assert_eq!(ParsedMessage::parse("", 3), ParsedMessage::Empty);
    }
}

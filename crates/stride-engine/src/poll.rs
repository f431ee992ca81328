//! Daily poll composition and reminder fan-out.
//!
//! The engine only composes text and hands it to the injected `Messenger`;
//! when and how fan-out is triggered belongs to an external scheduler.

use crate::Engine;
use stride_core::catalog::task_name;
use stride_core::error::StrideError;
use stride_core::traits::Messenger;
use stride_core::types::User;
use tracing::{info, warn};

impl Engine {
    /// The daily check-in message for one user: a numbered ordinal task
    /// list plus reply instructions. `None` when the user has no tasks
    /// selected or no phone on file.
    pub fn compose_daily_poll(&self, user: &User) -> Option<String> {
        let tasks = user.selection.ordinal_tasks();
        if tasks.is_empty() || user.phone.is_empty() {
            return None;
        }

        let mut message = format!(
            "🎯 Daily Activity Check-in\n\nHi {}! Which tasks did you complete today?\n\n",
            user.first_name
        );
        for (i, id) in tasks.iter().enumerate() {
            message.push_str(&format!("{}. {}\n", i + 1, task_name(id)));
        }
        message.push_str("\n📝 Reply with numbers (e.g. \"1,3,5\") or \"all\" / \"none\"\n💪 Keep your streaks going!");
        Some(message)
    }

    /// Send the daily poll to one user. Returns `false` when skipped.
    pub async fn send_daily_poll(
        &self,
        messenger: &dyn Messenger,
        user: &User,
    ) -> Result<bool, StrideError> {
        match self.compose_daily_poll(user) {
            Some(text) => {
                let result = messenger.send(&user.phone, &text).await?;
                if !result.accepted {
                    warn!("poll to {} not accepted by {}", user.phone, messenger.name());
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Fan the daily poll out to every user with a phone on file. Returns
    /// how many polls were sent.
    pub async fn send_reminders(&self, messenger: &dyn Messenger) -> Result<usize, StrideError> {
        let users = self.store.users_with_phone().await?;
        info!("sending daily polls to {} user(s)", users.len());

        let mut sent = 0;
        for user in &users {
            if self.send_daily_poll(messenger, user).await? {
                sent += 1;
            }
        }
        Ok(sent)
    }
}

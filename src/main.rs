use async_trait::async_trait;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use stride_core::clock::SystemClock;
use stride_core::error::StrideError;
use stride_core::traits::{DeliveryResult, Messenger};
use stride_core::types::{MessageOutcome, Source, TaskSelection};
use stride_engine::Engine;
use stride_store::{NewUser, Store};

#[derive(Parser)]
#[command(name = "stride", version, about = "Stride — daily activity & streak tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed a user with a task selection.
    AddUser {
        #[arg(long)]
        first_name: String,
        #[arg(long, default_value = "")]
        last_name: String,
        #[arg(long)]
        email: String,
        /// Messaging address (phone); empty = no polls.
        #[arg(long, default_value = "")]
        phone: String,
        /// Comma-separated career task ids.
        #[arg(long, default_value = "")]
        career: String,
        /// Comma-separated personal task ids.
        #[arg(long, default_value = "")]
        personal: String,
        /// Comma-separated custom task ids.
        #[arg(long, default_value = "")]
        custom: String,
        /// Tasks per day required for the global streak.
        #[arg(long)]
        min: Option<i64>,
    },
    /// Toggle a task's completion for a user.
    Complete {
        user: String,
        task: String,
        /// Mark the task as not completed instead.
        #[arg(long)]
        undo: bool,
        /// Calendar day (YYYY-MM-DD); defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    /// Show a user's dashboard.
    Dashboard { user: String },
    /// Simulate an inbound message from the messaging channel.
    Message {
        /// Sender address, e.g. "+15550001111" or "whatsapp:+15550001111".
        #[arg(long)]
        from: String,
        /// The message text.
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },
    /// Send the daily poll to every user with a phone on file.
    Remind,
    /// Update a user's global-streak threshold.
    SetMin { user: String, min: i64 },
}

/// Console-only messenger: prints outbound messages instead of delivering
/// them. Stands in for a real channel collaborator.
struct ConsoleMessenger;

#[async_trait]
impl Messenger for ConsoleMessenger {
    fn name(&self) -> &str {
        "console"
    }

    async fn send(&self, address: &str, text: &str) -> Result<DeliveryResult, StrideError> {
        println!("--- to {address} ---\n{text}\n");
        Ok(DeliveryResult {
            accepted: true,
            message_id: None,
        })
    }
}

fn split_ids(s: &str) -> Vec<String> {
    s.split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn parse_day(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("invalid date '{s}', expected YYYY-MM-DD"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cfg = stride_core::config::load(&cli.config)?;
    let store = Store::new(&cfg.store).await?;
    let engine = Engine::new(store.clone(), Arc::new(SystemClock));

    match cli.command {
        Commands::AddUser {
            first_name,
            last_name,
            email,
            phone,
            career,
            personal,
            custom,
            min,
        } => {
            let selection = TaskSelection {
                career: split_ids(&career),
                personal: split_ids(&personal),
                custom: split_ids(&custom),
            };
            if selection.is_empty() {
                anyhow::bail!("select at least one task (--career/--personal/--custom)");
            }
            let id = store
                .create_user(&NewUser {
                    first_name,
                    last_name,
                    email,
                    phone,
                    selection,
                    min_tasks_required: min
                        .unwrap_or(cfg.streaks.default_min_tasks_required),
                })
                .await?;
            println!("created user {id}");
        }
        Commands::Complete {
            user,
            task,
            undo,
            date,
        } => {
            let day = match date {
                Some(s) => parse_day(&s)?,
                None => engine.today(),
            };
            let outcome = engine
                .apply_completion(&user, &task, day, !undo, Source::Interactive)
                .await?;
            println!(
                "{} {task} on {day} — {}/{} tasks done{}",
                if undo { "uncompleted" } else { "completed" },
                outcome.completed_count,
                outcome.min_required,
                if outcome.streak_updated {
                    " — streak day earned"
                } else {
                    ""
                },
            );
        }
        Commands::Dashboard { user } => {
            let d = engine.get_dashboard(&user).await?;
            println!(
                "🔥 Global streak: {} (best {})",
                d.global_streak.current_streak, d.global_streak.best_streak
            );
            println!(
                "Today: {} of {} tasks ({}%) — progress to streak {}{}",
                d.stats.completed_today,
                d.stats.total_tasks,
                d.stats.completion_rate,
                d.stats.progress_to_streak,
                if d.stats.streak_earned { " ✅" } else { "" },
            );
            println!();
            for t in &d.tasks {
                println!(
                    "{} {} — week {}/7, month {}/30, 🔥{} (best {})",
                    if t.completed { "✅" } else { "⬜" },
                    t.name,
                    t.week_completed,
                    t.month_completed,
                    t.current_streak,
                    t.best_streak,
                );
            }
            let earned_days = d.chart_data.iter().filter(|p| p.threshold_met).count();
            println!(
                "\nThreshold met on {earned_days} of the last {} days",
                d.chart_data.len()
            );
        }
        Commands::Message { from, text } => {
            if text.is_empty() {
                anyhow::bail!("no message text provided. Usage: stride message --from <addr> <text>");
            }
            let body = text.join(" ");
            let messenger = ConsoleMessenger;
            match engine.handle_inbound(&messenger, &from, &body).await {
                Ok(MessageOutcome::Completion { tasks, .. }) => {
                    println!("recorded {} completion(s)", tasks.len());
                }
                Ok(MessageOutcome::Status { .. }) => println!("status report sent"),
                Ok(MessageOutcome::Empty { .. }) => println!("acknowledged, nothing recorded"),
                Err(StrideError::NotFound(_)) => {
                    println!("sender not registered; registration prompt sent");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::Remind => {
            if !cfg.messaging.enabled {
                anyhow::bail!("messaging is disabled in config");
            }
            let messenger = ConsoleMessenger;
            let sent = engine.send_reminders(&messenger).await?;
            println!("sent {sent} daily poll(s)");
        }
        Commands::SetMin { user, min } => {
            engine.update_min_tasks_required(&user, min).await?;
            println!("min tasks required set to {min}");
        }
    }

    Ok(())
}

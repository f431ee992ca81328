//! # stride-store
//!
//! SQLite-backed persistence: the activity ledger, per-task streak rows,
//! user profiles, and poll-response audit rows.

mod store;

pub use store::{NewUser, PollResponse, Store};

//! # stride-engine
//!
//! The activity and streak aggregation engine: applies completion toggles
//! to the ledger, drives the per-task and global streak counters, builds
//! the dashboard view, and interprets free-text poll replies. Both input
//! channels (interactive and messaging) funnel through the same
//! [`Engine::apply_completion`] entry point and differ only in their
//! `Source` tag.

mod dashboard;
mod interpreter;
mod poll;
mod streaks;

pub use interpreter::{ParsedMessage, REGISTRATION_PROMPT};

use chrono::NaiveDate;
use std::sync::Arc;
use stride_core::clock::Clock;
use stride_store::Store;

/// The aggregation engine. Cheap to clone; holds the store pool and the
/// injected calendar-day source.
#[derive(Clone)]
pub struct Engine {
    store: Store,
    clock: Arc<dyn Clock>,
}

impl Engine {
    pub fn new(store: Store, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// The underlying store, for read paths owned by collaborators.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Today in the process-wide reference calendar.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}

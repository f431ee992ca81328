//! # stride-core
//!
//! Core types, traits, configuration, and error handling for Stride.

pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod traits;
pub mod types;

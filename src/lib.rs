//! Lyrics Seeker - Telegram bot that finds a song by free-text search and
//! sends its audio, its lyrics and a link to the companion web app.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging, retry and small utilities
//! - `lyrics`: client for the LRCLIB-compatible lyrics provider
//! - `storage`: per-chat search results kept in memory
//! - `download`: audio backend, per-request artifact directory, fulfillment pipeline
//! - `telegram`: handler tree, result picker, callback routing
//! - `testing`: recording messenger used by tests

pub mod cli;
pub mod core;
pub mod download;
pub mod lyrics;
pub mod storage;
pub mod telegram;
pub mod testing;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult};
pub use download::{fulfill, FulfillmentContext, FulfillmentReport};
pub use lyrics::{LyricsClient, SearchOutcome, SongRecord};
pub use storage::ResultStore;
pub use telegram::{schema, HandlerDeps};

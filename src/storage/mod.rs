//! In-memory per-chat state

pub mod results;

pub use results::ResultStore;

//! Telegram bot handler tree configuration
//!
//! The same schema is used by the binary and can be fed updates in tests.

mod schema;
mod types;

pub use schema::schema;
pub use types::{HandlerDeps, HandlerError};

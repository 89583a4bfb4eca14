//! Telegram bot integration: search, result picker, callbacks

pub mod bot;
pub mod callback;
pub mod handlers;
pub mod messenger;
pub mod pagination;
pub mod search;
pub mod texts;

pub use bot::{create_bot, setup_bot_commands, Command};
pub use callback::{resolve_selection, route_action, ActionToken, PickerCallback, RouteOutcome, Selection};
pub use handlers::{schema, HandlerDeps, HandlerError};
pub use messenger::{Messenger, TelegramMessenger};
pub use pagination::PageView;
pub use search::handle_search;

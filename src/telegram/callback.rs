//! Callback routing for the result picker.
//!
//! Callback data protocol:
//!   `pg:{page}`   : show page `page` (0-based)
//!   `cancel`      : close the picker
//!   `sel:{index}` : fulfill the record at global index `index`
//!
//! Every callback is answered exactly once so the client spinner stops.

use std::fmt;

use teloxide::types::{CallbackQueryId, ChatId, MessageId};
use teloxide::RequestError;

use crate::download::pipeline::{fulfill, FulfillmentContext, FulfillmentReport};
use crate::lyrics::SongRecord;
use crate::storage::ResultStore;
use crate::telegram::messenger::Messenger;
use crate::telegram::pagination::PageView;
use crate::telegram::texts;

const NAVIGATE_PREFIX: &str = "pg:";
const SELECT_PREFIX: &str = "sel:";
const CANCEL: &str = "cancel";

/// Parsed callback data of a picker button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionToken {
    Navigate(usize),
    Cancel,
    Select(usize),
}

impl ActionToken {
    /// Parses callback data. Anything unrecognized is `None`.
    pub fn parse(data: &str) -> Option<Self> {
        if data == CANCEL {
            return Some(ActionToken::Cancel);
        }
        if let Some(page) = data.strip_prefix(NAVIGATE_PREFIX) {
            return parse_index(page).map(ActionToken::Navigate);
        }
        if let Some(index) = data.strip_prefix(SELECT_PREFIX) {
            return parse_index(index).map(ActionToken::Select);
        }
        None
    }
}

impl fmt::Display for ActionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionToken::Navigate(page) => write!(f, "{}{}", NAVIGATE_PREFIX, page),
            ActionToken::Cancel => f.write_str(CANCEL),
            ActionToken::Select(index) => write!(f, "{}{}", SELECT_PREFIX, index),
        }
    }
}

/// Plain ASCII digits only; rejects signs, whitespace and overflow.
fn parse_index(raw: &str) -> Option<usize> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Result of looking up a selected index.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// The chat has no stored results
    Expired,
    /// The index is outside the stored results
    NotFound,
    Found(SongRecord),
}

pub fn resolve_selection(store: &ResultStore, chat_id: ChatId, index: usize) -> Selection {
    match store.get(chat_id) {
        None => Selection::Expired,
        Some(set) => match set.get(index) {
            Some(record) => Selection::Found(record.clone()),
            None => Selection::NotFound,
        },
    }
}

/// What a routed callback did.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    /// Unrecognized callback data
    Ignored,
    Cancelled,
    Navigated(usize),
    /// Page outside the stored results; the view stays as it is
    Unchanged,
    Expired,
    NotFound,
    Fulfilled(FulfillmentReport),
}

/// A picker button press.
#[derive(Debug, Clone)]
pub struct PickerCallback<'a> {
    pub callback_id: &'a CallbackQueryId,
    pub chat_id: ChatId,
    /// The picker message the button belongs to
    pub message_id: MessageId,
    pub data: &'a str,
}

/// Interprets a button press and applies its effect.
///
/// Only a failed callback answer is returned as an error; edit and
/// delivery failures are logged and reported to the chat instead.
pub async fn route_action(
    store: &ResultStore,
    ctx: &FulfillmentContext,
    messenger: &dyn Messenger,
    callback: PickerCallback<'_>,
) -> Result<RouteOutcome, RequestError> {
    let PickerCallback {
        callback_id,
        chat_id,
        message_id,
        data,
    } = callback;

    let Some(token) = ActionToken::parse(data) else {
        log::warn!("Ignoring unknown callback data '{}' from chat {}", data, chat_id);
        messenger.answer_callback(callback_id, None).await?;
        return Ok(RouteOutcome::Ignored);
    };

    log::debug!("Callback {} from chat {}", token, chat_id);

    match token {
        ActionToken::Cancel => {
            messenger.answer_callback(callback_id, None).await?;
            edit_view(messenger, chat_id, message_id, texts::CANCELLED, None).await;
            Ok(RouteOutcome::Cancelled)
        }
        ActionToken::Navigate(page) => {
            let Some(set) = store.get(chat_id) else {
                messenger.answer_callback(callback_id, Some(texts::SESSION_EXPIRED)).await?;
                return Ok(RouteOutcome::Expired);
            };
            messenger.answer_callback(callback_id, None).await?;

            let Some(view) = PageView::new(&set, page) else {
                log::debug!("Page {} out of range for chat {} ({} results)", page, chat_id, set.len());
                return Ok(RouteOutcome::Unchanged);
            };
            edit_view(messenger, chat_id, message_id, &view.header(), Some(view.keyboard())).await;
            Ok(RouteOutcome::Navigated(page))
        }
        ActionToken::Select(index) => match resolve_selection(store, chat_id, index) {
            Selection::Expired => {
                messenger.answer_callback(callback_id, Some(texts::SESSION_EXPIRED)).await?;
                Ok(RouteOutcome::Expired)
            }
            Selection::NotFound => {
                messenger.answer_callback(callback_id, Some(texts::SONG_NOT_FOUND)).await?;
                Ok(RouteOutcome::NotFound)
            }
            Selection::Found(record) => {
                messenger.answer_callback(callback_id, None).await?;
                edit_view(messenger, chat_id, message_id, texts::PROCESSING, None).await;
                let report = fulfill(ctx, messenger, chat_id, Some(message_id), record).await;
                Ok(RouteOutcome::Fulfilled(report))
            }
        },
    }
}

async fn edit_view(
    messenger: &dyn Messenger,
    chat_id: ChatId,
    message_id: MessageId,
    text: &str,
    keyboard: Option<teloxide::types::InlineKeyboardMarkup>,
) {
    // Re-rendering the same page is rejected as "message is not modified"
    if let Err(e) = messenger.edit_text(chat_id, message_id, text, keyboard).await {
        log::warn!("Failed to update picker message in chat {}: {}", chat_id, e);
    }
}

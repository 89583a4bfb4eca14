//! Outbound chat operations.
//!
//! Handlers and the fulfillment pipeline talk to Telegram only through
//! [`Messenger`], so the whole flow can run against
//! [`crate::testing::RecordingMessenger`] in tests.

use std::path::Path;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{CallbackQueryId, InlineKeyboardMarkup, InputFile, MessageId};
use teloxide::RequestError;

#[async_trait]
pub trait Messenger: Send + Sync {
    /// Sends a text message, optionally with an inline keyboard.
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<MessageId, RequestError>;

    /// Replaces the text of a message. `None` removes its keyboard.
    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<(), RequestError>;

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), RequestError>;

    /// Answers a callback query; `text` is shown as a transient notice.
    async fn answer_callback(&self, callback_id: &CallbackQueryId, text: Option<&str>) -> Result<(), RequestError>;

    /// Uploads a local file as a playable audio message.
    async fn send_audio(&self, chat_id: ChatId, path: &Path, title: &str, performer: &str) -> Result<(), RequestError>;
}

/// [`Messenger`] backed by the Bot API.
#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<MessageId, RequestError> {
        let request = self.bot.send_message(chat_id, text);
        let message = match keyboard {
            Some(keyboard) => request.reply_markup(keyboard).await?,
            None => request.await?,
        };
        Ok(message.id)
    }

    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<(), RequestError> {
        let request = self.bot.edit_message_text(chat_id, message_id, text);
        match keyboard {
            Some(keyboard) => request.reply_markup(keyboard).await?,
            None => request.await?,
        };
        Ok(())
    }

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), RequestError> {
        self.bot.delete_message(chat_id, message_id).await?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &CallbackQueryId, text: Option<&str>) -> Result<(), RequestError> {
        let request = self.bot.answer_callback_query(callback_id.clone());
        match text {
            Some(text) => request.text(text).await?,
            None => request.await?,
        };
        Ok(())
    }

    async fn send_audio(&self, chat_id: ChatId, path: &Path, title: &str, performer: &str) -> Result<(), RequestError> {
        self.bot
            .send_audio(chat_id, InputFile::file(path))
            .title(title)
            .performer(performer)
            .await?;
        Ok(())
    }
}

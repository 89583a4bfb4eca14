//! In-memory [`Messenger`] that records every outbound operation
//!
//! Used by unit and integration tests to drive handlers and the
//! fulfillment pipeline without a Bot API server.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use teloxide::types::{CallbackQueryId, ChatId, InlineKeyboardMarkup, MessageId};
use teloxide::RequestError;

use crate::telegram::messenger::Messenger;

/// One recorded outbound operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Text {
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>,
    },
    Edit {
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>,
    },
    Delete {
        chat_id: ChatId,
        message_id: MessageId,
    },
    CallbackAnswer {
        callback_id: String,
        text: Option<String>,
    },
    Audio {
        chat_id: ChatId,
        file_name: String,
        title: String,
        performer: String,
        /// Whether the file was on disk at upload time
        file_existed: bool,
    },
}

/// Recording messenger
#[derive(Debug, Default)]
pub struct RecordingMessenger {
    log: Mutex<Vec<Outbound>>,
    next_message_id: AtomicI32,
    fail_audio: AtomicBool,
    text_attempts: AtomicUsize,
    failing_texts: Mutex<Vec<usize>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self {
            next_message_id: AtomicI32::new(1000),
            ..Self::default()
        }
    }

    /// Makes every audio upload fail.
    #[must_use]
    pub fn failing_audio(self) -> Self {
        self.fail_audio.store(true, Ordering::SeqCst);
        self
    }

    /// Makes the `n`-th `send_text` call (0-based, counting failed ones) fail.
    #[must_use]
    pub fn failing_text_at(self, n: usize) -> Self {
        self.failing_texts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(n);
        self
    }

    /// Snapshot of everything sent so far, in order.
    pub fn outbound(&self) -> Vec<Outbound> {
        self.lock().clone()
    }

    /// Texts of plain messages sent to `chat_id`.
    pub fn texts(&self, chat_id: ChatId) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|op| match op {
                Outbound::Text { chat_id: c, text, .. } if *c == chat_id => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Edits applied to messages in `chat_id`, as `(message, text, keyboard)`.
    pub fn edits(&self, chat_id: ChatId) -> Vec<(MessageId, String, Option<InlineKeyboardMarkup>)> {
        self.lock()
            .iter()
            .filter_map(|op| match op {
                Outbound::Edit {
                    chat_id: c,
                    message_id,
                    text,
                    keyboard,
                } if *c == chat_id => Some((*message_id, text.clone(), keyboard.clone())),
                _ => None,
            })
            .collect()
    }

    /// Messages deleted in `chat_id`.
    pub fn deleted(&self, chat_id: ChatId) -> Vec<MessageId> {
        self.lock()
            .iter()
            .filter_map(|op| match op {
                Outbound::Delete { chat_id: c, message_id } if *c == chat_id => Some(*message_id),
                _ => None,
            })
            .collect()
    }

    /// Notices shown through callback answers (`None` for silent answers).
    pub fn callback_answers(&self) -> Vec<Option<String>> {
        self.lock()
            .iter()
            .filter_map(|op| match op {
                Outbound::CallbackAnswer { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn audio_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|op| matches!(op, Outbound::Audio { .. }))
            .count()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Outbound>> {
        // A panicking test thread must not hide what was recorded
        self.log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn push(&self, op: Outbound) {
        self.lock().push(op);
    }

    fn simulated_failure(what: &str) -> RequestError {
        RequestError::from(Arc::new(std::io::Error::other(format!("simulated {} failure", what))))
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<MessageId, RequestError> {
        let attempt = self.text_attempts.fetch_add(1, Ordering::SeqCst);
        if self
            .failing_texts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains(&attempt)
        {
            return Err(Self::simulated_failure("message"));
        }
        let message_id = MessageId(self.next_message_id.fetch_add(1, Ordering::SeqCst));
        self.push(Outbound::Text {
            chat_id,
            message_id,
            text: text.to_string(),
            keyboard,
        });
        Ok(message_id)
    }

    async fn edit_text(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: &str,
        keyboard: Option<InlineKeyboardMarkup>,
    ) -> Result<(), RequestError> {
        self.push(Outbound::Edit {
            chat_id,
            message_id,
            text: text.to_string(),
            keyboard,
        });
        Ok(())
    }

    async fn delete_message(&self, chat_id: ChatId, message_id: MessageId) -> Result<(), RequestError> {
        self.push(Outbound::Delete { chat_id, message_id });
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &CallbackQueryId, text: Option<&str>) -> Result<(), RequestError> {
        self.push(Outbound::CallbackAnswer {
            callback_id: callback_id.0.clone(),
            text: text.map(str::to_string),
        });
        Ok(())
    }

    async fn send_audio(&self, chat_id: ChatId, path: &Path, title: &str, performer: &str) -> Result<(), RequestError> {
        if self.fail_audio.load(Ordering::SeqCst) {
            return Err(Self::simulated_failure("audio upload"));
        }
        self.push(Outbound::Audio {
            chat_id,
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            title: title.to_string(),
            performer: performer.to_string(),
            file_existed: path.is_file(),
        });
        Ok(())
    }
}

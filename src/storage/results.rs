use std::sync::Arc;

use dashmap::DashMap;
use teloxide::types::ChatId;

use crate::lyrics::SongRecord;

/// Latest search results per chat.
///
/// Each chat has at most one result set; a new search replaces the previous
/// one wholesale. Sets are shared as `Arc<[SongRecord]>` so readers never
/// observe a half-written list.
///
/// Nothing is persisted: a restart forgets every set and old buttons answer
/// with "session expired".
#[derive(Debug, Default)]
pub struct ResultStore {
    sets: DashMap<ChatId, Arc<[SongRecord]>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the chat's result set.
    pub fn put(&self, chat_id: ChatId, records: Vec<SongRecord>) -> Arc<[SongRecord]> {
        let set: Arc<[SongRecord]> = records.into();
        self.sets.insert(chat_id, Arc::clone(&set));
        log::debug!("Stored {} result(s) for chat {}", set.len(), chat_id);
        set
    }

    /// Returns the chat's current result set, if any.
    pub fn get(&self, chat_id: ChatId) -> Option<Arc<[SongRecord]>> {
        self.sets.get(&chat_id).map(|entry| Arc::clone(entry.value()))
    }

    /// Number of chats with a stored result set.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }
}

use teloxide::types::ChatId;
use teloxide::RequestError;

use crate::lyrics::{LyricsClient, SearchOutcome};
use crate::storage::ResultStore;
use crate::telegram::messenger::Messenger;
use crate::telegram::pagination::PageView;
use crate::telegram::texts;

/// Handles a free-text message: search, store, show page one.
///
/// A "searching" message is sent first and then edited into the picker
/// (or into the no-match / failure notice). A search with no hits stores
/// an empty result set, so buttons of an older picker answer "not found".
pub async fn handle_search(
    store: &ResultStore,
    lyrics: &LyricsClient,
    messenger: &dyn Messenger,
    chat_id: ChatId,
    text: &str,
) -> Result<(), RequestError> {
    let query = text.trim();
    if query.is_empty() {
        messenger.send_text(chat_id, texts::USAGE, None).await?;
        return Ok(());
    }

    log::info!("Search from chat {}: '{}'", chat_id, query);
    let status = messenger.send_text(chat_id, &texts::searching(query), None).await?;

    let records = match lyrics.search(query).await {
        Ok(SearchOutcome::Found(records)) => records,
        Ok(SearchOutcome::NoMatches) => {
            store.put(chat_id, Vec::new());
            messenger.edit_text(chat_id, status, texts::NO_MATCHES, None).await?;
            return Ok(());
        }
        Err(e) => {
            log::error!("Lyrics search failed for chat {}: {}", chat_id, e);
            messenger.edit_text(chat_id, status, texts::SEARCH_FAILED, None).await?;
            return Ok(());
        }
    };

    let set = store.put(chat_id, records);
    match PageView::new(&set, 0) {
        Some(view) => {
            messenger
                .edit_text(chat_id, status, &view.header(), Some(view.keyboard()))
                .await?
        }
        None => messenger.edit_text(chat_id, status, texts::NO_MATCHES, None).await?,
    }
    Ok(())
}

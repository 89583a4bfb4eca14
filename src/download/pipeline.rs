//! Fulfillment: everything that happens after a user picks a song.
//!
//! enrich → sanitize name → download → locate → send audio → drop the
//! processing indicator → send lyrics → send companion links.
//!
//! Every step reports its own failure to the chat. The per-request
//! [`ArtifactScope`] is dropped on every exit path, so nothing downloaded
//! outlives the request.

use std::path::PathBuf;
use std::sync::Arc;

use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, MessageId, WebAppInfo};
use url::Url;

use crate::core::config;
use crate::core::error::{AppError, AppResult};
use crate::core::utils::{chunk_text, sanitize_filename};
use crate::download::artifact::ArtifactScope;
use crate::download::backend::AudioBackend;
use crate::lyrics::{LyricsClient, SongRecord};
use crate::telegram::messenger::Messenger;
use crate::telegram::texts;

/// Base name used when sanitizing leaves nothing.
const FALLBACK_BASE_NAME: &str = "audio";

/// Shared collaborators of the pipeline.
#[derive(Clone)]
pub struct FulfillmentContext {
    pub lyrics: Arc<LyricsClient>,
    pub backend: Arc<dyn AudioBackend>,
    /// Root under which per-request directories are created
    pub download_root: PathBuf,
    /// Companion web app base URL, without trailing slash
    pub companion_url: String,
}

impl FulfillmentContext {
    pub fn new(
        lyrics: Arc<LyricsClient>,
        backend: Arc<dyn AudioBackend>,
        download_root: impl Into<PathBuf>,
        companion_url: &str,
    ) -> Self {
        Self {
            lyrics,
            backend,
            download_root: download_root.into(),
            companion_url: companion_url.trim_end_matches('/').to_string(),
        }
    }
}

/// First thing that went wrong during a fulfillment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FulfillmentFailure {
    /// Backend failed (or the working directory could not be created)
    DownloadFailed,
    /// Backend succeeded but left no matching file
    ArtifactMissing,
    /// Telegram rejected the audio upload
    AudioNotSent,
    /// Some lyrics chunks or the link message could not be sent
    DeliveryIncomplete,
}

impl FulfillmentFailure {
    fn user_message(self) -> &'static str {
        match self {
            FulfillmentFailure::DownloadFailed => texts::DOWNLOAD_FAILED,
            FulfillmentFailure::ArtifactMissing => texts::AUDIO_NOT_FOUND,
            FulfillmentFailure::AudioNotSent => texts::AUDIO_SEND_FAILED,
            FulfillmentFailure::DeliveryIncomplete => texts::DELIVERY_INCOMPLETE,
        }
    }
}

/// What a fulfillment delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FulfillmentReport {
    pub audio_sent: bool,
    pub lyrics_chunks_sent: usize,
    pub link_sent: bool,
    pub failure: Option<FulfillmentFailure>,
}

impl FulfillmentReport {
    fn record_failure(&mut self, failure: FulfillmentFailure) {
        self.failure.get_or_insert(failure);
    }

    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Runs the whole fulfillment for one selected record.
///
/// `indicator` is the "processing" message shown while this runs; it is
/// deleted once the audio step is over, whatever its outcome.
pub async fn fulfill(
    ctx: &FulfillmentContext,
    messenger: &dyn Messenger,
    chat_id: ChatId,
    indicator: Option<MessageId>,
    record: SongRecord,
) -> FulfillmentReport {
    let mut report = FulfillmentReport::default();
    let record = ctx.lyrics.enrich(&record).await;
    let base = base_name(&record);

    log::info!("Fulfilling '{}' for chat {}", record.display_title(), chat_id);

    // Dropped when this function returns, removing everything downloaded
    let scope = match ArtifactScope::create(&ctx.download_root) {
        Ok(scope) => scope,
        Err(e) => {
            log::error!("Failed to create download directory: {}", e);
            abort(messenger, chat_id, indicator, FulfillmentFailure::DownloadFailed, &mut report).await;
            return report;
        }
    };

    let artifact = match acquire(ctx, &scope, &record, &base).await {
        Ok(path) => path,
        Err(failure) => {
            abort(messenger, chat_id, indicator, failure, &mut report).await;
            return report;
        }
    };

    match messenger
        .send_audio(chat_id, &artifact, &record.track_name, &record.artist_name)
        .await
    {
        Ok(()) => report.audio_sent = true,
        Err(e) => {
            log::error!("Failed to send audio '{}' to chat {}: {}", record.display_title(), chat_id, e);
            report.record_failure(FulfillmentFailure::AudioNotSent);
        }
    }

    remove_indicator(messenger, chat_id, indicator).await;

    if !report.audio_sent {
        notify(messenger, chat_id, FulfillmentFailure::AudioNotSent.user_message()).await;
    }

    let lyrics_complete = send_lyrics(messenger, chat_id, &record, &mut report).await;
    let link_sent = send_companion_links(ctx, messenger, chat_id, &record, &mut report).await;
    if !(lyrics_complete && link_sent) {
        report.record_failure(FulfillmentFailure::DeliveryIncomplete);
        notify(messenger, chat_id, FulfillmentFailure::DeliveryIncomplete.user_message()).await;
    }

    log::info!(
        "Fulfilled '{}' for chat {}: audio={}, lyrics chunks={}, link={}",
        record.display_title(),
        chat_id,
        report.audio_sent,
        report.lyrics_chunks_sent,
        report.link_sent
    );
    report
}

/// Sanitized `"{track} - {artist}"`, or a fixed name when neither part
/// keeps any visible character.
pub fn base_name(record: &SongRecord) -> String {
    let track = sanitize_filename(&record.track_name);
    let artist = sanitize_filename(&record.artist_name);
    if track.trim().is_empty() && artist.trim().is_empty() {
        FALLBACK_BASE_NAME.to_string()
    } else {
        format!("{} - {}", track, artist)
    }
}

/// Builds the "synced lyrics" and "save to playlist" URLs.
pub fn companion_links(companion_url: &str, record: &SongRecord) -> (String, String) {
    let base = companion_url.trim_end_matches('/');
    let track = urlencoding::encode(&record.track_name);
    let artist = urlencoding::encode(&record.artist_name);

    let youtube = format!("https://www.youtube.com/results?search_query={}+{}", track, artist);
    let lyrics = format!("{}/?track={}&artist={}", base, track, artist);
    let save = format!(
        "{}/?action=save&track={}&artist={}&youtube={}",
        base,
        track,
        artist,
        urlencoding::encode(&youtube)
    );

    (lyrics, save)
}

/// Keyboard with both companion links as web-app buttons.
pub fn companion_keyboard(companion_url: &str, record: &SongRecord) -> AppResult<InlineKeyboardMarkup> {
    let (lyrics, save) = companion_links(companion_url, record);

    Ok(InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::web_app(texts::SYNCED_LYRICS_BUTTON, WebAppInfo { url: Url::parse(&lyrics)? }),
        InlineKeyboardButton::web_app(texts::SAVE_TO_PLAYLIST_BUTTON, WebAppInfo { url: Url::parse(&save)? }),
    ]]))
}

async fn acquire(
    ctx: &FulfillmentContext,
    scope: &ArtifactScope,
    record: &SongRecord,
    base: &str,
) -> Result<PathBuf, FulfillmentFailure> {
    if let Err(e) = ctx.backend.download(&record.audio_query(), scope.path(), base).await {
        log::error!("Download failed for '{}': {}", record.display_title(), e);
        return Err(FulfillmentFailure::DownloadFailed);
    }

    match scope.locate(base) {
        Ok(Some(path)) => {
            log::info!("Downloaded audio: {}", path.display());
            Ok(path)
        }
        Ok(None) => {
            let err = AppError::ArtifactNotFound(base.to_string());
            log::error!("{}", err);
            Err(FulfillmentFailure::ArtifactMissing)
        }
        Err(e) => {
            log::error!("Failed to look for downloaded audio '{}': {}", base, e);
            Err(FulfillmentFailure::ArtifactMissing)
        }
    }
}

async fn abort(
    messenger: &dyn Messenger,
    chat_id: ChatId,
    indicator: Option<MessageId>,
    failure: FulfillmentFailure,
    report: &mut FulfillmentReport,
) {
    report.record_failure(failure);
    remove_indicator(messenger, chat_id, indicator).await;
    notify(messenger, chat_id, failure.user_message()).await;
}

async fn remove_indicator(messenger: &dyn Messenger, chat_id: ChatId, indicator: Option<MessageId>) {
    if let Some(message_id) = indicator {
        if let Err(e) = messenger.delete_message(chat_id, message_id).await {
            log::warn!("Failed to delete processing message in chat {}: {}", chat_id, e);
        }
    }
}

async fn notify(messenger: &dyn Messenger, chat_id: ChatId, text: &str) {
    if let Err(e) = messenger.send_text(chat_id, text, None).await {
        log::error!("Failed to notify chat {}: {}", chat_id, e);
    }
}

/// Sends every chunk, skipping the ones Telegram rejects. Returns whether all arrived.
async fn send_lyrics(
    messenger: &dyn Messenger,
    chat_id: ChatId,
    record: &SongRecord,
    report: &mut FulfillmentReport,
) -> bool {
    let chunks = match record.lyrics() {
        Some(lyrics) => chunk_text(lyrics, config::telegram::MAX_MESSAGE_CHARS),
        None => vec![texts::LYRICS_UNAVAILABLE.to_string()],
    };

    for (i, chunk) in chunks.iter().enumerate() {
        match messenger.send_text(chat_id, chunk, None).await {
            Ok(_) => report.lyrics_chunks_sent += 1,
            Err(e) => log::error!(
                "Failed to send lyrics chunk {}/{} to chat {}: {}",
                i + 1,
                chunks.len(),
                chat_id,
                e
            ),
        }
    }
    report.lyrics_chunks_sent == chunks.len()
}

async fn send_companion_links(
    ctx: &FulfillmentContext,
    messenger: &dyn Messenger,
    chat_id: ChatId,
    record: &SongRecord,
    report: &mut FulfillmentReport,
) -> bool {
    let keyboard = match companion_keyboard(&ctx.companion_url, record) {
        Ok(keyboard) => keyboard,
        Err(e) => {
            log::error!("Invalid companion link for '{}': {}", record.display_title(), e);
            return false;
        }
    };

    match messenger.send_text(chat_id, texts::COMPANION_PROMPT, Some(keyboard)).await {
        Ok(_) => report.link_sent = true,
        Err(e) => log::error!("Failed to send companion links to chat {}: {}", chat_id, e),
    }
    report.link_sent
}

//! User-facing strings.

pub const USAGE: &str = "🎵 Send me a song title and artist name, for example:\n\
    Here Comes The Sun The Beatles\n\n\
    Pick a result and I'll send you the audio, the lyrics and a link to the web app.";

pub const NO_MATCHES: &str = "❌ No songs found. Try another title or artist.";
pub const SEARCH_FAILED: &str = "⚠️ Failed to search lyrics. Please try again.";

pub const CANCEL_BUTTON: &str = "❌ Cancel";
pub const PREV_BUTTON: &str = "⬅️";
pub const NEXT_BUTTON: &str = "➡️";

pub const CANCELLED: &str = "❌ Search cancelled.";
pub const SESSION_EXPIRED: &str = "⌛ Session expired, please search again.";
pub const SONG_NOT_FOUND: &str = "❌ Song not found.";
pub const PROCESSING: &str = "⏳ Downloading audio…";

pub const DOWNLOAD_FAILED: &str = "⚠️ Failed to download audio.";
pub const AUDIO_NOT_FOUND: &str = "⚠️ Audio not found.";
pub const AUDIO_SEND_FAILED: &str = "⚠️ Failed to send audio.";
pub const LYRICS_UNAVAILABLE: &str = "📝 Lyrics not available.";
pub const DELIVERY_INCOMPLETE: &str = "⚠️ Some lyrics or links could not be sent.";

pub const COMPANION_PROMPT: &str = "Or manage it in the web app:";
pub const SYNCED_LYRICS_BUTTON: &str = "✨ Synced lyrics";
pub const SAVE_TO_PLAYLIST_BUTTON: &str = "➕ Save to playlist";

pub fn searching(query: &str) -> String {
    format!("🔎 Searching for \"{}\"…", query)
}

/// Header of a result page; `page` is 0-based.
pub fn page_header(page: usize, total_pages: usize) -> String {
    format!("🎧 Pick a song (page {}/{}):", page + 1, total_pages)
}

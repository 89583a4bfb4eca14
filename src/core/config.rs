use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

// Configuration for the bot.
// Every value is read once from the environment (after `.env` is loaded) and cached.

/// Bot token
/// Read from BOT_TOKEN, TELOXIDE_TOKEN or TELEGRAM_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .or_else(|_| env::var("TELEGRAM_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Base URL of the companion web app that receives "synced lyrics" and
/// "save to playlist" links.
/// Read from WEB_APP_URL environment variable, trailing slashes are trimmed
pub static WEB_APP_URL: Lazy<String> = Lazy::new(|| {
    env::var("WEB_APP_URL")
        .map(|url| url.trim().trim_end_matches('/').to_string())
        .unwrap_or_else(|_| "https://lyrics-seeker.vercel.app".to_string())
});

/// Base URL of the LRCLIB-compatible lyrics provider
/// Read from LYRICS_API_URL environment variable
pub static LYRICS_API_URL: Lazy<String> = Lazy::new(|| {
    env::var("LYRICS_API_URL")
        .map(|url| url.trim().trim_end_matches('/').to_string())
        .unwrap_or_else(|_| "https://lrclib.net".to_string())
});

/// Cached yt-dlp binary path
/// Read once at startup from YTDL_BIN environment variable or defaults to "yt-dlp"
pub static YTDL_BIN: Lazy<String> = Lazy::new(|| env::var("YTDL_BIN").unwrap_or_else(|_| "yt-dlp".to_string()));

/// Audio codec to extract to (e.g. "mp3").
/// Unset means the backend keeps whatever container the best audio stream has.
/// Extraction requires ffmpeg next to yt-dlp.
pub static YTDL_AUDIO_FORMAT: Lazy<Option<String>> = Lazy::new(|| {
    env::var("YTDL_AUDIO_FORMAT")
        .ok()
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
});

/// Download folder path
/// Read from DOWNLOAD_FOLDER environment variable
/// Every fulfillment creates (and removes) its own sub-directory here
/// Supports tilde (~) expansion for home directory
pub static DOWNLOAD_FOLDER: Lazy<String> = Lazy::new(|| {
    let raw = env::var("DOWNLOAD_FOLDER").unwrap_or_else(|_| "/tmp/lyrics-seeker".to_string());
    shellexpand::tilde(&raw).into_owned()
});

/// Force IPv4 for the lyrics HTTP client and yt-dlp
/// Read from FORCE_IPV4 environment variable, default: true
pub static FORCE_IPV4: Lazy<bool> = Lazy::new(|| {
    env::var("FORCE_IPV4")
        .map(|v| !matches!(v.trim().to_lowercase().as_str(), "0" | "false" | "no" | "off"))
        .unwrap_or(true)
});

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: app.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "app.log".to_string()));

/// Lyrics provider configuration
pub mod lyrics {
    use super::Duration;

    /// Timeout for a single provider request (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 20;

    /// User agent sent to the provider
    pub const USER_AGENT: &str = concat!("lyrics-seeker/", env!("CARGO_PKG_VERSION"));

    /// Provider request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Download configuration
pub mod download {
    use super::Duration;

    /// Timeout for the yt-dlp process (in seconds)
    pub const YTDLP_TIMEOUT_SECS: u64 = 240;

    /// Audio quality passed along with YTDL_AUDIO_FORMAT
    pub const AUDIO_QUALITY: &str = "128K";

    /// yt-dlp command timeout duration
    pub fn ytdlp_timeout() -> Duration {
        Duration::from_secs(YTDLP_TIMEOUT_SECS)
    }
}

/// Retry configuration for provider requests
pub mod retry {
    use super::Duration;

    /// Maximum number of retries after the first attempt
    pub const MAX_RETRIES: u32 = 3;

    /// Delay before the first retry (in milliseconds)
    pub const INITIAL_DELAY_MS: u64 = 1000;

    /// Upper bound for a single backoff delay (in seconds)
    pub const MAX_DELAY_SECS: u64 = 10;

    /// Base for exponential backoff calculation
    pub const EXPONENTIAL_BACKOFF_BASE: f64 = 2.0;

    /// HTTP status codes that are retried
    pub const RETRY_STATUS_CODES: [u16; 5] = [429, 500, 502, 503, 504];

    pub fn initial_delay() -> Duration {
        Duration::from_millis(INITIAL_DELAY_MS)
    }

    pub fn max_delay() -> Duration {
        Duration::from_secs(MAX_DELAY_SECS)
    }
}

/// Telegram surface configuration
pub mod telegram {
    /// Search results shown per page
    pub const PAGE_SIZE: usize = 10;

    /// Maximum characters in a single outbound lyrics message
    pub const MAX_MESSAGE_CHARS: usize = 4000;

    /// Maximum characters of a result button label
    pub const MAX_BUTTON_LABEL_CHARS: usize = 60;
}

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Bot API requests (in seconds)
    /// Large enough for audio uploads
    pub const REQUEST_TIMEOUT_SECS: u64 = 300;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

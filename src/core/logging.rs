//! Logging initialization
//!
//! Console + file logger through `simplelog`, plus a startup summary of the
//! configuration the bot is about to use.

use anyhow::Result;
use simplelog::*;

use crate::core::config;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to create the log file or a logger is already set
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file =
        fs_err::File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs the effective configuration at application startup
///
/// The bot token is never logged, only whether it is present.
pub fn log_configuration() {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("🎵 Lyrics Seeker configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if config::BOT_TOKEN.is_empty() {
        log::error!("❌ BOT_TOKEN: not set");
    } else {
        log::info!("✅ BOT_TOKEN: set");
    }
    log::info!("Lyrics provider: {}", *config::LYRICS_API_URL);
    log::info!("Companion web app: {}", *config::WEB_APP_URL);
    log::info!("yt-dlp binary: {}", *config::YTDL_BIN);
    match config::YTDL_AUDIO_FORMAT.as_deref() {
        Some(format) => log::info!("Audio extraction: {} @ {}", format, config::download::AUDIO_QUALITY),
        None => log::info!("Audio extraction: off (backend keeps the original container)"),
    }
    log::info!("Download folder: {}", *config::DOWNLOAD_FOLDER);
    log::info!("Force IPv4: {}", *config::FORCE_IPV4);
}

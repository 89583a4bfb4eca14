use anyhow::Result;
use dotenvy::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use tokio::time::sleep;

use lyrics_seeker::cli::{Cli, Commands};
use lyrics_seeker::core::{config, init_logger, log_configuration};
use lyrics_seeker::download::{FulfillmentContext, YtDlpBackend};
use lyrics_seeker::lyrics::{LyricsClient, SearchOutcome};
use lyrics_seeker::storage::ResultStore;
use lyrics_seeker::telegram::pagination::{button_label, PageView};
use lyrics_seeker::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Attempts to reach the Bot API before giving up at startup
const STARTUP_MAX_RETRIES: u32 = 12;

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, configuration, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));

    // Load environment variables from .env if present, before any config is read
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Run) => run_bot().await,
        Some(Commands::Search { query, page }) => run_cli_search(&query.join(" "), page).await,
        None => {
            log::info!("No command specified, running bot in default mode");
            run_bot().await
        }
    }
}

/// Builds the dependencies shared by all handlers
fn build_deps() -> Result<HandlerDeps> {
    url::Url::parse(&config::WEB_APP_URL).map_err(|e| anyhow::anyhow!("Invalid WEB_APP_URL: {}", e))?;

    let download_root = PathBuf::from(config::DOWNLOAD_FOLDER.as_str());
    fs_err::create_dir_all(&download_root)?;

    let lyrics = Arc::new(LyricsClient::from_config()?);
    let backend = Arc::new(YtDlpBackend::from_config());
    let fulfillment = FulfillmentContext::new(lyrics, backend, download_root, &config::WEB_APP_URL);

    Ok(HandlerDeps::new(Arc::new(ResultStore::new()), Arc::new(fulfillment)))
}

/// Run the Telegram bot
async fn run_bot() -> Result<()> {
    log::info!("Starting bot...");
    log_configuration();

    let deps = build_deps()?;
    let bot = create_bot()?;

    // Retry while the Bot API is unreachable
    let mut startup_retry = 0;
    let bot_info = loop {
        match bot.get_me().await {
            Ok(info) => break info,
            Err(e) => {
                startup_retry += 1;
                if startup_retry >= STARTUP_MAX_RETRIES {
                    return Err(anyhow::anyhow!(
                        "Failed to connect to Bot API after {} retries: {}",
                        startup_retry,
                        e
                    ));
                }
                log::warn!(
                    "Bot API not ready (attempt {}/{}): {}. Retrying in 5 seconds...",
                    startup_retry,
                    STARTUP_MAX_RETRIES,
                    e
                );
                sleep(Duration::from_secs(5)).await;
            }
        }
    };
    log::info!("Bot username: {:?}, Bot ID: {}", bot_info.username, bot_info.id);

    // Long polling does not work while a webhook is registered
    bot.delete_webhook().await?;

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

    log::info!("🚀 Lyrics Seeker is up, polling for updates");
    Dispatcher::builder(bot, schema(deps))
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}

/// Prints one page of search results to stdout
async fn run_cli_search(query: &str, page: u64) -> Result<()> {
    let client = LyricsClient::from_config()?;

    println!("🔎 Searching {} for \"{}\"", client.base_url(), query);
    let records = match client.search(query).await? {
        SearchOutcome::Found(records) => records,
        SearchOutcome::NoMatches => {
            println!("No matches.");
            return Ok(());
        }
    };

    // clap rejects 0
    let index = usize::try_from(page - 1).unwrap_or(usize::MAX);
    let Some(view) = PageView::new(&records, index) else {
        println!("Page {} is out of range ({} results).", page, records.len());
        return Ok(());
    };

    println!("{}", view.header());
    for (offset, record) in view.window().iter().enumerate() {
        let index = view.start() + offset;
        let lyrics = if record.lyrics().is_some() { "📝" } else { "  " };
        println!("{} {}  [sel:{}]", lyrics, button_label(index, record), index);
    }
    Ok(())
}

//! Audio backends: something that turns a free-text query into a file on disk.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

use crate::core::config;
use crate::core::error::{AppError, AppResult};

/// Acquires audio for a query.
///
/// Implementations write exactly one file named `<base>.<ext>` into `dir`
/// and return `Ok(())`, or return an error. They never create anything
/// outside of `dir`.
#[async_trait]
pub trait AudioBackend: Send + Sync {
    async fn download(&self, query: &str, dir: &Path, base: &str) -> AppResult<()>;
}

/// Backend that shells out to yt-dlp and takes the first search hit.
#[derive(Debug, Clone)]
pub struct YtDlpBackend {
    bin: String,
    audio_format: Option<String>,
    force_ipv4: bool,
}

impl YtDlpBackend {
    pub fn new(bin: impl Into<String>, audio_format: Option<String>, force_ipv4: bool) -> Self {
        Self {
            bin: bin.into(),
            audio_format,
            force_ipv4,
        }
    }

    /// Backend configured from `YTDL_BIN`, `YTDL_AUDIO_FORMAT` and `FORCE_IPV4`.
    pub fn from_config() -> Self {
        Self::new(
            config::YTDL_BIN.as_str(),
            config::YTDL_AUDIO_FORMAT.clone(),
            *config::FORCE_IPV4,
        )
    }

    /// Builds the yt-dlp argument list.
    pub fn build_args(&self, query: &str, dir: &Path, base: &str) -> Vec<String> {
        let mut args: Vec<String> = ["--format", "bestaudio/best", "--no-playlist", "--quiet", "--no-warnings"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        if self.force_ipv4 {
            args.push("--force-ipv4".to_string());
        }

        if let Some(format) = &self.audio_format {
            args.extend([
                "-x".to_string(),
                "--audio-format".to_string(),
                format.clone(),
                "--audio-quality".to_string(),
                config::download::AUDIO_QUALITY.to_string(),
            ]);
        }

        // `%` starts an output template field
        let template = dir.join(format!("{}.%(ext)s", base.replace('%', "%%")));
        args.push("-o".to_string());
        args.push(template.to_string_lossy().into_owned());
        args.push(format!("ytsearch1:{}", query));

        args
    }
}

#[async_trait]
impl AudioBackend for YtDlpBackend {
    async fn download(&self, query: &str, dir: &Path, base: &str) -> AppResult<()> {
        let args = self.build_args(query, dir, base);
        log::debug!("yt-dlp command: {} {}", self.bin, args.join(" "));

        let mut command = TokioCommand::new(&self.bin);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match timeout(config::download::ytdlp_timeout(), command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(AppError::Download(format!("Failed to execute {}: {}", self.bin, e)));
            }
            Err(_) => {
                return Err(AppError::Download(format!(
                    "yt-dlp timed out after {}s",
                    config::download::YTDLP_TIMEOUT_SECS
                )));
            }
        };

        if output.status.success() {
            log::info!("yt-dlp finished for '{}'", query);
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let tail: String = stderr.chars().take(500).collect();
        log::error!("yt-dlp failed for '{}' ({}): {}", query, output.status, tail.trim());
        Err(AppError::Download(format!("yt-dlp exited with {}", output.status)))
    }
}

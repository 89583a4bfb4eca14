//! Lyrics lookup against an LRCLIB-compatible provider.
//!
//! Two calls are used:
//! - `/api/search?q=` to find candidate songs for a free-text query
//! - `/api/get-cached` to enrich one candidate with full details (lyrics)
//!
//! Both are idempotent GETs and go through [`crate::core::retry`], so the
//! caller only sees the final outcome.

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::config;
use crate::core::retry::{is_retryable_status, retry, RetryConfig, Retryable};

const UNKNOWN: &str = "Unknown";

/// One search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongRecord {
    pub id: Option<i64>,
    pub track_name: String,
    pub artist_name: String,
    pub album_name: Option<String>,
    /// Track length in seconds, as reported by the provider
    pub duration: Option<f64>,
    pub plain_lyrics: Option<String>,
}

impl SongRecord {
    /// Creates a record with only title and artist set.
    pub fn new(track_name: impl Into<String>, artist_name: impl Into<String>) -> Self {
        Self {
            id: None,
            track_name: track_name.into(),
            artist_name: artist_name.into(),
            album_name: None,
            duration: None,
            plain_lyrics: None,
        }
    }

    /// "Title - Artist", used for button labels and file names.
    pub fn display_title(&self) -> String {
        format!("{} - {}", self.track_name, self.artist_name)
    }

    /// Free-text query handed to the audio backend.
    pub fn audio_query(&self) -> String {
        format!("{} {}", self.track_name, self.artist_name)
    }

    /// Lyrics body, if it has any non-blank content.
    pub fn lyrics(&self) -> Option<&str> {
        self.plain_lyrics.as_deref().filter(|text| !text.trim().is_empty())
    }

    /// Fills the gaps of a detail response with what this record already knows.
    fn merged_with(&self, detail: ProviderTrack) -> SongRecord {
        SongRecord {
            id: detail.id.or(self.id),
            track_name: non_blank(detail.track_name).unwrap_or_else(|| self.track_name.clone()),
            artist_name: non_blank(detail.artist_name).unwrap_or_else(|| self.artist_name.clone()),
            album_name: non_blank(detail.album_name).or_else(|| self.album_name.clone()),
            duration: detail.duration.or(self.duration),
            plain_lyrics: detail.plain_lyrics.or_else(|| self.plain_lyrics.clone()),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Wire format of a provider track object. Every field may be missing or null.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderTrack {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    track_name: Option<String>,
    #[serde(default)]
    artist_name: Option<String>,
    #[serde(default)]
    album_name: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    plain_lyrics: Option<String>,
}

impl From<ProviderTrack> for SongRecord {
    fn from(track: ProviderTrack) -> Self {
        Self {
            id: track.id,
            track_name: track.track_name.unwrap_or_else(|| UNKNOWN.to_string()),
            artist_name: track.artist_name.unwrap_or_else(|| UNKNOWN.to_string()),
            album_name: non_blank(track.album_name),
            duration: track.duration,
            plain_lyrics: track.plain_lyrics,
        }
    }
}

/// Outcome of a successful search request.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// At least one hit, in provider order
    Found(Vec<SongRecord>),
    /// The provider answered with an empty list; a different query is needed
    NoMatches,
}

/// Lookup failure. Transient ones are retried before they surface here.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider answered with status {0}")]
    Status(StatusCode),

    /// 429, with the provider's `Retry-After` hint when it sent one
    #[error("provider rate limit hit")]
    RateLimited(Option<Duration>),

    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl Retryable for LookupError {
    fn is_retryable(&self) -> bool {
        match self {
            LookupError::Transport(e) => e.is_retryable(),
            LookupError::Status(status) => is_retryable_status(status.as_u16()),
            LookupError::RateLimited(_) => true,
            LookupError::Malformed(_) => false,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        match self {
            LookupError::RateLimited(hint) => *hint,
            _ => None,
        }
    }
}

/// Delay-seconds form of `Retry-After`, capped at the longest backoff delay.
fn retry_after_hint(headers: &HeaderMap) -> Option<Duration> {
    let secs: u64 = headers.get(RETRY_AFTER)?.to_str().ok()?.trim().parse().ok()?;
    Some(Duration::from_secs(secs).min(config::retry::max_delay()))
}

/// HTTP client for the lyrics provider.
#[derive(Debug, Clone)]
pub struct LyricsClient {
    http: reqwest::Client,
    base_url: String,
    retry: RetryConfig,
}

impl LyricsClient {
    /// Creates a client for the provider at `base_url` (e.g. `https://lrclib.net`).
    pub fn new(base_url: &str, force_ipv4: bool) -> Result<Self, LookupError> {
        let mut builder = reqwest::Client::builder()
            .timeout(config::lyrics::timeout())
            .user_agent(config::lyrics::USER_AGENT);
        if force_ipv4 {
            builder = builder.local_address(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry: RetryConfig::default(),
        })
    }

    /// Creates a client from `LYRICS_API_URL` and `FORCE_IPV4`.
    pub fn from_config() -> Result<Self, LookupError> {
        Self::new(&config::LYRICS_API_URL, *config::FORCE_IPV4)
    }

    /// Replaces the retry strategy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Searches the provider for a free-text query.
    ///
    /// A blank query yields [`SearchOutcome::NoMatches`] without a request.
    pub async fn search(&self, query: &str) -> Result<SearchOutcome, LookupError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(SearchOutcome::NoMatches);
        }

        let params = [("q", query.to_string())];
        let tracks: Vec<ProviderTrack> = self.get_json("/api/search", &params).await?;

        log::info!("Lyrics search '{}' → {} hit(s)", query, tracks.len());
        if tracks.is_empty() {
            return Ok(SearchOutcome::NoMatches);
        }
        Ok(SearchOutcome::Found(tracks.into_iter().map(SongRecord::from).collect()))
    }

    /// Fetches full details for a record.
    ///
    /// Best-effort: on any failure the original record is returned unchanged.
    pub async fn enrich(&self, record: &SongRecord) -> SongRecord {
        let params = [
            ("track_name", record.track_name.clone()),
            ("artist_name", record.artist_name.clone()),
            ("album_name", record.album_name.clone().unwrap_or_default()),
            (
                "duration",
                record
                    .duration
                    .map(|secs| format!("{}", secs.round() as i64))
                    .unwrap_or_default(),
            ),
        ];

        match self.get_json::<ProviderTrack>("/api/get-cached", &params).await {
            Ok(detail) => {
                log::info!("Lyrics: enriched '{}'", record.display_title());
                record.merged_with(detail)
            }
            Err(e) => {
                log::warn!(
                    "Lyrics: enrichment failed for '{}', keeping search result: {}",
                    record.display_title(),
                    e
                );
                record.clone()
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T, LookupError> {
        let url = format!("{}{}", self.base_url, path);
        let url = url.as_str();
        retry(&self.retry, move || self.get_json_once::<T>(url, params))
            .await
            .into_result()
    }

    async fn get_json_once<T: DeserializeOwned>(&self, url: &str, params: &[(&str, String)]) -> Result<T, LookupError> {
        let response = self.http.get(url).query(params).send().await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(LookupError::RateLimited(retry_after_hint(response.headers())));
        }
        if !status.is_success() {
            return Err(LookupError::Status(status));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| LookupError::Malformed(e.to_string()))
    }
}

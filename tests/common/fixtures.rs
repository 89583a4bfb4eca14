//! Fixtures: a mocked lyrics provider, a fake audio backend and a wired-up
//! fulfillment context.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lyrics_seeker::core::retry::RetryConfig;
use lyrics_seeker::download::{AudioBackend, FulfillmentContext};
use lyrics_seeker::{AppError, AppResult, LyricsClient, ResultStore};
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const COMPANION_URL: &str = "https://companion.example";

/// `n` provider tracks named "Song 0".."Song {n-1}" by "Artist".
pub fn songs_json(n: usize) -> Value {
    Value::Array(
        (0..n)
            .map(|i| {
                json!({
                    "id": i,
                    "trackName": format!("Song {}", i),
                    "artistName": "Artist",
                    "albumName": "Album",
                    "duration": 200.0 + i as f64
                })
            })
            .collect(),
    )
}

/// Audio backend that writes canned files instead of running yt-dlp.
pub struct FakeBackend {
    /// File names to create; `{base}` is replaced by the requested base name
    pub files: Vec<String>,
    pub fail: bool,
    pub dirs: Mutex<Vec<PathBuf>>,
}

impl FakeBackend {
    pub fn writing(files: &[&str]) -> Self {
        Self {
            files: files.iter().map(|f| f.to_string()).collect(),
            fail: false,
            dirs: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::writing(&["{base}.webm.part"])
        }
    }

    pub fn dirs(&self) -> Vec<PathBuf> {
        self.dirs.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioBackend for FakeBackend {
    async fn download(&self, _query: &str, dir: &Path, base: &str) -> AppResult<()> {
        self.dirs.lock().unwrap().push(dir.to_path_buf());
        for file in &self.files {
            std::fs::write(dir.join(file.replace("{base}", base)), b"fake audio")?;
        }
        if self.fail {
            return Err(AppError::Download("yt-dlp exited with exit status: 1".to_string()));
        }
        Ok(())
    }
}

/// Everything a flow test needs.
pub struct TestEnvironment {
    pub provider: MockServer,
    pub download_root: TempDir,
    pub backend: Arc<FakeBackend>,
    pub store: Arc<ResultStore>,
    pub lyrics: Arc<LyricsClient>,
    pub ctx: FulfillmentContext,
}

impl TestEnvironment {
    pub async fn new(backend: FakeBackend) -> Self {
        let provider = MockServer::start().await;
        let download_root = tempfile::tempdir().unwrap();
        let backend = Arc::new(backend);
        let lyrics = Arc::new(
            LyricsClient::new(&provider.uri(), false)
                .unwrap()
                .with_retry(RetryConfig::quick()),
        );
        let ctx = FulfillmentContext::new(lyrics.clone(), backend.clone(), download_root.path(), COMPANION_URL);

        Self {
            provider,
            download_root,
            backend,
            store: Arc::new(ResultStore::new()),
            lyrics,
            ctx,
        }
    }

    /// Answers `/api/search?q={query}` with `body`.
    pub async fn mock_search(&self, query: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path("/api/search"))
            .and(query_param("q", query))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.provider)
            .await;
    }

    /// Answers every `/api/get-cached` with `body`.
    pub async fn mock_detail(&self, body: Value) {
        Mock::given(method("GET"))
            .and(path("/api/get-cached"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.provider)
            .await;
    }

    /// Number of entries left under the download root.
    pub fn leftover_entries(&self) -> usize {
        std::fs::read_dir(self.download_root.path()).unwrap().count()
    }
}

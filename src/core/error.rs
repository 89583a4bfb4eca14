use thiserror::Error;

/// Centralized error types for the application
///
/// Handlers convert these into chat messages at their boundary; nothing here
/// is allowed to reach the dispatcher as a crash.
#[derive(Error, Debug)]
pub enum AppError {
    /// Download/yt-dlp errors
    #[error("Download error: {0}")]
    Download(String),

    /// The backend reported success but produced no matching file
    #[error("Downloaded audio not found for '{0}'")]
    ArtifactNotFound(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing errors
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

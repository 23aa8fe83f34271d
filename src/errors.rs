//! Error types for vod_fetcher
//!
//! This module defines error types for all components of the application.
//! Errors are designed to be actionable and to let the caller distinguish
//! "no match" from "network down" from "quality not offered".
//!
//! Note that a resolver returning no candidate is a normal outcome, not an
//! error; see [`crate::app::pipeline::Outcome`].

use std::path::PathBuf;
use thiserror::Error;

/// Catalog API errors covering paged search requests
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request rejected by the API (bad key, malformed filter). Never retried.
    #[error("catalog API rejected the request: {message}")]
    InvalidRequest { message: String },

    /// Transient network or server failure that survived all retries
    #[error("catalog API unavailable after {attempts} attempts")]
    RemoteUnavailable { attempts: u32 },

    /// HTTP transport error
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// Response body could not be decoded
    #[error("failed to decode catalog response")]
    Decode(#[from] serde_json::Error),

    /// A request URL could not be constructed
    #[error("invalid API URL: {url}")]
    InvalidUrl { url: String },
}

/// Cache store errors
///
/// These never abort a run: the orchestrator degrades every cache failure to
/// a miss and falls back to the network.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Cache directory could not be created or accessed
    #[error("cache directory not accessible: {path}")]
    DirectoryNotAccessible { path: PathBuf },

    /// I/O error during cache operations
    #[error("cache I/O error")]
    Io(#[from] std::io::Error),

    /// Persisted entry could not be decoded
    #[error("cache entry corrupted")]
    Corrupt(#[from] serde_json::Error),
}

/// Download engine errors
#[derive(Error, Debug)]
pub enum DownloadError {
    /// Requested quality tier has no rendition URL for this video
    #[error("quality '{quality}' is not offered for video {video_id}")]
    QualityUnavailable { quality: String, video_id: u64 },

    /// Stream interrupted or server refused the transfer
    #[error("download failed: {reason}")]
    Failed { reason: String },

    /// Transfer aborted by an external interrupt signal
    #[error("download interrupted")]
    Interrupted,

    /// Byte count did not match the reported content length
    #[error("incomplete download: received {received} bytes, expected {expected} bytes")]
    SizeMismatch { received: u64, expected: u64 },

    /// HTTP transport error
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    /// File I/O error during the transfer
    #[error("file I/O error")]
    Io(#[from] std::io::Error),

    /// Rename from temp path to final target failed
    #[error("atomic rename failed: could not rename {temp_path} to {final_path}")]
    AtomicOperationFailed {
        temp_path: PathBuf,
        final_path: PathBuf,
    },

    /// Rendition URL could not be parsed
    #[error("invalid download URL: {url}")]
    InvalidUrl { url: String },
}

impl DownloadError {
    /// Whether the orchestrator may retry the download state once
    ///
    /// Quality gaps are permanent and interrupts are deliberate; everything
    /// else is a stream-level failure worth one more attempt.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            DownloadError::QualityUnavailable { .. } | DownloadError::Interrupted
        )
    }
}

/// Configuration validation errors
///
/// Raised before the pipeline runs, while converting parsed CLI arguments
/// into the validated run configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No API key on the command line or in the environment
    #[error("--api-key not provided (or set {})", crate::constants::ENV_API_KEY)]
    MissingApiKey,

    /// No show regex supplied
    #[error("--show-regex not provided")]
    MissingShowRegex,

    /// Neither a video regex nor a video number supplied
    #[error("--video-regex or --video-number must be provided")]
    MissingVideoSelector,

    /// A supplied pattern failed to compile
    #[error("invalid regex pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Unknown quality tier name
    #[error("unknown quality '{value}' (expected highest, hd, high, low or mobile)")]
    InvalidQuality { value: String },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Catalog API error
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Cache error
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Download error
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic application error with context
    #[error("application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Api(_) => "api",
            AppError::Cache(_) => "cache",
            AppError::Download(_) => "download",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Catalog API result type alias
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Cache result type alias
pub type CacheResult<T> = std::result::Result<T, CacheError>;

/// Download result type alias
pub type DownloadResult<T> = std::result::Result<T, DownloadError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

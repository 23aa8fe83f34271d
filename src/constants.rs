//! Application constants for vod_fetcher
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// Environment variable names for authentication
pub mod env {
    /// Environment variable name for the Giant Bomb API key
    pub const API_KEY: &str = "GIANTBOMB_API_KEY";
}

/// Catalog API endpoints and protocol constants
pub mod api {
    /// Catalog API base URL
    pub const BASE_URL: &str = "https://www.giantbomb.com/api";

    /// List endpoint for video shows
    pub const SHOWS_ENDPOINT: &str = "video_shows";

    /// List endpoint for videos
    pub const VIDEOS_ENDPOINT: &str = "videos";

    /// Default page size for list requests
    pub const DEFAULT_PAGE_SIZE: u32 = 100;

    /// Envelope status code indicating a successful response
    pub const STATUS_OK: i32 = 1;

    /// Response format requested from the API
    pub const FORMAT: &str = "json";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = "vod-fetcher/0.1.0 (Catalog Download Tool)";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 4;
}

/// Rate limiting and retry configuration
pub mod limits {
    /// Default rate limit for catalog requests (requests per second)
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 2;

    /// Maximum retry attempts for transient request failures
    pub const MAX_RETRIES: u32 = 3;

    /// Base delay for exponential backoff (milliseconds)
    pub const RETRY_BASE_DELAY_MS: u64 = 1000;
}

/// Cache store configuration
pub mod cache {
    use super::Duration;

    /// Time-to-live for a cached query result
    pub const ENTRY_TTL: Duration = Duration::from_secs(24 * 60 * 60);

    /// Directory name under the per-OS config directory
    pub const DIR_NAME: &str = "vod-fetcher";

    /// Subdirectory holding cache entries
    pub const CACHE_SUBDIR: &str = "cache";
}

/// File operation constants
pub mod files {
    /// Temporary file suffix for atomic operations
    pub const TEMP_FILE_SUFFIX: &str = ".tmp";

    /// Fallback extension when a rendition URL has none
    pub const DEFAULT_VIDEO_EXTENSION: &str = "mp4";
}

/// Progress reporting
pub mod progress {
    use super::Duration;

    /// Minimum interval between progress bar redraws
    pub const UPDATE_INTERVAL: Duration = Duration::from_millis(100);
}

// Re-export commonly used constants for convenience
pub use api::{BASE_URL as API_BASE_URL, DEFAULT_PAGE_SIZE};
pub use env::API_KEY as ENV_API_KEY;
pub use files::TEMP_FILE_SUFFIX;
pub use http::{DEFAULT_TIMEOUT as HTTP_TIMEOUT, USER_AGENT};
pub use limits::{DEFAULT_RATE_LIMIT_RPS, MAX_RETRIES, RETRY_BASE_DELAY_MS};

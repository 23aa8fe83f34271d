//! vod_fetcher library
//!
//! Resolves fuzzy show/video queries against a paginated media catalog API
//! and downloads the matching video at a requested quality, with on-disk
//! caching of query results and atomic file writes.

pub mod app;
pub mod cli;
pub mod constants;
pub mod errors;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        assert_eq!(DEFAULT_PAGE_SIZE, 100);
        assert_eq!(ENV_API_KEY, "GIANTBOMB_API_KEY");
        assert!(USER_AGENT.contains("vod-fetcher"));
    }

    #[test]
    fn test_error_types() {
        let api_error = errors::ApiError::RemoteUnavailable { attempts: 3 };
        let app_error = AppError::Api(api_error);

        assert_eq!(app_error.category(), "api");
    }
}

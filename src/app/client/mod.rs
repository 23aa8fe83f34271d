//! HTTP client for the catalog API
//!
//! The module is organized into specialized components:
//! - `config`: HTTP client configuration and building
//! - `http`: Core HTTP operations with rate limiting and retries
//! - `download`: Streaming file download with atomic writes
//!
//! [`CatalogClient`] ties them together and owns the API key, which the
//! catalog expects as a query parameter on every request, including byte
//! access to premium renditions.

use serde::Deserialize;
use url::Url;

use crate::constants::api;
use crate::errors::{ApiError, ApiResult, DownloadError, DownloadResult};

pub mod config;
pub mod download;
pub mod http;

pub use config::ClientConfig;
pub use download::{DownloadHandler, TransferObserver};

use http::HttpHandler;

/// Paged response envelope returned by every list endpoint
///
/// The API reports request-level failures inside a 200 body via
/// `status_code`; anything other than [`api::STATUS_OK`] carries a
/// human-readable `error` string.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub error: String,
    pub status_code: i32,
    pub number_of_page_results: u32,
    pub number_of_total_results: u32,
    pub limit: u32,
    pub offset: u32,
    pub results: Vec<T>,
}

/// HTTP client for interacting with the catalog API
#[derive(Debug)]
pub struct CatalogClient {
    http_handler: HttpHandler,
    base_url: Url,
    api_key: String,
}

impl CatalogClient {
    /// Creates a client for the default catalog base URL
    pub fn new(api_key: impl Into<String>, config: ClientConfig) -> ApiResult<Self> {
        Self::with_base_url(api_key, config, api::BASE_URL)
    }

    /// Creates a client against an explicit base URL (used by tests)
    pub fn with_base_url(
        api_key: impl Into<String>,
        config: ClientConfig,
        base_url: &str,
    ) -> ApiResult<Self> {
        let client = config.build_http_client()?;
        let http_handler = HttpHandler::new(client, config.rate_limit_rps);
        let base_url = Url::parse(base_url).map_err(|_| ApiError::InvalidUrl {
            url: base_url.to_string(),
        })?;

        Ok(Self {
            http_handler,
            base_url,
            api_key: api_key.into(),
        })
    }

    /// Build the URL for one page of a list endpoint
    fn page_url(
        &self,
        endpoint: &str,
        filters: &[String],
        limit: u32,
        offset: u32,
    ) -> ApiResult<Url> {
        let mut url = self
            .base_url
            .join(&format!("{}/", endpoint))
            .map_err(|_| ApiError::InvalidUrl {
                url: format!("{}/{}", self.base_url, endpoint),
            })?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", &self.api_key);
            pairs.append_pair("format", api::FORMAT);
            pairs.append_pair("limit", &limit.to_string());
            pairs.append_pair("offset", &offset.to_string());
            if !filters.is_empty() {
                pairs.append_pair("filter", &filters.join(","));
            }
        }

        Ok(url)
    }

    /// Fetch one page of records from a list endpoint
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` when the API rejects the request, either at
    /// the HTTP level or via the envelope status code, and
    /// `RemoteUnavailable` when transient failures exhaust their retries.
    pub async fn fetch_page<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        filters: &[String],
        limit: u32,
        offset: u32,
    ) -> ApiResult<ApiEnvelope<T>> {
        let url = self.page_url(endpoint, filters, limit, offset)?;
        let envelope: ApiEnvelope<T> = self.http_handler.get_json(&url).await?;

        if envelope.status_code != api::STATUS_OK {
            return Err(ApiError::InvalidRequest {
                message: envelope.error,
            });
        }

        Ok(envelope)
    }

    /// Attach the API key to a rendition URL for authenticated byte access
    pub fn authenticated_url(&self, rendition_url: &str) -> DownloadResult<Url> {
        let mut url = Url::parse(rendition_url).map_err(|_| DownloadError::InvalidUrl {
            url: rendition_url.to_string(),
        })?;
        url.query_pairs_mut().append_pair("api_key", &self.api_key);
        Ok(url)
    }

    /// Create a download handler borrowing this client's transport
    pub fn downloader(&self) -> DownloadHandler<'_> {
        DownloadHandler::new(&self.http_handler)
    }

    /// Get the base URL for the catalog API
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

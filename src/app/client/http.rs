//! Core HTTP operations with rate limiting and retry logic
//!
//! JSON requests retry transient failures with exponential backoff; a 4xx
//! response is never retried and surfaces immediately as `InvalidRequest`.
//! Streaming responses used by the download engine are rate limited but make
//! exactly one attempt, since retrying a transfer is the orchestrator's call.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::{clock::DefaultClock, state::InMemoryState, Jitter, Quota, RateLimiter};
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::constants::limits;
use crate::errors::{ApiError, ApiResult, DownloadError, DownloadResult};

/// HTTP operations handler with resilience patterns
#[derive(Debug)]
pub struct HttpHandler {
    client: Client,
    rate_limiter: RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>,
}

impl HttpHandler {
    /// Creates a new HttpHandler with the given client and rate limiting
    pub fn new(client: Client, rate_limit_rps: u32) -> Self {
        let rps = NonZeroU32::new(rate_limit_rps).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(rps));
        Self {
            client,
            rate_limiter,
        }
    }

    async fn throttle(&self) {
        // Jitter avoids thundering herd against the catalog API
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(100)))
            .await;
    }

    fn backoff_delay(attempt: u32) -> Duration {
        Duration::from_millis(limits::RETRY_BASE_DELAY_MS * 2_u64.pow(attempt))
    }

    /// Fetches and decodes a JSON document with rate limiting and retries
    ///
    /// Transient failures (network errors, 429, 5xx) are retried up to
    /// [`limits::MAX_RETRIES`] times with exponential backoff, then surface
    /// as `RemoteUnavailable`. Client errors surface immediately as
    /// `InvalidRequest` without a retry.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> ApiResult<T> {
        self.throttle().await;

        let mut attempts = 0;
        loop {
            match self.client.get(url.as_str()).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_client_error() && status.as_u16() != 429 {
                        return Err(ApiError::InvalidRequest {
                            message: format!("HTTP {}", status.as_u16()),
                        });
                    }

                    if status.is_success() {
                        tracing::debug!("Fetched catalog page: {}", url);
                        let body = response.bytes().await?;
                        return Ok(serde_json::from_slice(&body)?);
                    }

                    // 429 or 5xx: transient
                    if attempts < limits::MAX_RETRIES {
                        attempts += 1;
                        let delay = Self::backoff_delay(attempts);
                        tracing::warn!(
                            "Catalog returned HTTP {} (attempt {}/{}). Backing off for {}ms",
                            status.as_u16(),
                            attempts,
                            limits::MAX_RETRIES,
                            delay.as_millis()
                        );
                        tokio::time::sleep(delay).await;
                    } else {
                        return Err(ApiError::RemoteUnavailable { attempts });
                    }
                }
                Err(e) if attempts < limits::MAX_RETRIES => {
                    attempts += 1;
                    let delay = Self::backoff_delay(attempts);
                    tracing::warn!(
                        "Request failed (attempt {}/{}): {}. Retrying in {}ms",
                        attempts,
                        limits::MAX_RETRIES,
                        e,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::error!(
                        "Request failed after {} retries: {}",
                        limits::MAX_RETRIES,
                        e
                    );
                    return Err(ApiError::RemoteUnavailable { attempts });
                }
            }
        }
    }

    /// Fetches a raw response for streaming, making exactly one attempt
    pub async fn get_stream_response(&self, url: &Url) -> DownloadResult<reqwest::Response> {
        self.throttle().await;

        let response = self.client.get(url.as_str()).send().await?;
        if !response.status().is_success() {
            return Err(DownloadError::Failed {
                reason: format!("HTTP {}", response.status().as_u16()),
            });
        }

        tracing::debug!("Opened transfer stream: {}", url);
        Ok(response)
    }
}

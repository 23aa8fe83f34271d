//! Pipeline orchestration for a single resolve-then-fetch run
//!
//! State machine: `Init -> ResolveShow -> ResolveVideo -> Download -> Done`,
//! with a combined-search fast path that resolves the video directly when
//! both regexes are supplied, falling back to the two-step path when it finds
//! no candidate. Each resolve state checks the cache first, fetches and
//! resolves on a miss, then writes the result back. Info-only mode reports
//! the resolved video and skips the download state entirely.

use std::path::PathBuf;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::app::cache::CacheStore;
use crate::app::client::{download, CatalogClient, TransferObserver};
use crate::app::models::{QualityTier, Show, Video};
use crate::app::query::{Query, ResourceKind};
use crate::app::{pager, resolver};
use crate::errors::{AppError, Result};

/// Validated configuration bundle for one pipeline run
///
/// Built by the configuration layer before the pipeline is invoked; the
/// filter list is ordered and immutable from here on.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub api_key: String,
    pub show_regex: Regex,
    pub video_regex: Option<Regex>,
    /// Positional video selection, used only when no video regex is supplied
    pub video_number: usize,
    /// Premium filters in CLI order, e.g. `premium:true`
    pub filters: Vec<String>,
    pub quality: QualityTier,
    pub out_dir: PathBuf,
    pub info_only: bool,
    pub clean_cache: bool,
}

/// Terminal result of a pipeline run
///
/// `NotFound` is a normal negative outcome, distinct from transport or
/// download errors, so the caller can map it to its own exit condition.
#[derive(Debug)]
pub enum Outcome {
    /// Video downloaded to the target path
    Downloaded { video: Video, path: PathBuf },
    /// Info-only mode: resolved video reported without downloading
    Info(Video),
    /// No show or video matched the query
    NotFound(ResourceKind),
}

/// Sequences resolver calls and the download engine for one invocation
pub struct Pipeline {
    client: CatalogClient,
    cache: CacheStore,
    config: RunConfig,
}

/// Video query filters: premium filters first, then the show constraint
fn video_filters(base: &[String], show_id: u64) -> Vec<String> {
    let mut filters = base.to_vec();
    filters.push(format!("video_show:{}", show_id));
    filters
}

impl Pipeline {
    pub fn new(client: CatalogClient, cache: CacheStore, config: RunConfig) -> Self {
        Self {
            client,
            cache,
            config,
        }
    }

    /// Execute the full run, returning its terminal outcome
    pub async fn run(&self, observer: Option<&dyn TransferObserver>) -> Result<Outcome> {
        // Invalidation happens before any get, so a clean run only ever
        // sees fresh results. If the sweep fails, entries may survive it,
        // so cache reads are bypassed for the rest of the run.
        let mut use_cache = true;
        if self.config.clean_cache {
            if let Err(e) = self.cache.invalidate_all().await {
                warn!("Cache invalidation failed, bypassing cache reads: {}", e);
                use_cache = false;
            }
        }

        // Fast path: combined show+video search
        if let Some(video_regex) = self.config.video_regex.clone() {
            let query = Query::video_search(
                video_regex.as_str(),
                self.config.show_regex.as_str(),
                self.config.filters.clone(),
            );
            if let Some(video) = self.resolve_direct(&query, &video_regex, use_cache).await? {
                info!("Combined search resolved video: {} (id {})", video.name, video.id);
                return self.finish(video, observer).await;
            }
            debug!("Combined search found no candidate, falling back to show resolution");
        }

        // ResolveShow
        let show_query = Query::shows(self.config.show_regex.as_str());
        let Some(show) = self.resolve_show(&show_query, use_cache).await? else {
            return Ok(Outcome::NotFound(ResourceKind::Show));
        };
        info!("Resolved show: {} (id {})", show.title, show.id);

        // ResolveVideo
        let filters = video_filters(&self.config.filters, show.id);
        let video = match self.config.video_regex.clone() {
            Some(regex) => {
                let query = Query::videos(regex.as_str(), filters);
                self.resolve_video(&query, &regex, use_cache).await?
            }
            None => {
                let query = Query::video_number(self.config.video_number, filters);
                self.resolve_video_by_number(&query, use_cache).await?
            }
        };
        let Some(video) = video else {
            return Ok(Outcome::NotFound(ResourceKind::Video));
        };
        info!("Resolved video: {} (id {})", video.name, video.id);

        self.finish(video, observer).await
    }

    async fn resolve_show(&self, query: &Query, use_cache: bool) -> Result<Option<Show>> {
        let hash = query.hash();
        if use_cache {
            if let Some(payload) = self.cache.get::<Show>(&hash).await {
                return Ok(payload.into_iter().next());
            }
        }

        let records = pager::records::<Show>(&self.client, query);
        let resolved = resolver::first_match(records, &self.config.show_regex)
            .await
            .map_err(AppError::Api)?;

        self.store(&hash, resolved.as_ref()).await;
        Ok(resolved)
    }

    async fn resolve_video(
        &self,
        query: &Query,
        pattern: &Regex,
        use_cache: bool,
    ) -> Result<Option<Video>> {
        let hash = query.hash();
        if use_cache {
            if let Some(payload) = self.cache.get::<Video>(&hash).await {
                return Ok(payload.into_iter().next());
            }
        }

        let records = pager::records::<Video>(&self.client, query);
        let resolved = resolver::first_match(records, pattern)
            .await
            .map_err(AppError::Api)?;

        self.store(&hash, resolved.as_ref()).await;
        Ok(resolved)
    }

    async fn resolve_video_by_number(&self, query: &Query, use_cache: bool) -> Result<Option<Video>> {
        let hash = query.hash();
        if use_cache {
            if let Some(payload) = self.cache.get::<Video>(&hash).await {
                return Ok(payload.into_iter().next());
            }
        }

        let number = query.video_number.unwrap_or(0);
        let records = pager::records::<Video>(&self.client, query);
        let resolved = resolver::nth_record(records, number)
            .await
            .map_err(AppError::Api)?;

        self.store(&hash, resolved.as_ref()).await;
        Ok(resolved)
    }

    async fn resolve_direct(
        &self,
        query: &Query,
        video_pattern: &Regex,
        use_cache: bool,
    ) -> Result<Option<Video>> {
        let hash = query.hash();
        if use_cache {
            if let Some(payload) = self.cache.get::<Video>(&hash).await {
                return Ok(payload.into_iter().next());
            }
        }

        let records = pager::records::<Video>(&self.client, query);
        let resolved = resolver::first_video_match(records, video_pattern, &self.config.show_regex)
            .await
            .map_err(AppError::Api)?;

        self.store(&hash, resolved.as_ref()).await;
        Ok(resolved)
    }

    /// Write a resolved candidate back to the cache
    ///
    /// An empty payload caches a negative result, so a repeated query replays
    /// `NotFound` without another fetch. Cache write failures are logged and
    /// swallowed.
    async fn store<T: Serialize>(&self, hash: &str, resolved: Option<&T>) {
        let payload: Vec<&T> = resolved.into_iter().collect();
        if let Err(e) = self.cache.put(hash, &payload).await {
            warn!("Failed to cache query result: {}", e);
        }
    }

    async fn finish(
        &self,
        video: Video,
        observer: Option<&dyn TransferObserver>,
    ) -> Result<Outcome> {
        if self.config.info_only {
            return Ok(Outcome::Info(video));
        }

        let path = self.download(&video, observer).await?;
        Ok(Outcome::Downloaded { video, path })
    }

    /// Download state: one engine attempt, retried once on stream failure
    async fn download(
        &self,
        video: &Video,
        observer: Option<&dyn TransferObserver>,
    ) -> Result<PathBuf> {
        let (tier, rendition_url) =
            download::resolve_rendition(video, self.config.quality).map_err(AppError::Download)?;
        info!("Selected {} rendition: {}", tier, rendition_url);

        let url = self
            .client
            .authenticated_url(&rendition_url)
            .map_err(AppError::Download)?;
        let target = self
            .config
            .out_dir
            .join(download::target_file_name(video, &rendition_url));

        let handler = self.client.downloader();
        match handler.download_to(&url, &target, observer).await {
            Ok(()) => Ok(target),
            Err(e) if e.is_retryable() => {
                warn!("Download failed ({}), retrying once", e);
                handler
                    .download_to(&url, &target, observer)
                    .await
                    .map_err(AppError::Download)?;
                Ok(target)
            }
            Err(e) => Err(AppError::Download(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_filters_preserve_order() {
        let base = vec!["premium:false".to_string()];
        let filters = video_filters(&base, 17);
        assert_eq!(filters, vec!["premium:false", "video_show:17"]);
    }

    #[test]
    fn test_video_filters_without_premium_constraint() {
        let filters = video_filters(&[], 3);
        assert_eq!(filters, vec!["video_show:3"]);
    }

    #[test]
    fn test_outcome_not_found_names_resource() {
        let outcome = Outcome::NotFound(ResourceKind::Show);
        match outcome {
            Outcome::NotFound(kind) => assert_eq!(kind.to_string(), "show"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}

//! Core application logic for vod_fetcher
//!
//! This module contains the resolve-then-fetch pipeline: the catalog HTTP
//! client, data models, query identity, the paged record stream, candidate
//! resolution, the on-disk result cache, and the orchestrator that sequences
//! them for one invocation.
//!
//! # Examples
//!
//! ```rust,no_run
//! use vod_fetcher::app::{CacheConfig, CacheStore, CatalogClient, ClientConfig};
//! use vod_fetcher::app::{Pipeline, RunConfig};
//!
//! # async fn example(config: RunConfig) -> Result<(), Box<dyn std::error::Error>> {
//! let client = CatalogClient::new(config.api_key.clone(), ClientConfig::default())?;
//! let cache = CacheStore::new(CacheConfig::default());
//!
//! let pipeline = Pipeline::new(client, cache, config);
//! let outcome = pipeline.run(None).await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod client;
pub mod models;
pub mod pager;
pub mod pipeline;
pub mod query;
pub mod resolver;

// Re-export main public API
pub use cache::{CacheConfig, CacheStore};
pub use client::{ApiEnvelope, CatalogClient, ClientConfig, DownloadHandler, TransferObserver};
pub use models::{NamedRecord, QualityTier, Show, ShowRef, Video};
pub use pipeline::{Outcome, Pipeline, RunConfig};
pub use query::{Query, ResourceKind};

//! Command handler for the vod_fetcher CLI
//!
//! Wires validated arguments into the pipeline: builds the catalog client
//! and cache store, runs the resolve-then-fetch pipeline, and reports the
//! outcome. Exit-code mapping happens in `main`.

use tracing::info;

use crate::app::{
    CacheConfig, CacheStore, CatalogClient, ClientConfig, Outcome, Pipeline, TransferObserver,
};
use crate::cli::{Cli, TransferBar};
use crate::errors::{AppError, Result};

/// Execute one resolve-then-fetch run from parsed arguments
pub async fn run(cli: Cli) -> Result<Outcome> {
    let config = cli.run_config().map_err(AppError::Config)?;

    let client = CatalogClient::new(config.api_key.clone(), ClientConfig::default())
        .map_err(AppError::Api)?;
    let cache = CacheStore::new(CacheConfig {
        cache_root: cli.cache_dir.clone(),
        ..Default::default()
    });

    let progress = cli.debug.then(TransferBar::new);
    let observer = progress
        .as_ref()
        .map(|bar| bar as &dyn TransferObserver);

    let pipeline = Pipeline::new(client, cache, config);
    let outcome = pipeline.run(observer).await;

    if let Some(bar) = &progress {
        bar.finish();
    }
    let outcome = outcome?;

    match &outcome {
        Outcome::Downloaded { video, path } => {
            info!("Download complete");
            println!("downloaded '{}' to {}", video.name, path.display());
        }
        Outcome::Info(video) => {
            // Structured description of the resolved video
            println!("{}", serde_json::to_string_pretty(video).map_err(
                |e| AppError::generic(format!("failed to render video info: {}", e)),
            )?);
        }
        Outcome::NotFound(_) => {}
    }

    Ok(outcome)
}

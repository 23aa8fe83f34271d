//! End-to-end pipeline tests against a local fixture catalog
//!
//! Exercise the orchestrator with a real HTTP round trip: the second
//! identical run must be answered from the cache with no fetch, and a run
//! whose cache sweep fails must bypass cache reads rather than serve
//! entries that survived the failed sweep.

mod common;

use std::path::Path;
use std::time::Duration;

use regex::RegexBuilder;
use serde_json::json;
use tempfile::tempdir;

use vod_fetcher::app::models::QualityTier;
use vod_fetcher::app::{
    CacheConfig, CacheStore, CatalogClient, ClientConfig, Outcome, Pipeline, RunConfig,
};

fn videos_page() -> Vec<u8> {
    serde_json::to_vec(&json!({
        "error": "OK",
        "status_code": 1,
        "number_of_page_results": 1,
        "number_of_total_results": 1,
        "limit": 100,
        "offset": 0,
        "results": [{
            "id": 7,
            "name": "Quick Look: Example",
            "premium": false,
            "video_show": {"id": 17, "title": "Quick Looks"},
            "hd_url": "http://example.invalid/clip_4000.mp4"
        }]
    }))
    .unwrap()
}

fn run_config(clean_cache: bool) -> RunConfig {
    let pattern = |source: &str| {
        RegexBuilder::new(source)
            .case_insensitive(true)
            .build()
            .unwrap()
    };
    RunConfig {
        api_key: "k".to_string(),
        show_regex: pattern("Quick Looks"),
        video_regex: Some(pattern("Quick Look")),
        video_number: 0,
        filters: Vec::new(),
        quality: QualityTier::Highest,
        out_dir: std::env::temp_dir(),
        info_only: true,
        clean_cache,
    }
}

fn pipeline(base_url: &str, cache_root: &Path, clean_cache: bool) -> Pipeline {
    let client = CatalogClient::with_base_url("k", ClientConfig::default(), base_url).unwrap();
    let cache = CacheStore::new(CacheConfig {
        cache_root: Some(cache_root.to_path_buf()),
        ttl: Duration::from_secs(3600),
    });
    Pipeline::new(client, cache, run_config(clean_cache))
}

fn resolved_video_id(outcome: Outcome) -> u64 {
    match outcome {
        Outcome::Info(video) => video.id,
        other => panic!("expected info outcome, got {:?}", other),
    }
}

#[tokio::test]
async fn second_identical_run_is_served_from_cache() {
    let server = common::TestServer::start(|target| {
        assert!(target.starts_with("/videos/"), "unexpected request: {}", target);
        common::Canned::json(videos_page())
    })
    .await;
    let cache_dir = tempdir().unwrap();

    let first = pipeline(&server.url(), cache_dir.path(), false)
        .run(None)
        .await
        .unwrap();
    assert_eq!(resolved_video_id(first), 7);
    assert_eq!(server.request_count(), 1);

    // Identical query, fresh pipeline: cache hit, no fetch
    let second = pipeline(&server.url(), cache_dir.path(), false)
        .run(None)
        .await
        .unwrap();
    assert_eq!(resolved_video_id(second), 7);
    assert_eq!(server.request_count(), 1);
}

#[tokio::test]
async fn failed_cache_sweep_bypasses_cache_reads() {
    let server =
        common::TestServer::start(|_| common::Canned::json(videos_page())).await;
    let cache_dir = tempdir().unwrap();

    // Populate the cache with a normal run
    pipeline(&server.url(), cache_dir.path(), false)
        .run(None)
        .await
        .unwrap();
    assert_eq!(server.request_count(), 1);

    // A directory the sweep cannot remove makes invalidation fail, so
    // entries may survive it
    std::fs::create_dir(cache_dir.path().join("blocker.json")).unwrap();

    // The clean run must not serve surviving entries: it goes to the
    // network despite the populated cache
    let outcome = pipeline(&server.url(), cache_dir.path(), true)
        .run(None)
        .await
        .unwrap();
    assert_eq!(resolved_video_id(outcome), 7);
    assert_eq!(server.request_count(), 2);
}

//! Integration tests for the streaming download engine
//!
//! Runs the engine against a local fixture server to exercise the failure
//! paths that matter: a transfer cut off mid-body must leave neither a file
//! at the final target path nor a temporary artifact behind.

mod common;

use tempfile::tempdir;
use url::Url;

use vod_fetcher::app::{CatalogClient, ClientConfig};

#[tokio::test]
async fn truncated_transfer_leaves_no_artifacts() {
    // Server declares 1000 bytes but closes the connection after 400
    let server = common::TestServer::start(|_| common::Canned {
        status: 200,
        body: vec![0u8; 400],
        declared_length: Some(1000),
    })
    .await;

    let client = CatalogClient::with_base_url("k", ClientConfig::default(), &server.url()).unwrap();
    let dir = tempdir().unwrap();
    let destination = dir.path().join("clip.mp4");
    let url = Url::parse(&format!("{}clip.mp4", server.url())).unwrap();

    let result = client.downloader().download_to(&url, &destination, None).await;

    assert!(result.is_err());
    assert!(!destination.exists(), "no file may appear at the target path");

    // The temp artifact must be removed before the failure is reported
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert!(leftovers.is_empty(), "artifacts left behind: {:?}", leftovers);
}

#[tokio::test]
async fn refused_transfer_leaves_no_artifacts() {
    let server = common::TestServer::start(|_| common::Canned {
        status: 403,
        body: b"denied".to_vec(),
        declared_length: None,
    })
    .await;

    let client = CatalogClient::with_base_url("k", ClientConfig::default(), &server.url()).unwrap();
    let dir = tempdir().unwrap();
    let destination = dir.path().join("clip.mp4");
    let url = Url::parse(&format!("{}clip.mp4", server.url())).unwrap();

    let result = client.downloader().download_to(&url, &destination, None).await;

    assert!(result.is_err());
    assert!(!destination.exists());
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert!(leftovers.is_empty(), "artifacts left behind: {:?}", leftovers);
}

#[tokio::test]
async fn completed_transfer_renames_into_place() {
    let payload = b"fake video bytes".to_vec();
    let expected = payload.clone();
    let server = common::TestServer::start(move |_| common::Canned::json(payload.clone())).await;

    let client = CatalogClient::with_base_url("k", ClientConfig::default(), &server.url()).unwrap();
    let dir = tempdir().unwrap();
    let destination = dir.path().join("clip.mp4");
    let url = Url::parse(&format!("{}clip.mp4", server.url())).unwrap();

    client
        .downloader()
        .download_to(&url, &destination, None)
        .await
        .unwrap();

    assert_eq!(std::fs::read(&destination).unwrap(), expected);

    // Only the final file remains
    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(names.len(), 1);
}

//! Streaming video download with atomic writes
//!
//! The engine makes exactly one transfer attempt per call: bytes stream into
//! a temporary path which is renamed to the final target only after the byte
//! count matches the reported content length. Any failure or external
//! interrupt removes the temporary file, so the final target path either
//! holds a complete file or nothing at all.

use std::path::Path;

use futures::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::app::client::http::HttpHandler;
use crate::app::models::{QualityTier, Video};
use crate::constants::files;
use crate::errors::{DownloadError, DownloadResult};

/// Observer for transfer progress signals
///
/// Purely observational: implementations must not affect transfer
/// correctness. `total_bytes` is `None` when the server does not report a
/// content length.
pub trait TransferObserver {
    fn on_progress(&self, bytes_written: u64, total_bytes: Option<u64>);
}

/// Resolve the rendition to download for a requested quality tier
///
/// `Highest` picks the first available tier in descending preference order;
/// a specific tier that is absent for this video fails with
/// `QualityUnavailable` rather than silently substituting.
pub fn resolve_rendition(
    video: &Video,
    requested: QualityTier,
) -> DownloadResult<(QualityTier, String)> {
    let resolved = match requested {
        QualityTier::Highest => video
            .best_available()
            .map(|(tier, url)| (tier, url.to_string())),
        tier => video.rendition_url(tier).map(|url| (tier, url.to_string())),
    };

    resolved.ok_or(DownloadError::QualityUnavailable {
        quality: requested.to_string(),
        video_id: video.id,
    })
}

/// Deterministic output file name for a resolved video
///
/// Sanitized video name plus the extension of the rendition URL's final path
/// segment, falling back to the default video extension.
pub fn target_file_name(video: &Video, rendition_url: &str) -> String {
    let extension = Url::parse(rendition_url)
        .ok()
        .and_then(|url| {
            url.path_segments()
                .and_then(|segments| segments.last().map(str::to_string))
        })
        .and_then(|segment| {
            segment
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_ascii_lowercase())
        })
        .filter(|ext| !ext.is_empty() && ext.len() <= 4 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| files::DEFAULT_VIDEO_EXTENSION.to_string());

    format!("{}.{}", sanitize_filename::sanitize(&video.name), extension)
}

/// File download operations handler
pub struct DownloadHandler<'a> {
    http_handler: &'a HttpHandler,
}

impl<'a> DownloadHandler<'a> {
    /// Creates a new DownloadHandler with the given HTTP handler
    pub fn new(http_handler: &'a HttpHandler) -> Self {
        Self { http_handler }
    }

    /// Downloads a URL to the destination path with atomic completion
    ///
    /// Makes exactly one attempt. The transfer races against Ctrl-C so an
    /// aborted run never leaves a temporary file behind.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if the stream fails or is interrupted, the
    /// received byte count disagrees with the content length, or file I/O
    /// fails. The temporary file is removed on every error path.
    pub async fn download_to(
        &self,
        url: &Url,
        destination: &Path,
        observer: Option<&dyn TransferObserver>,
    ) -> DownloadResult<()> {
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp_path = destination.with_extension(format!(
            "{}{}",
            destination
                .extension()
                .and_then(|s| s.to_str())
                .unwrap_or(""),
            files::TEMP_FILE_SUFFIX
        ));

        let result = tokio::select! {
            res = self.stream_to_temp(url, &temp_path, observer) => res,
            _ = tokio::signal::ctrl_c() => Err(DownloadError::Interrupted),
        };

        if let Err(e) = result {
            if temp_path.exists() {
                let _ = tokio::fs::remove_file(&temp_path).await;
            }
            return Err(e);
        }

        if tokio::fs::rename(&temp_path, destination).await.is_err() {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(DownloadError::AtomicOperationFailed {
                temp_path,
                final_path: destination.to_path_buf(),
            });
        }

        tracing::info!("Successfully downloaded: {}", destination.display());
        Ok(())
    }

    /// Stream response bytes into the temporary path, verifying byte count
    async fn stream_to_temp(
        &self,
        url: &Url,
        temp_path: &Path,
        observer: Option<&dyn TransferObserver>,
    ) -> DownloadResult<()> {
        let response = self.http_handler.get_stream_response(url).await?;
        let total_bytes = response.content_length();

        let mut file = File::create(temp_path).await?;
        let mut stream = response.bytes_stream();
        let mut bytes_written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            bytes_written += chunk.len() as u64;
            if let Some(observer) = observer {
                observer.on_progress(bytes_written, total_bytes);
            }
        }

        file.flush().await?;
        drop(file);

        if let Some(expected) = total_bytes {
            if bytes_written != expected {
                return Err(DownloadError::SizeMismatch {
                    received: bytes_written,
                    expected,
                });
            }
        }

        Ok(())
    }
}

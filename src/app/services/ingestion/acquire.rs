//! Profile file acquisition
//!
//! Downloads the selected catalog entries into the local download directory
//! with bounded concurrency. Individual download failures are logged and
//! tolerated; only a fully empty result is fatal to the pipeline. Files
//! already on disk above the size floor are reused rather than re-fetched.

use crate::config::Config;
use crate::constants::MIN_CACHED_FILE_BYTES;
use crate::Result;
use crate::app::services::ingestion::catalog::CatalogEntry;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Download every entry, returning the local paths that are now available
pub async fn download_files(
    client: &reqwest::Client,
    config: &Config,
    entries: &[CatalogEntry],
) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(&config.download_dir).await?;
    info!(
        files = entries.len(),
        concurrency = config.max_concurrent_downloads,
        "downloading profile files"
    );

    let downloaded: Vec<PathBuf> = futures::stream::iter(entries)
        .map(|entry| download_one(client, config, entry))
        .buffer_unordered(config.max_concurrent_downloads)
        .filter_map(|result| async move { result })
        .collect()
        .await;

    info!(downloaded = downloaded.len(), "file acquisition finished");
    Ok(downloaded)
}

/// Download a single catalog entry, reusing a cached copy when present
///
/// Returns `None` on any failure; the batch tolerates partial acquisition.
async fn download_one(
    client: &reqwest::Client,
    config: &Config,
    entry: &CatalogEntry,
) -> Option<PathBuf> {
    let file_name = Path::new(&entry.file).file_name()?;
    let local_path = config.download_dir.join(file_name);

    // Tiny files are truncated earlier failures, not usable caches
    if let Ok(meta) = tokio::fs::metadata(&local_path).await {
        if meta.len() > MIN_CACHED_FILE_BYTES {
            debug!(file = %local_path.display(), "using cached file");
            return Some(local_path);
        }
    }

    let url = config.file_url(&entry.file);
    let response = match client.get(&url).send().await {
        Ok(r) => r,
        Err(e) => {
            warn!(url = %url, error = %e, "download request failed");
            return None;
        }
    };

    if !response.status().is_success() {
        warn!(url = %url, status = %response.status(), "download rejected");
        return None;
    }

    let content = match response.bytes().await {
        Ok(b) => b,
        Err(e) => {
            warn!(url = %url, error = %e, "download body read failed");
            return None;
        }
    };

    if let Err(e) = tokio::fs::write(&local_path, &content).await {
        warn!(file = %local_path.display(), error = %e, "writing download failed");
        return None;
    }

    debug!(file = %local_path.display(), bytes = content.len(), "downloaded");
    Some(local_path)
}

//! Concurrent batch parsing with failure isolation
//!
//! Dispatches per-file parsing to blocking workers behind a semaphore. Each
//! file gets its own time budget, and every per-file failure is contained:
//! the file lands in `failed_files` and the batch keeps going. Only
//! cancellation aborts the batch as a whole.

use crate::app::models::NormalizedProfile;
use crate::app::services::dataset::DatasetOpener;
use crate::app::services::ingestion::stats::BatchResult;
use crate::app::services::profile_parser::parse_path;
use crate::config::Config;
use crate::{Error, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

type FileOutcome = (String, Result<NormalizedProfile>);

/// Parse a batch of downloaded files concurrently
///
/// Worker count and the per-file timeout come from the configuration. The
/// returned result carries successes and failures side by side; no per-file
/// error propagates to the caller.
pub async fn process_batch(
    opener: Arc<dyn DatasetOpener>,
    config: Arc<Config>,
    files: Vec<PathBuf>,
    cancel: &CancellationToken,
) -> Result<BatchResult> {
    let start = Instant::now();
    info!(
        files = files.len(),
        workers = config.workers,
        "starting batch parse"
    );

    let semaphore = Arc::new(Semaphore::new(config.workers));
    let mut join_set: JoinSet<FileOutcome> = JoinSet::new();

    for path in files {
        if cancel.is_cancelled() {
            join_set.abort_all();
            return Err(Error::processing_interrupted("batch parsing cancelled"));
        }

        let semaphore = semaphore.clone();
        let opener = opener.clone();
        let config = config.clone();
        let timeout = Duration::from_secs(config.parse_timeout_secs);

        join_set.spawn(async move {
            let name = file_identifier(&path);

            let permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    return (
                        name,
                        Err(Error::processing_interrupted("worker pool closed")),
                    );
                }
            };

            let parse_name = name.clone();
            let parse = tokio::time::timeout(
                timeout,
                tokio::task::spawn_blocking(move || {
                    parse_path(opener.as_ref(), &config, &path)
                }),
            )
            .await;
            drop(permit);

            let outcome = match parse {
                Err(_) => Err(Error::timeout(parse_name, timeout.as_secs())),
                Ok(Err(join_error)) => Err(Error::structure(
                    parse_name,
                    format!("parse worker panicked: {join_error}"),
                )),
                Ok(Ok(result)) => result,
            };

            (name, outcome)
        });
    }

    let mut result = BatchResult::default();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((_, Ok(profile))) => result.successful_profiles.push(profile),
            Ok((name, Err(error))) => {
                warn!(file = %name, error = %error, "file failed parsing");
                result.failed_files.push(name);
            }
            Err(join_error) => {
                warn!(error = %join_error, "batch worker task failed");
            }
        }
    }

    result.elapsed = start.elapsed();
    info!("batch parse complete: {}", result.summary());
    Ok(result)
}

fn file_identifier(path: &PathBuf) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

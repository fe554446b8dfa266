//! Ingestion pipeline controller
//!
//! Drives the full catalog -> filter -> download -> parse -> persist ->
//! index sequence. Collaborator handles (dataset opener, profile store,
//! vector index, audit sink) are injected at construction; the controller
//! owns only the orchestration. A stage that produces no usable output
//! fails the run, and cancellation is honored between stages. Every run,
//! successful or not, leaves one audit record.

use crate::app::services::dataset::DatasetOpener;
use crate::app::services::ingestion::stats::IngestionReport;
use crate::app::services::ingestion::{acquire, batch, catalog};
use crate::app::services::storage::{
    AuditRecord, AuditSink, OperationStatus, ProfileStore, VectorIndex,
};
use crate::config::Config;
use crate::{Error, Result};
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Parse success fraction separating a fully successful run from a partial one
const SUCCESS_RATE_THRESHOLD: f64 = 0.8;

/// Orchestrates one complete ingestion run
pub struct IngestionPipeline {
    config: Arc<Config>,
    opener: Arc<dyn DatasetOpener>,
    store: Arc<dyn ProfileStore>,
    index: Arc<dyn VectorIndex>,
    audit: Arc<dyn AuditSink>,
    client: reqwest::Client,
}

impl IngestionPipeline {
    /// Create a pipeline with injected collaborators
    pub fn new(
        config: Config,
        opener: Arc<dyn DatasetOpener>,
        store: Arc<dyn ProfileStore>,
        index: Arc<dyn VectorIndex>,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        Ok(Self {
            config: Arc::new(config),
            opener,
            store,
            index,
            audit,
            client,
        })
    }

    /// Run the complete ingestion pipeline
    ///
    /// Returns the run report on success; on failure the error is returned
    /// after the audit record is written.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<IngestionReport> {
        let start = Instant::now();
        info!(
            max_profiles = self.config.max_profiles,
            "starting ingestion pipeline"
        );

        match self.run_stages(cancel, start).await {
            Ok(report) => {
                self.audit_run(&report, None).await;
                info!(
                    stored = report.stored,
                    indexed = report.indexed,
                    elapsed = format!("{:.2}s", report.elapsed_seconds),
                    "ingestion pipeline completed"
                );
                Ok(report)
            }
            Err(e) => {
                error!(error = %e, "ingestion pipeline failed");
                let failed_report = IngestionReport {
                    elapsed_seconds: start.elapsed().as_secs_f64(),
                    ..Default::default()
                };
                self.audit_run(&failed_report, Some(&e)).await;
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        cancel: &CancellationToken,
        start: Instant,
    ) -> Result<IngestionReport> {
        // Stage 1: fetch the remote catalog
        ensure_active(cancel, "fetch_catalog")?;
        let entries = catalog::fetch_catalog(&self.client, &self.config).await?;
        if entries.is_empty() {
            return Err(Error::stage_failure("fetch_catalog", "catalog is empty"));
        }
        let catalog_entries = entries.len();

        // Stage 2: narrow to the target basin and window
        ensure_active(cancel, "filter_catalog")?;
        let selected = catalog::filter_entries(entries, &self.config, Utc::now());
        if selected.is_empty() {
            return Err(Error::stage_failure(
                "filter_catalog",
                "no profiles matched the basin and date filters",
            ));
        }
        let selected_entries = selected.len();

        // Stage 3: acquire the files locally
        ensure_active(cancel, "download")?;
        let files = acquire::download_files(&self.client, &self.config, &selected).await?;
        if files.is_empty() {
            return Err(Error::stage_failure(
                "download",
                "no files downloaded successfully",
            ));
        }
        let downloaded_files = files.len();

        // Stage 4: parse concurrently
        ensure_active(cancel, "parse_batch")?;
        let batch_result =
            batch::process_batch(self.opener.clone(), self.config.clone(), files, cancel).await?;
        if batch_result.successful_profiles.is_empty() {
            return Err(Error::stage_failure(
                "parse_batch",
                "no profiles parsed successfully",
            ));
        }

        // Stage 5: persist
        ensure_active(cancel, "persist")?;
        let store_outcome = self
            .store
            .store_profiles(&batch_result.successful_profiles)
            .await?;

        // Stage 6: index for semantic search
        ensure_active(cancel, "index")?;
        let index_outcome = self
            .index
            .index_profiles(&batch_result.successful_profiles)
            .await?;

        Ok(IngestionReport {
            catalog_entries,
            selected_entries,
            downloaded_files,
            parsed_profiles: batch_result.successful_profiles.len(),
            success_rate: batch_result.success_rate(),
            failed_files: batch_result.failed_files,
            stored: store_outcome.stored,
            skipped_duplicates: store_outcome.skipped_duplicates,
            indexed: index_outcome.indexed,
            elapsed_seconds: start.elapsed().as_secs_f64(),
        })
    }

    /// Write the run's audit record; audit problems are logged, not raised
    async fn audit_run(&self, report: &IngestionReport, failure: Option<&Error>) {
        let status = match failure {
            Some(_) => OperationStatus::Failure,
            None if report.success_rate > SUCCESS_RATE_THRESHOLD => OperationStatus::Success,
            None => OperationStatus::PartialSuccess,
        };

        let record = AuditRecord {
            operation_type: "netcdf_processing".to_string(),
            operation_subtype: "batch_ingestion".to_string(),
            status,
            records_processed: report.downloaded_files,
            records_accepted: report.stored,
            records_rejected: report.failed_files.len(),
            processing_time_seconds: report.elapsed_seconds,
            parameters: serde_json::json!({
                "max_profiles": self.config.max_profiles,
                "workers": self.config.workers,
                "date_range": self.config.date_range,
                "basin_bounds": self.config.basin_bounds,
                "qc_flags_accept": self.config.qc_flags_accept,
            }),
            error: failure.map(|e| e.to_string()),
        };

        if let Err(e) = self.audit.record(record).await {
            error!(error = %e, "failed to write audit record");
        }
    }
}

/// Cancellation checkpoint between pipeline stages
fn ensure_active(cancel: &CancellationToken, stage: &str) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(Error::processing_interrupted(format!(
            "cancelled before stage '{stage}'"
        )));
    }
    Ok(())
}

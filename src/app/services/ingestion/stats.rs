//! Batch and pipeline result structures

use crate::app::models::NormalizedProfile;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Aggregate outcome of one concurrent parse batch
///
/// Exists only for the duration of one batch call; the pipeline folds it
/// into the run report.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Profiles parsed successfully, in completion order
    pub successful_profiles: Vec<NormalizedProfile>,
    /// Source identifiers of files that failed parsing
    pub failed_files: Vec<String>,
    /// Wall-clock time for the whole batch
    pub elapsed: Duration,
}

impl BatchResult {
    /// Total files the batch attempted
    pub fn total_files(&self) -> usize {
        self.successful_profiles.len() + self.failed_files.len()
    }

    /// Fraction of attempted files that parsed successfully
    pub fn success_rate(&self) -> f64 {
        let total = self.total_files();
        if total == 0 {
            return 0.0;
        }
        self.successful_profiles.len() as f64 / total as f64
    }

    /// One-line human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "{}/{} files parsed ({:.1}%) in {:.2}s",
            self.successful_profiles.len(),
            self.total_files(),
            self.success_rate() * 100.0,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Final report of one complete ingestion pipeline run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestionReport {
    /// Entries in the remote catalog before filtering
    pub catalog_entries: usize,
    /// Entries selected after basin, date, and cap filtering
    pub selected_entries: usize,
    /// Files available locally after the acquisition stage
    pub downloaded_files: usize,
    /// Profiles parsed successfully
    pub parsed_profiles: usize,
    /// Source identifiers of files that failed parsing
    pub failed_files: Vec<String>,
    /// Parse success fraction over attempted files
    pub success_rate: f64,
    /// Profiles newly persisted
    pub stored: usize,
    /// Profiles skipped as duplicates by the store
    pub skipped_duplicates: usize,
    /// Profiles indexed for semantic search
    pub indexed: usize,
    /// Total wall-clock pipeline time
    pub elapsed_seconds: f64,
}

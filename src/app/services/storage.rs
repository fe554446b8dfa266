//! Persistence and indexing collaborators
//!
//! The pipeline never talks to a concrete database or vector store; it is
//! handed [`ProfileStore`], [`VectorIndex`], and [`AuditSink`] trait objects
//! whose lifecycles are owned by the caller. Unreachable collaborators are
//! stage failures, never silently substituted. In-memory implementations
//! back the tests and local dry runs.

use crate::app::models::NormalizedProfile;
use crate::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Outcome of a bulk profile store operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreOutcome {
    /// Profiles newly persisted
    pub stored: usize,
    /// Profiles skipped because their (float id, cycle) pair already exists
    pub skipped_duplicates: usize,
    /// Per-profile store errors that did not abort the bulk operation
    pub errors: Vec<String>,
}

/// Outcome of a bulk indexing operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexOutcome {
    pub indexed: usize,
    pub errors: Vec<String>,
}

/// Relational persistence for normalized profiles
///
/// Implementations must enforce deduplication on the (float identifier,
/// cycle number) pair; it is the only cross-file invariant in the system.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn store_profiles(&self, profiles: &[NormalizedProfile]) -> Result<StoreOutcome>;
}

/// Semantic index over profile summary text
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn index_profiles(&self, profiles: &[NormalizedProfile]) -> Result<IndexOutcome>;
}

/// Terminal status of an audited pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    Success,
    PartialSuccess,
    Failure,
}

/// One audit record written per pipeline run, success or failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub operation_type: String,
    pub operation_subtype: String,
    pub status: OperationStatus,
    pub records_processed: usize,
    pub records_accepted: usize,
    pub records_rejected: usize,
    pub processing_time_seconds: f64,
    /// Run parameters captured for reproducibility
    pub parameters: serde_json::Value,
    pub error: Option<String>,
}

/// Audit trail for pipeline operations
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn record(&self, record: AuditRecord) -> Result<()>;
}

// =============================================================================
// In-Memory Implementations
// =============================================================================

/// In-memory [`ProfileStore`] keyed by the deduplication pair
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: Mutex<HashMap<(String, u32), NormalizedProfile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted profiles
    pub fn len(&self) -> usize {
        self.profiles.lock().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch a persisted profile by its deduplication key
    pub fn get(&self, float_id: &str, cycle_number: u32) -> Option<NormalizedProfile> {
        self.profiles
            .lock()
            .ok()?
            .get(&(float_id.to_string(), cycle_number))
            .cloned()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn store_profiles(&self, profiles: &[NormalizedProfile]) -> Result<StoreOutcome> {
        let mut guard = self
            .profiles
            .lock()
            .map_err(|_| Error::storage("profile store lock poisoned"))?;

        let mut outcome = StoreOutcome::default();
        for profile in profiles {
            let key = profile.dedup_key();
            if guard.contains_key(&key) {
                debug!(
                    float_id = %key.0,
                    cycle = key.1,
                    "skipping duplicate profile"
                );
                outcome.skipped_duplicates += 1;
                continue;
            }
            guard.insert(key, profile.clone());
            outcome.stored += 1;
        }

        Ok(outcome)
    }
}

/// One entry in the in-memory vector index
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub profile_id: String,
    pub text: String,
    pub metadata: serde_json::Value,
}

/// In-memory [`VectorIndex`] capturing the indexable text and metadata
#[derive(Debug, Default)]
pub struct InMemoryVectorIndex {
    entries: Mutex<Vec<IndexEntry>>,
}

impl InMemoryVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn entries(&self) -> Vec<IndexEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn index_profiles(&self, profiles: &[NormalizedProfile]) -> Result<IndexOutcome> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| Error::indexing("vector index lock poisoned"))?;

        for profile in profiles {
            guard.push(IndexEntry {
                profile_id: profile.id.clone(),
                text: profile.scientific_summary.clone(),
                metadata: serde_json::json!({
                    "float_id": profile.float_id,
                    "cycle_number": profile.cycle_number,
                    "ocean_region": profile.ocean_region.as_str(),
                    "profile_date": profile.profile_date.to_rfc3339(),
                    "quality_score": profile.quality_score,
                }),
            });
        }

        Ok(IndexOutcome {
            indexed: profiles.len(),
            errors: Vec::new(),
        })
    }
}

/// File-backed [`ProfileStore`] writing one JSON record per line
///
/// Used by the CLI so runs leave durable output without a database. The
/// deduplication set is seeded from the existing file at open, making
/// repeated runs over the same profiles idempotent.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    seen: Mutex<HashSet<(String, u32)>>,
}

impl JsonFileStore {
    /// Open (or create) a JSON-lines profile store
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut seen = HashSet::new();
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            for line in content.lines().filter(|l| !l.trim().is_empty()) {
                let profile: NormalizedProfile = serde_json::from_str(line)
                    .map_err(|e| Error::storage(format!("corrupt store record: {e}")))?;
                seen.insert(profile.dedup_key());
            }
        }

        Ok(Self {
            path,
            seen: Mutex::new(seen),
        })
    }

    /// Number of profiles known to the store
    pub fn len(&self) -> usize {
        self.seen.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ProfileStore for JsonFileStore {
    async fn store_profiles(&self, profiles: &[NormalizedProfile]) -> Result<StoreOutcome> {
        let mut outcome = StoreOutcome::default();
        let mut lines = String::new();

        {
            let mut seen = self
                .seen
                .lock()
                .map_err(|_| Error::storage("profile store lock poisoned"))?;
            for profile in profiles {
                let key = profile.dedup_key();
                if seen.contains(&key) {
                    outcome.skipped_duplicates += 1;
                    continue;
                }
                match serde_json::to_string(profile) {
                    Ok(json) => {
                        seen.insert(key);
                        lines.push_str(&json);
                        lines.push('\n');
                        outcome.stored += 1;
                    }
                    Err(e) => outcome
                        .errors
                        .push(format!("failed to serialize {}: {e}", profile.source_file)),
                }
            }
        }

        if !lines.is_empty() {
            let mut file = tokio::fs::OpenOptions::new()
                .append(true)
                .create(true)
                .open(&self.path)
                .await?;
            file.write_all(lines.as_bytes()).await?;
            file.flush().await?;
        }

        Ok(outcome)
    }
}

/// [`AuditSink`] that emits records to the structured log stream
#[derive(Debug, Clone, Default)]
pub struct LoggingAuditSink;

impl LoggingAuditSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuditSink for LoggingAuditSink {
    async fn record(&self, record: AuditRecord) -> Result<()> {
        info!(
            operation = %record.operation_type,
            subtype = %record.operation_subtype,
            status = ?record.status,
            processed = record.records_processed,
            accepted = record.records_accepted,
            rejected = record.records_rejected,
            elapsed = format!("{:.2}s", record.processing_time_seconds),
            "pipeline operation audited"
        );
        Ok(())
    }
}

/// In-memory [`AuditSink`] collecting records for inspection
#[derive(Debug, Default)]
pub struct InMemoryAuditSink {
    records: Mutex<Vec<AuditRecord>>,
}

impl InMemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AuditSink for InMemoryAuditSink {
    async fn record(&self, record: AuditRecord) -> Result<()> {
        self.records
            .lock()
            .map_err(|_| Error::storage("audit sink lock poisoned"))?
            .push(record);
        Ok(())
    }
}

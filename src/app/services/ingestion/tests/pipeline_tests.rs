//! Tests for the pipeline controller's failure handling and audit trail

use crate::app::services::ingestion::pipeline::IngestionPipeline;
use crate::app::services::ingestion::tests::ScriptedOpener;
use crate::app::services::storage::{
    InMemoryAuditSink, InMemoryProfileStore, InMemoryVectorIndex, OperationStatus,
};
use crate::config::Config;
use crate::Error;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

fn build_pipeline(config: Config, audit: Arc<InMemoryAuditSink>) -> IngestionPipeline {
    IngestionPipeline::new(
        config,
        Arc::new(ScriptedOpener),
        Arc::new(InMemoryProfileStore::new()),
        Arc::new(InMemoryVectorIndex::new()),
        audit,
    )
    .expect("pipeline construction")
}

#[tokio::test]
async fn test_unreachable_catalog_fails_run_and_audits() {
    let audit = Arc::new(InMemoryAuditSink::new());
    let mut config = Config::default();
    // nothing listens on the discard port; the fetch stage fails fast
    config.gdac_url = "http://127.0.0.1:9".to_string();
    let pipeline = build_pipeline(config, audit.clone());

    let err = pipeline.run(&CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, Error::Http { .. }));

    let records = audit.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, OperationStatus::Failure);
    assert!(records[0].error.is_some());
}

#[tokio::test]
async fn test_cancelled_run_stops_before_first_stage() {
    let audit = Arc::new(InMemoryAuditSink::new());
    let pipeline = build_pipeline(Config::default(), audit.clone());

    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = pipeline.run(&cancel).await.unwrap_err();
    assert!(matches!(err, Error::ProcessingInterrupted { .. }));

    let records = audit.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, OperationStatus::Failure);
}

#[tokio::test]
async fn test_invalid_config_rejected_at_construction() {
    let result = IngestionPipeline::new(
        Config::default().with_workers(0),
        Arc::new(ScriptedOpener),
        Arc::new(InMemoryProfileStore::new()),
        Arc::new(InMemoryVectorIndex::new()),
        Arc::new(InMemoryAuditSink::new()),
    );
    assert!(result.is_err());
}

//! Ingestion pipeline for remote Argo profile data
//!
//! This module covers everything between the remote data assembly centre and
//! the persistence collaborators:
//! - [`catalog`] - Fetching, decoding, and filtering the global profile index
//! - [`acquire`] - Bounded-concurrency file downloads with cache reuse
//! - [`batch`] - Concurrent per-file parsing with timeouts and failure isolation
//! - [`pipeline`] - The stage-by-stage pipeline controller and audit trail
//! - [`stats`] - Batch and run result structures
//!
//! # Failure Philosophy
//!
//! Per-file problems (bad structure, bad coordinates, bad time, slow parse)
//! never abort a run; they are recorded against the file and the batch moves
//! on. A whole stage producing no usable output is fatal. Cancellation is
//! checked between stages and inside the batch dispatch loop.

pub mod acquire;
pub mod batch;
pub mod catalog;
pub mod pipeline;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use catalog::CatalogEntry;
pub use pipeline::IngestionPipeline;
pub use stats::{BatchResult, IngestionReport};

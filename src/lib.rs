//! Argo Processor Library
//!
//! A Rust library for ingesting Argo float profile data from the global data
//! assembly centre into normalized, quality-controlled profile records.
//!
//! This library provides tools for:
//! - Validating NetCDF profile dataset structure before extraction
//! - Extracting physical parameters with QC-flag masking and plausibility filtering
//! - Computing derived oceanographic features (mixed-layer depth, thermocline
//!   depth, halocline depth, surface density, composite quality score)
//! - Assembling normalized profile records with indexable text summaries
//! - Concurrent batch parsing with per-file timeouts and failure isolation
//! - Driving the full catalog -> download -> parse -> persist -> index pipeline

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod context;
        pub mod dataset;
        pub mod ingestion;
        pub mod profile_parser;
        pub mod storage;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{NormalizedProfile, OceanRegion, PhysicalSeries, ProcessingLevel};
pub use config::Config;

/// Result type alias for the Argo processor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Argo profile ingestion operations
///
/// Per-file failures (`Structure`, `Coordinate`, `Time`, `Timeout`) are
/// contained at the file boundary by the batch orchestrator; only
/// `StageFailure` aborts a pipeline run.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Dataset lacks required variables or vertical levels
    #[error("Structural error in '{file}': {reason}")]
    Structure { file: String, reason: String },

    /// Profile position is invalid or outside the target basin
    #[error("Invalid coordinates in '{file}': lat={lat}, lon={lon}")]
    Coordinate { file: String, lat: f64, lon: f64 },

    /// Profile timestamp is missing or unparseable
    #[error("Invalid profile time in '{file}': {reason}")]
    Time { file: String, reason: String },

    /// Per-file parse exceeded its time budget
    #[error("Parse timeout for '{file}' after {seconds}s")]
    Timeout { file: String, seconds: u64 },

    /// HTTP transfer failed
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// Catalog index could not be decoded
    #[error("Catalog format error: {message}")]
    CatalogFormat {
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// An entire pipeline stage produced no usable output
    #[error("Stage '{stage}' failed: {reason}")]
    StageFailure { stage: String, reason: String },

    /// Relational store rejected an operation
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Vector index rejected an operation
    #[error("Indexing error: {message}")]
    Indexing { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create a structural validation error
    pub fn structure(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Structure {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Create a coordinate validation error
    pub fn coordinate(file: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self::Coordinate {
            file: file.into(),
            lat,
            lon,
        }
    }

    /// Create a profile time error
    pub fn time(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Time {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Create a per-file timeout error
    pub fn timeout(file: impl Into<String>, seconds: u64) -> Self {
        Self::Timeout {
            file: file.into(),
            seconds,
        }
    }

    /// Create an HTTP error with context
    pub fn http(message: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Http {
            message: message.into(),
            source,
        }
    }

    /// Create a catalog format error
    pub fn catalog_format(message: impl Into<String>, source: Option<csv::Error>) -> Self {
        Self::CatalogFormat {
            message: message.into(),
            source,
        }
    }

    /// Create a stage failure error
    pub fn stage_failure(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StageFailure {
            stage: stage.into(),
            reason: reason.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a vector indexing error
    pub fn indexing(message: impl Into<String>) -> Self {
        Self::Indexing {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// Whether this error is contained at the file boundary (batch continues)
    pub fn is_file_scoped(&self) -> bool {
        matches!(
            self,
            Self::Structure { .. }
                | Self::Coordinate { .. }
                | Self::Time { .. }
                | Self::Timeout { .. }
        )
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Self::Http {
            message: "HTTP request failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CatalogFormat {
            message: "catalog CSV decoding failed".to_string(),
            source: Some(error),
        }
    }
}

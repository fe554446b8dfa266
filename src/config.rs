//! Configuration management and validation.
//!
//! Provides the explicit configuration structure passed into the ingestion
//! pipeline. There is no global settings singleton: callers construct a
//! [`Config`], adjust it with the builder methods, and hand it to the
//! pipeline together with the collaborator handles.

use crate::constants::{
    CATALOG_SAMPLE_SEED, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MAX_CONCURRENT_DOWNLOADS,
    DEFAULT_MAX_PROFILES, DEFAULT_PARALLEL_WORKERS, DEFAULT_PARSE_TIMEOUT_SECS, GDAC_BASE_URL,
    qc_flags,
};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Geographic bounding box for the target ocean basin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasinBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BasinBounds {
    /// Indian Ocean basin bounds used by the default configuration
    pub fn indian_ocean() -> Self {
        Self {
            lat_min: -40.0,
            lat_max: 30.0,
            lon_min: 40.0,
            lon_max: 120.0,
        }
    }

    /// Whether a coordinate falls inside the box
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&lat) && (self.lon_min..=self.lon_max).contains(&lon)
    }

    /// Whether a coordinate falls inside the box expanded by `buffer` degrees
    pub fn contains_buffered(&self, lat: f64, lon: f64, buffer: f64) -> bool {
        (self.lat_min - buffer..=self.lat_max + buffer).contains(&lat)
            && (self.lon_min - buffer..=self.lon_max + buffer).contains(&lon)
    }
}

/// Global configuration for Argo profile ingestion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the remote data assembly centre
    pub gdac_url: String,

    /// Local directory for downloaded NetCDF files
    pub download_dir: PathBuf,

    /// Target basin; profiles outside it (plus buffer) are rejected
    pub basin_bounds: BasinBounds,

    /// Degrees of slack around the basin when validating coordinates
    pub coordinate_buffer_degrees: f64,

    /// QC flags whose samples are kept during extraction
    pub qc_flags_accept: Vec<u8>,

    /// Number of parallel parse workers
    pub workers: usize,

    /// Maximum simultaneous file downloads
    pub max_concurrent_downloads: usize,

    /// Per-file parse timeout in seconds, enforced by the orchestrator
    pub parse_timeout_secs: u64,

    /// HTTP request timeout in seconds
    pub http_timeout_secs: u64,

    /// Maximum profiles to select from the catalog per run
    pub max_profiles: usize,

    /// Seed for over-cap catalog sampling
    pub sample_seed: u64,

    /// Optional temporal filter applied to the catalog
    pub date_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gdac_url: GDAC_BASE_URL.to_string(),
            download_dir: PathBuf::from("./data/netcdf"),
            basin_bounds: BasinBounds::indian_ocean(),
            coordinate_buffer_degrees: 5.0,
            qc_flags_accept: qc_flags::DEFAULT_ACCEPT.to_vec(),
            workers: DEFAULT_PARALLEL_WORKERS,
            max_concurrent_downloads: DEFAULT_MAX_CONCURRENT_DOWNLOADS,
            parse_timeout_secs: DEFAULT_PARSE_TIMEOUT_SECS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            max_profiles: DEFAULT_MAX_PROFILES,
            sample_seed: CATALOG_SAMPLE_SEED,
            date_range: None,
        }
    }
}

impl Config {
    /// Create configuration with custom worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Create configuration with a custom profile cap
    pub fn with_max_profiles(mut self, max_profiles: usize) -> Self {
        self.max_profiles = max_profiles;
        self
    }

    /// Create configuration with a custom download directory
    pub fn with_download_dir(mut self, dir: PathBuf) -> Self {
        self.download_dir = dir;
        self
    }

    /// Create configuration with a catalog date-range filter
    pub fn with_date_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.date_range = Some((start, end));
        self
    }

    /// Create configuration with a custom download concurrency bound
    pub fn with_max_concurrent_downloads(mut self, max: usize) -> Self {
        self.max_concurrent_downloads = max;
        self
    }

    /// Create configuration with a custom QC accept-set
    pub fn with_qc_flags_accept(mut self, flags: Vec<u8>) -> Self {
        self.qc_flags_accept = flags;
        self
    }

    /// Validate configuration for consistency
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::configuration("worker count must be greater than 0"));
        }

        if self.max_concurrent_downloads == 0 {
            return Err(Error::configuration(
                "download concurrency must be greater than 0",
            ));
        }

        if self.max_profiles == 0 {
            return Err(Error::configuration("profile cap must be greater than 0"));
        }

        let b = &self.basin_bounds;
        if b.lat_min >= b.lat_max || b.lon_min >= b.lon_max {
            return Err(Error::configuration(format!(
                "invalid basin bounds: lat [{}, {}], lon [{}, {}]",
                b.lat_min, b.lat_max, b.lon_min, b.lon_max
            )));
        }

        if self.qc_flags_accept.is_empty() {
            return Err(Error::configuration("QC accept-set cannot be empty"));
        }

        if let Some((start, end)) = self.date_range {
            if start >= end {
                return Err(Error::configuration(format!(
                    "date range start {start} must precede end {end}"
                )));
            }
        }

        Ok(())
    }

    /// Full URL of the compressed global profile index
    pub fn index_url(&self) -> String {
        format!(
            "{}/{}",
            self.gdac_url.trim_end_matches('/'),
            crate::constants::GDAC_INDEX_PATH
        )
    }

    /// Full URL for a catalog-relative file path
    pub fn file_url(&self, catalog_path: &str) -> String {
        format!(
            "{}/{}",
            self.gdac_url.trim_end_matches('/'),
            catalog_path.trim_start_matches('/')
        )
    }
}

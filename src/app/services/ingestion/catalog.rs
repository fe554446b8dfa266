//! Remote profile catalog: fetch, decode, and filter
//!
//! The global data assembly centre publishes a gzip-compressed CSV index of
//! every profile file it serves. This module fetches and decodes that index,
//! then narrows it to the configured basin, date window, and profile cap.
//! Over-cap selection is a seeded random sample so runs stay reproducible
//! while still covering the basin evenly.

use crate::config::Config;
use crate::constants::{DEFAULT_RECENT_YEARS, INDEX_HEADER_SKIP_LINES};
use crate::{Error, Result};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use flate2::read::GzDecoder;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::io::Read;
use tracing::{debug, info, warn};

/// One row of the global profile index after decoding
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    /// Path of the profile file relative to the catalog root
    pub file: String,
    pub date: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Raw index row as serialized in the catalog CSV
#[derive(Debug, Deserialize)]
struct RawEntry {
    file: String,
    date: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Fetch and decode the compressed global profile index
pub async fn fetch_catalog(client: &reqwest::Client, config: &Config) -> Result<Vec<CatalogEntry>> {
    let url = config.index_url();
    info!(url = %url, "fetching profile catalog");

    let response = client
        .get(&url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| Error::http(format!("catalog fetch from {url} failed"), e))?;
    let compressed = response.bytes().await?;

    let mut decoder = GzDecoder::new(compressed.as_ref());
    let mut text = String::new();
    decoder
        .read_to_string(&mut text)
        .map_err(|e| Error::Io {
            message: "catalog decompression failed".to_string(),
            source: e,
        })?;

    let entries = parse_catalog(&text)?;
    info!(entries = entries.len(), "loaded profile catalog");
    Ok(entries)
}

/// Parse the decompressed catalog text
///
/// The index opens with comment lines before the CSV header; rows with a
/// missing date or position are dropped rather than failing the catalog.
pub fn parse_catalog(text: &str) -> Result<Vec<CatalogEntry>> {
    let mut lines = text.lines();
    for _ in 0..INDEX_HEADER_SKIP_LINES {
        lines.next();
    }
    let body = lines.collect::<Vec<_>>().join("\n");

    if body.trim().is_empty() {
        return Err(Error::catalog_format("catalog body is empty", None));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let mut entries = Vec::new();
    let mut dropped = 0usize;
    for row in reader.deserialize::<RawEntry>() {
        let raw = row?;
        let parsed = parse_entry(&raw);
        match parsed {
            Some(entry) => entries.push(entry),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(dropped, "dropped catalog rows with missing fields");
    }

    Ok(entries)
}

fn parse_entry(raw: &RawEntry) -> Option<CatalogEntry> {
    let date = parse_catalog_date(raw.date.as_deref()?)?;
    let latitude = raw.latitude.filter(|v| v.is_finite())?;
    let longitude = raw.longitude.filter(|v| v.is_finite())?;

    Some(CatalogEntry {
        file: raw.file.clone(),
        date,
        latitude,
        longitude,
    })
}

/// Catalog dates are compact YYYYMMDDHHMMSS stamps
fn parse_catalog_date(text: &str) -> Option<DateTime<Utc>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Narrow the catalog to the configured basin, date window, and cap
///
/// Without a configured date range the window defaults to the most recent
/// five years before `now`. When more entries survive than the cap allows,
/// a seeded sample keeps the selection reproducible. The result is sorted
/// by profile date.
pub fn filter_entries(
    entries: Vec<CatalogEntry>,
    config: &Config,
    now: DateTime<Utc>,
) -> Vec<CatalogEntry> {
    let bounds = &config.basin_bounds;
    let (start, end) = match config.date_range {
        Some((start, end)) => (start, end),
        None => (now - Duration::days(365 * DEFAULT_RECENT_YEARS), now),
    };

    let mut filtered: Vec<CatalogEntry> = entries
        .into_iter()
        .filter(|e| bounds.contains(e.latitude, e.longitude))
        .filter(|e| e.date >= start && e.date <= end)
        .collect();

    if filtered.len() > config.max_profiles {
        warn!(
            candidates = filtered.len(),
            cap = config.max_profiles,
            "catalog selection exceeds cap, sampling"
        );
        let mut rng = StdRng::seed_from_u64(config.sample_seed);
        filtered = filtered
            .choose_multiple(&mut rng, config.max_profiles)
            .cloned()
            .collect();
    }

    filtered.sort_by_key(|e| e.date);
    info!(selected = filtered.len(), "filtered catalog to target basin");
    filtered
}

//! Tests for catalog decoding and filtering

use crate::app::services::ingestion::catalog::{filter_entries, parse_catalog, CatalogEntry};
use crate::app::services::ingestion::tests::sample_catalog_text;
use crate::config::Config;
use chrono::{Duration, TimeZone, Utc};

fn fixed_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
}

#[test]
fn test_parse_catalog_decodes_rows() {
    let entries = parse_catalog(&sample_catalog_text()).unwrap();

    // the row with missing coordinates is dropped, the rest decode
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0].file, "coriolis/2902746/profiles/D2902746_001.nc");
    assert_eq!(entries[0].latitude, 15.0);
    assert_eq!(
        entries[0].date,
        Utc.with_ymd_and_hms(2023, 7, 4, 12, 0, 0).unwrap()
    );
}

#[test]
fn test_parse_catalog_rejects_empty_body() {
    let text = "# one\n# two\n";
    assert!(parse_catalog(text).is_err());
}

#[test]
fn test_filter_basin_and_default_window() {
    let entries = parse_catalog(&sample_catalog_text()).unwrap();
    let config = Config::default();
    let selected = filter_entries(entries, &config, fixed_now());

    // the out-of-basin row and the 2010 row are filtered out
    assert_eq!(selected.len(), 2);
    assert!(selected.iter().all(|e| e.file.contains("2902746")));
    // sorted by date
    assert!(selected[0].date <= selected[1].date);
}

#[test]
fn test_filter_explicit_date_range() {
    let entries = parse_catalog(&sample_catalog_text()).unwrap();
    let start = Utc.with_ymd_and_hms(2023, 7, 10, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2023, 7, 31, 0, 0, 0).unwrap();
    let config = Config::default().with_date_range(start, end);

    let selected = filter_entries(entries, &config, fixed_now());
    assert_eq!(selected.len(), 1);
    assert!(selected[0].file.ends_with("D2902746_002.nc"));
}

#[test]
fn test_over_cap_sampling_is_reproducible() {
    let base_date = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let entries: Vec<CatalogEntry> = (0..50)
        .map(|i| CatalogEntry {
            file: format!("coriolis/float/profiles/R_{i:03}.nc"),
            date: base_date + Duration::days(i),
            latitude: 10.0,
            longitude: 70.0,
        })
        .collect();

    let config = Config::default().with_max_profiles(10);
    let first = filter_entries(entries.clone(), &config, fixed_now());
    let second = filter_entries(entries.clone(), &config, fixed_now());

    assert_eq!(first.len(), 10);
    // identical seed, identical selection
    assert_eq!(first, second);
    // sample is drawn from the candidates
    assert!(first.iter().all(|e| entries.contains(e)));
    assert!(first.windows(2).all(|w| w[0].date <= w[1].date));
}

//! Tests for normalized profile assembly

use crate::app::models::{AccuracyTag, OceanRegion, ProcessingLevel};
use crate::app::services::dataset::{DatasetOpener, InMemoryDataset, ProfileDataset};
use crate::app::services::profile_parser::assembler::{assemble, parse_path};
use crate::app::services::profile_parser::tests::create_test_dataset;
use crate::config::Config;
use crate::constants::variables;
use crate::{Error, Result};
use chrono::Datelike;
use std::path::Path;

struct FixtureOpener(InMemoryDataset);

impl DatasetOpener for FixtureOpener {
    fn open(&self, _path: &Path) -> Result<Box<dyn ProfileDataset>> {
        Ok(Box::new(self.0.clone()))
    }
}

#[test]
fn test_assemble_full_profile() {
    let config = Config::default();
    let profile = assemble(&config, &create_test_dataset(), "D2902746_042.nc").unwrap();

    assert_eq!(profile.float_id, "2902746");
    assert_eq!(profile.cycle_number, 42);
    assert_eq!(profile.source_file, "D2902746_042.nc");
    assert_eq!(profile.ocean_region, OceanRegion::ArabianSea);
    assert_eq!(profile.processing_level, ProcessingLevel::DelayedMode);
    assert_eq!(profile.platform_type, "APEX");
    assert_eq!(profile.data_source, "argo_gdac");

    assert!(profile.has_temperature);
    assert!(profile.has_salinity);
    assert!(profile.has_pressure);
    assert!(!profile.has_oxygen);

    assert_eq!(profile.surface_temperature, Some(28.5));
    assert_eq!(profile.surface_salinity, Some(36.1));
    assert_eq!(profile.max_depth, Some(500.0));
    assert_eq!(profile.num_valid_levels, 12);

    // first temperature departure >= 0.2°C from 28.5 is 28.2 at 20 dbar
    assert_eq!(profile.mixed_layer_depth, Some(20.0));
    assert!(profile.thermocline_depth.is_some());
    assert!(profile.halocline_depth.is_some());
    assert!(profile.surface_density.is_some());

    // 5.0 - 0.5 (under 50 levels) + 0.2 (delayed mode)
    assert!((profile.quality_score - 4.7).abs() < 1e-9);

    // no POSITION_QC flag, delayed mode implies high position accuracy
    assert_eq!(profile.position_accuracy, AccuracyTag::High);
    assert_eq!(profile.time_accuracy, AccuracyTag::Standard);

    assert_eq!(profile.profile_date.year(), 2023);
    assert!(profile.validate().is_ok());
}

#[test]
fn test_assemble_generates_summaries() {
    let config = Config::default();
    let profile = assemble(&config, &create_test_dataset(), "D2902746_042.nc").unwrap();

    assert!(profile.summary.contains("Arabian Sea"));
    assert!(profile.summary.contains("surface temperature 28.5°C"));
    assert!(profile.summary.contains("max depth 500m"));
    // score 4.7 sits in the >= 4.5 band
    assert!(profile.summary.contains("Excellent data quality"));

    assert!(profile.scientific_summary.contains("Arabian Sea"));
    assert!(profile.scientific_summary.contains("SST 28.50°C"));
    assert!(profile.scientific_summary.contains("MLD 20m"));
    assert!(profile.scientific_summary.contains("Influenced by"));
}

#[test]
fn test_assemble_without_salinity() {
    let config = Config::default();
    let dataset = create_test_dataset().remove_variable(variables::SALINITY);
    let profile = assemble(&config, &dataset, "test.nc").unwrap();

    assert!(!profile.has_salinity);
    assert_eq!(profile.surface_salinity, None);
    assert_eq!(profile.salinity_mean, None);
    assert_eq!(profile.halocline_depth, None);
    assert_eq!(profile.surface_density, None);

    // everything else is populated normally
    assert!(profile.has_temperature);
    assert_eq!(profile.mixed_layer_depth, Some(20.0));
    assert!((profile.quality_score - 3.2).abs() < 1e-9);
}

#[test]
fn test_assemble_rejects_missing_temperature() {
    let config = Config::default();
    let dataset = create_test_dataset().remove_variable(variables::TEMPERATURE);
    let err = assemble(&config, &dataset, "test.nc").unwrap_err();
    assert!(matches!(err, Error::Structure { .. }));
}

#[test]
fn test_assemble_rejects_out_of_basin_coordinates() {
    let config = Config::default();
    let dataset = create_test_dataset().with_scalar(variables::LATITUDE, 50.0);
    let err = assemble(&config, &dataset, "test.nc").unwrap_err();
    assert!(matches!(err, Error::Coordinate { .. }));
}

#[test]
fn test_assemble_rejects_unparseable_time() {
    let config = Config::default();
    let dataset = create_test_dataset().with_scalar(variables::JULIAN_DAY, f64::NAN);
    let err = assemble(&config, &dataset, "test.nc").unwrap_err();
    assert!(matches!(err, Error::Time { .. }));
}

#[test]
fn test_assemble_ids_are_unique() {
    let config = Config::default();
    let a = assemble(&config, &create_test_dataset(), "a.nc").unwrap();
    let b = assemble(&config, &create_test_dataset(), "b.nc").unwrap();

    assert_ne!(a.id, b.id);
    // dedup key is identity-based, not record-based
    assert_eq!(a.dedup_key(), b.dedup_key());
}

#[test]
fn test_parse_path_uses_file_name() {
    let config = Config::default();
    let opener = FixtureOpener(create_test_dataset());
    let profile = parse_path(&opener, &config, Path::new("/tmp/argo/D2902746_042.nc")).unwrap();
    assert_eq!(profile.source_file, "D2902746_042.nc");
}

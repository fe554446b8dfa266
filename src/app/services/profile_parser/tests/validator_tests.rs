//! Tests for structural and coordinate validation

use crate::app::services::dataset::InMemoryDataset;
use crate::app::services::profile_parser::tests::create_test_dataset;
use crate::app::services::profile_parser::validator::{validate_coordinates, validate_structure};
use crate::config::Config;
use crate::constants::variables;
use crate::Error;

#[test]
fn test_valid_dataset_passes() {
    let dataset = create_test_dataset();
    assert!(validate_structure(&dataset, "test.nc").is_ok());
}

#[test]
fn test_missing_temperature_rejected() {
    let dataset = create_test_dataset().remove_variable(variables::TEMPERATURE);
    let err = validate_structure(&dataset, "test.nc").unwrap_err();

    assert!(matches!(err, Error::Structure { .. }));
    assert!(err.is_file_scoped());
    assert!(err.to_string().contains("TEMP"));
}

#[test]
fn test_missing_salinity_tolerated() {
    // profiles without PSAL still assemble; the quality score is penalized
    let dataset = create_test_dataset().remove_variable(variables::SALINITY);
    assert!(validate_structure(&dataset, "test.nc").is_ok());
}

#[test]
fn test_insufficient_vertical_levels_rejected() {
    let dataset = InMemoryDataset::new(2)
        .with_variable(variables::TEMPERATURE, vec![28.0, 27.0])
        .with_variable(variables::PRESSURE, vec![0.0, 10.0])
        .with_scalar(variables::LATITUDE, 15.0)
        .with_scalar(variables::LONGITUDE, 65.0)
        .with_scalar(variables::JULIAN_DAY, 26847.5);

    let err = validate_structure(&dataset, "test.nc").unwrap_err();
    assert!(err.to_string().contains("vertical levels"));
}

#[test]
fn test_coordinates_inside_basin_accepted() {
    let config = Config::default();
    assert!(validate_coordinates(&config, "test.nc", 15.0, 65.0).is_ok());
}

#[test]
fn test_coordinates_in_buffer_accepted() {
    // lat 34 is above the basin box but inside the 5 degree buffer
    let config = Config::default();
    assert!(validate_coordinates(&config, "test.nc", 34.0, 65.0).is_ok());
}

#[test]
fn test_coordinates_outside_basin_rejected() {
    let config = Config::default();
    let err = validate_coordinates(&config, "test.nc", 50.0, 65.0).unwrap_err();
    assert!(matches!(err, Error::Coordinate { .. }));
    assert!(err.is_file_scoped());
}

#[test]
fn test_unphysical_coordinates_rejected() {
    let config = Config::default();
    assert!(validate_coordinates(&config, "test.nc", 95.0, 65.0).is_err());
    assert!(validate_coordinates(&config, "test.nc", 15.0, -185.0).is_err());
    assert!(validate_coordinates(&config, "test.nc", f64::NAN, 65.0).is_err());
}

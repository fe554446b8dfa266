//! Tests for the profile parsing pipeline
//!
//! Unit tests for structural validation, parameter extraction, derived
//! calculations, and full record assembly, plus shared dataset fixtures.

pub mod assembler_tests;
pub mod validator_tests;

use crate::app::models::PhysicalSeries;
use crate::app::services::dataset::InMemoryDataset;
use crate::constants::variables;

/// A realistic Arabian Sea delayed-mode profile with 12 vertical levels
pub fn create_test_dataset() -> InMemoryDataset {
    let pressures = vec![
        0.0, 5.0, 10.0, 20.0, 30.0, 50.0, 75.0, 100.0, 150.0, 200.0, 300.0, 500.0,
    ];
    let temperatures = vec![
        28.5, 28.5, 28.4, 28.2, 28.0, 26.0, 22.0, 18.0, 15.0, 13.5, 12.0, 10.0,
    ];
    let salinities = vec![
        36.1, 36.1, 36.0, 36.0, 35.9, 35.6, 35.4, 35.2, 35.1, 35.05, 35.0, 34.9,
    ];
    let good_flags = vec![1u8; 12];

    InMemoryDataset::new(12)
        .with_variable(variables::PRESSURE, pressures)
        .with_flags(variables::PRESSURE, good_flags.clone())
        .with_variable(variables::TEMPERATURE, temperatures)
        .with_flags(variables::TEMPERATURE, good_flags.clone())
        .with_variable(variables::SALINITY, salinities)
        .with_flags(variables::SALINITY, good_flags)
        .with_scalar(variables::LATITUDE, 15.0)
        .with_scalar(variables::LONGITUDE, 65.0)
        .with_scalar(variables::JULIAN_DAY, 26847.5)
        .with_scalar(variables::CYCLE_NUMBER, 42.0)
        .with_char(variables::DATA_MODE, 'D')
        .with_attribute(variables::PLATFORM_NUMBER_ATTR, "2902746")
        .with_attribute("platform_type", "APEX")
}

/// Build an unflagged series from plain values
pub fn series(values: &[f64]) -> PhysicalSeries {
    PhysicalSeries::new(values.iter().map(|v| Some(*v)).collect(), None)
        .expect("series construction")
}

//! Structural validation of raw profile datasets
//!
//! Cheap usability checks that run before any extraction work: required
//! variables present, enough vertical levels to interpret, coordinates inside
//! the buffered target basin. All checks are pure predicates over the dataset
//! and configuration.

use crate::app::services::dataset::ProfileDataset;
use crate::config::Config;
use crate::constants::{MIN_VERTICAL_LEVELS, REQUIRED_VARIABLES, qc_variable_name, variables};
use crate::{Error, Result};
use tracing::{debug, warn};

/// Validate that a dataset carries the minimum structure for parsing
///
/// Absence of QC variables is logged but does not fail validation; the
/// quality score absorbs the penalty downstream.
pub fn validate_structure(dataset: &dyn ProfileDataset, source_file: &str) -> Result<()> {
    let missing: Vec<&str> = REQUIRED_VARIABLES
        .iter()
        .filter(|var| !dataset.has_variable(var))
        .copied()
        .collect();

    if !missing.is_empty() {
        return Err(Error::structure(
            source_file,
            format!("missing required variables: {}", missing.join(", ")),
        ));
    }

    if dataset.n_levels() < MIN_VERTICAL_LEVELS {
        return Err(Error::structure(
            source_file,
            format!(
                "insufficient vertical levels: {} < {MIN_VERTICAL_LEVELS}",
                dataset.n_levels()
            ),
        ));
    }

    if !dataset.has_variable(variables::SALINITY) {
        debug!(file = source_file, "no salinity variable present");
    }

    let core_qc = [
        variables::TEMPERATURE,
        variables::SALINITY,
        variables::PRESSURE,
    ];
    let qc_present = core_qc
        .iter()
        .filter(|p| dataset.flags(p).is_some() || dataset.has_variable(&qc_variable_name(p)))
        .count();
    if qc_present == 0 {
        warn!(
            file = source_file,
            "no QC variables found, quality assessment limited"
        );
    }

    Ok(())
}

/// Validate profile coordinates against physical bounds and the target basin
///
/// The basin box is expanded by the configured buffer so profiles drifting
/// near the boundary are not discarded.
pub fn validate_coordinates(config: &Config, source_file: &str, lat: f64, lon: f64) -> Result<()> {
    if !lat.is_finite() || !lon.is_finite() {
        return Err(Error::coordinate(source_file, lat, lon));
    }

    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(Error::coordinate(source_file, lat, lon));
    }

    if !config
        .basin_bounds
        .contains_buffered(lat, lon, config.coordinate_buffer_degrees)
    {
        return Err(Error::coordinate(source_file, lat, lon));
    }

    Ok(())
}

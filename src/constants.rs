//! Application constants for the Argo processor
//!
//! This module contains the NetCDF variable names, quality-control flag
//! values, physical plausibility ranges, and derived-parameter thresholds
//! used throughout the ingestion pipeline.

// =============================================================================
// Remote Catalog Constants
// =============================================================================

/// Base URL of the Argo global data assembly centre
pub const GDAC_BASE_URL: &str = "https://data-argo.ifremer.fr";

/// Path of the compressed global profile index below the GDAC root
pub const GDAC_INDEX_PATH: &str = "ar_index_global_prof.txt.gz";

/// Comment lines preceding the header row in the global index
pub const INDEX_HEADER_SKIP_LINES: usize = 8;

/// Files already on disk above this size are not downloaded again
pub const MIN_CACHED_FILE_BYTES: u64 = 1000;

// =============================================================================
// NetCDF Variable Names
// =============================================================================

/// Standard variable names in Argo profile NetCDF files
pub mod variables {
    // Core physical parameters
    pub const TEMPERATURE: &str = "TEMP";
    pub const SALINITY: &str = "PSAL";
    pub const PRESSURE: &str = "PRES";

    // Biogeochemical parameters
    pub const OXYGEN: &str = "DOXY";
    pub const PH: &str = "PH_IN_SITU_TOTAL";
    pub const NITRATE: &str = "NITRATE";
    pub const CHLOROPHYLL: &str = "CHLA";

    // Position and time
    pub const LATITUDE: &str = "LATITUDE";
    pub const LONGITUDE: &str = "LONGITUDE";
    pub const JULIAN_DAY: &str = "JULD";

    // Identity and processing metadata
    pub const CYCLE_NUMBER: &str = "CYCLE_NUMBER";
    pub const DATA_MODE: &str = "DATA_MODE";
    pub const POSITION_QC: &str = "POSITION_QC";
    pub const JULIAN_DAY_QC: &str = "JULD_QC";

    // Global attribute carrying the float identifier
    pub const PLATFORM_NUMBER_ATTR: &str = "platform_number";
}

/// Supported physical quantities as (NetCDF variable, record field) pairs
pub const SUPPORTED_PARAMETERS: &[(&str, &str)] = &[
    (variables::TEMPERATURE, "temperature"),
    (variables::SALINITY, "salinity"),
    (variables::PRESSURE, "pressure"),
    (variables::OXYGEN, "oxygen"),
    (variables::PH, "ph"),
    (variables::NITRATE, "nitrate"),
    (variables::CHLOROPHYLL, "chlorophyll"),
];

/// Variables that must be present for a dataset to be usable
///
/// Salinity is deliberately absent: profiles without PSAL still assemble
/// (with `has_salinity = false`) and the quality score carries the penalty.
pub const REQUIRED_VARIABLES: &[&str] = &[
    variables::TEMPERATURE,
    variables::PRESSURE,
    variables::LATITUDE,
    variables::LONGITUDE,
    variables::JULIAN_DAY,
];

/// Minimum vertical levels for any oceanographic interpretation
pub const MIN_VERTICAL_LEVELS: usize = 3;

/// QC variable name for a parameter (e.g. `TEMP` -> `TEMP_QC`)
pub fn qc_variable_name(parameter: &str) -> String {
    format!("{parameter}_QC")
}

/// Adjusted-mode QC variable name (e.g. `TEMP` -> `TEMP_ADJUSTED_QC`)
pub fn adjusted_qc_variable_name(parameter: &str) -> String {
    format!("{parameter}_ADJUSTED_QC")
}

// =============================================================================
// Quality Control Constants
// =============================================================================

/// Quality control flag values per the Argo QC convention
pub mod qc_flags {
    /// Passed all real-time QC checks
    pub const GOOD: u8 = 1;

    /// Probably good - minor inconsistencies
    pub const PROBABLY_GOOD: u8 = 2;

    /// Probably bad - potentially correctable
    pub const PROBABLY_BAD: u8 = 3;

    /// Bad - should not be used
    pub const BAD: u8 = 4;

    /// Value changed during delayed-mode adjustment
    pub const CHANGED: u8 = 5;

    /// Estimated value (interpolated or extrapolated)
    pub const ESTIMATED: u8 = 8;

    /// Missing or unparseable quality information
    pub const MISSING: u8 = 9;

    /// Default accept-set for sample masking
    pub const DEFAULT_ACCEPT: &[u8] = &[GOOD, PROBABLY_GOOD, CHANGED, ESTIMATED];

    /// Flags counted as "good" when scoring data quality
    pub const SCORING_GOOD: &[u8] = &[GOOD, PROBABLY_GOOD];
}

/// Get quality flag description for human-readable output
pub fn qc_flag_description(flag: u8) -> &'static str {
    match flag {
        qc_flags::GOOD => "Good - passed all QC checks",
        qc_flags::PROBABLY_GOOD => "Probably good - minor inconsistencies",
        qc_flags::PROBABLY_BAD => "Probably bad - potentially correctable",
        qc_flags::BAD => "Bad - should not be used",
        qc_flags::CHANGED => "Changed - adjusted in delayed mode",
        qc_flags::ESTIMATED => "Estimated - interpolated value",
        qc_flags::MISSING => "Missing - no quality information",
        _ => "Unassigned quality flag",
    }
}

// =============================================================================
// Physical Plausibility Ranges
// =============================================================================

/// Inclusive plausibility range for a parameter, if one is defined
///
/// Sensor glitches produce physically impossible spikes that would corrupt
/// derived gradients and means; out-of-range samples become missing.
pub fn plausible_range(parameter: &str) -> Option<(f64, f64)> {
    match parameter {
        variables::TEMPERATURE => Some((-3.0, 40.0)), // °C
        variables::SALINITY => Some((0.0, 45.0)),     // PSU
        variables::PRESSURE => Some((0.0, 12000.0)),  // dbar
        variables::OXYGEN => Some((0.0, 600.0)),      // µmol/kg
        variables::PH => Some((6.0, 9.0)),
        variables::NITRATE => Some((0.0, 100.0)), // µmol/kg
        variables::CHLOROPHYLL => Some((0.0, 100.0)), // mg/m³
        _ => None,
    }
}

// =============================================================================
// Derived Parameter Thresholds
// =============================================================================

/// Temperature difference from the surface defining the mixed layer (°C)
pub const MLD_TEMPERATURE_THRESHOLD: f64 = 0.2;

/// Minimum valid (depth, value) pairs for the mixed-layer calculation
pub const MLD_MIN_SAMPLES: usize = 5;

/// Minimum valid pairs for gradient-based cline detection
pub const CLINE_MIN_SAMPLES: usize = 10;

/// Thermoclines shallower than this are surface noise artifacts (dbar)
pub const THERMOCLINE_MIN_DEPTH: f64 = 10.0;

/// Haloclines shallower than this are surface noise artifacts (dbar)
pub const HALOCLINE_MIN_DEPTH: f64 = 5.0;

/// Sanity band for computed seawater density (kg/m³)
pub const DENSITY_MIN: f64 = 900.0;
pub const DENSITY_MAX: f64 = 1100.0;

/// Composite quality score bounds
pub const QUALITY_SCORE_MIN: f64 = 1.0;
pub const QUALITY_SCORE_MAX: f64 = 5.0;

// =============================================================================
// Processing Configuration Defaults
// =============================================================================

/// Default number of parallel parse workers
pub const DEFAULT_PARALLEL_WORKERS: usize = 4;

/// Default maximum simultaneous file downloads
pub const DEFAULT_MAX_CONCURRENT_DOWNLOADS: usize = 10;

/// Default per-file parse timeout enforced by the batch orchestrator
pub const DEFAULT_PARSE_TIMEOUT_SECS: u64 = 30;

/// Default HTTP request timeout for catalog and file transfers
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default cap on profiles selected from the catalog per run
pub const DEFAULT_MAX_PROFILES: usize = 1000;

/// Fixed seed for over-cap catalog sampling, keeping runs reproducible
pub const CATALOG_SAMPLE_SEED: u64 = 42;

/// Default temporal window when no date range is configured (years)
pub const DEFAULT_RECENT_YEARS: i64 = 5;

// =============================================================================
// Time Reference
// =============================================================================

/// Days in the JULD convention are counted from this epoch
pub const JULD_EPOCH: &str = "1950-01-01";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qc_variable_names() {
        assert_eq!(qc_variable_name("TEMP"), "TEMP_QC");
        assert_eq!(adjusted_qc_variable_name("PSAL"), "PSAL_ADJUSTED_QC");
    }

    #[test]
    fn test_plausible_ranges() {
        assert_eq!(plausible_range("TEMP"), Some((-3.0, 40.0)));
        assert_eq!(plausible_range("PSAL"), Some((0.0, 45.0)));
        assert_eq!(plausible_range("PRES"), Some((0.0, 12000.0)));
        assert_eq!(plausible_range("PH_IN_SITU_TOTAL"), Some((6.0, 9.0)));
        assert_eq!(plausible_range("UNKNOWN_PARAM"), None);
    }

    #[test]
    fn test_default_accept_set() {
        assert_eq!(qc_flags::DEFAULT_ACCEPT, &[1, 2, 5, 8]);
        assert!(!qc_flags::DEFAULT_ACCEPT.contains(&qc_flags::BAD));
    }

    #[test]
    fn test_supported_parameter_count() {
        assert_eq!(SUPPORTED_PARAMETERS.len(), 7);
    }

    #[test]
    fn test_qc_flag_descriptions() {
        assert!(qc_flag_description(qc_flags::GOOD).contains("passed all QC"));
        assert!(qc_flag_description(qc_flags::MISSING).contains("Missing"));
        assert_eq!(qc_flag_description(7), "Unassigned quality flag");
    }
}

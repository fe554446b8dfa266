//! Data models for Argo profile processing
//!
//! This module contains the core data structures for representing extracted
//! measurement series and the normalized profile record emitted by the
//! assembler, following the Argo profile data conventions.

use crate::constants::{QUALITY_SCORE_MAX, QUALITY_SCORE_MIN, qc_flags};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Ocean Region Classification
// =============================================================================

/// Named sub-regions of the target ocean basin
///
/// Assigned by the region classifier from profile coordinates; used for
/// filtering, summary text, and downstream query context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OceanRegion {
    ArabianSea,
    BayOfBengal,
    EquatorialIndian,
    IndianOceanOther,
    OutsideBasin,
}

impl OceanRegion {
    /// Stable snake_case tag stored with the profile
    pub fn as_str(&self) -> &'static str {
        match self {
            OceanRegion::ArabianSea => "arabian_sea",
            OceanRegion::BayOfBengal => "bay_of_bengal",
            OceanRegion::EquatorialIndian => "equatorial_indian",
            OceanRegion::IndianOceanOther => "indian_ocean_other",
            OceanRegion::OutsideBasin => "outside_basin",
        }
    }

    /// Human-readable region name for summary text
    pub fn display_name(&self) -> &'static str {
        match self {
            OceanRegion::ArabianSea => "Arabian Sea",
            OceanRegion::BayOfBengal => "Bay of Bengal",
            OceanRegion::EquatorialIndian => "Equatorial Indian Ocean",
            OceanRegion::IndianOceanOther => "Indian Ocean",
            OceanRegion::OutsideBasin => "Outside Basin",
        }
    }
}

impl fmt::Display for OceanRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OceanRegion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "arabian_sea" => Ok(OceanRegion::ArabianSea),
            "bay_of_bengal" => Ok(OceanRegion::BayOfBengal),
            "equatorial_indian" => Ok(OceanRegion::EquatorialIndian),
            "indian_ocean_other" => Ok(OceanRegion::IndianOceanOther),
            "outside_basin" => Ok(OceanRegion::OutsideBasin),
            other => Err(Error::configuration(format!(
                "unknown ocean region tag '{other}'"
            ))),
        }
    }
}

// =============================================================================
// Processing Level and Accuracy Tags
// =============================================================================

/// Data processing level of a profile file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingLevel {
    /// Automated real-time processing only
    RealTime,
    /// Full delayed-mode scientific calibration
    DelayedMode,
    /// Real-time data with adjusted values applied
    Adjusted,
}

impl ProcessingLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingLevel::RealTime => "real_time",
            ProcessingLevel::DelayedMode => "delayed_mode",
            ProcessingLevel::Adjusted => "adjusted",
        }
    }
}

impl fmt::Display for ProcessingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Accuracy assessment for position or time metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyTag {
    High,
    Standard,
    Low,
}

impl AccuracyTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccuracyTag::High => "high",
            AccuracyTag::Standard => "standard",
            AccuracyTag::Low => "low",
        }
    }
}

// =============================================================================
// Physical Series
// =============================================================================

/// One physical quantity sampled across vertical levels
///
/// Missing samples are `None` placeholders rather than removed, so every
/// series extracted from a file has the same length as the file's vertical
/// dimension and stays index-aligned with the pressure series for
/// depth-paired calculations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicalSeries {
    /// One sample per vertical level; `None` marks a rejected or absent value
    pub values: Vec<Option<f64>>,

    /// QC flag codes parallel to `values`, when the file carried them
    pub flags: Option<Vec<u8>>,
}

impl PhysicalSeries {
    /// Create a new series, enforcing flag/sample alignment
    pub fn new(values: Vec<Option<f64>>, flags: Option<Vec<u8>>) -> Result<Self> {
        if let Some(ref f) = flags {
            if f.len() != values.len() {
                return Err(Error::configuration(format!(
                    "flag count {} does not match sample count {}",
                    f.len(),
                    values.len()
                )));
            }
        }
        Ok(Self { values, flags })
    }

    /// Number of vertical levels (including missing placeholders)
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterator over valid (non-missing) samples
    pub fn valid_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(|v| *v)
    }

    /// Number of valid samples
    pub fn valid_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Shallowest valid sample (series are level-ordered, surface first)
    pub fn surface_value(&self) -> Option<f64> {
        self.values.iter().find_map(|v| *v)
    }

    /// Largest valid sample
    pub fn max(&self) -> Option<f64> {
        self.valid_values().fold(None, |acc, v| match acc {
            Some(m) if m >= v => Some(m),
            _ => Some(v),
        })
    }

    /// Smallest valid sample
    pub fn min(&self) -> Option<f64> {
        self.valid_values().fold(None, |acc, v| match acc {
            Some(m) if m <= v => Some(m),
            _ => Some(v),
        })
    }

    /// Spread (max - min) across valid samples
    pub fn range(&self) -> Option<f64> {
        match (self.max(), self.min()) {
            (Some(max), Some(min)) => Some(max - min),
            _ => None,
        }
    }

    /// Mean of valid samples
    pub fn mean(&self) -> Option<f64> {
        let count = self.valid_count();
        if count == 0 {
            return None;
        }
        Some(self.valid_values().sum::<f64>() / count as f64)
    }

    /// Population standard deviation of valid samples
    pub fn std_dev(&self) -> Option<f64> {
        let mean = self.mean()?;
        let count = self.valid_count();
        let variance =
            self.valid_values().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;
        Some(variance.sqrt())
    }

    /// Fraction of flagged samples carrying a "good" QC flag
    ///
    /// Returns `None` when the file carried no QC flags for this parameter.
    pub fn good_flag_fraction(&self) -> Option<f64> {
        let flags = self.flags.as_ref()?;
        if flags.is_empty() {
            return None;
        }
        let good = flags
            .iter()
            .filter(|f| qc_flags::SCORING_GOOD.contains(f))
            .count();
        Some(good as f64 / flags.len() as f64)
    }
}

// =============================================================================
// Normalized Profile Record
// =============================================================================

/// The normalized profile record emitted by the assembler
///
/// Created once per source file; immutable thereafter until persisted. Any
/// later enrichment produces a new record built from the persisted one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedProfile {
    // Identity
    /// Generated unique identifier
    pub id: String,
    /// Float platform identifier from the file metadata
    pub float_id: String,
    /// Sequential surfacing event number for this float
    pub cycle_number: u32,
    /// Name of the source file this record was parsed from
    pub source_file: String,

    // Position and time
    pub latitude: f64,
    pub longitude: f64,
    pub profile_date: DateTime<Utc>,
    pub processed_at: DateTime<Utc>,

    // Regional and processing context
    pub ocean_region: OceanRegion,
    pub processing_level: ProcessingLevel,
    pub data_source: String,
    pub platform_type: String,

    // Surface values (shallowest valid sample per parameter)
    pub surface_temperature: Option<f64>,
    pub surface_salinity: Option<f64>,
    pub surface_pressure: Option<f64>,
    pub surface_oxygen: Option<f64>,
    pub surface_ph: Option<f64>,
    pub surface_nitrate: Option<f64>,
    pub surface_chlorophyll: Option<f64>,

    // Availability flags
    pub has_temperature: bool,
    pub has_salinity: bool,
    pub has_pressure: bool,
    pub has_oxygen: bool,
    pub has_ph: bool,
    pub has_nitrate: bool,
    pub has_chlorophyll: bool,

    // Profile shape
    /// Deepest valid pressure sample (dbar, used as depth proxy)
    pub max_depth: Option<f64>,
    /// Number of levels with a valid pressure sample
    pub num_valid_levels: usize,
    pub temperature_range: Option<f64>,
    pub salinity_range: Option<f64>,
    pub temperature_mean: Option<f64>,
    pub temperature_std: Option<f64>,
    pub salinity_mean: Option<f64>,
    pub salinity_std: Option<f64>,

    // Derived parameters
    pub mixed_layer_depth: Option<f64>,
    pub thermocline_depth: Option<f64>,
    pub halocline_depth: Option<f64>,
    pub surface_density: Option<f64>,

    // Quality
    pub quality_score: f64,
    pub position_accuracy: AccuracyTag,
    pub time_accuracy: AccuracyTag,

    // Indexable text
    pub summary: String,
    pub scientific_summary: String,
}

impl NormalizedProfile {
    /// Deduplication key enforced by the persistence collaborator
    pub fn dedup_key(&self) -> (String, u32) {
        (self.float_id.clone(), self.cycle_number)
    }

    /// Validate the record against the profile invariants
    pub fn validate(&self) -> Result<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(Error::coordinate(
                self.source_file.clone(),
                self.latitude,
                self.longitude,
            ));
        }

        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(Error::coordinate(
                self.source_file.clone(),
                self.latitude,
                self.longitude,
            ));
        }

        if !(QUALITY_SCORE_MIN..=QUALITY_SCORE_MAX).contains(&self.quality_score) {
            return Err(Error::configuration(format!(
                "quality score {} outside [{QUALITY_SCORE_MIN}, {QUALITY_SCORE_MAX}]",
                self.quality_score
            )));
        }

        // An unavailable parameter cannot carry a surface value
        let pairs = [
            (self.has_temperature, self.surface_temperature, "temperature"),
            (self.has_salinity, self.surface_salinity, "salinity"),
            (self.has_pressure, self.surface_pressure, "pressure"),
            (self.has_oxygen, self.surface_oxygen, "oxygen"),
            (self.has_ph, self.surface_ph, "ph"),
            (self.has_nitrate, self.surface_nitrate, "nitrate"),
            (self.has_chlorophyll, self.surface_chlorophyll, "chlorophyll"),
        ];
        for (available, surface, name) in pairs {
            if !available && surface.is_some() {
                return Err(Error::configuration(format!(
                    "profile marks {name} unavailable but carries a surface value"
                )));
            }
        }

        if let (Some(mld), Some(max_depth)) = (self.mixed_layer_depth, self.max_depth) {
            if mld > max_depth {
                return Err(Error::configuration(format!(
                    "mixed-layer depth {mld} exceeds max depth {max_depth}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn create_test_profile() -> NormalizedProfile {
        NormalizedProfile {
            id: "test-id".to_string(),
            float_id: "2902746".to_string(),
            cycle_number: 42,
            source_file: "R2902746_042.nc".to_string(),
            latitude: 15.0,
            longitude: 65.0,
            profile_date: Utc.with_ymd_and_hms(2023, 6, 16, 12, 0, 0).unwrap(),
            processed_at: Utc::now(),
            ocean_region: OceanRegion::ArabianSea,
            processing_level: ProcessingLevel::DelayedMode,
            data_source: "argo_gdac".to_string(),
            platform_type: "ARGO_FLOAT".to_string(),
            surface_temperature: Some(28.5),
            surface_salinity: Some(36.1),
            surface_pressure: Some(2.5),
            surface_oxygen: None,
            surface_ph: None,
            surface_nitrate: None,
            surface_chlorophyll: None,
            has_temperature: true,
            has_salinity: true,
            has_pressure: true,
            has_oxygen: false,
            has_ph: false,
            has_nitrate: false,
            has_chlorophyll: false,
            max_depth: Some(1950.0),
            num_valid_levels: 98,
            temperature_range: Some(24.3),
            salinity_range: Some(1.8),
            temperature_mean: Some(12.4),
            temperature_std: Some(7.2),
            salinity_mean: Some(35.2),
            salinity_std: Some(0.4),
            mixed_layer_depth: Some(32.0),
            thermocline_depth: Some(85.0),
            halocline_depth: Some(60.0),
            surface_density: Some(1023.4),
            quality_score: 4.7,
            position_accuracy: AccuracyTag::High,
            time_accuracy: AccuracyTag::Standard,
            summary: "Argo profile from Arabian Sea".to_string(),
            scientific_summary: "Oceanographic profile from Arabian Sea".to_string(),
        }
    }

    mod region_tests {
        use super::*;

        #[test]
        fn test_region_round_trip() {
            for region in [
                OceanRegion::ArabianSea,
                OceanRegion::BayOfBengal,
                OceanRegion::EquatorialIndian,
                OceanRegion::IndianOceanOther,
                OceanRegion::OutsideBasin,
            ] {
                assert_eq!(OceanRegion::from_str(region.as_str()).unwrap(), region);
            }
        }

        #[test]
        fn test_unknown_region_rejected() {
            assert!(OceanRegion::from_str("atlantic").is_err());
        }

        #[test]
        fn test_display_names() {
            assert_eq!(OceanRegion::ArabianSea.display_name(), "Arabian Sea");
            assert_eq!(OceanRegion::ArabianSea.to_string(), "arabian_sea");
        }
    }

    mod series_tests {
        use super::*;

        #[test]
        fn test_series_flag_alignment() {
            let ok = PhysicalSeries::new(vec![Some(1.0), None], Some(vec![1, 9]));
            assert!(ok.is_ok());

            let bad = PhysicalSeries::new(vec![Some(1.0), None], Some(vec![1]));
            assert!(bad.is_err());
        }

        #[test]
        fn test_series_statistics() {
            let series =
                PhysicalSeries::new(vec![Some(10.0), None, Some(20.0), Some(30.0)], None).unwrap();

            assert_eq!(series.len(), 4);
            assert_eq!(series.valid_count(), 3);
            assert_eq!(series.surface_value(), Some(10.0));
            assert_eq!(series.max(), Some(30.0));
            assert_eq!(series.min(), Some(10.0));
            assert_eq!(series.range(), Some(20.0));
            assert_eq!(series.mean(), Some(20.0));

            let std = series.std_dev().unwrap();
            assert!((std - (200.0_f64 / 3.0).sqrt()).abs() < 1e-9);
        }

        #[test]
        fn test_empty_series_statistics() {
            let series = PhysicalSeries::new(vec![None, None], None).unwrap();
            assert_eq!(series.valid_count(), 0);
            assert_eq!(series.surface_value(), None);
            assert_eq!(series.mean(), None);
            assert_eq!(series.range(), None);
        }

        #[test]
        fn test_good_flag_fraction() {
            let series = PhysicalSeries::new(
                vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)],
                Some(vec![1, 2, 4, 9]),
            )
            .unwrap();
            assert_eq!(series.good_flag_fraction(), Some(0.5));

            let unflagged = PhysicalSeries::new(vec![Some(1.0)], None).unwrap();
            assert_eq!(unflagged.good_flag_fraction(), None);
        }
    }

    mod profile_tests {
        use super::*;

        #[test]
        fn test_valid_profile() {
            let profile = create_test_profile();
            assert!(profile.validate().is_ok());
            assert_eq!(profile.dedup_key(), ("2902746".to_string(), 42));
        }

        #[test]
        fn test_coordinate_bounds() {
            let mut profile = create_test_profile();
            profile.latitude = 95.0;
            assert!(profile.validate().is_err());

            profile.latitude = 15.0;
            profile.longitude = -185.0;
            assert!(profile.validate().is_err());
        }

        #[test]
        fn test_quality_score_bounds() {
            let mut profile = create_test_profile();
            profile.quality_score = 5.5;
            assert!(profile.validate().is_err());

            profile.quality_score = 0.5;
            assert!(profile.validate().is_err());
        }

        #[test]
        fn test_availability_invariant() {
            let mut profile = create_test_profile();
            profile.has_salinity = false;
            // surface_salinity still set: invariant violated
            assert!(profile.validate().is_err());

            profile.surface_salinity = None;
            profile.salinity_mean = None;
            profile.salinity_std = None;
            assert!(profile.validate().is_ok());
        }

        #[test]
        fn test_mld_cannot_exceed_max_depth() {
            let mut profile = create_test_profile();
            profile.mixed_layer_depth = Some(2500.0);
            assert!(profile.validate().is_err());
        }

        #[test]
        fn test_serde_round_trip() {
            let profile = create_test_profile();
            let json = serde_json::to_string(&profile).unwrap();
            let back: NormalizedProfile = serde_json::from_str(&json).unwrap();
            assert_eq!(profile, back);
            assert!(json.contains("\"arabian_sea\""));
            assert!(json.contains("\"delayed_mode\""));
        }
    }
}

//! Normalized profile assembly
//!
//! The final stage of per-file parsing: pulls identity, position, and time
//! out of a validated dataset, extracts every supported parameter, computes
//! the derived quantities, classifies the region, and renders the indexable
//! summary text. Produces exactly one [`NormalizedProfile`] per file or a
//! file-scoped error.

use crate::app::models::{NormalizedProfile, PhysicalSeries};
use crate::app::services::context::{regional_context, seasonal_context};
use crate::app::services::dataset::{DatasetOpener, ProfileDataset};
use crate::app::services::profile_parser::{derived, extraction, validator};
use crate::config::Config;
use crate::constants::variables;
use crate::{Error, Result};
use chrono::{Datelike, Utc};
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

/// Parse the file at `path` into a normalized profile
///
/// Convenience wrapper used by the batch orchestrator: opens the dataset via
/// the injected opener and runs [`assemble`] with the file name as the
/// source identifier.
pub fn parse_path(
    opener: &dyn DatasetOpener,
    config: &Config,
    path: &Path,
) -> Result<NormalizedProfile> {
    let source_file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let dataset = opener.open(path)?;
    assemble(config, dataset.as_ref(), &source_file)
}

/// Assemble one normalized profile record from a raw dataset
pub fn assemble(
    config: &Config,
    dataset: &dyn ProfileDataset,
    source_file: &str,
) -> Result<NormalizedProfile> {
    validator::validate_structure(dataset, source_file)?;

    // Identity, position, and time
    let latitude = dataset
        .scalar(variables::LATITUDE)
        .ok_or_else(|| Error::structure(source_file, "LATITUDE carries no data"))?;
    let longitude = dataset
        .scalar(variables::LONGITUDE)
        .ok_or_else(|| Error::structure(source_file, "LONGITUDE carries no data"))?;
    validator::validate_coordinates(config, source_file, latitude, longitude)?;

    let juld = dataset
        .scalar(variables::JULIAN_DAY)
        .ok_or_else(|| Error::time(source_file, "JULD carries no data"))?;
    let profile_date = extraction::juld_to_datetime(juld)
        .ok_or_else(|| Error::time(source_file, format!("unparseable JULD value {juld}")))?;

    let float_id = dataset
        .attribute(variables::PLATFORM_NUMBER_ATTR)
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let cycle_number = dataset
        .scalar(variables::CYCLE_NUMBER)
        .filter(|c| c.is_finite() && *c >= 0.0)
        .map(|c| c as u32)
        .unwrap_or(0);
    let platform_type = dataset
        .attribute("platform_type")
        .unwrap_or_else(|| "ARGO_FLOAT".to_string());

    let processing_level = extraction::determine_processing_level(dataset);
    let position_accuracy = extraction::assess_position_accuracy(dataset);
    let time_accuracy = extraction::assess_time_accuracy(dataset);

    // Parameter extraction
    let accept = &config.qc_flags_accept;
    let temperature = extraction::extract_series(dataset, variables::TEMPERATURE, accept);
    let salinity = extraction::extract_series(dataset, variables::SALINITY, accept);
    let pressure = extraction::extract_series(dataset, variables::PRESSURE, accept);
    let oxygen = extraction::extract_series(dataset, variables::OXYGEN, accept);
    let ph = extraction::extract_series(dataset, variables::PH, accept);
    let nitrate = extraction::extract_series(dataset, variables::NITRATE, accept);
    let chlorophyll = extraction::extract_series(dataset, variables::CHLOROPHYLL, accept);

    let max_depth = pressure.as_ref().and_then(PhysicalSeries::max);
    let num_valid_levels = pressure.as_ref().map_or(0, PhysicalSeries::valid_count);

    // Derived parameters need depth-paired series
    let mixed_layer_depth = match (&pressure, &temperature) {
        (Some(p), Some(t)) => derived::mixed_layer_depth(p, t),
        _ => None,
    };
    let thermocline_depth = match (&pressure, &temperature) {
        (Some(p), Some(t)) => derived::thermocline_depth(p, t),
        _ => None,
    };
    let halocline_depth = match (&pressure, &salinity) {
        (Some(p), Some(s)) => derived::halocline_depth(p, s),
        _ => None,
    };

    let surface_temperature = temperature.as_ref().and_then(PhysicalSeries::surface_value);
    let surface_salinity = salinity.as_ref().and_then(PhysicalSeries::surface_value);
    let surface_pressure = pressure.as_ref().and_then(PhysicalSeries::surface_value);

    let surface_density = match (surface_temperature, surface_salinity) {
        (Some(t), Some(s)) => derived::seawater_density(t, s, surface_pressure.unwrap_or(0.0)),
        _ => None,
    };

    let quality_score = derived::quality_score(&derived::QualityInputs {
        has_temperature: temperature.is_some(),
        has_salinity: salinity.is_some(),
        has_pressure: pressure.is_some(),
        num_valid_levels,
        temperature: temperature.as_ref(),
        salinity: salinity.as_ref(),
        processing_level,
    });

    let ocean_region =
        crate::app::services::context::classify_region(&config.basin_bounds, latitude, longitude);

    let mut profile = NormalizedProfile {
        id: Uuid::new_v4().to_string(),
        float_id,
        cycle_number,
        source_file: source_file.to_string(),
        latitude,
        longitude,
        profile_date,
        processed_at: Utc::now(),
        ocean_region,
        processing_level,
        data_source: "argo_gdac".to_string(),
        platform_type,
        surface_temperature,
        surface_salinity,
        surface_pressure,
        surface_oxygen: oxygen.as_ref().and_then(PhysicalSeries::surface_value),
        surface_ph: ph.as_ref().and_then(PhysicalSeries::surface_value),
        surface_nitrate: nitrate.as_ref().and_then(PhysicalSeries::surface_value),
        surface_chlorophyll: chlorophyll.as_ref().and_then(PhysicalSeries::surface_value),
        has_temperature: temperature.is_some(),
        has_salinity: salinity.is_some(),
        has_pressure: pressure.is_some(),
        has_oxygen: oxygen.is_some(),
        has_ph: ph.is_some(),
        has_nitrate: nitrate.is_some(),
        has_chlorophyll: chlorophyll.is_some(),
        max_depth,
        num_valid_levels,
        temperature_range: temperature.as_ref().and_then(PhysicalSeries::range),
        salinity_range: salinity.as_ref().and_then(PhysicalSeries::range),
        temperature_mean: temperature.as_ref().and_then(PhysicalSeries::mean),
        temperature_std: temperature.as_ref().and_then(PhysicalSeries::std_dev),
        salinity_mean: salinity.as_ref().and_then(PhysicalSeries::mean),
        salinity_std: salinity.as_ref().and_then(PhysicalSeries::std_dev),
        mixed_layer_depth,
        thermocline_depth,
        halocline_depth,
        surface_density,
        quality_score,
        position_accuracy,
        time_accuracy,
        summary: String::new(),
        scientific_summary: String::new(),
    };

    profile.summary = build_summary(&profile);
    profile.scientific_summary = build_scientific_summary(&profile);

    profile.validate()?;
    debug!(
        file = source_file,
        float_id = %profile.float_id,
        cycle = profile.cycle_number,
        region = %profile.ocean_region,
        score = profile.quality_score,
        "assembled profile"
    );

    Ok(profile)
}

/// Human-readable one-line profile summary
fn build_summary(profile: &NormalizedProfile) -> String {
    let mut summary = format!(
        "ARGO profile from {} collected on {}",
        profile.ocean_region.display_name(),
        profile.profile_date.format("%Y-%m-%d")
    );

    let mut details = Vec::new();
    if let Some(temp) = profile.surface_temperature {
        details.push(format!("surface temperature {temp:.1}°C"));
    }
    if let Some(sal) = profile.surface_salinity {
        details.push(format!("salinity {sal:.1} PSU"));
    }
    if let Some(depth) = profile.max_depth {
        details.push(format!("max depth {depth:.0}m"));
    }
    if !details.is_empty() {
        summary.push_str(&format!(" with {}", details.join(", ")));
    }

    summary.push_str(match profile.quality_score {
        s if s >= 4.5 => ". Excellent data quality.",
        s if s >= 4.0 => ". High data quality.",
        s if s >= 3.0 => ". Good data quality.",
        _ => ". Standard data quality.",
    });

    summary
}

/// Scientific summary with regional and seasonal oceanographic context
fn build_scientific_summary(profile: &NormalizedProfile) -> String {
    let season = seasonal_context(profile.profile_date.month());
    let regional = regional_context(profile.ocean_region);

    let mut summary = format!(
        "Oceanographic profile from {} ({:.2}°N, {:.2}°E) during {}",
        regional.full_name, profile.latitude, profile.longitude, season.description
    );

    let mut details = Vec::new();
    if let Some(temp) = profile.surface_temperature {
        details.push(format!(
            "SST {temp:.2}°C (typical range: {})",
            regional.typical_temp_range
        ));
    }
    if let Some(sal) = profile.surface_salinity {
        details.push(format!(
            "SSS {sal:.2} PSU (typical range: {})",
            regional.typical_salinity_range
        ));
    }
    if let Some(mld) = profile.mixed_layer_depth {
        details.push(format!("MLD {mld:.0}m"));
    }
    if !details.is_empty() {
        summary.push_str(&format!(". Key parameters: {}", details.join("; ")));
    }

    let phenomena: Vec<&str> = regional.key_phenomena.iter().take(2).copied().collect();
    if !phenomena.is_empty() {
        summary.push_str(&format!(". Influenced by {}", phenomena.join(", ")));
    }

    if !season.characteristics.is_empty() {
        summary.push_str(&format!(
            ". Seasonal characteristics: {}",
            season.characteristics.to_lowercase()
        ));
    }

    summary
}

//! Parameter extraction with quality-control masking
//!
//! Pulls one [`PhysicalSeries`] per physical quantity out of a raw dataset,
//! turning rejected samples into missing placeholders rather than dropping
//! them so series stay index-aligned with the pressure series. Also decodes
//! the scalar identity/time/accuracy metadata.

use crate::app::models::{AccuracyTag, PhysicalSeries, ProcessingLevel};
use crate::app::services::dataset::ProfileDataset;
use crate::constants::{adjusted_qc_variable_name, plausible_range, variables};
use chrono::{DateTime, Duration, TimeZone, Utc};
use tracing::warn;

/// Extract a parameter as a masked physical series
///
/// Returns `None` when the variable is absent from the file. A sample
/// survives only if it is finite, not the declared fill value, carries an
/// accepted QC flag (when flags exist), and falls inside the parameter's
/// plausibility range. Flag/sample length mismatches skip QC filtering
/// rather than failing the file.
pub fn extract_series(
    dataset: &dyn ProfileDataset,
    parameter: &str,
    accept: &[u8],
) -> Option<PhysicalSeries> {
    let raw = dataset.variable(parameter)?;
    let fill = dataset.fill_value(parameter);
    let range = plausible_range(parameter);

    let flags = dataset.flags(parameter);
    let aligned_flags = match flags {
        Some(f) if f.len() == raw.len() => Some(f),
        Some(f) => {
            warn!(
                parameter,
                flags = f.len(),
                samples = raw.len(),
                "QC flag length mismatch, skipping QC filtering"
            );
            None
        }
        None => None,
    };

    let values: Vec<Option<f64>> = raw
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            if !v.is_finite() {
                return None;
            }
            if let Some(fill) = fill {
                if v == fill {
                    return None;
                }
            }
            if let Some(ref flags) = aligned_flags {
                if !accept.contains(&flags[i]) {
                    return None;
                }
            }
            if let Some((min, max)) = range {
                if !(min..=max).contains(&v) {
                    return None;
                }
            }
            Some(v)
        })
        .collect();

    // Alignment holds by construction
    PhysicalSeries::new(values, aligned_flags).ok()
}

/// Convert a JULD value (days since 1950-01-01) to a UTC timestamp
pub fn juld_to_datetime(juld: f64) -> Option<DateTime<Utc>> {
    if !juld.is_finite() || juld < 0.0 {
        return None;
    }

    let epoch = Utc.with_ymd_and_hms(1950, 1, 1, 0, 0, 0).single()?;
    let seconds = (juld * 86_400.0).round();
    if seconds > i64::MAX as f64 {
        return None;
    }
    epoch.checked_add_signed(Duration::seconds(seconds as i64))
}

/// Determine the data processing level of a profile file
///
/// Reads the DATA_MODE character when present; otherwise falls back to
/// inferring delayed mode from the presence of adjusted QC variables.
pub fn determine_processing_level(dataset: &dyn ProfileDataset) -> ProcessingLevel {
    if let Some(mode) = dataset.char_value(variables::DATA_MODE) {
        return match mode {
            'D' => ProcessingLevel::DelayedMode,
            'A' => ProcessingLevel::Adjusted,
            _ => ProcessingLevel::RealTime,
        };
    }

    let has_adjusted = [variables::TEMPERATURE, variables::SALINITY]
        .iter()
        .any(|p| dataset.has_variable(&adjusted_qc_variable_name(p)));

    if has_adjusted {
        ProcessingLevel::DelayedMode
    } else {
        ProcessingLevel::RealTime
    }
}

/// Map a single-character QC flag to an accuracy tag
fn accuracy_from_flag(flag: Option<u8>) -> Option<AccuracyTag> {
    match flag {
        Some(1) | Some(2) => Some(AccuracyTag::High),
        Some(3) | Some(4) => Some(AccuracyTag::Standard),
        Some(_) => Some(AccuracyTag::Low),
        None => None,
    }
}

fn char_flag(dataset: &dyn ProfileDataset, name: &str) -> Option<u8> {
    dataset
        .char_value(name)
        .and_then(|c| c.to_digit(10))
        .map(|d| d as u8)
}

/// Assess position accuracy from the POSITION_QC flag
///
/// Without a position flag, delayed-mode files are trusted as high accuracy
/// and everything else as standard.
pub fn assess_position_accuracy(dataset: &dyn ProfileDataset) -> AccuracyTag {
    if dataset.has_variable(variables::POSITION_QC) {
        if let Some(tag) = accuracy_from_flag(char_flag(dataset, variables::POSITION_QC)) {
            return tag;
        }
        return AccuracyTag::Low;
    }

    match determine_processing_level(dataset) {
        ProcessingLevel::DelayedMode => AccuracyTag::High,
        _ => AccuracyTag::Standard,
    }
}

/// Assess time accuracy from the JULD_QC flag
pub fn assess_time_accuracy(dataset: &dyn ProfileDataset) -> AccuracyTag {
    if dataset.has_variable(variables::JULIAN_DAY_QC) {
        if let Some(tag) = accuracy_from_flag(char_flag(dataset, variables::JULIAN_DAY_QC)) {
            return tag;
        }
        return AccuracyTag::Low;
    }

    AccuracyTag::Standard
}

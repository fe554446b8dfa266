//! Derived oceanographic parameters
//!
//! Computes mixed-layer depth, thermocline depth, halocline depth, surface
//! density, and the composite quality score from the extracted series. All
//! functions are pure; a calculation that cannot proceed (too few samples,
//! out-of-band result) yields `None`, never an error.

use crate::app::models::{PhysicalSeries, ProcessingLevel};
use crate::constants::{
    CLINE_MIN_SAMPLES, DENSITY_MAX, DENSITY_MIN, HALOCLINE_MIN_DEPTH, MLD_MIN_SAMPLES,
    MLD_TEMPERATURE_THRESHOLD, QUALITY_SCORE_MAX, QUALITY_SCORE_MIN, THERMOCLINE_MIN_DEPTH,
};

/// Collect (pressure, value) pairs where both samples are valid, sorted by
/// increasing pressure
fn depth_sorted_pairs(pressure: &PhysicalSeries, values: &PhysicalSeries) -> Vec<(f64, f64)> {
    let mut pairs: Vec<(f64, f64)> = pressure
        .values
        .iter()
        .zip(values.values.iter())
        .filter_map(|(p, v)| match (p, v) {
            (Some(p), Some(v)) => Some((*p, *v)),
            _ => None,
        })
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
    pairs
}

/// Mixed-layer depth from the temperature criterion
///
/// The mixed layer ends at the first depth where temperature departs from
/// the shallowest measurement by at least the threshold (0.2°C).
pub fn mixed_layer_depth(pressure: &PhysicalSeries, temperature: &PhysicalSeries) -> Option<f64> {
    let pairs = depth_sorted_pairs(pressure, temperature);
    if pairs.len() < MLD_MIN_SAMPLES {
        return None;
    }

    let surface_temp = pairs[0].1;
    let mld = pairs
        .iter()
        .find(|(_, t)| (t - surface_temp).abs() >= MLD_TEMPERATURE_THRESHOLD)
        .map(|(p, _)| *p)?;

    if mld > 0.0 { Some(mld) } else { None }
}

/// Second-order gradient dy/dx over possibly unequally spaced samples
///
/// One-sided differences at the endpoints, weighted central differences in
/// the interior. Inputs must be equal-length and at least 2 samples.
fn gradient(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut out = Vec::with_capacity(n);

    out.push((y[1] - y[0]) / (x[1] - x[0]));
    for i in 1..n - 1 {
        let a = x[i] - x[i - 1];
        let b = x[i + 1] - x[i];
        out.push((a * a * y[i + 1] + (b * b - a * a) * y[i] - b * b * y[i - 1]) / (a * b * (a + b)));
    }
    out.push((y[n - 1] - y[n - 2]) / (x[n - 1] - x[n - 2]));

    out
}

/// Depth of the steepest gradient in a parameter, subject to a minimum
/// depth below which the result is treated as surface noise
fn steepest_gradient_depth(
    pressure: &PhysicalSeries,
    values: &PhysicalSeries,
    min_depth: f64,
) -> Option<f64> {
    let pairs = depth_sorted_pairs(pressure, values);
    if pairs.len() < CLINE_MIN_SAMPLES {
        return None;
    }

    let depths: Vec<f64> = pairs.iter().map(|(p, _)| *p).collect();
    let series: Vec<f64> = pairs.iter().map(|(_, v)| *v).collect();
    let grad = gradient(&depths, &series);

    // Duplicate depth samples produce non-finite gradients; ignore them
    let depth = grad
        .iter()
        .enumerate()
        .filter(|(_, g)| g.is_finite())
        .max_by(|(_, a), (_, b)| a.abs().total_cmp(&b.abs()))
        .map(|(i, _)| depths[i])?;

    if depth > min_depth { Some(depth) } else { None }
}

/// Thermocline depth: the depth of maximum temperature gradient
pub fn thermocline_depth(pressure: &PhysicalSeries, temperature: &PhysicalSeries) -> Option<f64> {
    steepest_gradient_depth(pressure, temperature, THERMOCLINE_MIN_DEPTH)
}

/// Halocline depth: the depth of maximum salinity gradient
pub fn halocline_depth(pressure: &PhysicalSeries, salinity: &PhysicalSeries) -> Option<f64> {
    steepest_gradient_depth(pressure, salinity, HALOCLINE_MIN_DEPTH)
}

/// Seawater density from the simplified UNESCO equation of state
///
/// Temperature in °C, salinity in PSU, pressure in dbar. Results outside
/// the physical band (900, 1100) kg/m³ are rejected. For research-grade
/// density use the full TEOS-10 formulation instead.
pub fn seawater_density(temp: f64, sal: f64, pres: f64) -> Option<f64> {
    let p_bar = pres * 0.1;

    // Density of pure water at atmospheric pressure
    let rho0 = 999.842594 + 6.793952e-2 * temp - 9.095290e-3 * temp.powi(2)
        + 1.001685e-4 * temp.powi(3)
        - 1.120083e-6 * temp.powi(4)
        + 6.536332e-9 * temp.powi(5);

    // Salinity terms
    let rho = rho0
        + sal
            * (0.824493 - 4.0899e-3 * temp + 7.6438e-5 * temp.powi(2) - 8.2467e-7 * temp.powi(3)
                + 5.3875e-9 * temp.powi(4))
        + sal.powf(1.5) * (-5.72466e-3 + 1.0227e-4 * temp - 1.6546e-6 * temp.powi(2))
        + sal.powi(2) * 4.8314e-4;

    // Simplified compressibility correction
    let rho_p = rho * (1.0 + p_bar * 4.5e-6);

    if rho_p > DENSITY_MIN && rho_p < DENSITY_MAX {
        Some(rho_p)
    } else {
        None
    }
}

/// Inputs to the composite quality score
#[derive(Debug, Clone, Copy)]
pub struct QualityInputs<'a> {
    pub has_temperature: bool,
    pub has_salinity: bool,
    pub has_pressure: bool,
    pub num_valid_levels: usize,
    pub temperature: Option<&'a PhysicalSeries>,
    pub salinity: Option<&'a PhysicalSeries>,
    pub processing_level: ProcessingLevel,
}

/// Composite data quality score on a 1-5 scale
///
/// Starts from a perfect 5.0 and subtracts penalties for missing core
/// parameters, sparse vertical sampling, and poor QC flag fractions, then
/// adds a small bonus for delayed-mode or adjusted processing.
pub fn quality_score(inputs: &QualityInputs<'_>) -> f64 {
    let mut score = 5.0;

    if !inputs.has_temperature {
        score -= 1.5;
    }
    if !inputs.has_salinity {
        score -= 1.5;
    }
    if !inputs.has_pressure {
        score -= 1.0;
    }

    if inputs.num_valid_levels < 10 {
        score -= 1.0;
    } else if inputs.num_valid_levels < 50 {
        score -= 0.5;
    }

    if let Some(fraction) = inputs.temperature.and_then(|s| s.good_flag_fraction()) {
        score -= (1.0 - fraction) * 0.5;
    }
    if let Some(fraction) = inputs.salinity.and_then(|s| s.good_flag_fraction()) {
        score -= (1.0 - fraction) * 0.5;
    }

    match inputs.processing_level {
        ProcessingLevel::DelayedMode => score += 0.2,
        ProcessingLevel::Adjusted => score += 0.1,
        ProcessingLevel::RealTime => {}
    }

    score.clamp(QUALITY_SCORE_MIN, QUALITY_SCORE_MAX)
}

//! Regional and seasonal context for the Indian Ocean basin
//!
//! Pure classification functions used by the profile assembler: coordinates
//! map to a named sub-region, and month/region map to the oceanographic
//! context woven into the indexable summary text. No side effects.

use crate::app::models::OceanRegion;
use crate::config::BasinBounds;

/// Seasonal context for summary generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonalContext {
    pub season: &'static str,
    pub description: &'static str,
    pub characteristics: &'static str,
}

/// Regional context for summary generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionalContext {
    pub full_name: &'static str,
    pub characteristics: &'static str,
    pub typical_temp_range: &'static str,
    pub typical_salinity_range: &'static str,
    pub key_phenomena: &'static [&'static str],
}

struct RegionBox {
    lat_min: f64,
    lat_max: f64,
    lon_min: f64,
    lon_max: f64,
    region: OceanRegion,
}

impl RegionBox {
    fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&lat) && (self.lon_min..=self.lon_max).contains(&lon)
    }
}

// Checked in order; the Arabian Sea and Bay of Bengal boxes overlap the
// equatorial band and take precedence.
const SUB_REGIONS: &[RegionBox] = &[
    RegionBox {
        lat_min: 8.0,
        lat_max: 30.0,
        lon_min: 50.0,
        lon_max: 78.0,
        region: OceanRegion::ArabianSea,
    },
    RegionBox {
        lat_min: 5.0,
        lat_max: 24.0,
        lon_min: 78.0,
        lon_max: 100.0,
        region: OceanRegion::BayOfBengal,
    },
    RegionBox {
        lat_min: -10.0,
        lat_max: 10.0,
        lon_min: 40.0,
        lon_max: 120.0,
        region: OceanRegion::EquatorialIndian,
    },
];

/// Classify a coordinate into a named ocean region
pub fn classify_region(basin: &BasinBounds, lat: f64, lon: f64) -> OceanRegion {
    if !basin.contains(lat, lon) {
        return OceanRegion::OutsideBasin;
    }

    SUB_REGIONS
        .iter()
        .find(|b| b.contains(lat, lon))
        .map(|b| b.region)
        .unwrap_or(OceanRegion::IndianOceanOther)
}

/// Seasonal context for a calendar month (1-12)
pub fn seasonal_context(month: u32) -> SeasonalContext {
    match month {
        6..=9 => SeasonalContext {
            season: "southwest_monsoon",
            description: "Southwest Monsoon (June-September)",
            characteristics: "Strong winds, upwelling in Arabian Sea, heavy precipitation",
        },
        12 | 1 | 2 => SeasonalContext {
            season: "northeast_monsoon",
            description: "Northeast Monsoon (December-February)",
            characteristics: "Cooler temperatures, reduced precipitation",
        },
        3..=5 => SeasonalContext {
            season: "pre_monsoon",
            description: "Pre-monsoon (March-May)",
            characteristics: "Rising temperatures, low precipitation",
        },
        10 | 11 => SeasonalContext {
            season: "post_monsoon",
            description: "Post-monsoon (October-November)",
            characteristics: "Retreating monsoon, cyclone season",
        },
        _ => SeasonalContext {
            season: "unknown",
            description: "Unknown season",
            characteristics: "",
        },
    }
}

/// Regional context for a classified region
pub fn regional_context(region: OceanRegion) -> RegionalContext {
    match region {
        OceanRegion::ArabianSea => RegionalContext {
            full_name: "Arabian Sea",
            characteristics: "High salinity, seasonal upwelling, monsoon influence",
            typical_temp_range: "24-30°C",
            typical_salinity_range: ">35.5 PSU",
            key_phenomena: &[
                "Seasonal upwelling",
                "High evaporation",
                "Oxygen minimum zone",
            ],
        },
        OceanRegion::BayOfBengal => RegionalContext {
            full_name: "Bay of Bengal",
            characteristics: "Low salinity, river input, cyclone activity",
            typical_temp_range: "26-30°C",
            typical_salinity_range: "<34.5 PSU",
            key_phenomena: &[
                "River discharge",
                "Cyclone formation",
                "Salinity stratification",
            ],
        },
        OceanRegion::EquatorialIndian => RegionalContext {
            full_name: "Equatorial Indian Ocean",
            characteristics: "Equatorial currents, stable temperatures",
            typical_temp_range: "26-28°C",
            typical_salinity_range: "34.5-35.5 PSU",
            key_phenomena: &["Equatorial currents", "IOD influence", "Seasonal thermocline"],
        },
        OceanRegion::IndianOceanOther | OceanRegion::OutsideBasin => RegionalContext {
            full_name: "Indian Ocean",
            characteristics: "Tropical ocean basin",
            typical_temp_range: "Variable",
            typical_salinity_range: "Variable",
            key_phenomena: &["Monsoon influence"],
        },
    }
}

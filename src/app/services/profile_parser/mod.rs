//! Profile parsing pipeline for Argo NetCDF datasets
//!
//! This module turns one raw profile dataset into one [`NormalizedProfile`]
//! record. It is organized into logical components:
//! - [`validator`] - Structural usability checks on the raw dataset
//! - [`extraction`] - Parameter extraction with QC masking and plausibility filtering
//! - [`derived`] - Derived oceanographic parameters (MLD, clines, density, score)
//! - [`assembler`] - Final record assembly, summary text, and invariant checks
//!
//! # Parsing Pipeline
//!
//! 1. **Structural validation**: required variables and vertical resolution
//! 2. **Identity extraction**: float id, cycle number, position, time
//! 3. **Parameter extraction**: one [`PhysicalSeries`] per supported quantity
//! 4. **Derived calculation**: mixed-layer depth, thermocline, halocline,
//!    surface density, composite quality score
//! 5. **Assembly**: region classification, summary generation, validation
//!
//! Parsing is a pure function of the dataset and configuration: no shared
//! state, so the batch orchestrator can dispatch it to blocking workers
//! freely. Per-file problems surface as file-scoped errors that the caller
//! records without aborting the batch.
//!
//! [`NormalizedProfile`]: crate::app::models::NormalizedProfile
//! [`PhysicalSeries`]: crate::app::models::PhysicalSeries

pub mod assembler;
pub mod derived;
pub mod extraction;
pub mod validator;

#[cfg(test)]
pub mod tests;

// Re-export main entry points for easy access
pub use assembler::{assemble, parse_path};
pub use extraction::{determine_processing_level, extract_series, juld_to_datetime};
pub use validator::validate_structure;

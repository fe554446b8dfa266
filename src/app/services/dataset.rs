//! Raw profile dataset abstraction
//!
//! The core never touches the NetCDF container format directly: decoded files
//! are consumed through the [`ProfileDataset`] trait, and file opening is a
//! collaborator injected via [`DatasetOpener`]. This keeps the extraction and
//! assembly logic independent of the binary reader and lets tests drive the
//! full pipeline with in-memory datasets.

use crate::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Read-only view over one decoded profile file
///
/// Implementations flatten multi-dimensional variables to one value per
/// vertical level before exposing them here.
pub trait ProfileDataset: Send + Sync {
    /// Size of the vertical-level dimension
    fn n_levels(&self) -> usize;

    /// Whether the named variable exists in the file
    fn has_variable(&self, name: &str) -> bool;

    /// Per-level values for a variable, fill values included as stored
    fn variable(&self, name: &str) -> Option<Vec<f64>>;

    /// Decoded per-level QC flag codes for a variable
    fn flags(&self, name: &str) -> Option<Vec<u8>>;

    /// Declared fill value for a variable, if any
    fn fill_value(&self, name: &str) -> Option<f64>;

    /// First value of a scalar (per-profile) variable
    fn scalar(&self, name: &str) -> Option<f64>;

    /// Single-character code variable (e.g. DATA_MODE, POSITION_QC)
    fn char_value(&self, name: &str) -> Option<char>;

    /// Global attribute as text
    fn attribute(&self, name: &str) -> Option<String>;
}

/// Collaborator that opens a downloaded file into a [`ProfileDataset`]
///
/// The production implementation wraps the external NetCDF reader; tests
/// supply openers backed by [`InMemoryDataset`].
pub trait DatasetOpener: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn ProfileDataset>>;
}

/// In-memory [`ProfileDataset`] for tests and synthetic inputs
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataset {
    n_levels: usize,
    variables: HashMap<String, Vec<f64>>,
    flags: HashMap<String, Vec<u8>>,
    fill_values: HashMap<String, f64>,
    scalars: HashMap<String, f64>,
    chars: HashMap<String, char>,
    attributes: HashMap<String, String>,
}

impl InMemoryDataset {
    pub fn new(n_levels: usize) -> Self {
        Self {
            n_levels,
            ..Default::default()
        }
    }

    pub fn with_variable(mut self, name: &str, values: Vec<f64>) -> Self {
        self.variables.insert(name.to_string(), values);
        self
    }

    pub fn with_flags(mut self, name: &str, flags: Vec<u8>) -> Self {
        self.flags.insert(name.to_string(), flags);
        self
    }

    pub fn with_fill_value(mut self, name: &str, fill: f64) -> Self {
        self.fill_values.insert(name.to_string(), fill);
        self
    }

    pub fn with_scalar(mut self, name: &str, value: f64) -> Self {
        self.scalars.insert(name.to_string(), value);
        self
    }

    pub fn with_char(mut self, name: &str, value: char) -> Self {
        self.chars.insert(name.to_string(), value);
        self
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn remove_variable(mut self, name: &str) -> Self {
        self.variables.remove(name);
        self.flags.remove(name);
        self
    }
}

impl ProfileDataset for InMemoryDataset {
    fn n_levels(&self) -> usize {
        self.n_levels
    }

    fn has_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
            || self.flags.contains_key(name)
            || self.scalars.contains_key(name)
            || self.chars.contains_key(name)
    }

    fn variable(&self, name: &str) -> Option<Vec<f64>> {
        self.variables.get(name).cloned()
    }

    fn flags(&self, name: &str) -> Option<Vec<u8>> {
        self.flags.get(name).cloned()
    }

    fn fill_value(&self, name: &str) -> Option<f64> {
        self.fill_values.get(name).copied()
    }

    fn scalar(&self, name: &str) -> Option<f64> {
        self.scalars
            .get(name)
            .copied()
            .or_else(|| self.variables.get(name).and_then(|v| v.first().copied()))
    }

    fn char_value(&self, name: &str) -> Option<char> {
        self.chars.get(name).copied()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }
}

/// A profile dataset deserialized from the JSON mirror format
///
/// The binary NetCDF decode is an external concern; deployments convert
/// profile files to this flat JSON shape (one value per vertical level,
/// QC flags already decoded to digits) before handing them to the CLI.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsonDataset {
    n_levels: usize,
    #[serde(default)]
    variables: HashMap<String, Vec<f64>>,
    #[serde(default)]
    flags: HashMap<String, Vec<u8>>,
    #[serde(default)]
    fill_values: HashMap<String, f64>,
    #[serde(default)]
    scalars: HashMap<String, f64>,
    #[serde(default)]
    chars: HashMap<String, String>,
    #[serde(default)]
    attributes: HashMap<String, String>,
}

impl ProfileDataset for JsonDataset {
    fn n_levels(&self) -> usize {
        self.n_levels
    }

    fn has_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
            || self.flags.contains_key(name)
            || self.scalars.contains_key(name)
            || self.chars.contains_key(name)
    }

    fn variable(&self, name: &str) -> Option<Vec<f64>> {
        self.variables.get(name).cloned()
    }

    fn flags(&self, name: &str) -> Option<Vec<u8>> {
        self.flags.get(name).cloned()
    }

    fn fill_value(&self, name: &str) -> Option<f64> {
        self.fill_values.get(name).copied()
    }

    fn scalar(&self, name: &str) -> Option<f64> {
        self.scalars
            .get(name)
            .copied()
            .or_else(|| self.variables.get(name).and_then(|v| v.first().copied()))
    }

    fn char_value(&self, name: &str) -> Option<char> {
        self.chars.get(name).and_then(|s| s.chars().next())
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }
}

/// Opener for profile files in the JSON mirror format
#[derive(Debug, Clone, Default)]
pub struct JsonDatasetOpener;

impl JsonDatasetOpener {
    pub fn new() -> Self {
        Self
    }
}

impl DatasetOpener for JsonDatasetOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn ProfileDataset>> {
        let file = path.display().to_string();
        let content = std::fs::read_to_string(path)?;
        let dataset: JsonDataset = serde_json::from_str(&content)
            .map_err(|e| Error::structure(&file, format!("dataset decode failed: {e}")))?;
        Ok(Box::new(dataset))
    }
}

/// Decode raw QC characters to numeric flag codes
///
/// Argo QC variables are stored as character arrays; blanks and unparseable
/// bytes map to flag 9 (missing quality information) rather than failing.
pub fn decode_flag_chars(raw: &[char]) -> Vec<u8> {
    raw.iter()
        .map(|c| c.to_digit(10).map(|d| d as u8).unwrap_or(9))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::variables;

    #[test]
    fn test_in_memory_dataset_access() {
        let dataset = InMemoryDataset::new(3)
            .with_variable(variables::TEMPERATURE, vec![28.0, 27.5, 26.0])
            .with_flags(variables::TEMPERATURE, vec![1, 1, 2])
            .with_fill_value(variables::TEMPERATURE, 99999.0)
            .with_scalar(variables::LATITUDE, 15.0)
            .with_char(variables::DATA_MODE, 'D')
            .with_attribute("platform_number", "2902746");

        assert_eq!(dataset.n_levels(), 3);
        assert!(dataset.has_variable(variables::TEMPERATURE));
        assert!(!dataset.has_variable(variables::SALINITY));
        assert_eq!(
            dataset.variable(variables::TEMPERATURE),
            Some(vec![28.0, 27.5, 26.0])
        );
        assert_eq!(dataset.flags(variables::TEMPERATURE), Some(vec![1, 1, 2]));
        assert_eq!(dataset.fill_value(variables::TEMPERATURE), Some(99999.0));
        assert_eq!(dataset.scalar(variables::LATITUDE), Some(15.0));
        assert_eq!(dataset.char_value(variables::DATA_MODE), Some('D'));
        assert_eq!(
            dataset.attribute("platform_number"),
            Some("2902746".to_string())
        );
    }

    #[test]
    fn test_scalar_falls_back_to_first_level() {
        let dataset =
            InMemoryDataset::new(2).with_variable(variables::PRESSURE, vec![5.0, 10.0]);
        assert_eq!(dataset.scalar(variables::PRESSURE), Some(5.0));
    }

    #[test]
    fn test_json_dataset_decodes() {
        let text = r#"{
            "n_levels": 3,
            "variables": {"TEMP": [28.0, 27.5, 26.0]},
            "flags": {"TEMP": [1, 1, 2]},
            "fill_values": {"TEMP": 99999.0},
            "scalars": {"LATITUDE": 15.0},
            "chars": {"DATA_MODE": "D"},
            "attributes": {"platform_number": "2902746"}
        }"#;

        let dataset: JsonDataset = serde_json::from_str(text).unwrap();
        assert_eq!(dataset.n_levels(), 3);
        assert_eq!(dataset.variable(variables::TEMPERATURE).unwrap().len(), 3);
        assert_eq!(dataset.char_value(variables::DATA_MODE), Some('D'));
        assert_eq!(dataset.fill_value(variables::TEMPERATURE), Some(99999.0));
        assert_eq!(
            dataset.attribute("platform_number").as_deref(),
            Some("2902746")
        );
    }

    #[test]
    fn test_json_opener_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "not json").unwrap();

        let err = JsonDatasetOpener::new()
            .open(&path)
            .err()
            .expect("malformed file must not decode");
        assert!(matches!(err, crate::Error::Structure { .. }));
    }

    #[test]
    fn test_decode_flag_chars() {
        assert_eq!(decode_flag_chars(&['1', '2', '4', '9']), vec![1, 2, 4, 9]);
        // blanks and junk become flag 9
        assert_eq!(decode_flag_chars(&[' ', 'x', '3']), vec![9, 9, 3]);
    }
}

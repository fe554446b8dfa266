//! Tests for the ingestion pipeline
//!
//! Unit tests for catalog decoding/filtering, concurrent batch parsing, and
//! the pipeline controller's failure handling, plus shared fixtures.

pub mod catalog_tests;
pub mod pipeline_tests;

use crate::app::services::dataset::{DatasetOpener, ProfileDataset};
use crate::app::services::profile_parser::tests::create_test_dataset;
use crate::constants::variables;
use crate::Result;
use std::path::Path;

/// Opener yielding a valid fixture dataset, or a structurally broken one for
/// paths containing "corrupt"
pub struct ScriptedOpener;

impl DatasetOpener for ScriptedOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn ProfileDataset>> {
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        if name.is_some_and(|n| n.contains("corrupt")) {
            Ok(Box::new(
                create_test_dataset().remove_variable(variables::TEMPERATURE),
            ))
        } else {
            Ok(Box::new(create_test_dataset()))
        }
    }
}

/// A miniature catalog in the global index format: comment preamble, header
/// row, then data rows
pub fn sample_catalog_text() -> String {
    let mut text = String::new();
    for _ in 0..8 {
        text.push_str("# comment line\n");
    }
    text.push_str("file,date,latitude,longitude,ocean,profiler_type,institution,date_update\n");
    text.push_str(
        "coriolis/2902746/profiles/D2902746_001.nc,20230704120000,15.0,65.0,I,846,IF,20230801000000\n",
    );
    text.push_str(
        "coriolis/2902746/profiles/D2902746_002.nc,20230715060000,14.8,65.2,I,846,IF,20230801000000\n",
    );
    // outside the basin
    text.push_str(
        "aoml/13857/profiles/R13857_001.nc,20230601000000,50.0,-16.0,A,845,AO,20230801000000\n",
    );
    // too old for the default window
    text.push_str(
        "coriolis/1900001/profiles/R1900001_001.nc,20100101000000,10.0,70.0,I,846,IF,20100201000000\n",
    );
    // missing position, dropped during decode
    text.push_str(
        "coriolis/1900002/profiles/R1900002_001.nc,20230601000000,,,I,846,IF,20230801000000\n",
    );
    text
}

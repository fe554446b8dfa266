//! Command-line argument definitions for the Argo processor
//!
//! Defines the CLI interface using the clap derive API. Arguments are
//! validated eagerly and folded into a [`Config`] before any work starts.

use crate::config::Config;
use crate::constants::{
    DEFAULT_MAX_CONCURRENT_DOWNLOADS, DEFAULT_MAX_PROFILES, GDAC_BASE_URL,
};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for the Argo profile processor
///
/// Ingests Argo float profile data from the global data assembly centre
/// into normalized, quality-controlled profile records.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "argo-processor",
    version,
    about = "Ingest Argo float profiles into normalized, quality-controlled records",
    long_about = "Fetches the Argo global profile catalog, selects Indian Ocean profiles, \
                  downloads and parses them with QC-flag masking and physical plausibility \
                  filtering, computes derived oceanographic parameters, and persists the \
                  normalized records with indexable summaries."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the Argo processor
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run the complete remote ingestion pipeline
    Ingest(IngestArgs),
    /// Parse a local directory of already-acquired profile files
    Process(ProcessArgs),
}

/// Arguments for the ingest command (complete remote pipeline)
#[derive(Debug, Clone, Parser)]
pub struct IngestArgs {
    /// Base URL of the data assembly centre
    #[arg(
        long = "gdac-url",
        value_name = "URL",
        help = "Base URL of the data assembly centre"
    )]
    pub gdac_url: Option<String>,

    /// Directory for downloaded profile files
    ///
    /// Created if missing. Files already present above the cache size floor
    /// are reused instead of re-downloaded.
    #[arg(
        long = "download-dir",
        value_name = "PATH",
        help = "Directory for downloaded profile files"
    )]
    pub download_dir: Option<PathBuf>,

    /// Output file for normalized profile records (JSON lines)
    ///
    /// Appended to across runs; duplicate (float, cycle) pairs already in
    /// the file are skipped, making repeated runs idempotent.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        default_value = "./data/profiles.jsonl",
        help = "Output file for normalized profile records (JSON lines)"
    )]
    pub output: PathBuf,

    /// Start of the catalog date window (YYYY-MM-DD)
    ///
    /// Defaults together with --end-date to the most recent five years.
    #[arg(long = "start-date", value_name = "DATE", requires = "end_date")]
    pub start_date: Option<String>,

    /// End of the catalog date window (YYYY-MM-DD), inclusive
    #[arg(long = "end-date", value_name = "DATE", requires = "start_date")]
    pub end_date: Option<String>,

    /// Maximum profiles to ingest per run
    ///
    /// When more catalog entries match, a seeded random sample keeps the
    /// selection reproducible across runs.
    #[arg(
        short = 'n',
        long = "max-profiles",
        value_name = "COUNT",
        default_value_t = DEFAULT_MAX_PROFILES,
        help = "Maximum profiles to ingest per run"
    )]
    pub max_profiles: usize,

    /// Number of parallel parse workers
    ///
    /// Defaults to the number of logical CPUs.
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        help = "Number of parallel parse workers (default: logical CPUs)"
    )]
    pub workers: Option<usize>,

    /// Maximum simultaneous downloads
    #[arg(
        long = "max-downloads",
        value_name = "COUNT",
        default_value_t = DEFAULT_MAX_CONCURRENT_DOWNLOADS,
        help = "Maximum simultaneous file downloads"
    )]
    pub max_downloads: usize,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the process command (local batch parsing)
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Directory of profile dataset files to parse
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATH",
        help = "Directory of profile dataset files to parse"
    )]
    pub input: PathBuf,

    /// Output file for normalized profile records (JSON lines)
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Output file for normalized profile records (JSON lines)"
    )]
    pub output: Option<PathBuf>,

    /// Number of parallel parse workers
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        help = "Number of parallel parse workers (default: logical CPUs)"
    )]
    pub workers: Option<usize>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: debug, -vv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Option<Commands> {
        self.command.clone()
    }
}

fn effective_workers(requested: Option<usize>) -> usize {
    requested.unwrap_or_else(num_cpus::get).max(1)
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| Error::configuration(format!("invalid date '{text}': {e}")))
}

impl IngestArgs {
    /// Validate the ingest arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if self.max_profiles == 0 {
            return Err(Error::configuration(
                "maximum profile count must be greater than 0",
            ));
        }

        if self.max_downloads == 0 {
            return Err(Error::configuration(
                "download concurrency must be greater than 0",
            ));
        }

        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err(Error::configuration(
                    "worker count must be greater than 0",
                ));
            }
        }

        if let Some(range) = self.parse_date_range()? {
            if range.0 >= range.1 {
                return Err(Error::configuration(
                    "start date must precede end date",
                ));
            }
        }

        Ok(())
    }

    /// Fold the arguments into a pipeline configuration
    pub fn to_config(&self) -> Result<Config> {
        let mut config = Config::default()
            .with_workers(effective_workers(self.workers))
            .with_max_profiles(self.max_profiles)
            .with_max_concurrent_downloads(self.max_downloads);

        if let Some(url) = &self.gdac_url {
            config.gdac_url = url.clone();
        } else {
            config.gdac_url = GDAC_BASE_URL.to_string();
        }

        if let Some(dir) = &self.download_dir {
            config = config.with_download_dir(dir.clone());
        }

        if let Some((start, end)) = self.parse_date_range()? {
            config = config.with_date_range(start, end);
        }

        config.validate()?;
        Ok(config)
    }

    fn parse_date_range(&self) -> Result<Option<(DateTime<Utc>, DateTime<Utc>)>> {
        match (&self.start_date, &self.end_date) {
            (Some(start), Some(end)) => {
                let start = parse_date(start)?
                    .and_hms_opt(0, 0, 0)
                    .ok_or_else(|| Error::configuration("invalid start date"))?
                    .and_utc();
                // the end date is inclusive
                let end = parse_date(end)?
                    .and_hms_opt(23, 59, 59)
                    .ok_or_else(|| Error::configuration("invalid end date"))?
                    .and_utc();
                Ok(Some((start, end)))
            }
            _ => Ok(None),
        }
    }

    /// Get the logging level string based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Whether progress output should be shown
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl ProcessArgs {
    /// Validate the process arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if !self.input.exists() {
            return Err(Error::configuration(format!(
                "input path does not exist: {}",
                self.input.display()
            )));
        }

        if !self.input.is_dir() {
            return Err(Error::configuration(format!(
                "input path is not a directory: {}",
                self.input.display()
            )));
        }

        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err(Error::configuration(
                    "worker count must be greater than 0",
                ));
            }
        }

        Ok(())
    }

    /// Fold the arguments into a pipeline configuration
    pub fn to_config(&self) -> Result<Config> {
        let config = Config::default().with_workers(effective_workers(self.workers));
        config.validate()?;
        Ok(config)
    }

    /// Get the logging level string based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_ingest_args() -> IngestArgs {
        IngestArgs {
            gdac_url: None,
            download_dir: None,
            output: PathBuf::from("./data/profiles.jsonl"),
            start_date: None,
            end_date: None,
            max_profiles: 100,
            workers: Some(4),
            max_downloads: 10,
            verbose: 0,
            quiet: false,
        }
    }

    #[test]
    fn test_ingest_args_to_config() {
        let mut args = base_ingest_args();
        args.start_date = Some("2023-01-01".to_string());
        args.end_date = Some("2023-12-31".to_string());

        assert!(args.validate().is_ok());
        let config = args.to_config().unwrap();
        assert_eq!(config.max_profiles, 100);
        assert_eq!(config.workers, 4);
        assert!(config.date_range.is_some());
    }

    #[test]
    fn test_invalid_date_range_rejected() {
        let mut args = base_ingest_args();
        args.start_date = Some("2024-01-01".to_string());
        args.end_date = Some("2023-01-01".to_string());
        assert!(args.validate().is_err());

        args.start_date = Some("not-a-date".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_zero_counts_rejected() {
        let mut args = base_ingest_args();
        args.max_profiles = 0;
        assert!(args.validate().is_err());

        let mut args = base_ingest_args();
        args.workers = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_levels() {
        let mut args = base_ingest_args();
        assert_eq!(args.get_log_level(), "info");
        args.verbose = 1;
        assert_eq!(args.get_log_level(), "debug");
        args.verbose = 0;
        args.quiet = true;
        assert_eq!(args.get_log_level(), "error");
    }
}

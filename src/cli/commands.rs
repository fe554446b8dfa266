//! Command implementations for the Argo processor CLI
//!
//! Contains the command execution logic, progress reporting, and final
//! report printing for the CLI interface. The ingest command wires the
//! pipeline to file-backed collaborators so runs leave durable output;
//! the process command parses an already-acquired local directory.

use crate::app::services::ingestion::batch::process_batch;
use crate::app::services::dataset::JsonDatasetOpener;
use crate::app::services::ingestion::{IngestionPipeline, IngestionReport};
use crate::app::services::storage::{
    InMemoryVectorIndex, JsonFileStore, LoggingAuditSink, ProfileStore,
};
use crate::cli::args::{Args, Commands, IngestArgs, ProcessArgs};
use crate::{Error, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Main command runner for the Argo processor
///
/// Dispatches to the appropriate subcommand handler based on CLI args:
/// - `ingest`: complete remote pipeline with durable JSON-lines output
/// - `process`: local batch parsing of already-acquired profile files
pub async fn run(args: Args, cancel: CancellationToken) -> Result<()> {
    match args.get_command() {
        Some(Commands::Ingest(ingest_args)) => run_ingest(ingest_args, cancel).await,
        Some(Commands::Process(process_args)) => run_process(process_args, cancel).await,
        // main prints help before reaching here; nothing to do
        None => Ok(()),
    }
}

/// Set up tracing output for a command invocation
fn setup_logging(log_level: &str, quiet: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("argo_processor={log_level}")));

    if quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

/// Run the complete remote ingestion pipeline
async fn run_ingest(args: IngestArgs, cancel: CancellationToken) -> Result<()> {
    setup_logging(args.get_log_level(), args.quiet);

    info!("Starting Argo profile ingestion");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = args.to_config()?;
    debug!("Effective configuration: {:?}", config);

    let store = Arc::new(JsonFileStore::open(&args.output)?);
    if !store.is_empty() {
        info!(
            existing = store.len(),
            "output file already holds profiles; duplicates will be skipped"
        );
    }

    let pipeline = IngestionPipeline::new(
        config,
        Arc::new(JsonDatasetOpener::new()),
        store,
        Arc::new(InMemoryVectorIndex::new()),
        Arc::new(LoggingAuditSink::new()),
    )?;

    let spinner = if args.show_progress() {
        Some(create_spinner("ingesting Argo profiles"))
    } else {
        None
    };

    let result = pipeline.run(&cancel).await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let report = result?;
    if !args.quiet {
        print_ingest_report(&report, &args.output);
    }

    Ok(())
}

/// Parse a local directory of profile dataset files
async fn run_process(args: ProcessArgs, cancel: CancellationToken) -> Result<()> {
    setup_logging(args.get_log_level(), args.quiet);

    info!("Starting local profile batch processing");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let config = args.to_config()?;

    let files = discover_profile_files(&args.input)?;
    if files.is_empty() {
        return Err(Error::configuration(format!(
            "no profile files found in input directory: {}",
            args.input.display()
        )));
    }
    info!(files = files.len(), "discovered profile files");

    let batch = process_batch(
        Arc::new(JsonDatasetOpener::new()),
        Arc::new(config),
        files,
        &cancel,
    )
    .await?;

    let mut stored = None;
    if let Some(output) = &args.output {
        let store = JsonFileStore::open(output)?;
        let outcome = store.store_profiles(&batch.successful_profiles).await?;
        info!(
            stored = outcome.stored,
            skipped = outcome.skipped_duplicates,
            output = %output.display(),
            "profiles written"
        );
        stored = Some(outcome);
    }

    if !args.quiet {
        println!("\n{}", "Processing Summary".bright_green().bold());
        println!(
            "  Files parsed:       {}",
            batch.summary().bright_white().bold()
        );
        if !batch.failed_files.is_empty() {
            println!(
                "  Failed files:       {}",
                batch.failed_files.len().to_string().bright_red().bold()
            );
            for file in &batch.failed_files {
                println!("    {}", file.red());
            }
        }
        if let Some(outcome) = &stored {
            println!(
                "  Profiles stored:    {} ({} duplicates skipped)",
                outcome.stored.to_string().bright_white().bold(),
                outcome.skipped_duplicates
            );
        }
    }

    Ok(())
}

/// Collect profile dataset files from a directory, sorted by name
///
/// Only regular files with a `.json` extension are considered; anything
/// else in the directory (indexes, partial downloads) is ignored.
pub fn discover_profile_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Spinner for long-running pipeline stages of unknown length
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Print the final ingestion report to stdout
fn print_ingest_report(report: &IngestionReport, output: &Path) {
    println!("\n{}", "Ingestion Summary".bright_green().bold());
    println!(
        "  Catalog entries:    {}",
        report.catalog_entries.to_string().bright_white().bold()
    );
    println!(
        "  Selected profiles:  {}",
        report.selected_entries.to_string().bright_white().bold()
    );
    println!(
        "  Files downloaded:   {}",
        report.downloaded_files.to_string().bright_white().bold()
    );
    println!(
        "  Profiles parsed:    {} ({:.1}% success)",
        report.parsed_profiles.to_string().bright_white().bold(),
        report.success_rate * 100.0
    );
    if !report.failed_files.is_empty() {
        println!(
            "  Failed files:       {}",
            report.failed_files.len().to_string().bright_red().bold()
        );
    }
    println!(
        "  Profiles stored:    {} ({} duplicates skipped)",
        report.stored.to_string().bright_white().bold(),
        report.skipped_duplicates
    );
    println!(
        "  Profiles indexed:   {}",
        report.indexed.to_string().bright_white().bold()
    );
    println!(
        "  Elapsed:            {}",
        format!("{:.2}s", report.elapsed_seconds).bright_white().bold()
    );
    println!("  Output:             {}", output.display());
}

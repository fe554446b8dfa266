use argo_processor::cli::{args::Args, commands};
use clap::Parser;
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Create cancellation token for coordinating graceful shutdown
        let cancellation_token = CancellationToken::new();

        // Set up graceful shutdown handling
        let shutdown_signal = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install CTRL+C signal handler");

            // Cancel all operations when Ctrl+C is received
            cancellation_token.cancel();
        };

        // Run the main command with cancellation support
        tokio::select! {
            result = commands::run(args, cancellation_token.clone()) => {
                result
            }
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                Err(argo_processor::Error::processing_interrupted(
                    "Processing interrupted by user".to_string()
                ))
            }
        }
    });

    match result {
        Ok(()) => {
            // Success - the report has already been printed by the command
            process::exit(0);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Argo Processor - Ocean Float Profile Ingestion");
    println!("==============================================");
    println!();
    println!("Ingest Argo float profile data from the global data assembly centre");
    println!("into normalized, quality-controlled profile records with derived");
    println!("oceanographic parameters and indexable text summaries.");
    println!();
    println!("USAGE:");
    println!("    argo-processor <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    ingest      Run the complete remote ingestion pipeline (main command)");
    println!("    process     Parse a local directory of already-acquired profile files");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Ingest the most recent five years of Indian Ocean profiles:");
    println!("    argo-processor ingest");
    println!();
    println!("    # Ingest a specific window with custom limits:");
    println!("    argo-processor ingest --start-date 2023-01-01 --end-date 2023-12-31 \\");
    println!("                          --max-profiles 500 --output ./data/profiles.jsonl");
    println!();
    println!("    # Parse already-downloaded profile files:");
    println!("    argo-processor process --input ./data/raw --output ./data/profiles.jsonl");
    println!();
    println!("For detailed help on any command, use:");
    println!("    argo-processor <COMMAND> --help");
}

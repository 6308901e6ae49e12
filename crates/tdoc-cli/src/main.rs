//! # tdoc CLI entry point
//!
//! Parses command-line arguments, sets up logging and dispatches to the
//! subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tdoc_cli::mrz::{run_mrz, MrzArgs};
use tdoc_cli::parse::{run_parse, ParseArgs};
use tdoc_cli::seal::{run_seal, SealArgs};

/// Travel document toolkit.
///
/// Composes and verifies ICAO 9303 machine-readable zones and encodes or
/// decodes visa Visible Digital Seals.
#[derive(Parser, Debug)]
#[command(name = "tdoc", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit log lines as JSON.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compose MRZ lines from a document file.
    Mrz(MrzArgs),

    /// Parse and verify MRZ text.
    Parse(ParseArgs),

    /// Encode or decode a visa seal.
    Seal(SealArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!("tdoc CLI starting");

    let result = match cli.command {
        Commands::Mrz(args) => run_mrz(&args),
        Commands::Parse(args) => run_parse(&args),
        Commands::Seal(args) => run_seal(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

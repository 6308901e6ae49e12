//! # Mrz Subcommand
//!
//! Compose the MRZ lines of a document file and print them one per line.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use crate::document_file::DocumentFile;

/// Arguments for the `tdoc mrz` subcommand.
#[derive(Args, Debug)]
pub struct MrzArgs {
    /// YAML or JSON document file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

/// Execute the mrz subcommand.
pub fn run_mrz(args: &MrzArgs) -> Result<u8> {
    if !args.file.exists() {
        bail!("document file not found: {}", args.file.display());
    }
    match render_mrz(&args.file) {
        Ok(text) => {
            println!("{text}");
            Ok(0)
        }
        Err(e) => {
            eprintln!("FAIL: {e:#}");
            Ok(1)
        }
    }
}

/// Read `path` and return the MRZ lines joined by newlines.
pub fn render_mrz(path: &std::path::Path) -> Result<String> {
    let file: DocumentFile = crate::read_yaml(path)?;
    let mrz = file.compose()?;
    tracing::info!(size = %mrz.size(), "composed MRZ");
    Ok(mrz.to_string())
}

//! # tdoc-cli: Travel Document Command-Line Interface
//!
//! Provides the `tdoc` command-line interface over the MRZ and seal crates.
//!
//! ## Subcommands
//!
//! - `tdoc mrz <FILE>`: compose MRZ lines from a YAML or JSON document file.
//! - `tdoc parse --size <SIZE> <MRZ>`: parse and verify MRZ text, print JSON.
//! - `tdoc seal encode <FILE>`: build a visa seal, print hex and Base45.
//! - `tdoc seal decode <BASE45>`: decode a visa seal payload, print JSON.
//!
//! ```bash
//! tdoc mrz passport.yaml
//! tdoc parse --size td3 "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<
//! L898902C36UTO7408122F1204159ZE184226B<<<<<10"
//! tdoc seal encode visa.yaml --profile issuer.yaml --stub-signature
//! ```
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs` and the `*Args` structs.
//! - Handlers return an exit code and delegate to the domain crates.
//! - Output is produced by `render_*` functions so it can be tested.

pub mod document_file;
pub mod mrz;
pub mod parse;
pub mod seal;

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Read a YAML or JSON file. JSON is parsed by the YAML reader.
pub fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_yaml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

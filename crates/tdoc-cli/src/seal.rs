//! # Seal Subcommand
//!
//! Build visa seals from document files and decode barcode payloads.
//!
//! `encode` prints the unsigned seal and signed seal as hex followed by the
//! Base45 barcode payload. Without `--stub-signature` the signature is the
//! zero placeholder of the profile's signature length.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde_json::json;

use tdoc_codec::hex_util;
use tdoc_seal::{IssuerProfile, StubSigner};
use tdoc_visa::VisaDocument;

use crate::document_file::DocumentFile;

/// Arguments for the `tdoc seal` subcommand.
#[derive(Args, Debug)]
pub struct SealArgs {
    /// What to do with the seal.
    #[command(subcommand)]
    pub command: SealCommand,
}

/// Seal subcommands.
#[derive(Subcommand, Debug)]
pub enum SealCommand {
    /// Build a visa seal from a document file.
    Encode {
        /// YAML or JSON visa document file.
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Issuer profile (YAML). The specimen issuer is used when absent.
        #[arg(long)]
        profile: Option<PathBuf>,
        /// Fill the signature with random bytes.
        #[arg(long)]
        stub_signature: bool,
    },

    /// Decode a Base45 barcode payload.
    Decode {
        /// Base45 text of a signed seal.
        #[arg(value_name = "BASE45")]
        payload: String,
    },
}

/// Execute the seal subcommand.
pub fn run_seal(args: &SealArgs) -> Result<u8> {
    match &args.command {
        SealCommand::Encode {
            file,
            profile,
            stub_signature,
        } => {
            if !file.exists() {
                bail!("document file not found: {}", file.display());
            }
            let profile = load_profile(profile.as_deref())?;
            let today = chrono::Local::now().date_naive();
            println!("{}", render_encode(file, &profile, today, *stub_signature)?);
            Ok(0)
        }
        SealCommand::Decode { payload } => match render_decode(payload) {
            Ok(json) => {
                println!("{json}");
                Ok(0)
            }
            Err(e) => {
                eprintln!("FAIL: {e:#}");
                Ok(1)
            }
        },
    }
}

/// Load and validate an issuer profile, or the specimen issuer.
pub fn load_profile(path: Option<&Path>) -> Result<IssuerProfile> {
    let Some(path) = path else {
        return Ok(IssuerProfile::default());
    };
    let profile: IssuerProfile = crate::read_yaml(path)?;
    profile.validate()?;
    tracing::info!(
        authority = %profile.authority_code,
        signer = %profile.identifier_code,
        "loaded issuer profile"
    );
    Ok(profile)
}

/// Build the seal for the visa in `file`.
pub fn render_encode(
    file: &Path,
    profile: &IssuerProfile,
    today: NaiveDate,
    stub_signature: bool,
) -> Result<String> {
    let document: DocumentFile = crate::read_yaml(file)?;
    let mut visa = document.visa_document(profile, today)?;
    if stub_signature {
        visa.sign_with(&StubSigner::new(profile.signature_length))?;
    }
    let seal = visa.seal();
    Ok(format!(
        "unsigned: {}\nsigned:   {}\nbase45:   {}",
        hex_util::encode_upper(&seal.unsigned_seal()?),
        hex_util::encode_upper(&seal.signed_seal()?),
        seal.barcode_payload()?
    ))
}

/// Decode a barcode payload into pretty JSON of the header and the visa.
pub fn render_decode(payload: &str) -> Result<String> {
    let visa = VisaDocument::from_barcode_payload(payload.trim())?;
    let seal = visa.seal();
    let value = json!({
        "header": seal.header(),
        "features": seal.features().tags(),
        "signature": hex_util::encode_upper(seal.signature_data()),
        "mrz": visa.machine_readable_zone()?,
        "visa": visa,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

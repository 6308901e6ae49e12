//! # tdoc-seal: Visible Digital Seals
//!
//! ICAO 9303 Part 13 seals: a C40-packed header, a TLV message zone of
//! features, and a signature zone, Base45-encoded for the barcode.
//!
//! ## Key Design Principles
//!
//! 1. **Insertion order is layout.** [`FeatureMap`] is an ordered vector;
//!    the message zone bytes follow the order features were first set.
//!
//! 2. **Decode whole, then assign.** Zone setters on [`DigitalSeal`] build a
//!    complete candidate before replacing anything.
//!
//! 3. **Signing is pluggable.** [`SealSigner`] separates the byte layout
//!    from the signature scheme; only stub signers ship here.
//!
//! ## Crate Policy
//!
//! - Depends on `tdoc-core` and `tdoc-codec`; knows nothing about MRZ
//!   layouts. Visa-specific assembly lives in `tdoc-visa`.
//! - No I/O. Configuration arrives as an already-parsed [`IssuerProfile`].

pub mod features;
pub mod header;
pub mod profile;
pub mod seal;
pub mod signer;
pub mod visa_features;

pub use features::FeatureMap;
pub use header::{SealHeader, SignerIdentifier, VdsVersion};
pub use profile::IssuerProfile;
pub use seal::DigitalSeal;
pub use signer::{SealSigner, StubSigner, ZeroSigner};
pub use visa_features::DurationOfStay;

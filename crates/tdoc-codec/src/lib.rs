//! # tdoc-codec: Byte Codecs for Visible Digital Seals
//!
//! Stateless encoders and decoders sitting between the typed document
//! model and the bytes of a seal or barcode.
//!
//! | Module | Format |
//! |--------|--------|
//! | [`tlv`] | DER definite lengths, TLV entries, signature zone |
//! | [`c40`] | ICAO 9303 Part 13 C40 text packing |
//! | [`base45`] | RFC 9285 Base45 barcode text |
//! | [`hex_util`] | Upper-case hex |
//!
//! ## Crate Policy
//!
//! - Depends only on `tdoc-core` for its error type.
//! - Every decoder returns `Result<_, FormatError>` and never panics on
//!   malformed input.
//! - No I/O and no logging: callers decide what is worth reporting.

pub mod base45;
pub mod c40;
pub mod hex_util;
pub mod tlv;

pub use tlv::{TlvEntry, SIGNATURE_MARKER};

//! # tdoc-visa: Sealed Machine-Readable Visas
//!
//! Binds the MRV-A and MRV-B layouts from `tdoc-mrz` to the Visible Digital
//! Seal from `tdoc-seal`. A [`VisaDocument`] holds the fields and the seal
//! and keeps them consistent both ways:
//!
//! - Field setters re-derive the seal's MRZ feature ([`derive_seal_feature`]).
//! - Seal setters decode the MRZ feature, verify its check digits and
//!   replace the fields ([`derive_fields`]).
//!
//! ## Crate Policy
//!
//! - Synchronisation is explicit: every mutation entry point calls the sync
//!   functions itself. There are no observers or callbacks.
//! - Failed mutations leave the document untouched.

pub mod document;
pub mod sync;

pub use document::VisaDocument;
pub use sync::{derive_fields, derive_seal_feature, VisaSize};

#![deny(missing_docs)]
//! # tdoc-core: Foundational Types for Travel Documents
//!
//! This crate is the leaf of the travel document workspace. It defines the
//! validated identity fields every ICAO 9303 document carries and the pure
//! text projections used to build Machine-Readable Zones.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for document fields.** `TypeCode`, `AuthorityCode`,
//!    `NationalityCode`, `DocumentNumber`, `GenderMarker`, `OptionalData`:
//!    all validated at construction. No bare strings for codes.
//!
//! 2. **Validate, then assign.** `CoreFields` setters never leave a field
//!    half-updated: a rejected value keeps the previous one.
//!
//! 3. **Projections are functions, not state.** MRZ (`mrz_text`) and VIZ
//!    (`viz`) renderings are computed from the stored values on demand.
//!
//! 4. **Fixed-width output always.** Overlong free text is truncated with a
//!    `tracing` warning instead of failing.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `tdoc-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod check_digit;
pub mod core_fields;
pub mod error;
pub mod fields;
pub mod mrz_text;
pub mod viz;

// Re-export primary types for ergonomic imports.
pub use core_fields::CoreFields;
pub use error::{ErrorClass, FormatError, TdocError, ValidationError};
pub use fields::{
    AuthorityCode, DocumentNumber, FullName, GenderMarker, NationalityCode, OptionalData, TypeCode,
};

//! # tdoc-mrz: Machine-Readable Zone Composition and Parsing
//!
//! Bidirectional mapping between [`CoreFields`](tdoc_core::CoreFields) plus
//! size-specific fields and the fixed-width MRZ lines of each ICAO 9303
//! document size.
//!
//! ## Key Design Principles
//!
//! 1. **One composer per size.** [`td1`], [`td2`], [`td3`] and [`mrv`] are
//!    free functions over `&CoreFields`; documents embed the field set by
//!    value instead of inheriting behavior.
//!
//! 2. **Verify, then build.** Parsers recompute every embedded check digit
//!    before constructing a single field. A mismatch names the field and
//!    the slice that failed.
//!
//! 3. **Width is checked twice.** [`Mrz::new`] rejects wrong line counts
//!    and lengths on both the compose and the parse path.
//!
//! ## Crate Policy
//!
//! - Depends on `tdoc-core` only.
//! - No I/O. Truncation warnings go through `tracing`.

pub mod document;
pub mod layout;
pub mod mrv;
pub mod td1;
pub mod td2;
pub mod td3;
pub mod visa_fields;

pub use document::{CrewCertificate, Td1Document, Td2Document, Td3Document, TravelDocument};
pub use layout::{DocumentSize, Mrz, ParsedMrz};
pub use visa_fields::{NumberOfEntries, VisaFields};

use tdoc_core::FormatError;

/// Parse and verify `mrz` according to its size.
pub fn parse(mrz: &Mrz) -> Result<ParsedMrz, FormatError> {
    match mrz.size() {
        DocumentSize::Td1 => td1::parse(mrz),
        DocumentSize::Td2 => td2::parse(mrz),
        DocumentSize::Td3 => td3::parse(mrz),
        DocumentSize::MrvA => mrv::parse_a(mrz),
        DocumentSize::MrvB => mrv::parse_b(mrz),
    }
}

//! # Core Identity Fields
//!
//! [`CoreFields`] is the validated property bag shared by every document
//! size. Size-specific documents embed it by value and pass `&CoreFields` to
//! their MRZ composers.
//!
//! ## Invariant
//!
//! Every setter validates before it assigns. A rejected value leaves the
//! field exactly as it was, so no partially-updated state is observable.
//! MRZ and VIZ projections are derived on demand and never stored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::fields::{
    parse_date, AuthorityCode, DocumentNumber, FullName, GenderMarker, NationalityCode, TypeCode,
};
use crate::mrz_text::{self, YearWindow};
use crate::viz;

/// Dates outside the two-digit window are stored as given but come back
/// from the MRZ in another century.
fn warn_unless_representable(field: &'static str, date: NaiveDate, window: YearWindow) {
    if !mrz_text::date_is_mrz_representable(date, window) {
        tracing::warn!(field, %date, "date does not survive a two-digit MRZ year");
    }
}

/// Identity fields common to all travel document sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreFields {
    type_code: TypeCode,
    authority_code: AuthorityCode,
    number: DocumentNumber,
    full_name: FullName,
    nationality_code: NationalityCode,
    birth_date: NaiveDate,
    gender_marker: GenderMarker,
    expiration_date: NaiveDate,
}

impl CoreFields {
    /// Create a field set for a document of the given type code.
    ///
    /// Authority and nationality start as `UTO` (the ICAO specimen state),
    /// name and number start empty. The birth date starts at 1970-01-01 and
    /// the expiration date at 2000-01-01, so a blank document survives an
    /// MRZ round trip.
    pub fn new(type_code: TypeCode) -> Self {
        Self {
            type_code,
            authority_code: AuthorityCode(String::from("UTO")),
            number: DocumentNumber::default(),
            full_name: FullName::default(),
            nationality_code: NationalityCode(String::from("UTO")),
            birth_date: NaiveDate::default(),
            gender_marker: GenderMarker::X,
            expiration_date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default(),
        }
    }

    /// Assemble a field set from already-validated parts.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        type_code: TypeCode,
        authority_code: AuthorityCode,
        number: DocumentNumber,
        full_name: FullName,
        nationality_code: NationalityCode,
        birth_date: NaiveDate,
        gender_marker: GenderMarker,
        expiration_date: NaiveDate,
    ) -> Self {
        Self {
            type_code,
            authority_code,
            number,
            full_name,
            nationality_code,
            birth_date,
            gender_marker,
            expiration_date,
        }
    }

    // -- getters ------------------------------------------------------------

    /// Document type code.
    pub fn type_code(&self) -> &TypeCode {
        &self.type_code
    }

    /// Issuing state or organization.
    pub fn authority_code(&self) -> &AuthorityCode {
        &self.authority_code
    }

    /// Document number.
    pub fn number(&self) -> &DocumentNumber {
        &self.number
    }

    /// Holder name as entered.
    pub fn full_name(&self) -> &FullName {
        &self.full_name
    }

    /// Holder nationality.
    pub fn nationality_code(&self) -> &NationalityCode {
        &self.nationality_code
    }

    /// Date of birth.
    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    /// Sex marker.
    pub fn gender_marker(&self) -> GenderMarker {
        self.gender_marker
    }

    /// Date of expiry (visas: valid-until date).
    pub fn expiration_date(&self) -> NaiveDate {
        self.expiration_date
    }

    // -- setters ------------------------------------------------------------

    /// Assign the type code.
    pub fn set_type_code(&mut self, value: &str) -> Result<(), ValidationError> {
        self.type_code = TypeCode::new(value)?;
        Ok(())
    }

    /// Assign the issuing authority.
    pub fn set_authority_code(&mut self, value: &str) -> Result<(), ValidationError> {
        self.authority_code = AuthorityCode::new(value)?;
        Ok(())
    }

    /// Assign the document number.
    pub fn set_number(&mut self, value: &str) -> Result<(), ValidationError> {
        self.number = DocumentNumber::new(value)?;
        Ok(())
    }

    /// Assign the holder name. Free text never fails.
    pub fn set_full_name(&mut self, value: &str) {
        self.full_name = FullName::new(value);
    }

    /// Assign the nationality.
    pub fn set_nationality_code(&mut self, value: &str) -> Result<(), ValidationError> {
        self.nationality_code = NationalityCode::new(value)?;
        Ok(())
    }

    /// Assign the birth date from an ISO `YYYY-MM-DD` string.
    pub fn set_birth_date(&mut self, value: &str) -> Result<(), ValidationError> {
        let date = parse_date("birthDate", value)?;
        self.set_birth_date_value(date);
        Ok(())
    }

    /// Assign the birth date.
    pub fn set_birth_date_value(&mut self, date: NaiveDate) {
        warn_unless_representable("birthDate", date, YearWindow::Birth);
        self.birth_date = date;
    }

    /// Assign the sex marker from `F`, `M` or `X`.
    pub fn set_gender_marker(&mut self, value: &str) -> Result<(), ValidationError> {
        self.gender_marker = GenderMarker::parse(value)?;
        Ok(())
    }

    /// Assign the sex marker.
    pub fn set_gender_marker_value(&mut self, marker: GenderMarker) {
        self.gender_marker = marker;
    }

    /// Assign the expiration date from an ISO `YYYY-MM-DD` string.
    pub fn set_expiration_date(&mut self, value: &str) -> Result<(), ValidationError> {
        let date = parse_date("expirationDate", value)?;
        self.set_expiration_date_value(date);
        Ok(())
    }

    /// Assign the expiration date.
    pub fn set_expiration_date_value(&mut self, date: NaiveDate) {
        warn_unless_representable("expirationDate", date, YearWindow::Validity);
        self.expiration_date = date;
    }

    // -- MRZ projections ----------------------------------------------------

    /// Type code padded to two characters.
    pub fn type_code_mrz(&self) -> String {
        self.type_code.to_mrz()
    }

    /// Authority code (already three characters).
    pub fn authority_code_mrz(&self) -> String {
        self.authority_code.as_str().to_string()
    }

    /// Document number padded to nine characters.
    pub fn number_mrz(&self) -> String {
        self.number.to_mrz()
    }

    /// Name field of `width` characters.
    pub fn full_name_mrz(&self, width: usize) -> String {
        self.full_name.to_mrz(width)
    }

    /// Nationality (already three characters).
    pub fn nationality_code_mrz(&self) -> String {
        self.nationality_code.as_str().to_string()
    }

    /// Birth date as `YYMMDD`.
    pub fn birth_date_mrz(&self) -> String {
        mrz_text::date_to_mrz(self.birth_date)
    }

    /// Sex marker character (`<` for `X`).
    pub fn gender_marker_mrz(&self) -> char {
        self.gender_marker.to_mrz()
    }

    /// Expiration date as `YYMMDD`.
    pub fn expiration_date_mrz(&self) -> String {
        mrz_text::date_to_mrz(self.expiration_date)
    }

    // -- VIZ projections ----------------------------------------------------

    /// Type code for display.
    pub fn type_code_viz(&self) -> String {
        viz::text_to_viz(self.type_code.as_str())
    }

    /// Authority code for display.
    pub fn authority_code_viz(&self) -> String {
        viz::text_to_viz(self.authority_code.as_str())
    }

    /// Document number for display.
    pub fn number_viz(&self) -> String {
        viz::text_to_viz(self.number.as_str())
    }

    /// Holder name for display.
    pub fn full_name_viz(&self) -> String {
        self.full_name.to_viz()
    }

    /// Nationality for display.
    pub fn nationality_code_viz(&self) -> String {
        viz::text_to_viz(self.nationality_code.as_str())
    }

    /// Birth date as `DD MMM YYYY`.
    pub fn birth_date_viz(&self) -> String {
        viz::date_to_viz(self.birth_date)
    }

    /// Sex marker for display.
    pub fn gender_marker_viz(&self) -> String {
        self.gender_marker.as_str().to_string()
    }

    /// Expiration date as `DD MMM YYYY`.
    pub fn expiration_date_viz(&self) -> String {
        viz::date_to_viz(self.expiration_date)
    }
}

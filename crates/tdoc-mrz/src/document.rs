//! # Size-Specific Documents
//!
//! Each document embeds [`CoreFields`] by value together with the fields
//! its size adds, and exposes the MRZ through the [`TravelDocument`] trait.
//!
//! ## Invariant
//!
//! [`TravelDocument::set_machine_readable_zone`] parses and verifies the
//! complete MRZ into a fresh value before anything is assigned. A check
//! digit failure leaves the document untouched.

use serde::{Deserialize, Serialize};
use tdoc_core::{CoreFields, FormatError, OptionalData, TypeCode, ValidationError};

use crate::layout::{DocumentSize, Mrz, ParsedMrz, TD1_OPTIONAL_DATA_2_WIDTH};
use crate::{td1, td2, td3};

/// Behavior shared by every non-visa document size.
pub trait TravelDocument {
    /// The document size.
    fn size(&self) -> DocumentSize;

    /// Identity fields.
    fn core(&self) -> &CoreFields;

    /// Mutable identity fields.
    fn core_mut(&mut self) -> &mut CoreFields;

    /// Compose the MRZ from the current fields.
    fn mrz(&self) -> Result<Mrz, FormatError>;

    /// Replace the fields with those of a verified parse.
    fn apply(&mut self, parsed: ParsedMrz);

    /// Parse `mrz` as this document's size.
    fn parse(&self, mrz: &Mrz) -> Result<ParsedMrz, FormatError>;

    /// MRZ line `n`, 1-based.
    fn mrz_line(&self, n: usize) -> Result<String, FormatError> {
        let mrz = self.mrz()?;
        mrz.line(n).map(str::to_string).ok_or(FormatError::LineCount {
            expected: self.size().line_count(),
            actual: n,
        })
    }

    /// All MRZ lines concatenated.
    fn machine_readable_zone(&self) -> Result<String, FormatError> {
        Ok(self.mrz()?.concatenated())
    }

    /// Parse MRZ text (newline separated or concatenated) and, once every
    /// check digit verifies, replace the document's fields.
    fn set_machine_readable_zone(&mut self, text: &str) -> Result<(), FormatError> {
        let mrz = Mrz::from_text(self.size(), text)?;
        let parsed = self.parse(&mrz)?;
        self.apply(parsed);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TD3
// ---------------------------------------------------------------------------

/// Passport booklet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Td3Document {
    core: CoreFields,
    optional_data: OptionalData,
}

impl Td3Document {
    /// A blank passport with type code `P`.
    pub fn new() -> Self {
        Self::with_type(TypeCode::passport())
    }

    /// A blank TD3 document of `type_code`.
    pub fn with_type(type_code: TypeCode) -> Self {
        Self {
            core: CoreFields::new(type_code),
            optional_data: OptionalData::default(),
        }
    }

    /// Personal number or other optional data.
    pub fn optional_data(&self) -> &OptionalData {
        &self.optional_data
    }

    /// Assign optional data (at most 14 characters after normalization).
    pub fn set_optional_data(&mut self, value: &str) -> Result<(), ValidationError> {
        self.optional_data = OptionalData::new(value, DocumentSize::Td3.optional_data_width())?;
        Ok(())
    }

    /// Optional data for display.
    pub fn optional_data_viz(&self) -> String {
        self.optional_data.to_viz()
    }
}

impl Default for Td3Document {
    fn default() -> Self {
        Self::new()
    }
}

impl TravelDocument for Td3Document {
    fn size(&self) -> DocumentSize {
        DocumentSize::Td3
    }
    fn core(&self) -> &CoreFields {
        &self.core
    }
    fn core_mut(&mut self) -> &mut CoreFields {
        &mut self.core
    }
    fn mrz(&self) -> Result<Mrz, FormatError> {
        td3::compose(&self.core, &self.optional_data)
    }
    fn apply(&mut self, parsed: ParsedMrz) {
        self.core = parsed.core;
        self.optional_data = parsed.optional_data;
    }
    fn parse(&self, mrz: &Mrz) -> Result<ParsedMrz, FormatError> {
        td3::parse(mrz)
    }
}

// ---------------------------------------------------------------------------
// TD2
// ---------------------------------------------------------------------------

/// TD2 identity document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Td2Document {
    core: CoreFields,
    optional_data: OptionalData,
}

impl Td2Document {
    /// A blank TD2 document with type code `I`.
    pub fn new() -> Self {
        Self::with_type(TypeCode::identity_card())
    }

    /// A blank TD2 document of `type_code`.
    pub fn with_type(type_code: TypeCode) -> Self {
        Self {
            core: CoreFields::new(type_code),
            optional_data: OptionalData::default(),
        }
    }

    /// Optional data from line 2.
    pub fn optional_data(&self) -> &OptionalData {
        &self.optional_data
    }

    /// Assign optional data (at most 7 characters).
    pub fn set_optional_data(&mut self, value: &str) -> Result<(), ValidationError> {
        self.optional_data = OptionalData::new(value, DocumentSize::Td2.optional_data_width())?;
        Ok(())
    }

    /// Optional data for the VIZ.
    pub fn optional_data_viz(&self) -> String {
        self.optional_data.to_viz()
    }
}

impl Default for Td2Document {
    fn default() -> Self {
        Self::new()
    }
}

impl TravelDocument for Td2Document {
    fn size(&self) -> DocumentSize {
        DocumentSize::Td2
    }
    fn core(&self) -> &CoreFields {
        &self.core
    }
    fn core_mut(&mut self) -> &mut CoreFields {
        &mut self.core
    }
    fn mrz(&self) -> Result<Mrz, FormatError> {
        td2::compose(&self.core, &self.optional_data)
    }
    fn apply(&mut self, parsed: ParsedMrz) {
        self.core = parsed.core;
        self.optional_data = parsed.optional_data;
    }
    fn parse(&self, mrz: &Mrz) -> Result<ParsedMrz, FormatError> {
        td2::parse(mrz)
    }
}

// ---------------------------------------------------------------------------
// TD1
// ---------------------------------------------------------------------------

/// ID card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Td1Document {
    core: CoreFields,
    optional_data: OptionalData,
    optional_data_2: OptionalData,
}

impl Td1Document {
    /// A blank ID card with type code `I`.
    pub fn new() -> Self {
        Self::with_type(TypeCode::identity_card())
    }

    /// A blank TD1 document of `type_code`.
    pub fn with_type(type_code: TypeCode) -> Self {
        Self {
            core: CoreFields::new(type_code),
            optional_data: OptionalData::default(),
            optional_data_2: OptionalData::default(),
        }
    }

    /// Line 1 optional data.
    pub fn optional_data(&self) -> &OptionalData {
        &self.optional_data
    }

    /// Line 2 optional data.
    pub fn optional_data_2(&self) -> &OptionalData {
        &self.optional_data_2
    }

    /// Assign line 1 optional data (at most 15 characters).
    pub fn set_optional_data(&mut self, value: &str) -> Result<(), ValidationError> {
        self.optional_data = OptionalData::new(value, DocumentSize::Td1.optional_data_width())?;
        Ok(())
    }

    /// Assign line 2 optional data (at most 11 characters).
    pub fn set_optional_data_2(&mut self, value: &str) -> Result<(), ValidationError> {
        self.optional_data_2 = OptionalData::new(value, TD1_OPTIONAL_DATA_2_WIDTH)?;
        Ok(())
    }

    /// Optional data for the VIZ.
    pub fn optional_data_viz(&self) -> String {
        self.optional_data.to_viz()
    }

    /// Line 2 optional data for the VIZ.
    pub fn optional_data_2_viz(&self) -> String {
        self.optional_data_2.to_viz()
    }
}

impl Default for Td1Document {
    fn default() -> Self {
        Self::new()
    }
}

impl TravelDocument for Td1Document {
    fn size(&self) -> DocumentSize {
        DocumentSize::Td1
    }
    fn core(&self) -> &CoreFields {
        &self.core
    }
    fn core_mut(&mut self) -> &mut CoreFields {
        &mut self.core
    }
    fn mrz(&self) -> Result<Mrz, FormatError> {
        td1::compose(&self.core, &self.optional_data, &self.optional_data_2)
    }
    fn apply(&mut self, parsed: ParsedMrz) {
        self.core = parsed.core;
        self.optional_data = parsed.optional_data;
        self.optional_data_2 = parsed.optional_data_2;
    }
    fn parse(&self, mrz: &Mrz) -> Result<ParsedMrz, FormatError> {
        td1::parse(mrz)
    }
}

// ---------------------------------------------------------------------------
// Crew member certificate
// ---------------------------------------------------------------------------

/// Crew member certificate: a TD1 card of type `AC` with employer,
/// occupation and the issuer's declaration printed in the visual zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewCertificate {
    #[serde(flatten)]
    card: Td1Document,
    employer: String,
    occupation: String,
    declaration: String,
}

impl CrewCertificate {
    /// A blank certificate with type code `AC`.
    pub fn new() -> Self {
        Self {
            card: Td1Document::with_type(TypeCode::crew_member()),
            employer: String::new(),
            occupation: String::new(),
            declaration: String::new(),
        }
    }

    /// The underlying TD1 card.
    pub fn card(&self) -> &Td1Document {
        &self.card
    }

    /// Mutable access to the underlying TD1 card.
    pub fn card_mut(&mut self) -> &mut Td1Document {
        &mut self.card
    }

    /// Employer name, as entered.
    pub fn employer(&self) -> &str {
        &self.employer
    }

    /// Occupation, as entered.
    pub fn occupation(&self) -> &str {
        &self.occupation
    }

    /// Declaration text, as entered.
    pub fn declaration(&self) -> &str {
        &self.declaration
    }

    /// Assign the employer. Surrounding whitespace is removed.
    pub fn set_employer(&mut self, value: &str) {
        self.employer = value.trim().to_string();
    }

    /// Assign the occupation.
    pub fn set_occupation(&mut self, value: &str) {
        self.occupation = value.trim().to_string();
    }

    /// Assign the declaration.
    pub fn set_declaration(&mut self, value: &str) {
        self.declaration = value.trim().to_string();
    }

    /// Employer for the VIZ.
    pub fn employer_viz(&self) -> String {
        tdoc_core::viz::text_to_viz(&self.employer)
    }

    /// Occupation for the VIZ.
    pub fn occupation_viz(&self) -> String {
        tdoc_core::viz::text_to_viz(&self.occupation)
    }

    /// The declaration is printed as entered.
    pub fn declaration_viz(&self) -> String {
        self.declaration.clone()
    }
}

impl Default for CrewCertificate {
    fn default() -> Self {
        Self::new()
    }
}

impl TravelDocument for CrewCertificate {
    fn size(&self) -> DocumentSize {
        DocumentSize::Td1
    }
    fn core(&self) -> &CoreFields {
        self.card.core()
    }
    fn core_mut(&mut self) -> &mut CoreFields {
        self.card.core_mut()
    }
    fn mrz(&self) -> Result<Mrz, FormatError> {
        self.card.mrz()
    }
    fn apply(&mut self, parsed: ParsedMrz) {
        self.card.apply(parsed);
    }
    fn parse(&self, mrz: &Mrz) -> Result<ParsedMrz, FormatError> {
        self.card.parse(mrz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passport() -> Td3Document {
        let mut doc = Td3Document::new();
        let core = doc.core_mut();
        core.set_number("362142069").unwrap();
        core.set_full_name("ERIKSSON, ANNA MARIA");
        core.set_birth_date("1998-04-17").unwrap();
        core.set_gender_marker("F").unwrap();
        core.set_expiration_date("2033-08-23").unwrap();
        doc
    }

    #[test]
    fn passport_lines() {
        let doc = passport();
        assert_eq!(doc.mrz_line(1).unwrap().len(), 44);
        assert_eq!(doc.mrz_line(2).unwrap().len(), 44);
        assert!(doc.mrz_line(3).is_err());
        assert_eq!(doc.machine_readable_zone().unwrap().len(), 88);
    }

    #[test]
    fn set_mrz_replaces_fields() {
        let source = passport();
        let mut target = Td3Document::new();
        target
            .set_machine_readable_zone(&source.mrz().unwrap().to_string())
            .unwrap();
        assert_eq!(target, source);
    }

    #[test]
    fn failed_set_mrz_leaves_document_untouched() {
        let source = passport();
        let mut text = source.machine_readable_zone().unwrap();
        // Corrupt the birth date check digit (line 2, position 19).
        let pos = 44 + 19;
        let replacement = if &text[pos..=pos] == "0" { "1" } else { "0" };
        text.replace_range(pos..=pos, replacement);

        let mut target = Td3Document::new();
        target.core_mut().set_number("KEEPME").unwrap();
        let before = target.clone();
        let err = target.set_machine_readable_zone(&text).unwrap_err();
        assert!(matches!(err, FormatError::CheckDigitMismatch { field: "birthDate", .. }));
        assert_eq!(target, before);
    }

    #[test]
    fn td2_optional_data_limit() {
        let mut doc = Td2Document::new();
        assert!(doc.set_optional_data("1234567").is_ok());
        assert!(matches!(
            doc.set_optional_data("12345678"),
            Err(ValidationError::TooLong { max: 7, .. })
        ));
        assert_eq!(doc.optional_data().as_str(), "1234567");
    }

    #[test]
    fn crew_certificate_is_td1_ac() {
        let mut cert = CrewCertificate::new();
        cert.set_employer("Utopian Airways");
        cert.set_occupation("Pilot");
        cert.core_mut().set_number("CC1234567").unwrap();
        cert.core_mut().set_full_name("SMITH, JOHN");
        let mrz = cert.mrz().unwrap();
        assert!(mrz.line(1).unwrap().starts_with("ACUTOCC1234567"));
        assert_eq!(mrz.line(3).unwrap(), "SMITH<<JOHN<<<<<<<<<<<<<<<<<<<");
        assert_eq!(cert.employer_viz(), "UTOPIAN AIRWAYS");

        let mut copy = CrewCertificate::new();
        copy.set_machine_readable_zone(&cert.machine_readable_zone().unwrap())
            .unwrap();
        assert_eq!(copy.core(), cert.core());
    }

    #[test]
    fn td1_round_trip_through_text() {
        let mut card = Td1Document::new();
        card.core_mut().set_number("D23145890").unwrap();
        card.set_optional_data_2("ABC").unwrap();
        let text = card.mrz().unwrap().to_string();
        let mut back = Td1Document::new();
        back.set_machine_readable_zone(&text).unwrap();
        assert_eq!(back, card);
    }
}

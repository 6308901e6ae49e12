//! # Document Field Newtypes
//!
//! Domain-primitive newtypes for the identity fields shared by every
//! document size. Each value is validated at construction; there is no way
//! to hold an `AuthorityCode` of the wrong length.
//!
//! ## Validation
//!
//! | Type | Rule |
//! |------|------|
//! | [`TypeCode`] | 1-2 letters `A-Z` |
//! | [`AuthorityCode`] | exactly 3 of `A-Z<`, first a letter |
//! | [`NationalityCode`] | exactly 3 of `A-Z<`, first a letter |
//! | [`DocumentNumber`] | at most 9 of `A-Z0-9<` |
//! | [`GenderMarker`] | `F`, `M` or `X` |
//! | [`OptionalData`] | normalized, at most the document's width |
//!
//! Inputs are trimmed and uppercased before validation, so getters always
//! return the normalized stored value.
//!
//! ## Reference
//!
//! ICAO Doc 9303 Part 3 (common specifications), Part 4-7 (size layouts).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{FormatError, ValidationError};
use crate::mrz_text::{self, YearWindow, FILLER};
use crate::viz;

// ---------------------------------------------------------------------------
// Codes
// ---------------------------------------------------------------------------

/// Document type code (`P`, `I`, `AC`, `V`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TypeCode(String);

impl TypeCode {
    /// Create a type code, validating 1-2 letters.
    ///
    /// # Errors
    ///
    /// [`ValidationError::Empty`], [`ValidationError::TooLong`] or
    /// [`ValidationError::InvalidCharacters`].
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        let v = value.trim().to_uppercase();
        if v.is_empty() {
            return Err(ValidationError::Empty { field: "typeCode" });
        }
        if v.chars().count() > 2 {
            return Err(ValidationError::TooLong {
                field: "typeCode",
                max: 2,
                actual: v.chars().count(),
            });
        }
        if !v.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidCharacters {
                field: "typeCode",
                value: v,
                expected: "letters A-Z",
            });
        }
        Ok(Self(v))
    }

    /// `P`, passport.
    pub fn passport() -> Self {
        Self(String::from("P"))
    }

    /// `I`, identity card.
    pub fn identity_card() -> Self {
        Self(String::from("I"))
    }

    /// `V`, machine-readable visa.
    pub fn visa() -> Self {
        Self(String::from("V"))
    }

    /// `AC`, crew member certificate.
    pub fn crew_member() -> Self {
        Self(String::from("AC"))
    }

    /// Access the code.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// MRZ projection, padded to two characters.
    pub fn to_mrz(&self) -> String {
        mrz_text::pad(&self.0, 2)
    }

    /// Parse the two-character MRZ field.
    pub fn from_mrz(field: &str) -> Result<Self, ValidationError> {
        Self::new(field.trim_end_matches(FILLER))
    }
}

impl TryFrom<String> for TypeCode {
    type Error = ValidationError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<TypeCode> for String {
    fn from(value: TypeCode) -> Self {
        value.0
    }
}

impl std::fmt::Display for TypeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate a three-character state code (`UTO`, `D<<`).
fn validate_state_code(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let v = value.trim().to_uppercase();
    let len = v.chars().count();
    if len != 3 {
        return Err(ValidationError::WrongLength {
            field,
            expected: 3,
            actual: len,
        });
    }
    let mut chars = v.chars();
    let first_is_letter = chars.next().is_some_and(|c| c.is_ascii_uppercase());
    if !first_is_letter || !chars.all(|c| c.is_ascii_uppercase() || c == FILLER) {
        return Err(ValidationError::InvalidCharacters {
            field,
            value: v,
            expected: "three letters A-Z (trailing < allowed)",
        });
    }
    Ok(v)
}

/// Issuing state or organization (ISO 3166-1 alpha-3 or ICAO code).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AuthorityCode(pub(crate) String);

impl AuthorityCode {
    /// Create an authority code, validating exactly three characters.
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        validate_state_code("authorityCode", value).map(Self)
    }

    /// Access the code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AuthorityCode {
    type Error = ValidationError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<AuthorityCode> for String {
    fn from(value: AuthorityCode) -> Self {
        value.0
    }
}

impl std::fmt::Display for AuthorityCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Nationality of the holder (ISO 3166-1 alpha-3 or ICAO code).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NationalityCode(pub(crate) String);

impl NationalityCode {
    /// Create a nationality code, validating exactly three characters.
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        validate_state_code("nationalityCode", value).map(Self)
    }

    /// Access the code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NationalityCode {
    type Error = ValidationError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<NationalityCode> for String {
    fn from(value: NationalityCode) -> Self {
        value.0
    }
}

impl std::fmt::Display for NationalityCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Numbers and names
// ---------------------------------------------------------------------------

/// Maximum length of a document number in the MRZ number field.
pub const DOCUMENT_NUMBER_MAX: usize = 9;

/// Document number, at most nine characters of `A-Z0-9<`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentNumber(String);

impl DocumentNumber {
    /// Create a document number.
    ///
    /// `field` names the form input in errors (`number`, `passportNumber`).
    pub fn new_for(field: &'static str, value: &str) -> Result<Self, ValidationError> {
        let v = value.trim().to_uppercase();
        let len = v.chars().count();
        if len > DOCUMENT_NUMBER_MAX {
            return Err(ValidationError::TooLong {
                field,
                max: DOCUMENT_NUMBER_MAX,
                actual: len,
            });
        }
        if !v
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == FILLER)
        {
            return Err(ValidationError::InvalidCharacters {
                field,
                value: v,
                expected: "letters A-Z and digits 0-9",
            });
        }
        Ok(Self(v))
    }

    /// Create a document number for the `number` field.
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        Self::new_for("number", value)
    }

    /// Access the number.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when no number has been assigned.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// MRZ projection, padded to nine characters.
    pub fn to_mrz(&self) -> String {
        mrz_text::pad(&self.0, DOCUMENT_NUMBER_MAX)
    }
}

impl TryFrom<String> for DocumentNumber {
    type Error = ValidationError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<DocumentNumber> for String {
    fn from(value: DocumentNumber) -> Self {
        value.0
    }
}

impl std::fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Holder name as entered.
///
/// `", "` separates the primary identifier (surname) from the secondary
/// identifier (given names); `"/"` separates script variants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FullName(String);

impl FullName {
    /// Create a full name. Free text; only surrounding whitespace is removed.
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    /// Access the name as entered.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Script variants, primary first.
    pub fn variants(&self) -> Vec<&str> {
        self.0.split('/').map(str::trim).collect()
    }

    /// Primary identifier of the primary variant (text before `", "`).
    pub fn primary_identifier(&self) -> &str {
        let primary = self.variants().first().copied().unwrap_or_default();
        match primary.split_once(", ") {
            Some((surname, _)) => surname,
            None => primary,
        }
    }

    /// Secondary identifier of the primary variant, empty when absent.
    pub fn secondary_identifier(&self) -> &str {
        let primary = self.variants().first().copied().unwrap_or_default();
        primary.split_once(", ").map(|(_, given)| given).unwrap_or_default()
    }

    /// MRZ projection of `width` characters.
    pub fn to_mrz(&self, width: usize) -> String {
        mrz_text::name_to_mrz(&self.0, width)
    }

    /// VIZ projection.
    pub fn to_viz(&self) -> String {
        viz::text_to_viz(&self.0)
    }
}

impl std::fmt::Display for FullName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Gender marker
// ---------------------------------------------------------------------------

/// Sex of the holder as printed on the document.
///
/// `X` (unspecified) is written as the filler `<` in the MRZ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenderMarker {
    /// Female.
    F,
    /// Male.
    M,
    /// Unspecified.
    #[default]
    X,
}

impl GenderMarker {
    /// Parse a form value (`F`, `M`, `X`, case-insensitive; `<` means `X`).
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        match value.trim().to_uppercase().as_str() {
            "F" => Ok(Self::F),
            "M" => Ok(Self::M),
            "X" | "<" => Ok(Self::X),
            other => Err(ValidationError::InvalidCharacters {
                field: "genderMarker",
                value: other.to_string(),
                expected: "F, M or X",
            }),
        }
    }

    /// MRZ character.
    pub fn to_mrz(self) -> char {
        match self {
            Self::F => 'F',
            Self::M => 'M',
            Self::X => FILLER,
        }
    }

    /// Parse the MRZ character.
    pub fn from_mrz(c: char) -> Result<Self, ValidationError> {
        Self::parse(&c.to_string())
    }

    /// Display letter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::F => "F",
            Self::M => "M",
            Self::X => "X",
        }
    }
}

impl std::fmt::Display for GenderMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Optional data
// ---------------------------------------------------------------------------

/// Optional data field, normalized into the MRZ alphabet.
///
/// The permitted width depends on the document size (TD2: 7, MRV-B: 8,
/// TD3: 14, MRV-A: 16, TD1: 15 and 11).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionalData(String);

impl OptionalData {
    /// Normalize `value` and check it fits `width`.
    pub fn new(value: &str, width: usize) -> Result<Self, ValidationError> {
        let normalized = mrz_text::normalize(value);
        let len = normalized.chars().count();
        if len > width {
            return Err(ValidationError::TooLong {
                field: "optionalData",
                max: width,
                actual: len,
            });
        }
        Ok(Self(normalized))
    }

    /// Build from an MRZ field, dropping trailing fillers.
    pub fn from_mrz(field: &str) -> Self {
        Self(field.trim_end_matches(FILLER).to_string())
    }

    /// Access the normalized value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// MRZ projection of `width` characters.
    pub fn to_mrz(&self, width: usize) -> String {
        mrz_text::optional_data_to_mrz(&self.0, width)
    }

    /// VIZ projection (fillers shown as spaces).
    pub fn to_viz(&self) -> String {
        mrz_text::mrz_field_to_text(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Parse an ISO `YYYY-MM-DD` date for `field`.
///
/// # Errors
///
/// [`ValidationError::InvalidDate`] for anything that is not a calendar date.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| ValidationError::InvalidDate {
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// Parse an MRZ date field under `window` and attach the field name to
/// failures.
pub fn parse_mrz_date(
    field: &'static str,
    value: &str,
    window: YearWindow,
) -> Result<NaiveDate, FormatError> {
    mrz_text::date_from_mrz(value, field, window)
}

//! # MRZ Layout Primitives
//!
//! Document sizes, the validated [`Mrz`] line block, the result of a
//! successful parse, and the check-digit helpers shared by every composer.
//!
//! ## Line Geometry
//!
//! | Size | Lines | Width | Name | Optional data |
//! |------|-------|-------|------|---------------|
//! | TD1 | 3 | 30 | 30 | 15 + 11 |
//! | TD2 | 2 | 36 | 31 | 7 |
//! | TD3 | 2 | 44 | 39 | 14 |
//! | MRV-A | 2 | 44 | 39 | 16 |
//! | MRV-B | 2 | 36 | 31 | 8 |

use serde::{Deserialize, Serialize};
use tdoc_core::fields::parse_mrz_date;
use tdoc_core::mrz_text::{self, YearWindow, FILLER};
use tdoc_core::{
    check_digit, AuthorityCode, CoreFields, DocumentNumber, FormatError, FullName, GenderMarker,
    NationalityCode, OptionalData, TypeCode,
};

/// ICAO 9303 document size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentSize {
    /// ID-card size, three lines of 30.
    Td1,
    /// Two lines of 36.
    Td2,
    /// Passport booklet, two lines of 44.
    Td3,
    /// Full-page visa sticker, two lines of 44.
    MrvA,
    /// Small visa sticker, two lines of 36.
    MrvB,
}

impl DocumentSize {
    /// Number of MRZ lines.
    pub fn line_count(self) -> usize {
        match self {
            Self::Td1 => 3,
            Self::Td2 | Self::Td3 | Self::MrvA | Self::MrvB => 2,
        }
    }

    /// Characters per MRZ line.
    pub fn line_length(self) -> usize {
        match self {
            Self::Td1 => 30,
            Self::Td2 | Self::MrvB => 36,
            Self::Td3 | Self::MrvA => 44,
        }
    }

    /// Width of the name field.
    pub fn name_width(self) -> usize {
        match self {
            Self::Td1 => 30,
            Self::Td2 | Self::MrvB => 31,
            Self::Td3 | Self::MrvA => 39,
        }
    }

    /// Width of the (first) optional data field.
    pub fn optional_data_width(self) -> usize {
        match self {
            Self::Td1 => 15,
            Self::Td2 => 7,
            Self::Td3 => 14,
            Self::MrvA => 16,
            Self::MrvB => 8,
        }
    }

    /// True for the visa sticker sizes.
    pub fn is_visa(self) -> bool {
        matches!(self, Self::MrvA | Self::MrvB)
    }

    /// Lowercase name used in configuration and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Td1 => "td1",
            Self::Td2 => "td2",
            Self::Td3 => "td3",
            Self::MrvA => "mrva",
            Self::MrvB => "mrvb",
        }
    }
}

impl std::fmt::Display for DocumentSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Width of the second TD1 optional data field.
pub const TD1_OPTIONAL_DATA_2_WIDTH: usize = 11;

// ---------------------------------------------------------------------------
// Mrz
// ---------------------------------------------------------------------------

/// A block of MRZ lines whose count and widths match its size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mrz {
    size: DocumentSize,
    lines: Vec<String>,
}

impl Mrz {
    /// Wrap `lines`, checking the line count and every line's length.
    ///
    /// # Errors
    ///
    /// [`FormatError::LineCount`] or [`FormatError::LineLength`].
    pub fn new(size: DocumentSize, lines: Vec<String>) -> Result<Self, FormatError> {
        if lines.len() != size.line_count() {
            return Err(FormatError::LineCount {
                expected: size.line_count(),
                actual: lines.len(),
            });
        }
        for (i, line) in lines.iter().enumerate() {
            let actual = line.chars().count();
            if actual != size.line_length() {
                return Err(FormatError::LineLength {
                    line: i + 1,
                    expected: size.line_length(),
                    actual,
                });
            }
        }
        Ok(Self { size, lines })
    }

    /// Split MRZ text into lines.
    ///
    /// Accepts newline-separated lines, or the lines concatenated without
    /// separators. Surrounding whitespace is ignored.
    pub fn from_text(size: DocumentSize, text: &str) -> Result<Self, FormatError> {
        let text = text.trim();
        let lines: Vec<String> = if text.contains('\n') {
            text.lines().map(|l| l.trim().to_string()).collect()
        } else {
            let total = text.chars().count();
            let expected = size.line_count() * size.line_length();
            if total != expected {
                return Err(FormatError::LineLength {
                    line: 1,
                    expected,
                    actual: total,
                });
            }
            let chars: Vec<char> = text.chars().collect();
            chars
                .chunks(size.line_length())
                .map(|c| c.iter().collect())
                .collect()
        };
        Self::new(size, lines)
    }

    /// The document size.
    pub fn size(&self) -> DocumentSize {
        self.size
    }

    /// All lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Line `n`, 1-based.
    pub fn line(&self, n: usize) -> Option<&str> {
        n.checked_sub(1)
            .and_then(|i| self.lines.get(i))
            .map(String::as_str)
    }

    /// All lines concatenated without separators.
    pub fn concatenated(&self) -> String {
        self.lines.concat()
    }
}

impl std::fmt::Display for Mrz {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

/// Fields recovered from a verified MRZ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedMrz {
    /// Size the MRZ was parsed as.
    pub size: DocumentSize,
    /// Identity fields.
    pub core: CoreFields,
    /// First (or only) optional data field.
    pub optional_data: OptionalData,
    /// TD1 line 2 optional data; empty for every other size.
    pub optional_data_2: OptionalData,
}

// ---------------------------------------------------------------------------
// Check digits
// ---------------------------------------------------------------------------

/// Character-indexed slice of an ASCII MRZ line.
pub(crate) fn slice(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or_default()
}

/// Character at `index` of an ASCII MRZ line, `<` if out of range.
pub(crate) fn char_at(line: &str, index: usize) -> char {
    line.as_bytes().get(index).map_or(FILLER, |b| char::from(*b))
}

/// Check digit for an optional data field, `<` when the field is all filler.
pub(crate) fn optional_check_digit(field: &str) -> char {
    if field.chars().all(|c| c == FILLER) {
        FILLER
    } else {
        check_digit::compute(field)
    }
}

/// Compare `found` against the digit computed for `data`.
pub(crate) fn verify_digit(field: &'static str, data: &str, found: char) -> Result<(), FormatError> {
    verify_expected(field, data, check_digit::compute(data), found)
}

/// Compare `found` against an already computed `expected` digit.
pub(crate) fn verify_expected(
    field: &'static str,
    data: &str,
    expected: char,
    found: char,
) -> Result<(), FormatError> {
    if expected == found {
        return Ok(());
    }
    tracing::debug!(field, %expected, %found, "MRZ check digit mismatch");
    Err(FormatError::CheckDigitMismatch {
        field,
        slice: data.to_string(),
        expected,
        found,
    })
}

/// Raw MRZ slices for the identity fields, in MRZ form.
pub(crate) struct RawIdentity<'a> {
    /// Type code, filler included.
    pub type_code: &'a str,
    /// Issuing state.
    pub authority: &'a str,
    /// Name field in MRZ form.
    pub name: &'a str,
    /// Number field, filler included.
    pub number: &'a str,
    /// Nationality.
    pub nationality: &'a str,
    /// Birth date as `YYMMDD`.
    pub birth: &'a str,
    /// Sex character.
    pub sex: char,
    /// Expiry date as `YYMMDD`.
    pub expiry: &'a str,
}

impl RawIdentity<'_> {
    /// Build validated [`CoreFields`]. Only called after every check digit
    /// has been verified.
    pub(crate) fn into_core(self) -> Result<CoreFields, FormatError> {
        Ok(CoreFields::from_parts(
            TypeCode::from_mrz(self.type_code)?,
            AuthorityCode::new(self.authority)?,
            DocumentNumber::new(self.number.trim_end_matches(FILLER))?,
            FullName::new(&mrz_text::mrz_name_to_full_name(self.name)),
            NationalityCode::new(self.nationality)?,
            parse_mrz_date("birthDate", self.birth, YearWindow::Birth)?,
            GenderMarker::from_mrz(self.sex)?,
            parse_mrz_date("expirationDate", self.expiry, YearWindow::Validity)?,
        ))
    }
}

/// The 28-character run shared by line 2 of TD2, TD3 and both visa sizes:
/// number, check digit, nationality, birth date, check digit, sex, expiry,
/// check digit.
pub(crate) fn identity_run(number_mrz: &str, core: &CoreFields) -> String {
    let birth = core.birth_date_mrz();
    let expiry = core.expiration_date_mrz();
    format!(
        "{number_mrz}{}{}{birth}{}{}{expiry}{}",
        check_digit::compute(number_mrz),
        core.nationality_code_mrz(),
        check_digit::compute(&birth),
        core.gender_marker_mrz(),
        check_digit::compute(&expiry),
    )
}

/// Verify the three check digits of an [`identity_run`] at the start of `line`.
pub(crate) fn verify_identity_run(line: &str) -> Result<(), FormatError> {
    verify_digit("number", slice(line, 0, 9), char_at(line, 9))?;
    verify_digit("birthDate", slice(line, 13, 19), char_at(line, 19))?;
    verify_digit("expirationDate", slice(line, 21, 27), char_at(line, 27))
}

/// Reject non-ASCII input before byte-offset slicing.
pub(crate) fn ensure_ascii(mrz: &Mrz) -> Result<(), FormatError> {
    for (i, line) in mrz.lines().iter().enumerate() {
        if let Some(c) = line
            .chars()
            .find(|c| !(c.is_ascii_uppercase() || c.is_ascii_digit() || *c == FILLER))
        {
            return Err(FormatError::Field(tdoc_core::ValidationError::InvalidCharacters {
                field: "mrz",
                value: format!("line {}: {c:?}", i + 1),
                expected: "MRZ alphabet A-Z 0-9 <",
            }));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry() {
        assert_eq!(DocumentSize::Td1.line_count(), 3);
        assert_eq!(DocumentSize::Td3.line_length(), 44);
        assert_eq!(DocumentSize::MrvB.line_length(), 36);
        assert_eq!(DocumentSize::MrvA.optional_data_width(), 16);
        assert!(DocumentSize::MrvA.is_visa());
        assert!(!DocumentSize::Td2.is_visa());
    }

    #[test]
    fn mrz_rejects_wrong_line_length() {
        let lines = vec!["A".repeat(44), "B".repeat(43)];
        let err = Mrz::new(DocumentSize::Td3, lines).unwrap_err();
        assert_eq!(
            err,
            FormatError::LineLength {
                line: 2,
                expected: 44,
                actual: 43
            }
        );
        assert_eq!(err.class(), tdoc_core::ErrorClass::Range);
    }

    #[test]
    fn mrz_rejects_wrong_line_count() {
        let lines = vec!["A".repeat(30), "B".repeat(30)];
        assert!(matches!(
            Mrz::new(DocumentSize::Td1, lines),
            Err(FormatError::LineCount { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn from_text_accepts_both_forms() {
        let a = "A".repeat(36);
        let b = "B".repeat(36);
        let joined = Mrz::from_text(DocumentSize::Td2, &format!("{a}{b}")).unwrap();
        let split = Mrz::from_text(DocumentSize::Td2, &format!("{a}\n{b}\n")).unwrap();
        assert_eq!(joined, split);
        assert_eq!(joined.line(2), Some(b.as_str()));
        assert_eq!(joined.line(0), None);
        assert!(Mrz::from_text(DocumentSize::Td2, &a).is_err());
    }

    #[test]
    fn empty_optional_data_digit_is_filler() {
        assert_eq!(optional_check_digit("<<<<<<<<<<<<<<"), '<');
        assert_eq!(optional_check_digit("ZE184226B<<<<<"), '1');
    }

    #[test]
    fn size_serde_names() {
        assert_eq!(serde_json::to_string(&DocumentSize::MrvA).unwrap(), "\"mrva\"");
        let back: DocumentSize = serde_json::from_str("\"td1\"").unwrap();
        assert_eq!(back, DocumentSize::Td1);
    }
}

//! # Seal Header Zone
//!
//! ```text
//! 0xDC | version | country (C40, 2 bytes) | signer + cert ref (C40) |
//! issue date (3) | signature date (3) | feature def ref (1) | category (1)
//! ```
//!
//! ## Versions
//!
//! | Version | Byte | Signer + certificate reference |
//! |---------|------|--------------------------------|
//! | 3 | `0x02` | 4-char signer, 5-char reference (9 chars, 6 bytes) |
//! | 4 | `0x03` | 4-char signer, 2 hex digits of reference length, reference |
//!
//! Dates are the decimal number `MMDDYYYY` stored as a 24-bit big-endian
//! integer (25 March 2024 is `03252024` = `0x319F38`).
//!
//! ## Reference
//!
//! ICAO Doc 9303 Part 13, §2.2 (header) and §2.3 (date encoding).

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tdoc_codec::{c40, hex_util};
use tdoc_core::{AuthorityCode, FormatError, ValidationError};

/// First byte of every seal.
pub const MAGIC: u8 = 0xDC;

/// Seal format version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VdsVersion {
    /// Version 3, fixed five-character certificate reference.
    V3,
    /// Version 4, variable-length hex certificate reference.
    #[default]
    V4,
}

impl VdsVersion {
    /// The version byte written after the magic constant.
    pub fn byte(self) -> u8 {
        match self {
            Self::V3 => 0x02,
            Self::V4 => 0x03,
        }
    }

    /// Decode a version byte.
    pub fn from_byte(b: u8) -> Result<Self, FormatError> {
        match b {
            0x02 => Ok(Self::V3),
            0x03 => Ok(Self::V4),
            other => Err(FormatError::UnsupportedVersion(other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Signer identifier and certificate reference
// ---------------------------------------------------------------------------

/// Signer identifier: two-letter country plus two alphanumeric characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SignerIdentifier(String);

impl SignerIdentifier {
    /// Validate a signer identifier such as `UTSS`.
    pub fn new(value: &str) -> Result<Self, ValidationError> {
        let v = value.trim().to_uppercase();
        let len = v.chars().count();
        if len != 4 {
            return Err(ValidationError::WrongLength {
                field: "identifierCode",
                expected: 4,
                actual: len,
            });
        }
        let ok = v.chars().take(2).all(|c| c.is_ascii_uppercase())
            && v.chars().skip(2).all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
        if !ok {
            return Err(ValidationError::InvalidCharacters {
                field: "identifierCode",
                value: v,
                expected: "two letters followed by two letters or digits",
            });
        }
        Ok(Self(v))
    }

    /// Access the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SignerIdentifier {
    type Error = ValidationError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<SignerIdentifier> for String {
    fn from(value: SignerIdentifier) -> Self {
        value.0
    }
}

impl std::fmt::Display for SignerIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Longest V4 certificate reference (its length is written as two hex digits).
pub const CERT_REFERENCE_MAX: usize = 0xFF;

/// Length of a V3 certificate reference.
pub const CERT_REFERENCE_V3_LEN: usize = 5;

/// Validate a certificate reference for `version`, returning it uppercased.
pub fn validate_cert_reference(version: VdsVersion, value: &str) -> Result<String, ValidationError> {
    let v = value.trim().to_uppercase();
    let len = v.chars().count();
    match version {
        VdsVersion::V3 if len != CERT_REFERENCE_V3_LEN => {
            return Err(ValidationError::WrongLength {
                field: "certReference",
                expected: CERT_REFERENCE_V3_LEN,
                actual: len,
            })
        }
        VdsVersion::V4 if len == 0 => return Err(ValidationError::Empty { field: "certReference" }),
        VdsVersion::V4 if len > CERT_REFERENCE_MAX => {
            return Err(ValidationError::TooLong {
                field: "certReference",
                max: CERT_REFERENCE_MAX,
                actual: len,
            })
        }
        _ => {}
    }
    if !hex_util::is_hex(&v) {
        return Err(ValidationError::InvalidCharacters {
            field: "certReference",
            value: v,
            expected: "hex digits 0-9 A-F",
        });
    }
    Ok(v)
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Encode a date as three bytes of `MMDDYYYY`.
pub fn encode_date(date: NaiveDate) -> Result<[u8; 3], FormatError> {
    let year = u32::try_from(date.year())
        .ok()
        .filter(|y| *y <= 9999)
        .ok_or(FormatError::InvalidDate {
            field: "sealDate",
            value: date.to_string(),
        })?;
    let n = date.month() * 1_000_000 + date.day() * 10_000 + year;
    let [_, a, b, c] = n.to_be_bytes();
    Ok([a, b, c])
}

/// Decode three bytes of `MMDDYYYY`.
pub fn decode_date(field: &'static str, bytes: [u8; 3]) -> Result<NaiveDate, FormatError> {
    let n = u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]);
    let (month, day, year) = (n / 1_000_000, (n / 10_000) % 100, n % 10_000);
    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or(FormatError::InvalidDate {
        field,
        value: format!("{n:08}"),
    })
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// The seal header zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SealHeader {
    version: VdsVersion,
    authority_code: AuthorityCode,
    identifier_code: SignerIdentifier,
    cert_reference: String,
    issue_date: NaiveDate,
    signature_date: NaiveDate,
    feature_definition_ref: u8,
    type_category: u8,
}

fn validate_byte_field(field: &'static str, value: i64) -> Result<u8, ValidationError> {
    if (1..=254).contains(&value) {
        Ok(value as u8)
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min: 1,
            max: 254,
        })
    }
}

impl SealHeader {
    /// Build a header, validating every field.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        version: VdsVersion,
        authority_code: &str,
        identifier_code: &str,
        cert_reference: &str,
        issue_date: NaiveDate,
        signature_date: NaiveDate,
        feature_definition_ref: i64,
        type_category: i64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            version,
            authority_code: AuthorityCode::new(authority_code)?,
            identifier_code: SignerIdentifier::new(identifier_code)?,
            cert_reference: validate_cert_reference(version, cert_reference)?,
            issue_date,
            signature_date,
            feature_definition_ref: validate_byte_field("featureDefinitionRef", feature_definition_ref)?,
            type_category: validate_byte_field("typeCategory", type_category)?,
        })
    }

    /// Header format version.
    pub fn version(&self) -> VdsVersion {
        self.version
    }

    /// Issuing state or organization.
    pub fn authority_code(&self) -> &AuthorityCode {
        &self.authority_code
    }

    /// Signer identifier (two letters, then two alphanumerics).
    pub fn identifier_code(&self) -> &SignerIdentifier {
        &self.identifier_code
    }

    /// Hex certificate reference of the signer.
    pub fn cert_reference(&self) -> &str {
        &self.cert_reference
    }

    /// Date the document was issued.
    pub fn issue_date(&self) -> NaiveDate {
        self.issue_date
    }

    /// Date the seal was signed.
    pub fn signature_date(&self) -> NaiveDate {
        self.signature_date
    }

    /// Reference to the feature definition in use.
    pub fn feature_definition_ref(&self) -> u8 {
        self.feature_definition_ref
    }

    /// Document type category; odd values are defined by ICAO.
    pub fn type_category(&self) -> u8 {
        self.type_category
    }

    // -- setters (validate, then assign) ------------------------------------

    /// Change the version. The certificate reference must suit the new
    /// version, otherwise nothing changes.
    pub fn set_version(&mut self, version: VdsVersion) -> Result<(), ValidationError> {
        self.cert_reference = validate_cert_reference(version, &self.cert_reference)?;
        self.version = version;
        Ok(())
    }

    /// Assign the issuing state.
    pub fn set_authority_code(&mut self, value: &str) -> Result<(), ValidationError> {
        self.authority_code = AuthorityCode::new(value)?;
        Ok(())
    }

    /// Assign the signer identifier.
    pub fn set_identifier_code(&mut self, value: &str) -> Result<(), ValidationError> {
        self.identifier_code = SignerIdentifier::new(value)?;
        Ok(())
    }

    /// Assign the certificate reference. Its length must suit the version.
    pub fn set_cert_reference(&mut self, value: &str) -> Result<(), ValidationError> {
        self.cert_reference = validate_cert_reference(self.version, value)?;
        Ok(())
    }

    /// Assign the issue date.
    pub fn set_issue_date(&mut self, date: NaiveDate) {
        self.issue_date = date;
    }

    /// Assign the signature date.
    pub fn set_signature_date(&mut self, date: NaiveDate) {
        self.signature_date = date;
    }

    /// Assign the feature definition reference (1-254).
    pub fn set_feature_definition_ref(&mut self, value: i64) -> Result<(), ValidationError> {
        self.feature_definition_ref = validate_byte_field("featureDefinitionRef", value)?;
        Ok(())
    }

    /// Assign the document type category (1-254).
    pub fn set_type_category(&mut self, value: i64) -> Result<(), ValidationError> {
        self.type_category = validate_byte_field("typeCategory", value)?;
        Ok(())
    }

    // -- codec --------------------------------------------------------------

    /// The C40 text holding signer identifier and certificate reference.
    fn signer_text(&self) -> String {
        match self.version {
            VdsVersion::V3 => format!("{}{}", self.identifier_code, self.cert_reference),
            VdsVersion::V4 => format!(
                "{}{:02X}{}",
                self.identifier_code,
                self.cert_reference.len(),
                self.cert_reference
            ),
        }
    }

    /// Encode the header zone.
    pub fn encode(&self) -> Result<Vec<u8>, FormatError> {
        let mut out = vec![MAGIC, self.version.byte()];
        out.extend(c40::encode(self.authority_code.as_str())?);
        out.extend(c40::encode(&self.signer_text())?);
        out.extend(encode_date(self.issue_date)?);
        out.extend(encode_date(self.signature_date)?);
        out.push(self.feature_definition_ref);
        out.push(self.type_category);
        Ok(out)
    }

    /// Decode a header from the start of `bytes`, returning it and the
    /// number of bytes consumed.
    pub fn decode(bytes: &[u8]) -> Result<(Self, usize), FormatError> {
        let mut cursor = Cursor { bytes, offset: 0 };
        let magic = cursor.take(1, "seal magic")?[0];
        if magic != MAGIC {
            return Err(FormatError::InvalidMagic(magic));
        }
        let version = VdsVersion::from_byte(cursor.take(1, "seal version")?[0])?;
        let authority = c40::decode(cursor.take(2, "issuing country")?)?;

        let (identifier, cert_reference) = match version {
            VdsVersion::V3 => {
                let text = c40::decode(cursor.take(c40::encoded_len(9), "signer identifier")?)?;
                let (identifier, reference) = split_text(&text, 4, "signer identifier")?;
                (identifier.to_string(), reference.to_string())
            }
            VdsVersion::V4 => {
                // The first four bytes hold six characters: signer + length.
                let head = c40::decode(cursor.take(4, "signer identifier")?)?;
                let (identifier, length) = split_text(&head, 4, "signer identifier")?;
                let declared = usize::from_str_radix(length, 16).map_err(|_| FormatError::Hex {
                    value: length.to_string(),
                    reason: String::from("certificate reference length"),
                })?;
                let remaining = c40::encoded_len(6 + declared) - 4;
                let rest = c40::decode(cursor.take(remaining, "certificate reference")?)?;
                if rest.len() != declared {
                    return Err(FormatError::LengthMismatch {
                        context: "certificate reference",
                        declared,
                        available: rest.len(),
                    });
                }
                (identifier.to_string(), rest)
            }
        };

        let issue = cursor.take(3, "issue date")?;
        let issue_date = decode_date("issueDate", [issue[0], issue[1], issue[2]])?;
        let signed = cursor.take(3, "signature date")?;
        let signature_date = decode_date("signatureDate", [signed[0], signed[1], signed[2]])?;
        let feature_definition_ref = cursor.take(1, "feature definition reference")?[0];
        let type_category = cursor.take(1, "document type category")?[0];

        let header = Self::new(
            version,
            &authority,
            &identifier,
            &cert_reference,
            issue_date,
            signature_date,
            i64::from(feature_definition_ref),
            i64::from(type_category),
        )?;
        Ok((header, cursor.offset))
    }
}

/// Split decoded C40 text at `at`, failing if it is too short.
fn split_text<'t>(
    text: &'t str,
    at: usize,
    context: &'static str,
) -> Result<(&'t str, &'t str), FormatError> {
    match (text.get(..at), text.get(at..)) {
        (Some(head), Some(tail)) => Ok((head, tail)),
        _ => Err(FormatError::Truncated {
            context,
            needed: at,
            available: text.len(),
        }),
    }
}

struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, n: usize, context: &'static str) -> Result<&'a [u8], FormatError> {
        let end = self.offset + n;
        let slice = self.bytes.get(self.offset..end).ok_or(FormatError::Truncated {
            context,
            needed: n,
            available: self.bytes.len().saturating_sub(self.offset),
        })?;
        self.offset = end;
        Ok(slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn header(version: VdsVersion, cert: &str) -> SealHeader {
        SealHeader::new(version, "UTO", "UTSS", cert, date(2024, 3, 25), date(2024, 3, 26), 0x5D, 1)
            .unwrap()
    }

    #[test]
    fn date_encoding() {
        assert_eq!(encode_date(date(2024, 3, 25)).unwrap(), [0x31, 0x9F, 0x38]);
        assert_eq!(decode_date("issueDate", [0x31, 0x9F, 0x38]).unwrap(), date(2024, 3, 25));
        assert!(matches!(
            decode_date("issueDate", [0x00, 0x00, 0x00]),
            Err(FormatError::InvalidDate { field: "issueDate", .. })
        ));
    }

    #[test]
    fn v4_round_trip() {
        let h = header(VdsVersion::V4, "1A2B");
        let bytes = h.encode().unwrap();
        assert_eq!(&bytes[..2], &[0xDC, 0x03]);
        let (back, consumed) = SealHeader::decode(&bytes).unwrap();
        assert_eq!(back, h);
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn v4_odd_length_reference() {
        // "UTSS" + "03" + "ABC" = 9 characters, 6 bytes.
        let h = header(VdsVersion::V4, "abc");
        let bytes = h.encode().unwrap();
        assert_eq!(bytes.len(), 2 + 2 + 6 + 3 + 3 + 1 + 1);
        assert_eq!(SealHeader::decode(&bytes).unwrap().0.cert_reference(), "ABC");
    }

    #[test]
    fn v3_round_trip() {
        let h = header(VdsVersion::V3, "0000A");
        let bytes = h.encode().unwrap();
        assert_eq!(bytes[1], 0x02);
        assert_eq!(bytes.len(), 18);
        assert_eq!(SealHeader::decode(&bytes).unwrap().0, h);
    }

    #[test]
    fn cert_reference_rules() {
        assert!(matches!(
            validate_cert_reference(VdsVersion::V3, "1234"),
            Err(ValidationError::WrongLength { expected: 5, .. })
        ));
        assert!(validate_cert_reference(VdsVersion::V4, "").is_err());
        assert!(validate_cert_reference(VdsVersion::V4, "XYZ").is_err());
        assert!(validate_cert_reference(VdsVersion::V4, &"A".repeat(256)).is_err());
    }

    #[test]
    fn version_change_requires_compatible_reference() {
        let mut h = header(VdsVersion::V4, "1A");
        assert!(h.set_version(VdsVersion::V3).is_err());
        assert_eq!(h.version(), VdsVersion::V4);
    }

    #[test]
    fn byte_fields_in_range() {
        let mut h = header(VdsVersion::V4, "1A");
        assert!(matches!(
            h.set_type_category(255),
            Err(ValidationError::OutOfRange { value: 255, .. })
        ));
        assert!(h.set_feature_definition_ref(0).is_err());
        assert_eq!(h.type_category(), 1);
    }

    #[test]
    fn signer_identifier_rules() {
        assert!(SignerIdentifier::new("UT01").is_ok());
        assert!(SignerIdentifier::new("1TSS").is_err());
        assert!(SignerIdentifier::new("UTS").is_err());
    }

    #[test]
    fn decode_rejects_bad_prefix() {
        let bytes = header(VdsVersion::V4, "1A").encode().unwrap();
        let mut bad = bytes.clone();
        bad[0] = 0xDD;
        assert_eq!(SealHeader::decode(&bad).unwrap_err(), FormatError::InvalidMagic(0xDD));
        bad = bytes.clone();
        bad[1] = 0x04;
        assert_eq!(
            SealHeader::decode(&bad).unwrap_err(),
            FormatError::UnsupportedVersion(0x04)
        );
        assert!(matches!(
            SealHeader::decode(&bytes[..10]),
            Err(FormatError::Truncated { .. })
        ));
    }
}

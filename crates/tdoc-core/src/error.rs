//! # Error Hierarchy
//!
//! Structured error types for the travel document stack, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.
//!
//! Two families of failure exist:
//!
//! - [`ValidationError`] is raised when a field is assigned. The field keeps
//!   its previous value and the caller (usually a form) displays the message.
//! - [`FormatError`] is raised while decoding an MRZ line or a seal byte
//!   sequence. The decode is aborted and nothing is assigned.
//!
//! Overlong names and optional data are *not* errors: they are truncated and
//! reported with `tracing::warn!` (see [`crate::mrz_text`]).
//!
//! Every error reports an [`ErrorClass`], mirroring the range/type split that
//! form layers use to decide how to present a failure.

use thiserror::Error;

/// Coarse classification of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// A length, range, or checksum constraint was violated.
    Range,
    /// A value has the wrong shape entirely (unparsable date, wrong marker).
    Type,
}

/// Top-level error type for the travel document stack.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TdocError {
    /// A field assignment was rejected.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An MRZ or seal decode was rejected.
    #[error("format error: {0}")]
    Format(#[from] FormatError),
}

impl TdocError {
    /// The range/type classification of the underlying error.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Validation(e) => e.class(),
            Self::Format(e) => e.class(),
        }
    }
}

/// Errors raised when assigning a document field.
///
/// Each variant names the field so that a form can attach the message to
/// the right input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The field must not be empty.
    #[error("{field} must not be empty")]
    Empty {
        /// The field that was assigned.
        field: &'static str,
    },

    /// The value exceeds the maximum length of the field.
    #[error("{field} is too long: at most {max} characters, got {actual}")]
    TooLong {
        /// The field that was assigned.
        field: &'static str,
        /// Maximum permitted length.
        max: usize,
        /// Length of the rejected value.
        actual: usize,
    },

    /// The value must have an exact length.
    #[error("{field} must be exactly {expected} characters, got {actual}")]
    WrongLength {
        /// The field that was assigned.
        field: &'static str,
        /// Required length.
        expected: usize,
        /// Length of the rejected value.
        actual: usize,
    },

    /// The value contains characters outside the field's alphabet.
    #[error("{field} contains invalid characters: \"{value}\" (expected {expected})")]
    InvalidCharacters {
        /// The field that was assigned.
        field: &'static str,
        /// The rejected value.
        value: String,
        /// Human-readable description of the permitted alphabet.
        expected: &'static str,
    },

    /// A numeric value lies outside its permitted range.
    #[error("{field} out of range: {value} (expected {min}..={max})")]
    OutOfRange {
        /// The field that was assigned.
        field: &'static str,
        /// The rejected value.
        value: i64,
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },

    /// The value is not a valid calendar date.
    #[error("invalid date for {field}: \"{value}\" ({reason})")]
    InvalidDate {
        /// The field that was assigned.
        field: &'static str,
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl ValidationError {
    /// The range/type classification of this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::InvalidDate { .. } | Self::InvalidCharacters { .. } => ErrorClass::Type,
            Self::Empty { .. }
            | Self::TooLong { .. }
            | Self::WrongLength { .. }
            | Self::OutOfRange { .. } => ErrorClass::Range,
        }
    }
}

/// Errors raised while decoding MRZ text or seal bytes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// An MRZ line does not have the length its document size requires.
    #[error("MRZ line {line} has wrong length: expected {expected}, got {actual}")]
    LineLength {
        /// 1-based line number.
        line: usize,
        /// Required line length.
        expected: usize,
        /// Actual line length.
        actual: usize,
    },

    /// The MRZ has the wrong number of lines.
    #[error("MRZ has wrong number of lines: expected {expected}, got {actual}")]
    LineCount {
        /// Required number of lines.
        expected: usize,
        /// Actual number of lines.
        actual: usize,
    },

    /// An embedded check digit does not match its data slice.
    #[error("check digit mismatch for {field}: \"{slice}\" computes {expected}, found {found}")]
    CheckDigitMismatch {
        /// The field protected by the check digit.
        field: &'static str,
        /// The data slice the digit was computed over.
        slice: String,
        /// The digit computed from `slice`.
        expected: char,
        /// The digit present in the input.
        found: char,
    },

    /// The signature zone does not start with the signature marker.
    #[error("signature marker mismatch at offset {offset}: expected 0x{expected:02X}, found 0x{found:02X}")]
    SignatureMarker {
        /// Offset of the byte that was inspected.
        offset: usize,
        /// The required marker byte.
        expected: u8,
        /// The byte found instead.
        found: u8,
    },

    /// A DER length requires more length octets than supported.
    #[error("DER length needs {octets} length octets, at most 4 are supported")]
    DerLengthOverflow {
        /// Number of length octets required or declared.
        octets: usize,
    },

    /// The indefinite length form (`0x80`) was encountered.
    #[error("indefinite DER length form is not permitted")]
    IndefiniteLength,

    /// A declared length does not match the bytes that follow it.
    #[error("{context}: declared length {declared} does not match {available} available bytes")]
    LengthMismatch {
        /// What was being decoded.
        context: &'static str,
        /// The declared length.
        declared: usize,
        /// The number of bytes actually available.
        available: usize,
    },

    /// The input ended before a structure was complete.
    #[error("{context}: input truncated, needed {needed} bytes, {available} available")]
    Truncated {
        /// What was being decoded.
        context: &'static str,
        /// Bytes required.
        needed: usize,
        /// Bytes available.
        available: usize,
    },

    /// The seal does not begin with the VDS magic constant.
    #[error("invalid seal magic constant: expected 0xDC, found 0x{0:02X}")]
    InvalidMagic(u8),

    /// The seal version byte is not supported.
    #[error("unsupported seal version byte 0x{0:02X}")]
    UnsupportedVersion(u8),

    /// A character has no C40 representation.
    #[error("character {0:?} cannot be encoded in C40")]
    C40Character(char),

    /// A decoded C40 value does not map to a character.
    #[error("invalid C40 value {0}")]
    C40Value(u32),

    /// A character is not in the Base45 alphabet.
    #[error("character {0:?} is not in the Base45 alphabet")]
    Base45Character(char),

    /// A Base45 chunk decodes to a value that does not fit its byte width.
    #[error("Base45 chunk value {0} is out of range")]
    Base45Value(u32),

    /// A Base45 string has a length of the form `3n + 1`.
    #[error("Base45 input length {0} leaves a dangling character")]
    Base45Length(usize),

    /// A hex string could not be decoded.
    #[error("invalid hex string \"{value}\": {reason}")]
    Hex {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A date inside an MRZ line or seal header is not a calendar date.
    #[error("invalid date in {field}: \"{value}\"")]
    InvalidDate {
        /// The field holding the date.
        field: &'static str,
        /// The raw encoded value.
        value: String,
    },

    /// A required seal feature is absent.
    #[error("seal does not contain required feature 0x{0:02X}")]
    MissingFeature(u8),

    /// A seal feature value is malformed.
    #[error("feature 0x{tag:02X} has invalid value: {reason}")]
    FeatureValue {
        /// The feature tag.
        tag: u8,
        /// Why the value was rejected.
        reason: String,
    },

    /// A decoded value failed field validation.
    #[error("decoded field is invalid: {0}")]
    Field(#[from] ValidationError),
}

impl FormatError {
    /// The range/type classification of this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::SignatureMarker { .. }
            | Self::InvalidMagic(_)
            | Self::UnsupportedVersion(_)
            | Self::C40Character(_)
            | Self::Base45Character(_)
            | Self::Hex { .. }
            | Self::InvalidDate { .. } => ErrorClass::Type,
            Self::Field(e) => e.class(),
            Self::LineLength { .. }
            | Self::LineCount { .. }
            | Self::CheckDigitMismatch { .. }
            | Self::DerLengthOverflow { .. }
            | Self::IndefiniteLength
            | Self::LengthMismatch { .. }
            | Self::Truncated { .. }
            | Self::C40Value(_)
            | Self::Base45Value(_)
            | Self::Base45Length(_)
            | Self::MissingFeature(_)
            | Self::FeatureValue { .. } => ErrorClass::Range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_too_long_display() {
        let err = ValidationError::TooLong {
            field: "number",
            max: 9,
            actual: 12,
        };
        let msg = format!("{err}");
        assert!(msg.contains("number"));
        assert!(msg.contains('9'));
        assert!(msg.contains("12"));
        assert_eq!(err.class(), ErrorClass::Range);
    }

    #[test]
    fn validation_invalid_date_is_type_class() {
        let err = ValidationError::InvalidDate {
            field: "birthDate",
            value: "1998-02-30".to_string(),
            reason: "input is out of range".to_string(),
        };
        assert_eq!(err.class(), ErrorClass::Type);
        assert!(format!("{err}").contains("1998-02-30"));
    }

    #[test]
    fn check_digit_mismatch_names_field_and_slice() {
        let err = FormatError::CheckDigitMismatch {
            field: "document number",
            slice: "362142069".to_string(),
            expected: '9',
            found: '8',
        };
        let msg = format!("{err}");
        assert!(msg.contains("document number"));
        assert!(msg.contains("362142069"));
        assert_eq!(err.class(), ErrorClass::Range);
    }

    #[test]
    fn signature_marker_is_type_class() {
        let err = FormatError::SignatureMarker {
            offset: 40,
            expected: 0xFF,
            found: 0x01,
        };
        assert_eq!(err.class(), ErrorClass::Type);
        assert!(format!("{err}").contains("0xFF"));
    }

    #[test]
    fn field_error_inherits_class() {
        let inner = ValidationError::InvalidDate {
            field: "validThru",
            value: "x".to_string(),
            reason: "bad".to_string(),
        };
        let err = FormatError::Field(inner);
        assert_eq!(err.class(), ErrorClass::Type);
    }

    #[test]
    fn tdoc_error_from_conversions() {
        let e: TdocError = ValidationError::Empty { field: "typeCode" }.into();
        assert!(format!("{e}").contains("validation error"));
        assert_eq!(e.class(), ErrorClass::Range);

        let e: TdocError = FormatError::IndefiniteLength.into();
        assert!(format!("{e}").contains("format error"));
    }
}

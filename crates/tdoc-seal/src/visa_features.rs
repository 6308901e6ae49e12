//! # Visa Seal Features
//!
//! Feature tags and value codecs of the ICAO visa seal profile.
//!
//! | Tag | Content | Encoding |
//! |-----|---------|----------|
//! | `0x01` | MRZ of an MRV-A | C40, 72 characters |
//! | `0x02` | MRZ of an MRV-B | C40, 72 characters |
//! | `0x03` | Number of entries | 1 byte, `0` = unlimited |
//! | `0x04` | Duration of stay | 3 bytes: days, months, years |
//! | `0x05` | Passport number | C40, 9 characters |
//! | `0x06` | Visa type | up to 4 bytes |
//! | `0x07` | Additional feature | opaque bytes |

use serde::{Deserialize, Serialize};
use tdoc_codec::{c40, hex_util};
use tdoc_core::mrz_text::{self, FILLER};
use tdoc_core::{FormatError, ValidationError};

/// MRZ of an MRV-A visa.
pub const TAG_MRZ_MRV_A: u8 = 0x01;
/// MRZ of an MRV-B visa.
pub const TAG_MRZ_MRV_B: u8 = 0x02;
/// Number of entries.
pub const TAG_ENTRIES: u8 = 0x03;
/// Duration of stay.
pub const TAG_DURATION_OF_STAY: u8 = 0x04;
/// Passport number.
pub const TAG_PASSPORT_NUMBER: u8 = 0x05;
/// Visa type.
pub const TAG_VISA_TYPE: u8 = 0x06;
/// Additional feature.
pub const TAG_ADDITIONAL_FEATURE: u8 = 0x07;

/// Characters of MRZ text carried by the MRZ feature.
pub const MRZ_FEATURE_CHARS: usize = 72;

/// Characters of passport number carried by feature `0x05`.
pub const PASSPORT_NUMBER_CHARS: usize = 9;

/// Longest visa type code in hex digits.
pub const VISA_TYPE_MAX_HEX: usize = 8;

// ---------------------------------------------------------------------------
// MRZ
// ---------------------------------------------------------------------------

/// Encode 72 characters of MRZ text.
pub fn encode_mrz(tag: u8, text: &str) -> Result<Vec<u8>, FormatError> {
    let len = text.chars().count();
    if len != MRZ_FEATURE_CHARS {
        return Err(FormatError::FeatureValue {
            tag,
            reason: format!("MRZ text must be {MRZ_FEATURE_CHARS} characters, got {len}"),
        });
    }
    c40::encode(text)
}

/// Decode the MRZ feature back to 72 characters.
pub fn decode_mrz(tag: u8, bytes: &[u8]) -> Result<String, FormatError> {
    let text = c40::decode(bytes)?;
    if text.chars().count() != MRZ_FEATURE_CHARS {
        return Err(FormatError::FeatureValue {
            tag,
            reason: format!(
                "decoded MRZ text has {} characters, expected {MRZ_FEATURE_CHARS}",
                text.chars().count()
            ),
        });
    }
    Ok(text)
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// Encode an entry count (`0` = unlimited).
pub fn encode_entries(count: u8) -> Vec<u8> {
    vec![count]
}

/// Decode the single entry-count byte.
pub fn decode_entries(bytes: &[u8]) -> Result<u8, FormatError> {
    match *bytes {
        [count] => Ok(count),
        _ => Err(FormatError::FeatureValue {
            tag: TAG_ENTRIES,
            reason: format!("expected 1 byte, got {}", bytes.len()),
        }),
    }
}

// ---------------------------------------------------------------------------
// Duration of stay
// ---------------------------------------------------------------------------

/// Permitted duration of stay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DurationOfStay {
    /// Days, 0-254.
    pub days: u8,
    /// Months, 0-254.
    pub months: u8,
    /// Years, 0-254.
    pub years: u8,
}

impl DurationOfStay {
    /// Validate `[days, months, years]`, each 0 to 254.
    pub fn new(values: [i64; 3]) -> Result<Self, ValidationError> {
        let check = |field: &'static str, v: i64| -> Result<u8, ValidationError> {
            if (0..=254).contains(&v) {
                Ok(v as u8)
            } else {
                Err(ValidationError::OutOfRange {
                    field,
                    value: v,
                    min: 0,
                    max: 254,
                })
            }
        };
        Ok(Self {
            days: check("durationOfStay.days", values[0])?,
            months: check("durationOfStay.months", values[1])?,
            years: check("durationOfStay.years", values[2])?,
        })
    }

    /// `[days, months, years]`.
    pub fn to_array(self) -> [u8; 3] {
        [self.days, self.months, self.years]
    }

    /// Feature bytes.
    pub fn encode(self) -> Vec<u8> {
        self.to_array().to_vec()
    }

    /// Decode the three feature bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, FormatError> {
        match *bytes {
            [d, m, y] => Ok(Self::new([i64::from(d), i64::from(m), i64::from(y)])?),
            _ => Err(FormatError::FeatureValue {
                tag: TAG_DURATION_OF_STAY,
                reason: format!("expected 3 bytes, got {}", bytes.len()),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Passport number
// ---------------------------------------------------------------------------

/// Encode a passport number padded to nine characters.
pub fn encode_passport_number(number: &str) -> Result<Vec<u8>, FormatError> {
    let len = number.chars().count();
    if len > PASSPORT_NUMBER_CHARS {
        return Err(ValidationError::TooLong {
            field: "passportNumber",
            max: PASSPORT_NUMBER_CHARS,
            actual: len,
        }
        .into());
    }
    c40::encode(&mrz_text::pad(number, PASSPORT_NUMBER_CHARS))
}

/// Decode a passport number, dropping trailing fillers.
pub fn decode_passport_number(bytes: &[u8]) -> Result<String, FormatError> {
    Ok(c40::decode(bytes)?.trim_end_matches(FILLER).to_string())
}

// ---------------------------------------------------------------------------
// Visa type
// ---------------------------------------------------------------------------

/// Convert a visa type hex code to feature bytes.
///
/// Odd-length codes get a leading zero. Leading `00` bytes are dropped, but
/// the last byte is always kept so `"00000000"` becomes `[0x00]`.
pub fn visa_type_to_bytes(code: &str) -> Result<Vec<u8>, ValidationError> {
    let v = code.trim().to_uppercase();
    let len = v.chars().count();
    if len > VISA_TYPE_MAX_HEX {
        return Err(ValidationError::TooLong {
            field: "visaTypeCode",
            max: VISA_TYPE_MAX_HEX,
            actual: len,
        });
    }
    if !v.is_empty() && !hex_util::is_hex(&v) {
        return Err(ValidationError::InvalidCharacters {
            field: "visaTypeCode",
            value: v,
            expected: "hex digits 0-9 A-F",
        });
    }
    let padded = match len {
        0 => String::from("00"),
        n if n % 2 == 1 => format!("0{v}"),
        _ => v,
    };
    let bytes = hex_util::decode(&padded).map_err(|e| ValidationError::InvalidCharacters {
        field: "visaTypeCode",
        value: e.to_string(),
        expected: "hex digits 0-9 A-F",
    })?;
    let first_kept = bytes
        .iter()
        .position(|b| *b != 0)
        .unwrap_or(bytes.len().saturating_sub(1));
    Ok(bytes[first_kept..].to_vec())
}

/// Convert visa type feature bytes back to upper-case hex.
pub fn visa_type_from_bytes(bytes: &[u8]) -> Result<String, FormatError> {
    if bytes.is_empty() || bytes.len() > VISA_TYPE_MAX_HEX / 2 {
        return Err(FormatError::FeatureValue {
            tag: TAG_VISA_TYPE,
            reason: format!("expected 1 to 4 bytes, got {}", bytes.len()),
        });
    }
    Ok(hex_util::encode_upper(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mrz_feature_is_48_bytes() {
        let text = format!("{}{}", "V".repeat(44), "1".repeat(28));
        let bytes = encode_mrz(TAG_MRZ_MRV_A, &text).unwrap();
        assert_eq!(bytes.len(), 48);
        assert_eq!(decode_mrz(TAG_MRZ_MRV_A, &bytes).unwrap(), text);
    }

    #[test]
    fn mrz_feature_length_enforced() {
        assert!(matches!(
            encode_mrz(TAG_MRZ_MRV_B, "SHORT"),
            Err(FormatError::FeatureValue { tag: 0x02, .. })
        ));
        let short = c40::encode("ABC").unwrap();
        assert!(decode_mrz(TAG_MRZ_MRV_B, &short).is_err());
    }

    #[test]
    fn entries_codec() {
        assert_eq!(encode_entries(0), vec![0]);
        assert_eq!(decode_entries(&[3]).unwrap(), 3);
        assert!(decode_entries(&[1, 2]).is_err());
    }

    #[test]
    fn duration_of_stay_range() {
        let d = DurationOfStay::new([30, 0, 1]).unwrap();
        assert_eq!(d.encode(), vec![30, 0, 1]);
        assert_eq!(DurationOfStay::decode(&[30, 0, 1]).unwrap(), d);
        let err = DurationOfStay::new([255, 0, 0]).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { value: 255, .. }));
        assert_eq!(err.class(), tdoc_core::ErrorClass::Range);
        assert!(DurationOfStay::new([0, -1, 0]).is_err());
        assert!(DurationOfStay::decode(&[0xFF, 0, 0]).is_err());
        assert!(DurationOfStay::decode(&[1, 2]).is_err());
    }

    #[test]
    fn passport_number_codec() {
        let bytes = encode_passport_number("P1234567").unwrap();
        assert_eq!(bytes.len(), 6);
        assert_eq!(decode_passport_number(&bytes).unwrap(), "P1234567");
        assert!(encode_passport_number("P1234567890").is_err());
    }

    #[test]
    fn visa_type_trimming() {
        assert_eq!(visa_type_to_bytes("00000012").unwrap(), vec![0x12]);
        assert_eq!(visa_type_to_bytes("00000000").unwrap(), vec![0x00]);
        assert_eq!(visa_type_to_bytes("0A0B").unwrap(), vec![0x0A, 0x0B]);
        assert_eq!(visa_type_to_bytes("abc").unwrap(), vec![0x0A, 0xBC]);
        assert_eq!(visa_type_to_bytes("").unwrap(), vec![0x00]);
        assert_eq!(visa_type_to_bytes("00120000").unwrap(), vec![0x12, 0x00, 0x00]);
        assert!(matches!(
            visa_type_to_bytes("123456789"),
            Err(ValidationError::TooLong { max: 8, .. })
        ));
        assert!(visa_type_to_bytes("12G4").is_err());
    }

    #[test]
    fn visa_type_back_to_hex() {
        assert_eq!(visa_type_from_bytes(&[0x0A, 0xBC]).unwrap(), "0ABC");
        assert!(visa_type_from_bytes(&[]).is_err());
        assert!(visa_type_from_bytes(&[1, 2, 3, 4, 5]).is_err());
    }
}

//! Upper-case hex helpers over the `hex` crate.
//!
//! Certificate references and visa type codes travel as hex strings in
//! seal configuration; both are upper-case on output and case-insensitive
//! on input.

use tdoc_core::FormatError;

/// Encode bytes as upper-case hex.
pub fn encode_upper(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Decode a hex string of even length.
///
/// # Errors
///
/// [`FormatError::Hex`] for odd lengths or non-hex characters.
pub fn decode(text: &str) -> Result<Vec<u8>, FormatError> {
    hex::decode(text).map_err(|e| FormatError::Hex {
        value: text.to_string(),
        reason: e.to_string(),
    })
}

/// True when `text` is non-empty and made only of hex digits.
pub fn is_hex(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_upper_case() {
        assert_eq!(encode_upper(&[0x0a, 0xbc, 0x01]), "0ABC01");
    }

    #[test]
    fn decodes_either_case() {
        assert_eq!(decode("0aBC01").unwrap(), vec![0x0A, 0xBC, 0x01]);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(decode("ABC"), Err(FormatError::Hex { .. })));
        let err = decode("ZZ").unwrap_err();
        assert_eq!(err.class(), tdoc_core::ErrorClass::Type);
        assert!(!is_hex(""));
        assert!(!is_hex("12G4"));
        assert!(is_hex("12ab"));
    }
}

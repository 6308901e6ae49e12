//! # Base45 (RFC 9285)
//!
//! Text encoding for the barcode payload of a signed seal. Two bytes become
//! three characters and a trailing single byte becomes two, each character
//! drawn from the 45-symbol QR alphanumeric alphabet.
//!
//! ## Reference
//!
//! RFC 9285, "The Base45 Data Encoding".

use tdoc_core::FormatError;

/// The Base45 alphabet in value order.
pub const ALPHABET: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

const BASE: u32 = 45;

fn value_of(c: char) -> Result<u32, FormatError> {
    ALPHABET
        .iter()
        .position(|b| char::from(*b) == c)
        .map(|p| p as u32)
        .ok_or(FormatError::Base45Character(c))
}

fn push_digits(out: &mut String, mut n: u32, count: usize) {
    for _ in 0..count {
        out.push(char::from(ALPHABET[(n % BASE) as usize]));
        n /= BASE;
    }
}

/// Encode bytes as Base45 text.
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(2) * 3);
    for chunk in bytes.chunks(2) {
        match *chunk {
            [a, b] => push_digits(&mut out, u32::from(a) * 256 + u32::from(b), 3),
            [a] => push_digits(&mut out, u32::from(a), 2),
            _ => {}
        }
    }
    out
}

/// Decode Base45 text.
///
/// # Errors
///
/// - [`FormatError::Base45Length`] when the length leaves one dangling
///   character.
/// - [`FormatError::Base45Character`] for characters outside the alphabet.
/// - [`FormatError::Base45Value`] when a chunk overflows its byte width.
pub fn decode(text: &str) -> Result<Vec<u8>, FormatError> {
    let values = text.chars().map(value_of).collect::<Result<Vec<_>, _>>()?;
    if values.len() % 3 == 1 {
        return Err(FormatError::Base45Length(values.len()));
    }
    let mut out = Vec::with_capacity(values.len() / 3 * 2 + 1);
    for chunk in values.chunks(3) {
        match *chunk {
            [c, d, e] => {
                let n = c + d * BASE + e * BASE * BASE;
                if n > 0xFFFF {
                    return Err(FormatError::Base45Value(n));
                }
                out.push((n >> 8) as u8);
                out.push((n & 0xFF) as u8);
            }
            [c, d] => {
                let n = c + d * BASE;
                if n > 0xFF {
                    return Err(FormatError::Base45Value(n));
                }
                out.push(n as u8);
            }
            _ => {}
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc_vectors_encode() {
        assert_eq!(encode(b"AB"), "BB8");
        assert_eq!(encode(b"Hello!!"), "%69 VD92EX0");
        assert_eq!(encode(b"base-45"), "UJCLQE7W581");
        assert_eq!(encode(b"ietf!"), "QED8WEX0");
        assert_eq!(encode(b""), "");
    }

    #[test]
    fn rfc_vectors_decode() {
        assert_eq!(decode("QED8WEX0").unwrap(), b"ietf!");
        assert_eq!(decode("%69 VD92EX0").unwrap(), b"Hello!!");
    }

    #[test]
    fn rejects_foreign_characters() {
        assert_eq!(decode("QEd").unwrap_err(), FormatError::Base45Character('d'));
    }

    #[test]
    fn rejects_dangling_character() {
        assert_eq!(decode("BB8B").unwrap_err(), FormatError::Base45Length(4));
    }

    #[test]
    fn rejects_overflowing_chunks() {
        // ":::" = 44 + 44*45 + 44*2025 = 91124
        assert_eq!(decode(":::").unwrap_err(), FormatError::Base45Value(91124));
        // "::" = 44 + 44*45 = 2024
        assert_eq!(decode("::").unwrap_err(), FormatError::Base45Value(2024));
        assert_eq!(
            decode("::").unwrap_err().class(),
            tdoc_core::ErrorClass::Range
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn base45_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..300)) {
            let text = encode(&bytes);
            prop_assert!(text.chars().all(|c| ALPHABET.contains(&(c as u8))));
            prop_assert_eq!(decode(&text).unwrap(), bytes);
        }
    }
}

//! # C40 Text Packing
//!
//! ICAO 9303 Part 13 §2.6 C40 encoding, used inside Visible Digital Seals
//! for the issuing country, signer identifier, and MRZ-derived features.
//!
//! ## Encoding
//!
//! | Character | C40 value |
//! |-----------|-----------|
//! | space (`<`) | 3 |
//! | `0`-`9` | 4-13 |
//! | `A`-`Z` | 14-39 |
//!
//! Three characters pack into two bytes as `1600*c1 + 40*c2 + c3 + 1`,
//! big-endian. Two trailing characters are padded with the shift value 0.
//! A single trailing character is written as `0xFE` followed by its ASCII
//! code plus one.
//!
//! The MRZ filler `<` is written as a space and decoded back to `<`.

use tdoc_core::FormatError;

/// Byte that introduces a single trailing ASCII character.
pub const UNLATCH: u8 = 0xFE;

const PAD: u32 = 0;
const SPACE: u32 = 3;

fn char_to_value(c: char) -> Result<u32, FormatError> {
    match c {
        ' ' | '<' => Ok(SPACE),
        '0'..='9' => Ok(c as u32 - '0' as u32 + 4),
        'A'..='Z' => Ok(c as u32 - 'A' as u32 + 14),
        other => Err(FormatError::C40Character(other)),
    }
}

fn value_to_char(v: u32) -> Result<char, FormatError> {
    match v {
        SPACE => Ok('<'),
        4..=13 => char::from_u32('0' as u32 + v - 4).ok_or(FormatError::C40Value(v)),
        14..=39 => char::from_u32('A' as u32 + v - 14).ok_or(FormatError::C40Value(v)),
        other => Err(FormatError::C40Value(other)),
    }
}

fn push_triplet(out: &mut Vec<u8>, c1: u32, c2: u32, c3: u32) {
    let packed = 1600 * c1 + 40 * c2 + c3 + 1;
    out.push((packed >> 8) as u8);
    out.push((packed & 0xFF) as u8);
}

/// Number of bytes `chars` characters occupy once encoded.
pub fn encoded_len(chars: usize) -> usize {
    (chars / 3) * 2 + if chars % 3 == 0 { 0 } else { 2 }
}

/// Encode MRZ-alphabet text.
///
/// # Errors
///
/// [`FormatError::C40Character`] for any character outside `A-Z0-9< `.
pub fn encode(text: &str) -> Result<Vec<u8>, FormatError> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = Vec::with_capacity(encoded_len(chars.len()));
    for chunk in chars.chunks(3) {
        match *chunk {
            [a, b, c] => push_triplet(&mut out, char_to_value(a)?, char_to_value(b)?, char_to_value(c)?),
            [a, b] => push_triplet(&mut out, char_to_value(a)?, char_to_value(b)?, PAD),
            [a] => {
                char_to_value(a)?;
                let ascii = if a == '<' { b' ' } else { a as u8 };
                out.push(UNLATCH);
                out.push(ascii + 1);
            }
            _ => {}
        }
    }
    Ok(out)
}

/// Decode C40 bytes back into MRZ-alphabet text (spaces become `<`).
///
/// # Errors
///
/// - [`FormatError::Truncated`] for an odd number of bytes.
/// - [`FormatError::C40Value`] for values outside the table.
pub fn decode(bytes: &[u8]) -> Result<String, FormatError> {
    let mut out = String::with_capacity(bytes.len() * 3 / 2);
    for pair in bytes.chunks(2) {
        let [b1, b2] = *pair else {
            return Err(FormatError::Truncated {
                context: "C40 text",
                needed: bytes.len() + 1,
                available: bytes.len(),
            });
        };
        if b1 == UNLATCH {
            let ascii = b2.checked_sub(1).ok_or(FormatError::C40Value(0))?;
            let c = char::from(ascii);
            char_to_value(c)?;
            out.push(if c == ' ' { '<' } else { c });
            continue;
        }
        let packed = u32::from(b1) * 256 + u32::from(b2);
        if packed == 0 {
            return Err(FormatError::C40Value(0));
        }
        let v = packed - 1;
        let (c1, c2, c3) = (v / 1600, (v % 1600) / 40, v % 40);
        out.push(value_to_char(c1)?);
        out.push(value_to_char(c2)?);
        if c3 != PAD {
            out.push(value_to_char(c3)?);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_triplet() {
        // "D" = 17, space = 3: 1600*17 + 40*3 + 3 + 1 = 27324 = 0x6ABC.
        assert_eq!(encode("D<<").unwrap(), vec![0x6A, 0xBC]);
        assert_eq!(decode(&[0x6A, 0xBC]).unwrap(), "D<<");
    }

    #[test]
    fn two_trailing_characters_are_padded() {
        let bytes = encode("AB").unwrap();
        assert_eq!(bytes.len(), 2);
        assert_eq!(decode(&bytes).unwrap(), "AB");
    }

    #[test]
    fn single_trailing_character_uses_unlatch() {
        assert_eq!(encode("A").unwrap(), vec![0xFE, 0x42]);
        assert_eq!(decode(&[0xFE, 0x42]).unwrap(), "A");
        let bytes = encode("UTOX").unwrap();
        assert_eq!(bytes.len(), 4);
        assert_eq!(bytes[2], UNLATCH);
        assert_eq!(decode(&bytes).unwrap(), "UTOX");
    }

    #[test]
    fn filler_round_trips_through_space() {
        let text = "VDUTOERIKSSON<<ANNA<MARIA<<<";
        assert_eq!(decode(&encode(text).unwrap()).unwrap(), text);
    }

    #[test]
    fn encoded_len_matches() {
        for n in 0..20 {
            let text = "A".repeat(n);
            assert_eq!(encode(&text).unwrap().len(), encoded_len(n));
        }
        assert_eq!(encoded_len(72), 48);
        assert_eq!(encoded_len(9), 6);
    }

    #[test]
    fn rejects_lowercase() {
        assert_eq!(encode("abc").unwrap_err(), FormatError::C40Character('a'));
    }

    #[test]
    fn rejects_odd_length_input() {
        assert!(matches!(decode(&[0x6A]), Err(FormatError::Truncated { .. })));
    }

    #[test]
    fn rejects_out_of_table_values() {
        assert!(decode(&[0xFF, 0xFF]).is_err());
        assert!(decode(&[0x00, 0x00]).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any MRZ-alphabet text survives encode then decode.
        #[test]
        fn c40_round_trip(text in "[A-Z0-9<]{0,90}") {
            let bytes = encode(&text).unwrap();
            prop_assert_eq!(bytes.len(), encoded_len(text.len()));
            prop_assert_eq!(decode(&bytes).unwrap(), text);
        }
    }
}

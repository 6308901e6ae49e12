//! # TLV Framing and DER Definite Lengths
//!
//! The VDS message zone is a sequence of `(tag, length, value)` entries and
//! the signature zone is one more entry under the marker `0xFF`. Lengths use
//! the BER/DER definite form:
//!
//! - Short form: `n < 128` is the single byte `n`.
//! - Long form: `0x80 | k` followed by the `k` big-endian octets of `n`.
//!
//! At most four length octets are accepted, which bounds any single value
//! to `2^32 - 1` bytes. The indefinite form `0x80` is rejected.

use tdoc_core::FormatError;

/// Largest number of long-form length octets accepted.
pub const MAX_LENGTH_OCTETS: usize = 4;

/// Tag that introduces the signature zone.
pub const SIGNATURE_MARKER: u8 = 0xFF;

/// Encode `n` as a DER definite length.
///
/// # Errors
///
/// [`FormatError::DerLengthOverflow`] if `n` needs more than four octets.
pub fn length_to_der(n: usize) -> Result<Vec<u8>, FormatError> {
    if n < 0x80 {
        return Ok(vec![n as u8]);
    }
    let be = (n as u64).to_be_bytes();
    let skip = be.iter().take_while(|b| **b == 0).count();
    let octets = &be[skip..];
    if octets.len() > MAX_LENGTH_OCTETS {
        return Err(FormatError::DerLengthOverflow {
            octets: octets.len(),
        });
    }
    let mut out = Vec::with_capacity(octets.len() + 1);
    out.push(0x80 | octets.len() as u8);
    out.extend_from_slice(octets);
    Ok(out)
}

/// Decode a DER definite length at the start of `bytes`.
///
/// Returns `(length, octets consumed)`.
///
/// # Errors
///
/// - [`FormatError::Truncated`] if the input ends inside the length.
/// - [`FormatError::IndefiniteLength`] for `0x80`.
/// - [`FormatError::DerLengthOverflow`] for more than four length octets.
pub fn der_to_length(bytes: &[u8]) -> Result<(usize, usize), FormatError> {
    let first = *bytes.first().ok_or(FormatError::Truncated {
        context: "DER length",
        needed: 1,
        available: 0,
    })?;
    if first & 0x80 == 0 {
        return Ok((first as usize, 1));
    }
    let octets = (first & 0x7F) as usize;
    if octets == 0 {
        return Err(FormatError::IndefiniteLength);
    }
    if octets > MAX_LENGTH_OCTETS {
        return Err(FormatError::DerLengthOverflow { octets });
    }
    if bytes.len() < 1 + octets {
        return Err(FormatError::Truncated {
            context: "DER length",
            needed: 1 + octets,
            available: bytes.len(),
        });
    }
    let n = bytes[1..=octets]
        .iter()
        .fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
    let n = usize::try_from(n).map_err(|_| FormatError::DerLengthOverflow { octets })?;
    Ok((n, 1 + octets))
}

/// One tag-length-value entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlvEntry {
    /// Single-byte tag.
    pub tag: u8,
    /// Raw value bytes.
    pub value: Vec<u8>,
}

/// Encode one entry: tag byte, DER length, value bytes.
pub fn encode_entry(tag: u8, value: &[u8]) -> Result<Vec<u8>, FormatError> {
    let length = length_to_der(value.len())?;
    let mut out = Vec::with_capacity(1 + length.len() + value.len());
    out.push(tag);
    out.extend_from_slice(&length);
    out.extend_from_slice(value);
    Ok(out)
}

/// Decode the entry at the start of `bytes`, returning it and the number of
/// bytes consumed.
pub fn decode_entry(bytes: &[u8]) -> Result<(TlvEntry, usize), FormatError> {
    let tag = *bytes.first().ok_or(FormatError::Truncated {
        context: "TLV tag",
        needed: 1,
        available: 0,
    })?;
    let (length, consumed) = der_to_length(&bytes[1..])?;
    let start = 1 + consumed;
    let end = start.checked_add(length).ok_or(FormatError::LengthMismatch {
        context: "TLV value",
        declared: length,
        available: bytes.len() - start,
    })?;
    if end > bytes.len() {
        return Err(FormatError::Truncated {
            context: "TLV value",
            needed: length,
            available: bytes.len() - start,
        });
    }
    Ok((
        TlvEntry {
            tag,
            value: bytes[start..end].to_vec(),
        },
        end,
    ))
}

/// Decode a run of entries covering all of `bytes`.
pub fn decode_entries(bytes: &[u8]) -> Result<Vec<TlvEntry>, FormatError> {
    let mut entries = Vec::new();
    let mut offset = 0;
    while offset < bytes.len() {
        let (entry, consumed) = decode_entry(&bytes[offset..])?;
        entries.push(entry);
        offset += consumed;
    }
    Ok(entries)
}

/// Encode the signature zone: marker, DER length, signature bytes.
pub fn encode_signature_zone(signature: &[u8]) -> Result<Vec<u8>, FormatError> {
    encode_entry(SIGNATURE_MARKER, signature)
}

/// Extract the signature bytes from a signature zone starting at `start`.
///
/// The zone must run to the end of `bytes`.
///
/// # Errors
///
/// - [`FormatError::SignatureMarker`] if `bytes[start]` is not `0xFF`.
/// - [`FormatError::LengthMismatch`] if the declared length differs from
///   the number of bytes remaining.
pub fn extract_signature(bytes: &[u8], start: usize) -> Result<Vec<u8>, FormatError> {
    let marker = *bytes.get(start).ok_or(FormatError::Truncated {
        context: "signature zone",
        needed: start + 1,
        available: bytes.len(),
    })?;
    if marker != SIGNATURE_MARKER {
        return Err(FormatError::SignatureMarker {
            offset: start,
            expected: SIGNATURE_MARKER,
            found: marker,
        });
    }
    let (declared, consumed) = der_to_length(&bytes[start + 1..])?;
    let value_start = start + 1 + consumed;
    let available = bytes.len() - value_start;
    if declared != available {
        return Err(FormatError::LengthMismatch {
            context: "signature zone",
            declared,
            available,
        });
    }
    Ok(bytes[value_start..].to_vec())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Every length representable in four octets survives a round trip.
        #[test]
        fn der_length_round_trip(n in 0u64..=0xFFFF_FFFF) {
            let n = n as usize;
            let encoded = length_to_der(n).unwrap();
            let (decoded, consumed) = der_to_length(&encoded).unwrap();
            prop_assert_eq!(decoded, n);
            prop_assert_eq!(consumed, encoded.len());
        }

        /// Entries decode to the exact value bytes.
        #[test]
        fn entry_round_trip(tag in 0u8..0xFF, value in proptest::collection::vec(any::<u8>(), 0..400)) {
            let bytes = encode_entry(tag, &value).unwrap();
            let (entry, consumed) = decode_entry(&bytes).unwrap();
            prop_assert_eq!(entry.tag, tag);
            prop_assert_eq!(entry.value, value);
            prop_assert_eq!(consumed, bytes.len());
        }
    }
}

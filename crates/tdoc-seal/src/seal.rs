//! # Digital Seal
//!
//! A [`DigitalSeal`] is a header, an ordered feature map and a signature:
//!
//! ```text
//! unsigned seal = header zone || message zone
//! signed seal   = unsigned seal || 0xFF || DER length || signature
//! ```
//!
//! ## Invariant
//!
//! The zone setters decode into a complete candidate seal first and only
//! then replace `self`. A malformed zone leaves the seal exactly as it was.

use tdoc_codec::{base45, tlv};
use tdoc_core::FormatError;

use crate::features::FeatureMap;
use crate::header::SealHeader;
use crate::signer::{SealSigner, DEFAULT_SIGNATURE_LEN};

/// A Visible Digital Seal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitalSeal {
    header: SealHeader,
    features: FeatureMap,
    signature_data: Vec<u8>,
}

impl DigitalSeal {
    /// A seal with no features and a zero placeholder signature.
    pub fn new(header: SealHeader) -> Self {
        Self {
            header,
            features: FeatureMap::new(),
            signature_data: vec![0u8; DEFAULT_SIGNATURE_LEN],
        }
    }

    /// The seal header.
    pub fn header(&self) -> &SealHeader {
        &self.header
    }

    /// Mutable access to the header. The signature is not refreshed.
    pub fn header_mut(&mut self) -> &mut SealHeader {
        &mut self.header
    }

    /// Features in insertion order.
    pub fn features(&self) -> &FeatureMap {
        &self.features
    }

    /// Value of feature `tag`.
    pub fn feature(&self, tag: u8) -> Option<&[u8]> {
        self.features.get(tag)
    }

    /// Insert or replace feature `tag`, keeping its position.
    pub fn set_feature(&mut self, tag: u8, value: Vec<u8>) -> Result<(), FormatError> {
        self.features.insert(tag, value)
    }

    /// Remove feature `tag`.
    pub fn remove_feature(&mut self, tag: u8) -> Option<Vec<u8>> {
        self.features.remove(tag)
    }

    /// Raw signature bytes.
    pub fn signature_data(&self) -> &[u8] {
        &self.signature_data
    }

    /// Replace the signature bytes as given.
    pub fn set_signature_data(&mut self, signature: Vec<u8>) {
        self.signature_data = signature;
    }

    /// Replace the signature with one from `signer` over the unsigned seal.
    pub fn sign_with(&mut self, signer: &dyn SealSigner) -> Result<(), FormatError> {
        let unsigned = self.unsigned_seal()?;
        self.signature_data = signer.sign(&unsigned);
        Ok(())
    }

    // -- encode -------------------------------------------------------------

    /// Header zone bytes.
    pub fn header_zone(&self) -> Result<Vec<u8>, FormatError> {
        self.header.encode()
    }

    /// Message zone bytes: features in insertion order.
    pub fn message_zone(&self) -> Result<Vec<u8>, FormatError> {
        self.features.encode()
    }

    /// Header zone followed by message zone.
    pub fn unsigned_seal(&self) -> Result<Vec<u8>, FormatError> {
        let mut out = self.header_zone()?;
        out.extend(self.message_zone()?);
        Ok(out)
    }

    /// Signature zone bytes.
    pub fn signature_zone(&self) -> Result<Vec<u8>, FormatError> {
        tlv::encode_signature_zone(&self.signature_data)
    }

    /// Unsigned seal followed by the signature zone.
    pub fn signed_seal(&self) -> Result<Vec<u8>, FormatError> {
        let mut out = self.unsigned_seal()?;
        out.extend(self.signature_zone()?);
        Ok(out)
    }

    /// Base45 text of the signed seal, as placed in the barcode.
    pub fn barcode_payload(&self) -> Result<String, FormatError> {
        Ok(base45::encode(&self.signed_seal()?))
    }

    // -- decode -------------------------------------------------------------

    /// Decode a signed seal.
    pub fn from_signed_seal(bytes: &[u8]) -> Result<Self, FormatError> {
        let (header, offset) = SealHeader::decode(bytes)?;
        let mut features = FeatureMap::new();
        let mut cursor = offset;
        let signature_data = loop {
            match bytes.get(cursor) {
                Some(&tlv::SIGNATURE_MARKER) => break tlv::extract_signature(bytes, cursor)?,
                Some(_) => {
                    let (entry, consumed) = tlv::decode_entry(&bytes[cursor..])?;
                    features.insert(entry.tag, entry.value)?;
                    cursor += consumed;
                }
                None => {
                    return Err(FormatError::Truncated {
                        context: "signature zone",
                        needed: cursor + 1,
                        available: bytes.len(),
                    })
                }
            }
        };
        tracing::debug!(
            bytes = bytes.len(),
            features = features.len(),
            signature = signature_data.len(),
            "decoded signed seal"
        );
        Ok(Self {
            header,
            features,
            signature_data,
        })
    }

    /// Decode an unsigned seal. The signature becomes the zero placeholder.
    pub fn from_unsigned_seal(bytes: &[u8]) -> Result<Self, FormatError> {
        let (header, offset) = SealHeader::decode(bytes)?;
        let features = FeatureMap::decode(&bytes[offset..])?;
        tracing::debug!(bytes = bytes.len(), features = features.len(), "decoded unsigned seal");
        Ok(Self {
            header,
            features,
            signature_data: vec![0u8; DEFAULT_SIGNATURE_LEN],
        })
    }

    /// Decode barcode text.
    pub fn from_barcode_payload(text: &str) -> Result<Self, FormatError> {
        Self::from_signed_seal(&base45::decode(text)?)
    }

    /// Replace the header from a complete header zone.
    pub fn set_header_zone(&mut self, bytes: &[u8]) -> Result<(), FormatError> {
        let (header, consumed) = SealHeader::decode(bytes)?;
        if consumed != bytes.len() {
            return Err(FormatError::LengthMismatch {
                context: "header zone",
                declared: consumed,
                available: bytes.len(),
            });
        }
        self.header = header;
        Ok(())
    }

    /// Replace the features from a complete message zone.
    pub fn set_message_zone(&mut self, bytes: &[u8]) -> Result<(), FormatError> {
        self.features = FeatureMap::decode(bytes)?;
        Ok(())
    }

    /// Replace header and features from an unsigned seal, keeping the
    /// current signature.
    pub fn set_unsigned_seal(&mut self, bytes: &[u8]) -> Result<(), FormatError> {
        let decoded = Self::from_unsigned_seal(bytes)?;
        self.header = decoded.header;
        self.features = decoded.features;
        Ok(())
    }

    /// Replace everything from a signed seal.
    pub fn set_signed_seal(&mut self, bytes: &[u8]) -> Result<(), FormatError> {
        *self = Self::from_signed_seal(bytes)?;
        Ok(())
    }
}

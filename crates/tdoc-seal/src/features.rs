//! # Ordered Feature Map
//!
//! The message zone is written by iterating the features in insertion
//! order, so the map is a vector of `(tag, value)` pairs rather than a
//! hash map. Replacing the value of an existing tag keeps its position.

use tdoc_codec::tlv::{self, SIGNATURE_MARKER};
use tdoc_core::FormatError;

/// Seal features keyed by tag, iterated in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureMap {
    entries: Vec<(u8, Vec<u8>)>,
}

impl FeatureMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value for `tag`.
    ///
    /// # Errors
    ///
    /// [`FormatError::FeatureValue`] for the reserved signature marker tag.
    pub fn insert(&mut self, tag: u8, value: Vec<u8>) -> Result<(), FormatError> {
        if tag == SIGNATURE_MARKER {
            return Err(FormatError::FeatureValue {
                tag,
                reason: String::from("tag 0xFF is reserved for the signature zone"),
            });
        }
        match self.entries.iter_mut().find(|(t, _)| *t == tag) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((tag, value)),
        }
        Ok(())
    }

    /// The value stored for `tag`.
    pub fn get(&self, tag: u8) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, v)| v.as_slice())
    }

    /// The value stored for `tag`, or [`FormatError::MissingFeature`].
    pub fn require(&self, tag: u8) -> Result<&[u8], FormatError> {
        self.get(tag).ok_or(FormatError::MissingFeature(tag))
    }

    /// Remove `tag`, returning its value.
    pub fn remove(&mut self, tag: u8) -> Option<Vec<u8>> {
        let index = self.entries.iter().position(|(t, _)| *t == tag)?;
        Some(self.entries.remove(index).1)
    }

    /// True if `tag` is present.
    pub fn contains(&self, tag: u8) -> bool {
        self.get(tag).is_some()
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no features.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Tags in insertion order.
    pub fn tags(&self) -> Vec<u8> {
        self.entries.iter().map(|(t, _)| *t).collect()
    }

    /// `(tag, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &[u8])> {
        self.entries.iter().map(|(t, v)| (*t, v.as_slice()))
    }

    /// Encode the message zone.
    pub fn encode(&self) -> Result<Vec<u8>, FormatError> {
        let mut out = Vec::new();
        for (tag, value) in self.iter() {
            out.extend(tlv::encode_entry(tag, value)?);
        }
        Ok(out)
    }

    /// Decode a complete message zone.
    pub fn decode(bytes: &[u8]) -> Result<Self, FormatError> {
        let mut map = Self::new();
        for entry in tlv::decode_entries(bytes)? {
            map.insert(entry.tag, entry.value)?;
        }
        Ok(map)
    }
}

//! # Field and Seal Synchronisation
//!
//! The two directions between a visa's fields and its seal are plain
//! functions, called explicitly by [`VisaDocument`](crate::VisaDocument)
//! at its mutation entry points:
//!
//! - [`derive_seal_feature`]: fields to the C40 MRZ feature.
//! - [`derive_fields`]: MRZ feature to verified fields.
//!
//! ## MRZ Feature Content
//!
//! | Size | Feature | Text |
//! |------|---------|------|
//! | MRV-A | `0x01` | line 1 (44) + first 28 of line 2 |
//! | MRV-B | `0x02` | line 1 (36) + line 2 (36) |
//!
//! Both are 72 characters, 48 bytes of C40. The MRV-A feature omits the
//! optional data, which therefore does not travel through the seal.

use serde::{Deserialize, Serialize};
use tdoc_core::mrz_text::FILLER;
use tdoc_core::{CoreFields, FormatError};
use tdoc_mrz::{mrv, DocumentSize, Mrz, ParsedMrz, VisaFields};
use tdoc_seal::visa_features::{self, MRZ_FEATURE_CHARS, TAG_MRZ_MRV_A, TAG_MRZ_MRV_B};

/// Visa sticker size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisaSize {
    /// Full-page sticker, two lines of 44.
    MrvA,
    /// Small sticker, two lines of 36.
    MrvB,
}

impl VisaSize {
    /// The MRZ geometry.
    pub fn document_size(self) -> DocumentSize {
        match self {
            Self::MrvA => DocumentSize::MrvA,
            Self::MrvB => DocumentSize::MrvB,
        }
    }

    /// Tag of the seal feature holding the MRZ.
    pub fn mrz_tag(self) -> u8 {
        match self {
            Self::MrvA => TAG_MRZ_MRV_A,
            Self::MrvB => TAG_MRZ_MRV_B,
        }
    }

    /// Width of the optional data field.
    pub fn optional_data_width(self) -> usize {
        self.document_size().optional_data_width()
    }
}

/// Compose the MRZ and encode the 72-character seal feature.
///
/// Returns `(tag, bytes)`.
pub fn derive_seal_feature(
    size: VisaSize,
    core: &CoreFields,
    visa: &VisaFields,
) -> Result<(u8, Vec<u8>), FormatError> {
    let mrz = mrv::compose(size.document_size(), core, visa)?;
    let text: String = mrz.concatenated().chars().take(MRZ_FEATURE_CHARS).collect();
    let tag = size.mrz_tag();
    let bytes = visa_features::encode_mrz(tag, &text)?;
    tracing::debug!(tag, bytes = bytes.len(), "derived MRZ seal feature");
    Ok((tag, bytes))
}

/// Decode the MRZ feature and verify the number, birth date and validity
/// check digits.
pub fn derive_fields(size: VisaSize, feature: &[u8]) -> Result<ParsedMrz, FormatError> {
    let tag = size.mrz_tag();
    let text = visa_features::decode_mrz(tag, feature)?;
    let width = size.document_size().line_length();
    let chars: Vec<char> = text.chars().collect();
    let (line1, line2) = chars.split_at(width.min(chars.len()));
    let mut line2: String = line2.iter().collect();
    while line2.chars().count() < width {
        line2.push(FILLER);
    }
    let mrz = Mrz::new(size.document_size(), vec![line1.iter().collect(), line2])?;
    match size {
        VisaSize::MrvA => mrv::parse_a(&mrz),
        VisaSize::MrvB => mrv::parse_b(&mrz),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tdoc_core::TypeCode;

    fn fields() -> (CoreFields, VisaFields) {
        let mut core = CoreFields::new(TypeCode::visa());
        core.set_number("VX1234567").unwrap();
        core.set_full_name("ERIKSSON, ANNA MARIA");
        core.set_birth_date("1974-08-12").unwrap();
        core.set_gender_marker("F").unwrap();
        core.set_expiration_date("2030-04-15").unwrap();
        let mut visa = VisaFields::new();
        visa.set_optional_data("ab12", 8).unwrap();
        (core, visa)
    }

    #[test]
    fn feature_is_48_bytes_for_both_sizes() {
        let (core, visa) = fields();
        for size in [VisaSize::MrvA, VisaSize::MrvB] {
            let (tag, bytes) = derive_seal_feature(size, &core, &visa).unwrap();
            assert_eq!(tag, size.mrz_tag());
            assert_eq!(bytes.len(), 48);
        }
    }

    #[test]
    fn fields_round_trip() {
        let (core, visa) = fields();
        for size in [VisaSize::MrvA, VisaSize::MrvB] {
            let (_, bytes) = derive_seal_feature(size, &core, &visa).unwrap();
            let parsed = derive_fields(size, &bytes).unwrap();
            assert_eq!(parsed.core, core);
        }
        let (_, bytes) = derive_seal_feature(VisaSize::MrvB, &core, &visa).unwrap();
        assert_eq!(derive_fields(VisaSize::MrvB, &bytes).unwrap().optional_data.as_str(), "AB12");
    }

    #[test]
    fn tampered_feature_is_rejected() {
        let (core, visa) = fields();
        let mrz = mrv::compose(DocumentSize::MrvB, &core, &visa).unwrap();
        let mut text = mrz.concatenated();
        // Birth date check digit sits at line 2 position 19.
        let pos = 36 + 19;
        let replacement = if &text[pos..=pos] == "0" { "1" } else { "0" };
        text.replace_range(pos..=pos, replacement);
        let bytes = tdoc_codec::c40::encode(&text).unwrap();
        assert!(matches!(
            derive_fields(VisaSize::MrvB, &bytes),
            Err(FormatError::CheckDigitMismatch { field: "birthDate", .. })
        ));
    }
}

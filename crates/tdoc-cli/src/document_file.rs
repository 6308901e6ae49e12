//! # Document Files
//!
//! YAML or JSON description of a document, as read by `tdoc mrz` and
//! `tdoc seal encode`.
//!
//! ```yaml
//! size: td3
//! number: L898902C3
//! fullName: Eriksson, Anna Maria
//! birthDate: 1974-08-12
//! genderMarker: F
//! expirationDate: 2012-04-15
//! optionalData: ZE184226B
//! ```
//!
//! Visas add a `visa:` section with the visa fields and the seal-only
//! features (`durationOfStay`, `visaTypeCode`, `additionalFeature`).

use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use tdoc_codec::hex_util;
use tdoc_core::{CoreFields, OptionalData, TdocError, TypeCode, ValidationError};
use tdoc_mrz::layout::TD1_OPTIONAL_DATA_2_WIDTH;
use tdoc_mrz::{mrv, td1, td2, td3, DocumentSize, Mrz, VisaFields};
use tdoc_seal::IssuerProfile;
use tdoc_visa::{VisaDocument, VisaSize};

/// A document as described in a file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DocumentFile {
    /// Document size class.
    pub size: DocumentSize,
    /// Defaults to `P` for TD3, `I` for TD1/TD2 and `V` for visas.
    #[serde(default)]
    pub type_code: Option<String>,
    /// Issuing state. Defaults to the specimen state `UTO`.
    #[serde(default)]
    pub authority_code: Option<String>,
    /// Document number.
    pub number: String,
    /// Holder name as `Surname, Given names`.
    pub full_name: String,
    /// Holder nationality. Defaults to `UTO`.
    #[serde(default)]
    pub nationality_code: Option<String>,
    /// ISO birth date.
    pub birth_date: String,
    /// `F`, `M` or `X`.
    pub gender_marker: String,
    /// ISO expiry date. For visas this is the valid-until date.
    pub expiration_date: String,
    /// Line 2 optional data.
    #[serde(default)]
    pub optional_data: String,
    /// TD1 only: the second optional data field.
    #[serde(default)]
    pub optional_data_2: String,
    /// Visa-only fields. Ignored for passport sizes.
    #[serde(default)]
    pub visa: Option<VisaSection>,
}

/// Entry count written either as a number or as text such as `Multiple`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EntriesInput {
    /// A plain count, `0` meaning unlimited.
    Count(i64),
    /// Text such as `Multiple`, or a count written as a string.
    Text(String),
}

/// Visa-only fields.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VisaSection {
    /// Place of issue.
    #[serde(default)]
    pub place_of_issue: String,
    /// ISO first day of validity.
    #[serde(default)]
    pub valid_from: Option<String>,
    /// Permitted number of entries. Unlimited when absent.
    #[serde(default)]
    pub number_of_entries: Option<EntriesInput>,
    /// Visa category text.
    #[serde(default)]
    pub visa_type: String,
    /// VIZ remarks.
    #[serde(default)]
    pub additional_info: String,
    /// Number of the passport the visa is attached to.
    #[serde(default)]
    pub passport_number: String,
    /// Carry the passport number in the MRZ number field.
    #[serde(default, rename = "usePassportInMRZ")]
    pub use_passport_in_mrz: bool,
    /// `[days, months, years]`.
    #[serde(default)]
    pub duration_of_stay: Option<[i64; 3]>,
    /// Hex visa type code.
    #[serde(default)]
    pub visa_type_code: Option<String>,
    /// Hex bytes of the additional feature.
    #[serde(default)]
    pub additional_feature: Option<String>,
}

impl DocumentFile {
    fn default_type_code(&self) -> TypeCode {
        match self.size {
            DocumentSize::Td3 => TypeCode::passport(),
            DocumentSize::Td1 | DocumentSize::Td2 => TypeCode::identity_card(),
            DocumentSize::MrvA | DocumentSize::MrvB => TypeCode::visa(),
        }
    }

    /// Validate the identity fields.
    pub fn core_fields(&self) -> Result<CoreFields, ValidationError> {
        let mut core = CoreFields::new(self.default_type_code());
        if let Some(code) = &self.type_code {
            core.set_type_code(code)?;
        }
        if let Some(code) = &self.authority_code {
            core.set_authority_code(code)?;
        }
        core.set_number(&self.number)?;
        core.set_full_name(&self.full_name);
        if let Some(code) = &self.nationality_code {
            core.set_nationality_code(code)?;
        }
        core.set_birth_date(&self.birth_date)?;
        core.set_gender_marker(&self.gender_marker)?;
        core.set_expiration_date(&self.expiration_date)?;
        Ok(core)
    }

    /// Validate the visa fields. Non-visa sizes get an empty set.
    pub fn visa_fields(&self) -> Result<VisaFields, ValidationError> {
        let mut visa = VisaFields::new();
        let section = self.visa.clone().unwrap_or_default();
        visa.set_place_of_issue(&section.place_of_issue);
        if let Some(date) = &section.valid_from {
            visa.set_valid_from(date)?;
        }
        match &section.number_of_entries {
            Some(EntriesInput::Count(n)) => visa.set_number_of_entries(&n.to_string())?,
            Some(EntriesInput::Text(text)) => visa.set_number_of_entries(text)?,
            None => {}
        }
        visa.set_visa_type(&section.visa_type);
        visa.set_additional_info(&section.additional_info);
        visa.set_passport_number(&section.passport_number)?;
        visa.set_use_passport_in_mrz(section.use_passport_in_mrz);
        if self.size.is_visa() {
            visa.set_optional_data(&self.optional_data, self.size.optional_data_width())?;
        }
        Ok(visa)
    }

    /// Compose the MRZ for the file's size.
    pub fn compose(&self) -> Result<Mrz, TdocError> {
        let core = self.core_fields()?;
        let width = self.size.optional_data_width();
        let mrz = match self.size {
            DocumentSize::Td1 => td1::compose(
                &core,
                &OptionalData::new(&self.optional_data, width)?,
                &OptionalData::new(&self.optional_data_2, TD1_OPTIONAL_DATA_2_WIDTH)?,
            )?,
            DocumentSize::Td2 => td2::compose(&core, &OptionalData::new(&self.optional_data, width)?)?,
            DocumentSize::Td3 => td3::compose(&core, &OptionalData::new(&self.optional_data, width)?)?,
            DocumentSize::MrvA | DocumentSize::MrvB => {
                mrv::compose(self.size, &core, &self.visa_fields()?)?
            }
        };
        Ok(mrz)
    }

    /// Build a sealed visa. Only MRV-A and MRV-B files qualify.
    pub fn visa_document(&self, profile: &IssuerProfile, today: NaiveDate) -> Result<VisaDocument> {
        let size = match self.size {
            DocumentSize::MrvA => VisaSize::MrvA,
            DocumentSize::MrvB => VisaSize::MrvB,
            other => bail!("a seal needs a visa document (mrva or mrvb), got {other}"),
        };
        let seal = profile.seal(today)?;
        let mut doc = VisaDocument::new(size, self.core_fields()?, self.visa_fields()?, seal)?;
        if let Some(section) = &self.visa {
            if let Some(duration) = section.duration_of_stay {
                doc.set_duration_of_stay(duration)?;
            }
            if let Some(code) = &section.visa_type_code {
                doc.set_visa_type_code(code)?;
            }
            if let Some(hex) = &section.additional_feature {
                doc.set_additional_feature(hex_util::decode(hex)?)?;
            }
        }
        Ok(doc)
    }
}

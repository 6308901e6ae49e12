//! # Visa Document
//!
//! [`VisaDocument`] owns a visa's identity fields, its visa fields and its
//! Visible Digital Seal, and keeps the seal's MRZ feature consistent with
//! the fields.
//!
//! ## Invariant
//!
//! After every successful mutation the seal's MRZ feature (`0x01` or `0x02`)
//! decodes to exactly the fields held by the document. Mutations work on
//! copies and commit fields and seal together, so a failed setter leaves
//! the whole document untouched.
//!
//! ## Synchronised features
//!
//! | Feature | Written by |
//! |---------|------------|
//! | MRZ (`0x01`/`0x02`) | every field setter |
//! | Entries (`0x03`) | every field setter |
//! | Passport number (`0x05`) | every field setter, removed when empty |
//! | Duration of stay (`0x04`) | [`VisaDocument::set_duration_of_stay`] |
//! | Visa type (`0x06`) | [`VisaDocument::set_visa_type_code`] |
//! | Additional feature (`0x07`) | [`VisaDocument::set_additional_feature`] |

use chrono::NaiveDate;
use serde::Serialize;
use tdoc_core::{CoreFields, FormatError, TdocError, TypeCode, ValidationError};
use tdoc_mrz::{mrv, Mrz, NumberOfEntries, VisaFields};
use tdoc_seal::visa_features::{
    self, DurationOfStay, TAG_ADDITIONAL_FEATURE, TAG_DURATION_OF_STAY, TAG_ENTRIES,
    TAG_MRZ_MRV_A, TAG_MRZ_MRV_B, TAG_PASSPORT_NUMBER, TAG_VISA_TYPE,
};
use tdoc_seal::{DigitalSeal, IssuerProfile, SealHeader, SealSigner};

use crate::sync::{derive_fields, derive_seal_feature, VisaSize};

/// A machine-readable visa with its digital seal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisaDocument {
    size: VisaSize,
    #[serde(flatten)]
    core: CoreFields,
    #[serde(flatten)]
    visa: VisaFields,
    #[serde(skip)]
    seal: DigitalSeal,
}

impl VisaDocument {
    /// Assemble a visa and write the synchronised features into `seal`.
    pub fn new(
        size: VisaSize,
        core: CoreFields,
        visa: VisaFields,
        mut seal: DigitalSeal,
    ) -> Result<Self, TdocError> {
        write_synced_features(size, &core, &visa, &mut seal)?;
        Ok(Self {
            size,
            core,
            visa,
            seal,
        })
    }

    /// An empty MRV-A visa sealed by `profile`.
    pub fn mrv_a(profile: &IssuerProfile, today: NaiveDate) -> Result<Self, TdocError> {
        Self::blank(VisaSize::MrvA, profile, today)
    }

    /// An empty MRV-B visa sealed by `profile`.
    pub fn mrv_b(profile: &IssuerProfile, today: NaiveDate) -> Result<Self, TdocError> {
        Self::blank(VisaSize::MrvB, profile, today)
    }

    fn blank(size: VisaSize, profile: &IssuerProfile, today: NaiveDate) -> Result<Self, TdocError> {
        let seal = profile.seal(today)?;
        Self::new(size, CoreFields::new(TypeCode::visa()), VisaFields::new(), seal)
    }

    /// Build a visa from a decoded seal.
    ///
    /// The size follows the MRZ feature present: `0x01` for MRV-A, `0x02`
    /// for MRV-B.
    pub fn from_seal(seal: DigitalSeal) -> Result<Self, TdocError> {
        let size = if seal.features().contains(TAG_MRZ_MRV_A) {
            VisaSize::MrvA
        } else if seal.features().contains(TAG_MRZ_MRV_B) {
            VisaSize::MrvB
        } else {
            return Err(FormatError::MissingFeature(TAG_MRZ_MRV_B).into());
        };
        let mut doc = Self {
            size,
            core: CoreFields::new(TypeCode::visa()),
            visa: VisaFields::new(),
            seal: seal.clone(),
        };
        doc.adopt_seal(seal)?;
        Ok(doc)
    }

    /// Decode Base45 barcode text into a visa.
    pub fn from_barcode_payload(text: &str) -> Result<Self, TdocError> {
        Self::from_seal(DigitalSeal::from_barcode_payload(text)?)
    }

    /// Visa size class.
    pub fn size(&self) -> VisaSize {
        self.size
    }

    /// Identity fields.
    pub fn core(&self) -> &CoreFields {
        &self.core
    }

    /// Visa-specific fields.
    pub fn visa(&self) -> &VisaFields {
        &self.visa
    }

    /// The seal as last synchronised.
    pub fn seal(&self) -> &DigitalSeal {
        &self.seal
    }

    // -----------------------------------------------------------------------
    // Forward sync
    // -----------------------------------------------------------------------

    /// Apply `change` to copies of the fields, re-derive the seal features
    /// and commit everything together.
    pub fn update<F>(&mut self, change: F) -> Result<(), TdocError>
    where
        F: FnOnce(&mut CoreFields, &mut VisaFields) -> Result<(), ValidationError>,
    {
        let mut core = self.core.clone();
        let mut visa = self.visa.clone();
        change(&mut core, &mut visa)?;
        let mut seal = self.seal.clone();
        write_synced_features(self.size, &core, &visa, &mut seal)?;
        self.core = core;
        self.visa = visa;
        self.seal = seal;
        Ok(())
    }

    /// Rewrite the synchronised features from the current fields.
    pub fn refresh_seal(&mut self) -> Result<(), TdocError> {
        self.update(|_, _| Ok(()))
    }

    /// Assign the document type code.
    pub fn set_type_code(&mut self, value: &str) -> Result<(), TdocError> {
        self.update(|core, _| core.set_type_code(value))
    }

    /// Assign the issuing state.
    pub fn set_authority_code(&mut self, value: &str) -> Result<(), TdocError> {
        self.update(|core, _| core.set_authority_code(value))
    }

    /// Assign the visa number.
    pub fn set_number(&mut self, value: &str) -> Result<(), TdocError> {
        self.update(|core, _| core.set_number(value))
    }

    /// Assign the holder name. Never fails on its own, but the refreshed seal may.
    pub fn set_full_name(&mut self, value: &str) -> Result<(), TdocError> {
        self.update(|core, _| {
            core.set_full_name(value);
            Ok(())
        })
    }

    /// Assign the holder's nationality.
    pub fn set_nationality_code(&mut self, value: &str) -> Result<(), TdocError> {
        self.update(|core, _| core.set_nationality_code(value))
    }

    /// Assign the birth date from an ISO date.
    pub fn set_birth_date(&mut self, value: &str) -> Result<(), TdocError> {
        self.update(|core, _| core.set_birth_date(value))
    }

    /// Assign the sex marker.
    pub fn set_gender_marker(&mut self, value: &str) -> Result<(), TdocError> {
        self.update(|core, _| core.set_gender_marker(value))
    }

    /// Assign the valid-until date (the MRZ expiry field).
    pub fn set_valid_until(&mut self, value: &str) -> Result<(), TdocError> {
        self.update(|core, _| core.set_expiration_date(value))
    }

    /// Assign the place of issue. VIZ only.
    pub fn set_place_of_issue(&mut self, value: &str) -> Result<(), TdocError> {
        self.update(|_, visa| {
            visa.set_place_of_issue(value);
            Ok(())
        })
    }

    /// Assign the first day of validity. VIZ only.
    pub fn set_valid_from(&mut self, value: &str) -> Result<(), TdocError> {
        self.update(|_, visa| visa.set_valid_from(value))
    }

    /// Assign the entry count. `"Multiple"`, other text and `0` mean
    /// unlimited and are written to feature `0x03` as `0`.
    pub fn set_number_of_entries(&mut self, value: &str) -> Result<(), TdocError> {
        self.update(|_, visa| visa.set_number_of_entries(value))
    }

    /// Assign the visa category text. VIZ only.
    pub fn set_visa_type(&mut self, value: &str) -> Result<(), TdocError> {
        self.update(|_, visa| {
            visa.set_visa_type(value);
            Ok(())
        })
    }

    /// Assign the VIZ remarks.
    pub fn set_additional_info(&mut self, value: &str) -> Result<(), TdocError> {
        self.update(|_, visa| {
            visa.set_additional_info(value);
            Ok(())
        })
    }

    /// Assign the passport number. A non-empty value is written to feature `0x05`.
    pub fn set_passport_number(&mut self, value: &str) -> Result<(), TdocError> {
        self.update(|_, visa| visa.set_passport_number(value))
    }

    /// Carry the passport number in the MRZ number field instead of the
    /// visa number.
    pub fn set_use_passport_in_mrz(&mut self, value: bool) -> Result<(), TdocError> {
        self.update(|_, visa| {
            visa.set_use_passport_in_mrz(value);
            Ok(())
        })
    }

    /// Assign the optional data. Only MRV-B carries it through the seal.
    pub fn set_optional_data(&mut self, value: &str) -> Result<(), TdocError> {
        let width = self.size.optional_data_width();
        self.update(|_, visa| visa.set_optional_data(value, width))
    }

    // -----------------------------------------------------------------------
    // Seal-only features
    // -----------------------------------------------------------------------

    /// Validate `[days, months, years]` and write feature `0x04`.
    pub fn set_duration_of_stay(&mut self, values: [i64; 3]) -> Result<(), TdocError> {
        let duration = DurationOfStay::new(values)?;
        self.seal.set_feature(TAG_DURATION_OF_STAY, duration.encode())?;
        Ok(())
    }

    /// Decoded feature `0x04`, if present and well formed.
    pub fn duration_of_stay(&self) -> Option<DurationOfStay> {
        self.seal
            .feature(TAG_DURATION_OF_STAY)
            .and_then(|bytes| DurationOfStay::decode(bytes).ok())
    }

    /// Write the hex visa type code to feature `0x06`.
    pub fn set_visa_type_code(&mut self, code: &str) -> Result<(), TdocError> {
        let bytes = visa_features::visa_type_to_bytes(code)?;
        self.seal.set_feature(TAG_VISA_TYPE, bytes)?;
        Ok(())
    }

    /// Feature `0x06` as uppercase hex without leading zeros.
    pub fn visa_type_code(&self) -> Option<String> {
        self.seal
            .feature(TAG_VISA_TYPE)
            .and_then(|bytes| visa_features::visa_type_from_bytes(bytes).ok())
    }

    /// Write feature `0x07`, or remove it when `value` is empty.
    pub fn set_additional_feature(&mut self, value: Vec<u8>) -> Result<(), TdocError> {
        if value.is_empty() {
            self.seal.remove_feature(TAG_ADDITIONAL_FEATURE);
        } else {
            self.seal.set_feature(TAG_ADDITIONAL_FEATURE, value)?;
        }
        Ok(())
    }

    /// Raw feature `0x07`.
    pub fn additional_feature(&self) -> Option<&[u8]> {
        self.seal.feature(TAG_ADDITIONAL_FEATURE)
    }

    /// Mutable seal header. The header carries no field data.
    pub fn seal_header_mut(&mut self) -> &mut SealHeader {
        self.seal.header_mut()
    }

    /// Sign the unsigned seal.
    pub fn sign_with(&mut self, signer: &dyn SealSigner) -> Result<(), FormatError> {
        self.seal.sign_with(signer)
    }

    // -----------------------------------------------------------------------
    // Reverse sync
    // -----------------------------------------------------------------------

    /// Replace the header from its encoded bytes.
    pub fn set_header_zone(&mut self, bytes: &[u8]) -> Result<(), TdocError> {
        let mut candidate = self.seal.clone();
        candidate.set_header_zone(bytes)?;
        self.adopt_seal(candidate)
    }

    /// Replace the features from an encoded message zone and re-derive the fields.
    pub fn set_message_zone(&mut self, bytes: &[u8]) -> Result<(), TdocError> {
        let mut candidate = self.seal.clone();
        candidate.set_message_zone(bytes)?;
        self.adopt_seal(candidate)
    }

    /// Replace header and features from unsigned seal bytes and re-derive the fields.
    pub fn set_unsigned_seal(&mut self, bytes: &[u8]) -> Result<(), TdocError> {
        let mut candidate = self.seal.clone();
        candidate.set_unsigned_seal(bytes)?;
        self.adopt_seal(candidate)
    }

    /// Adopt a signed seal and re-derive the fields. On failure nothing changes.
    pub fn set_signed_seal(&mut self, bytes: &[u8]) -> Result<(), TdocError> {
        self.adopt_seal(DigitalSeal::from_signed_seal(bytes)?)
    }

    /// Adopt a seal from Base45 barcode text. On failure nothing changes.
    pub fn set_barcode_payload(&mut self, text: &str) -> Result<(), TdocError> {
        self.adopt_seal(DigitalSeal::from_barcode_payload(text)?)
    }

    /// Parse MRZ text into the fields and refresh the seal.
    pub fn set_machine_readable_zone(&mut self, text: &str) -> Result<(), TdocError> {
        let mrz = Mrz::from_text(self.size.document_size(), text)?;
        let parsed = match self.size {
            VisaSize::MrvA => mrv::parse_a(&mrz)?,
            VisaSize::MrvB => mrv::parse_b(&mrz)?,
        };
        let mut visa = self.visa.clone();
        let core = mrv::apply_to_visa(&parsed, self.core.number(), &mut visa)?;
        visa.set_optional_data(parsed.optional_data.as_str(), self.size.optional_data_width())?;
        let mut seal = self.seal.clone();
        write_synced_features(self.size, &core, &visa, &mut seal)?;
        self.core = core;
        self.visa = visa;
        self.seal = seal;
        Ok(())
    }

    /// Derive fields from `candidate` and commit fields and seal together.
    fn adopt_seal(&mut self, candidate: DigitalSeal) -> Result<(), TdocError> {
        let feature = candidate.features().require(self.size.mrz_tag())?;
        let parsed = derive_fields(self.size, feature)?;

        let mut visa = self.visa.clone();
        let core = mrv::apply_to_visa(&parsed, self.core.number(), &mut visa)?;
        if self.size == VisaSize::MrvB {
            visa.set_optional_data(parsed.optional_data.as_str(), self.size.optional_data_width())?;
        }
        if let Some(bytes) = candidate.feature(TAG_ENTRIES) {
            let count = visa_features::decode_entries(bytes)?;
            visa.set_number_of_entries_value(NumberOfEntries::from_byte(count)?);
        }
        if let Some(bytes) = candidate.feature(TAG_DURATION_OF_STAY) {
            DurationOfStay::decode(bytes)?;
        }
        if let Some(bytes) = candidate.feature(TAG_VISA_TYPE) {
            visa_features::visa_type_from_bytes(bytes)?;
        }
        if let Some(bytes) = candidate.feature(TAG_PASSPORT_NUMBER) {
            let number = visa_features::decode_passport_number(bytes)?;
            if !visa.use_passport_in_mrz() {
                visa.set_passport_number(&number)?;
            }
        }

        tracing::debug!(
            size = ?self.size,
            features = candidate.features().len(),
            "adopted seal"
        );
        self.core = core;
        self.visa = visa;
        self.seal = candidate;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Projections
    // -----------------------------------------------------------------------

    /// Compose the MRZ from the current fields.
    pub fn mrz(&self) -> Result<Mrz, FormatError> {
        mrv::compose(self.size.document_size(), &self.core, &self.visa)
    }

    /// First MRZ line.
    pub fn mrz_line1(&self) -> Result<String, FormatError> {
        Ok(self.mrz()?.line(1).map(str::to_string).unwrap_or_default())
    }

    /// Second MRZ line.
    pub fn mrz_line2(&self) -> Result<String, FormatError> {
        Ok(self.mrz()?.line(2).map(str::to_string).unwrap_or_default())
    }

    /// Both MRZ lines joined by a newline.
    pub fn machine_readable_zone(&self) -> Result<String, FormatError> {
        Ok(self.mrz()?.to_string())
    }

    /// Signed seal bytes.
    pub fn signed_seal(&self) -> Result<Vec<u8>, FormatError> {
        self.seal.signed_seal()
    }

    /// Base45 text of the signed seal.
    pub fn barcode_payload(&self) -> Result<String, FormatError> {
        self.seal.barcode_payload()
    }

    /// Visa number for the VIZ.
    pub fn number_viz(&self) -> String {
        self.core.number_viz()
    }

    /// Holder name for the VIZ.
    pub fn full_name_viz(&self) -> String {
        self.core.full_name_viz()
    }

    /// Nationality for the VIZ.
    pub fn nationality_code_viz(&self) -> String {
        self.core.nationality_code_viz()
    }

    /// Birth date as `DD MMM YYYY`.
    pub fn birth_date_viz(&self) -> String {
        self.core.birth_date_viz()
    }

    /// Sex marker for the VIZ.
    pub fn gender_marker_viz(&self) -> String {
        self.core.gender_marker_viz()
    }

    /// Valid-until date as `DD MMM YYYY`.
    pub fn valid_until_viz(&self) -> String {
        self.core.expiration_date_viz()
    }

    /// Valid-from date as `DD MMM YYYY`.
    pub fn valid_from_viz(&self) -> String {
        self.visa.valid_from_viz()
    }

    /// Place of issue for the VIZ.
    pub fn place_of_issue_viz(&self) -> String {
        self.visa.place_of_issue_viz()
    }

    /// Entries for the VIZ.
    pub fn number_of_entries_viz(&self) -> String {
        self.visa.number_of_entries_viz()
    }

    /// Visa category for the VIZ.
    pub fn visa_type_viz(&self) -> String {
        self.visa.visa_type_viz()
    }

    /// Remarks for the VIZ.
    pub fn additional_info_viz(&self) -> String {
        self.visa.additional_info_viz()
    }

    /// Passport number for the VIZ.
    pub fn passport_number_viz(&self) -> String {
        self.visa.passport_number_viz()
    }

    /// Duration of stay as `D DAYS, M MONTHS, Y YEARS`, omitting zero parts.
    pub fn duration_of_stay_viz(&self) -> String {
        let Some(d) = self.duration_of_stay() else {
            return String::new();
        };
        [(d.days, "DAYS"), (d.months, "MONTHS"), (d.years, "YEARS")]
            .iter()
            .filter(|(n, _)| *n > 0)
            .map(|(n, unit)| format!("{n} {unit}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn write_synced_features(
    size: VisaSize,
    core: &CoreFields,
    visa: &VisaFields,
    seal: &mut DigitalSeal,
) -> Result<(), FormatError> {
    let (tag, bytes) = derive_seal_feature(size, core, visa)?;
    seal.set_feature(tag, bytes)?;
    seal.set_feature(
        TAG_ENTRIES,
        visa_features::encode_entries(visa.number_of_entries().to_byte()),
    )?;
    if visa.passport_number().is_empty() {
        seal.remove_feature(TAG_PASSPORT_NUMBER);
    } else {
        seal.set_feature(
            TAG_PASSPORT_NUMBER,
            visa_features::encode_passport_number(visa.passport_number().as_str())?,
        )?;
    }
    Ok(())
}

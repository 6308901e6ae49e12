//! # Issuer Profile
//!
//! Seal issuer configuration, loaded from YAML or JSON:
//!
//! ```yaml
//! version: v4
//! authorityCode: UTO
//! identifierCode: UTSS
//! certReference: 1A
//! featureDefinitionRef: 93
//! typeCategory: 1
//! signatureLength: 64
//! ```
//!
//! Validation uses the same rules as the [`SealHeader`] setters, so a
//! profile that loads always produces a valid seal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tdoc_core::ValidationError;

use crate::header::{SealHeader, VdsVersion};
use crate::seal::DigitalSeal;
use crate::signer::DEFAULT_SIGNATURE_LEN;

/// ICAO feature definition reference for visa seals.
pub const VISA_FEATURE_DEFINITION_REF: u8 = 0x5D;

/// ICAO document type category for visas.
pub const VISA_TYPE_CATEGORY: u8 = 0x01;

fn default_signature_length() -> usize {
    DEFAULT_SIGNATURE_LEN
}

/// Issuer-side seal settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IssuerProfile {
    /// Seal format version.
    #[serde(default)]
    pub version: VdsVersion,
    /// Issuing country, three characters.
    pub authority_code: String,
    /// Signer identifier, four characters.
    pub identifier_code: String,
    /// Certificate reference (hex).
    pub cert_reference: String,
    /// Feature definition reference, 1-254.
    pub feature_definition_ref: i64,
    /// Document type category, 1-254.
    pub type_category: i64,
    /// Length of stub signatures.
    #[serde(default = "default_signature_length")]
    pub signature_length: usize,
    /// Fixed issue date; the caller's date is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,
}

impl Default for IssuerProfile {
    fn default() -> Self {
        Self {
            version: VdsVersion::V4,
            authority_code: String::from("UTO"),
            identifier_code: String::from("UTSS"),
            cert_reference: String::from("1A"),
            feature_definition_ref: i64::from(VISA_FEATURE_DEFINITION_REF),
            type_category: i64::from(VISA_TYPE_CATEGORY),
            signature_length: DEFAULT_SIGNATURE_LEN,
            issue_date: None,
        }
    }
}

impl IssuerProfile {
    /// Build the seal header, signed and issued on `today` unless the
    /// profile fixes an issue date.
    pub fn header(&self, today: NaiveDate) -> Result<SealHeader, ValidationError> {
        let issued = self.issue_date.unwrap_or(today);
        SealHeader::new(
            self.version,
            &self.authority_code,
            &self.identifier_code,
            &self.cert_reference,
            issued,
            issued,
            self.feature_definition_ref,
            self.type_category,
        )
    }

    /// Check every field without building anything.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.header(NaiveDate::default()).map(|_| ())
    }

    /// A fresh, featureless seal for this issuer.
    pub fn seal(&self, today: NaiveDate) -> Result<DigitalSeal, ValidationError> {
        let mut seal = DigitalSeal::new(self.header(today)?);
        seal.set_signature_data(vec![0u8; self.signature_length]);
        Ok(seal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn default_profile_is_valid() {
        let profile = IssuerProfile::default();
        profile.validate().unwrap();
        let seal = profile.seal(today()).unwrap();
        assert_eq!(seal.header().authority_code().as_str(), "UTO");
        assert_eq!(seal.header().issue_date(), today());
        assert_eq!(seal.signature_data().len(), 64);
    }

    #[test]
    fn loads_from_yaml() {
        let yaml = "\
version: v3
authorityCode: D<<
identifierCode: DETS
certReference: 0000A
featureDefinitionRef: 93
typeCategory: 3
issueDate: 2023-11-02
";
        let profile: IssuerProfile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(profile.version, VdsVersion::V3);
        assert_eq!(profile.signature_length, 64);
        let header = profile.header(today()).unwrap();
        assert_eq!(header.authority_code().as_str(), "D<<");
        assert_eq!(header.issue_date(), NaiveDate::from_ymd_opt(2023, 11, 2).unwrap());
    }

    #[test]
    fn loads_from_json_and_rejects_bad_values() {
        let json = r#"{"authorityCode":"UTO","identifierCode":"UTSS","certReference":"1A",
            "featureDefinitionRef":0,"typeCategory":1}"#;
        let profile: IssuerProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.version, VdsVersion::V4);
        assert!(matches!(
            profile.validate(),
            Err(ValidationError::OutOfRange { field: "featureDefinitionRef", .. })
        ));
    }

    #[test]
    fn unknown_fields_rejected() {
        let json = r#"{"authorityCode":"UTO","identifierCode":"UTSS","certReference":"1A",
            "featureDefinitionRef":93,"typeCategory":1,"colour":"red"}"#;
        assert!(serde_json::from_str::<IssuerProfile>(json).is_err());
    }
}

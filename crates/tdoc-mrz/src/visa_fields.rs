//! # Visa Fields
//!
//! Fields a machine-readable visa carries on top of [`CoreFields`]. They
//! are composed alongside the core set rather than merged into it, so the
//! same [`CoreFields`] type serves passports, ID cards and visas.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tdoc_core::fields::parse_date;
use tdoc_core::viz;
use tdoc_core::{CoreFields, DocumentNumber, OptionalData, ValidationError};

/// Largest finite entry count a seal can carry in one byte.
pub const MAX_ENTRIES: u8 = 254;

/// Number of entries a visa permits.
///
/// `0` and any non-numeric text (`"Multiple"`) mean unlimited entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum NumberOfEntries {
    /// Multiple / unlimited entries.
    #[default]
    Unlimited,
    /// A fixed number of entries, 1 to 254.
    Limited(u8),
}

impl NumberOfEntries {
    /// Parse form input.
    ///
    /// # Errors
    ///
    /// [`ValidationError::OutOfRange`] for numbers above 254.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let v = value.trim();
        match v.parse::<i64>() {
            Ok(n) => Self::from_count(n),
            Err(_) => Ok(Self::Unlimited),
        }
    }

    /// Build from a numeric count, `0` meaning unlimited.
    pub fn from_count(n: i64) -> Result<Self, ValidationError> {
        match n {
            0 => Ok(Self::Unlimited),
            1..=254 => Ok(Self::Limited(n as u8)),
            _ => Err(ValidationError::OutOfRange {
                field: "numberOfEntries",
                value: n,
                min: 0,
                max: i64::from(MAX_ENTRIES),
            }),
        }
    }

    /// Seal byte: `0` for unlimited.
    pub fn to_byte(self) -> u8 {
        match self {
            Self::Unlimited => 0,
            Self::Limited(n) => n,
        }
    }

    /// Decode the seal byte.
    pub fn from_byte(b: u8) -> Result<Self, ValidationError> {
        Self::from_count(i64::from(b))
    }

    /// Display text.
    pub fn to_viz(self) -> String {
        match self {
            Self::Unlimited => String::from("MULTIPLE"),
            Self::Limited(n) => n.to_string(),
        }
    }
}

impl TryFrom<String> for NumberOfEntries {
    type Error = ValidationError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NumberOfEntries> for String {
    fn from(value: NumberOfEntries) -> Self {
        value.to_viz()
    }
}

impl std::fmt::Display for NumberOfEntries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_viz())
    }
}

/// Visa-specific fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisaFields {
    place_of_issue: String,
    valid_from: NaiveDate,
    number_of_entries: NumberOfEntries,
    visa_type: String,
    additional_info: String,
    passport_number: DocumentNumber,
    #[serde(rename = "usePassportInMRZ")]
    use_passport_in_mrz: bool,
    optional_data: OptionalData,
}

impl VisaFields {
    /// Empty visa fields: unlimited entries, valid from 1970-01-01.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place where the visa was issued, as entered.
    pub fn place_of_issue(&self) -> &str {
        &self.place_of_issue
    }

    /// First day of validity.
    pub fn valid_from(&self) -> NaiveDate {
        self.valid_from
    }

    /// Permitted number of entries.
    pub fn number_of_entries(&self) -> NumberOfEntries {
        self.number_of_entries
    }

    /// Visa category, as entered.
    pub fn visa_type(&self) -> &str {
        &self.visa_type
    }

    /// Free-text remarks printed in the VIZ.
    pub fn additional_info(&self) -> &str {
        &self.additional_info
    }

    /// Number of the passport the visa is attached to.
    pub fn passport_number(&self) -> &DocumentNumber {
        &self.passport_number
    }

    /// Whether the MRZ number field carries the passport number instead of
    /// the visa number.
    pub fn use_passport_in_mrz(&self) -> bool {
        self.use_passport_in_mrz
    }

    /// Optional data carried in line 2.
    pub fn optional_data(&self) -> &OptionalData {
        &self.optional_data
    }

    /// Assign the place of issue. Surrounding whitespace is removed.
    pub fn set_place_of_issue(&mut self, value: &str) {
        self.place_of_issue = value.trim().to_string();
    }

    /// Assign the first day of validity from an ISO date.
    pub fn set_valid_from(&mut self, value: &str) -> Result<(), ValidationError> {
        self.valid_from = parse_date("validFrom", value)?;
        Ok(())
    }

    /// Assign the first day of validity.
    pub fn set_valid_from_value(&mut self, date: NaiveDate) {
        self.valid_from = date;
    }

    /// Assign the entries from a count. `0` and non-numeric text mean unlimited.
    pub fn set_number_of_entries(&mut self, value: &str) -> Result<(), ValidationError> {
        self.number_of_entries = NumberOfEntries::parse(value)?;
        Ok(())
    }

    /// Assign the permitted number of entries.
    pub fn set_number_of_entries_value(&mut self, entries: NumberOfEntries) {
        self.number_of_entries = entries;
    }

    /// Assign the visa category.
    pub fn set_visa_type(&mut self, value: &str) {
        self.visa_type = value.trim().to_string();
    }

    /// Assign the VIZ remarks.
    pub fn set_additional_info(&mut self, value: &str) {
        self.additional_info = value.trim().to_string();
    }

    /// Assign the passport number (at most nine characters).
    pub fn set_passport_number(&mut self, value: &str) -> Result<(), ValidationError> {
        self.passport_number = DocumentNumber::new_for("passportNumber", value)?;
        Ok(())
    }

    /// Choose whether the MRZ number field carries the passport number.
    pub fn set_use_passport_in_mrz(&mut self, value: bool) {
        self.use_passport_in_mrz = value;
    }

    /// Assign optional data for a visa whose field is `width` wide.
    pub fn set_optional_data(&mut self, value: &str, width: usize) -> Result<(), ValidationError> {
        self.optional_data = OptionalData::new(value, width)?;
        Ok(())
    }

    /// The nine-character MRZ number field.
    pub fn mrz_number(&self, core: &CoreFields) -> String {
        if self.use_passport_in_mrz {
            self.passport_number.to_mrz()
        } else {
            core.number_mrz()
        }
    }

    // -- VIZ projections ----------------------------------------------------

    /// Place of issue for the VIZ.
    pub fn place_of_issue_viz(&self) -> String {
        viz::text_to_viz(&self.place_of_issue)
    }

    /// First day of validity as `DD MMM YYYY`.
    pub fn valid_from_viz(&self) -> String {
        viz::date_to_viz(self.valid_from)
    }

    /// Entries for the VIZ.
    pub fn number_of_entries_viz(&self) -> String {
        self.number_of_entries.to_viz()
    }

    /// Visa category for the VIZ.
    pub fn visa_type_viz(&self) -> String {
        viz::text_to_viz(&self.visa_type)
    }

    /// Remarks for the VIZ.
    pub fn additional_info_viz(&self) -> String {
        viz::text_to_viz(&self.additional_info)
    }

    /// Passport number for the VIZ.
    pub fn passport_number_viz(&self) -> String {
        viz::text_to_viz(self.passport_number.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tdoc_core::TypeCode;

    #[test]
    fn entries_parsing() {
        assert_eq!(NumberOfEntries::parse("Multiple").unwrap(), NumberOfEntries::Unlimited);
        assert_eq!(NumberOfEntries::parse("0").unwrap(), NumberOfEntries::Unlimited);
        assert_eq!(NumberOfEntries::parse(" 3 ").unwrap(), NumberOfEntries::Limited(3));
        assert_eq!(NumberOfEntries::parse("3").unwrap().to_byte(), 3);
        assert_eq!(NumberOfEntries::parse("Multiple").unwrap().to_byte(), 0);
        assert!(matches!(
            NumberOfEntries::parse("255"),
            Err(ValidationError::OutOfRange { value: 255, .. })
        ));
        assert!(NumberOfEntries::parse("-1").is_err());
    }

    #[test]
    fn entries_bytes() {
        assert_eq!(NumberOfEntries::from_byte(0).unwrap(), NumberOfEntries::Unlimited);
        assert_eq!(NumberOfEntries::from_byte(7).unwrap(), NumberOfEntries::Limited(7));
        assert!(NumberOfEntries::from_byte(255).is_err());
    }

    #[test]
    fn mrz_number_selection() {
        let mut core = CoreFields::new(TypeCode::new("V").unwrap());
        core.set_number("VISA123").unwrap();
        let mut visa = VisaFields::new();
        visa.set_passport_number("P1234567").unwrap();
        assert_eq!(visa.mrz_number(&core), "VISA123<<");
        visa.set_use_passport_in_mrz(true);
        assert_eq!(visa.mrz_number(&core), "P1234567<");
    }

    #[test]
    fn rejected_passport_number_keeps_previous() {
        let mut visa = VisaFields::new();
        visa.set_passport_number("P1234567").unwrap();
        assert!(visa.set_passport_number("P12345678901").is_err());
        assert_eq!(visa.passport_number().as_str(), "P1234567");
    }

    #[test]
    fn viz_projections() {
        let mut visa = VisaFields::new();
        visa.set_place_of_issue("Zenith");
        visa.set_valid_from("2024-05-01").unwrap();
        assert_eq!(visa.place_of_issue_viz(), "ZENITH");
        assert_eq!(visa.valid_from_viz(), "01 MAY 2024");
        assert_eq!(visa.number_of_entries_viz(), "MULTIPLE");
    }

    #[test]
    fn serde_uses_camel_case() {
        let mut visa = VisaFields::new();
        visa.set_number_of_entries("2").unwrap();
        let json = serde_json::to_value(&visa).unwrap();
        assert_eq!(json["numberOfEntries"], "2");
        assert_eq!(json["usePassportInMRZ"], false);
        let back: VisaFields = serde_json::from_value(json).unwrap();
        assert_eq!(back, visa);
    }
}

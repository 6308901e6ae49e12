//! # Machine-Readable Visas (MRV-A, MRV-B)
//!
//! Visa stickers reuse the passport line 1 and the shared identity run on
//! line 2, followed by optional data that fills the rest of the line. There
//! is no composite check digit.
//!
//! ```text
//! MRV-A line 2: L8988901C4XXX4009078F9612109<<<<<<<<<<<<<<<<
//! MRV-B line 2: L8988901C4XXX4009078F9612109<<<<<<<<
//! ```
//!
//! When [`VisaFields::use_passport_in_mrz`] is set the number field holds
//! the passport number instead of the visa number.

use tdoc_core::{CoreFields, DocumentNumber, FormatError, OptionalData};

use crate::layout::{
    char_at, ensure_ascii, identity_run, slice, verify_identity_run, DocumentSize, Mrz, ParsedMrz,
    RawIdentity,
};
use crate::visa_fields::VisaFields;

/// Compose a visa MRZ of `size`.
///
/// `size` must be [`DocumentSize::MrvA`] or [`DocumentSize::MrvB`]; other
/// sizes produce lines of the wrong width and are rejected by [`Mrz::new`].
pub fn compose(size: DocumentSize, core: &CoreFields, visa: &VisaFields) -> Result<Mrz, FormatError> {
    let line1 = format!(
        "{}{}{}",
        core.type_code_mrz(),
        core.authority_code_mrz(),
        core.full_name_mrz(size.name_width())
    );
    let mut line2 = identity_run(&visa.mrz_number(core), core);
    line2.push_str(&visa.optional_data().to_mrz(size.optional_data_width()));
    Mrz::new(size, vec![line1, line2])
}

/// Compose an MRV-A (two lines of 44).
pub fn compose_a(core: &CoreFields, visa: &VisaFields) -> Result<Mrz, FormatError> {
    compose(DocumentSize::MrvA, core, visa)
}

/// Compose an MRV-B (two lines of 36).
pub fn compose_b(core: &CoreFields, visa: &VisaFields) -> Result<Mrz, FormatError> {
    compose(DocumentSize::MrvB, core, visa)
}

/// Parse and verify an MRV-A MRZ.
///
/// The number field is returned in [`ParsedMrz::core`]; whether it is the
/// visa or the passport number is up to the caller (see [`apply_to_visa`]).
pub fn parse_a(mrz: &Mrz) -> Result<ParsedMrz, FormatError> {
    parse_sized(DocumentSize::MrvA, mrz)
}

/// Parse and verify an MRV-B MRZ.
pub fn parse_b(mrz: &Mrz) -> Result<ParsedMrz, FormatError> {
    parse_sized(DocumentSize::MrvB, mrz)
}

fn parse_sized(size: DocumentSize, mrz: &Mrz) -> Result<ParsedMrz, FormatError> {
    let mrz = &Mrz::new(size, mrz.lines().to_vec())?;
    ensure_ascii(mrz)?;
    let [line1, line2] = [&mrz.lines()[0], &mrz.lines()[1]];

    verify_identity_run(line2)?;

    let core = RawIdentity {
        type_code: slice(line1, 0, 2),
        authority: slice(line1, 2, 5),
        name: slice(line1, 5, size.line_length()),
        number: slice(line2, 0, 9),
        nationality: slice(line2, 10, 13),
        birth: slice(line2, 13, 19),
        sex: char_at(line2, 20),
        expiry: slice(line2, 21, 27),
    }
    .into_core()?;
    Ok(ParsedMrz {
        size,
        core,
        optional_data: OptionalData::from_mrz(slice(line2, 28, size.line_length())),
        optional_data_2: OptionalData::default(),
    })
}

/// Resolve the MRZ number field of a parsed visa.
///
/// With `use_passport_in_mrz` set the MRZ number is the passport number: it
/// is written to `visa` and the returned fields keep `current_number`, since
/// the visa number is not carried by the MRZ. Optional data is left to the
/// caller.
pub fn apply_to_visa(
    parsed: &ParsedMrz,
    current_number: &DocumentNumber,
    visa: &mut VisaFields,
) -> Result<CoreFields, FormatError> {
    let mut core = parsed.core.clone();
    if visa.use_passport_in_mrz() {
        visa.set_passport_number(parsed.core.number().as_str())?;
        core.set_number(current_number.as_str())?;
    }
    Ok(core)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tdoc_core::TypeCode;

    fn fields() -> (CoreFields, VisaFields) {
        let mut core = CoreFields::new(TypeCode::new("V").unwrap());
        core.set_authority_code("UTO").unwrap();
        core.set_number("L8988901C").unwrap();
        core.set_full_name("Eriksson, Anna Maria");
        core.set_nationality_code("XXX").unwrap();
        core.set_birth_date("1940-09-07").unwrap();
        core.set_gender_marker("F").unwrap();
        core.set_expiration_date("1996-12-10").unwrap();
        (core, VisaFields::new())
    }

    #[test]
    fn mrv_a_specimen_line_two() {
        let (core, visa) = fields();
        let mrz = compose_a(&core, &visa).unwrap();
        assert_eq!(
            mrz.line(1).unwrap(),
            "V<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<"
        );
        assert_eq!(
            mrz.line(2).unwrap(),
            "L8988901C4XXX4009078F9612109<<<<<<<<<<<<<<<<"
        );
    }

    #[test]
    fn mrv_b_lines_are_36() {
        let (core, visa) = fields();
        let mrz = compose_b(&core, &visa).unwrap();
        assert_eq!(mrz.line(2).unwrap(), "L8988901C4XXX4009078F9612109<<<<<<<<");
        assert!(mrz.lines().iter().all(|l| l.len() == 36));
    }

    #[test]
    fn passport_number_in_mrz_round_trips() {
        let (core, mut visa) = fields();
        visa.set_passport_number("P7654321").unwrap();
        visa.set_use_passport_in_mrz(true);
        visa.set_optional_data("extra", 8).unwrap();
        let mrz = compose_b(&core, &visa).unwrap();
        assert!(mrz.line(2).unwrap().starts_with("P7654321<"));

        let parsed = parse_b(&mrz).unwrap();
        let mut target = VisaFields::new();
        target.set_use_passport_in_mrz(true);
        let back = apply_to_visa(&parsed, core.number(), &mut target).unwrap();
        assert_eq!(target.passport_number().as_str(), "P7654321");
        assert_eq!(parsed.optional_data.as_str(), "EXTRA");
        assert_eq!(back.number().as_str(), "L8988901C");
    }

    #[test]
    fn validity_tamper_detected() {
        let (core, visa) = fields();
        let mrz = compose_a(&core, &visa).unwrap();
        let mut lines = mrz.lines().to_vec();
        lines[1].replace_range(27..28, "0");
        assert!(matches!(
            parse_a(&Mrz::new(DocumentSize::MrvA, lines).unwrap()),
            Err(FormatError::CheckDigitMismatch { field: "expirationDate", .. })
        ));
    }

    #[test]
    fn rejects_passport_sizes() {
        let td1 = Mrz::new(DocumentSize::Td1, vec!["<".repeat(30); 3]).unwrap();
        assert!(matches!(parse_a(&td1), Err(FormatError::LineCount { .. })));
        let (core, visa) = fields();
        let mrv_b = compose_b(&core, &visa).unwrap();
        assert!(matches!(parse_a(&mrv_b), Err(FormatError::LineLength { .. })));
    }
}

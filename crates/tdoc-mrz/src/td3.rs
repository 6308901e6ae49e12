//! # TD3 (passport booklet)
//!
//! ```text
//! line 1: P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<
//!         |type|state|name (39)                      |
//! line 2: L898902C36UTO7408122F1204159ZE184226B<<<<<10
//!         |number|cd|nat|birth|cd|sex|expiry|cd|optional(14)|cd|composite
//! ```
//!
//! The composite check digit covers positions 0-9, 13-19 and 21-42 of
//! line 2. An empty optional data field carries `<` as its check digit.

use tdoc_core::{CoreFields, FormatError, OptionalData};

use crate::layout::{
    char_at, ensure_ascii, identity_run, optional_check_digit, slice, verify_digit,
    verify_expected, verify_identity_run, DocumentSize, Mrz, ParsedMrz, RawIdentity,
};

const SIZE: DocumentSize = DocumentSize::Td3;

/// Compose the two TD3 lines.
pub fn compose(core: &CoreFields, optional_data: &OptionalData) -> Result<Mrz, FormatError> {
    let line1 = format!(
        "{}{}{}",
        core.type_code_mrz(),
        core.authority_code_mrz(),
        core.full_name_mrz(SIZE.name_width())
    );
    let optional = optional_data.to_mrz(SIZE.optional_data_width());
    let mut line2 = identity_run(&core.number_mrz(), core);
    line2.push_str(&optional);
    line2.push(optional_check_digit(&optional));
    let composite = composite_data(&line2);
    line2.push(tdoc_core::check_digit::compute(&composite));
    Mrz::new(SIZE, vec![line1, line2])
}

fn composite_data(line2: &str) -> String {
    [slice(line2, 0, 10), slice(line2, 13, 20), slice(line2, 21, 43)].concat()
}

/// Parse and verify a TD3 MRZ.
///
/// Every check digit is verified before any field is built.
pub fn parse(mrz: &Mrz) -> Result<ParsedMrz, FormatError> {
    let mrz = Mrz::new(SIZE, mrz.lines().to_vec())?;
    ensure_ascii(&mrz)?;
    let [line1, line2] = [&mrz.lines()[0], &mrz.lines()[1]];

    verify_identity_run(line2)?;
    let optional = slice(line2, 28, 42);
    verify_expected(
        "optionalData",
        optional,
        optional_check_digit(optional),
        char_at(line2, 42),
    )?;
    verify_digit("composite", &composite_data(line2), char_at(line2, 43))?;

    let core = RawIdentity {
        type_code: slice(line1, 0, 2),
        authority: slice(line1, 2, 5),
        name: slice(line1, 5, 44),
        number: slice(line2, 0, 9),
        nationality: slice(line2, 10, 13),
        birth: slice(line2, 13, 19),
        sex: char_at(line2, 20),
        expiry: slice(line2, 21, 27),
    }
    .into_core()?;
    Ok(ParsedMrz {
        size: SIZE,
        core,
        optional_data: OptionalData::from_mrz(optional),
        optional_data_2: OptionalData::default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tdoc_core::{GenderMarker, TypeCode};

    fn example() -> CoreFields {
        let mut core = CoreFields::new(TypeCode::new("P").unwrap());
        core.set_number("362142069").unwrap();
        core.set_full_name("Eriksson, Anna Maria");
        core.set_birth_date("1998-04-17").unwrap();
        core.set_gender_marker("F").unwrap();
        core.set_expiration_date("2033-08-23").unwrap();
        core
    }

    #[test]
    fn example_line_two() {
        let mrz = compose(&example(), &OptionalData::default()).unwrap();
        assert_eq!(
            mrz.line(2).unwrap(),
            "3621420699UTO9804175F3308235<<<<<<<<<<<<<<<4"
        );
        assert_eq!(
            mrz.line(1).unwrap(),
            "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<"
        );
    }

    #[test]
    fn icao_specimen_parses() {
        let mrz = Mrz::new(
            SIZE,
            vec![
                "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<".to_string(),
                "L898902C36UTO7408122F1204159ZE184226B<<<<<10".to_string(),
            ],
        )
        .unwrap();
        let parsed = parse(&mrz).unwrap();
        assert_eq!(parsed.core.number().as_str(), "L898902C3");
        assert_eq!(parsed.core.full_name().as_str(), "ERIKSSON, ANNA MARIA");
        assert_eq!(parsed.core.birth_date_viz(), "12 AUG 1974");
        assert_eq!(parsed.core.expiration_date_viz(), "15 APR 2012");
        assert_eq!(parsed.core.gender_marker(), GenderMarker::F);
        assert_eq!(parsed.optional_data.as_str(), "ZE184226B");
    }

    #[test]
    fn round_trip_with_optional_data() {
        let optional = OptionalData::new("ZE184226B", 14).unwrap();
        let mrz = compose(&example(), &optional).unwrap();
        let parsed = parse(&mrz).unwrap();
        assert_eq!(parsed.optional_data, optional);
        assert_eq!(parsed.core.number(), example().number());
        assert_eq!(parsed.core.birth_date(), example().birth_date());
        assert_eq!(parsed.core.expiration_date(), example().expiration_date());
        assert_eq!(parsed.core.expiration_date_viz(), "23 AUG 2033");
    }

    #[test]
    fn gender_x_is_filler() {
        let mut core = example();
        core.set_gender_marker("X").unwrap();
        let mrz = compose(&core, &OptionalData::default()).unwrap();
        assert_eq!(&mrz.line(2).unwrap()[20..21], "<");
        assert_eq!(parse(&mrz).unwrap().core.gender_marker(), GenderMarker::X);
    }

    #[test]
    fn tampered_digits_name_their_field() {
        let mrz = compose(&example(), &OptionalData::default()).unwrap();
        for (pos, field) in [
            (9, "number"),
            (19, "birthDate"),
            (27, "expirationDate"),
            (42, "optionalData"),
            (43, "composite"),
        ] {
            let mut line2: Vec<char> = mrz.line(2).unwrap().chars().collect();
            line2[pos] = match line2[pos] {
                '<' => '0',
                d => char::from(b'0' + ((d as u8 - b'0' + 1) % 10)),
            };
            let tampered = Mrz::new(
                SIZE,
                vec![mrz.line(1).unwrap().to_string(), line2.into_iter().collect()],
            )
            .unwrap();
            match parse(&tampered) {
                Err(FormatError::CheckDigitMismatch { field: f, .. }) => assert_eq!(f, field),
                other => panic!("expected mismatch for {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_wrong_size() {
        let mrz = Mrz::new(DocumentSize::Td2, vec!["<".repeat(36), "<".repeat(36)]).unwrap();
        assert!(matches!(parse(&mrz), Err(FormatError::LineLength { .. })));
    }

    #[test]
    fn overlong_name_is_truncated() {
        let mut core = example();
        core.set_full_name("Wolfeschlegelsteinhausenbergerdorff, Hubert Blaine Charles");
        let mrz = compose(&core, &OptionalData::default()).unwrap();
        assert_eq!(mrz.line(1).unwrap().len(), 44);
    }
}

//! # TD1 (ID card)
//!
//! ```text
//! line 1: I<UTOD231458907<<<<<<<<<<<<<<<
//!         |type|state|number|cd|optional(15)|
//! line 2: 7408122F1204159UTO<<<<<<<<<<<6
//!         |birth|cd|sex|expiry|cd|nat|optional(11)|composite
//! line 3: ERIKSSON<<ANNA<MARIA<<<<<<<<<<
//! ```
//!
//! The composite check digit covers line 1 positions 5-29 and line 2
//! positions 0-6, 8-14 and 18-28.

use tdoc_core::{check_digit, CoreFields, FormatError, OptionalData};

use crate::layout::{
    char_at, ensure_ascii, slice, verify_digit, DocumentSize, Mrz, ParsedMrz, RawIdentity,
    TD1_OPTIONAL_DATA_2_WIDTH,
};

const SIZE: DocumentSize = DocumentSize::Td1;

/// Compose the three TD1 lines.
pub fn compose(
    core: &CoreFields,
    optional_data: &OptionalData,
    optional_data_2: &OptionalData,
) -> Result<Mrz, FormatError> {
    let number = core.number_mrz();
    let line1 = format!(
        "{}{}{number}{}{}",
        core.type_code_mrz(),
        core.authority_code_mrz(),
        check_digit::compute(&number),
        optional_data.to_mrz(SIZE.optional_data_width()),
    );
    let birth = core.birth_date_mrz();
    let expiry = core.expiration_date_mrz();
    let mut line2 = format!(
        "{birth}{}{}{expiry}{}{}{}",
        check_digit::compute(&birth),
        core.gender_marker_mrz(),
        check_digit::compute(&expiry),
        core.nationality_code_mrz(),
        optional_data_2.to_mrz(TD1_OPTIONAL_DATA_2_WIDTH),
    );
    line2.push(check_digit::compute(&composite_data(&line1, &line2)));
    let line3 = core.full_name_mrz(SIZE.name_width());
    Mrz::new(SIZE, vec![line1, line2, line3])
}

fn composite_data(line1: &str, line2: &str) -> String {
    [
        slice(line1, 5, 30),
        slice(line2, 0, 7),
        slice(line2, 8, 15),
        slice(line2, 18, 29),
    ]
    .concat()
}

/// Parse and verify a TD1 MRZ.
pub fn parse(mrz: &Mrz) -> Result<ParsedMrz, FormatError> {
    let mrz = Mrz::new(SIZE, mrz.lines().to_vec())?;
    ensure_ascii(&mrz)?;
    let [line1, line2, line3] = [&mrz.lines()[0], &mrz.lines()[1], &mrz.lines()[2]];

    verify_digit("number", slice(line1, 5, 14), char_at(line1, 14))?;
    verify_digit("birthDate", slice(line2, 0, 6), char_at(line2, 6))?;
    verify_digit("expirationDate", slice(line2, 8, 14), char_at(line2, 14))?;
    verify_digit("composite", &composite_data(line1, line2), char_at(line2, 29))?;

    let core = RawIdentity {
        type_code: slice(line1, 0, 2),
        authority: slice(line1, 2, 5),
        name: line3,
        number: slice(line1, 5, 14),
        nationality: slice(line2, 15, 18),
        birth: slice(line2, 0, 6),
        sex: char_at(line2, 7),
        expiry: slice(line2, 8, 14),
    }
    .into_core()?;
    Ok(ParsedMrz {
        size: SIZE,
        core,
        optional_data: OptionalData::from_mrz(slice(line1, 15, 30)),
        optional_data_2: OptionalData::from_mrz(slice(line2, 18, 29)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPECIMEN: [&str; 3] = [
        "I<UTOD231458907<<<<<<<<<<<<<<<",
        "7408122F1204159UTO<<<<<<<<<<<6",
        "ERIKSSON<<ANNA<MARIA<<<<<<<<<<",
    ];

    fn specimen() -> Mrz {
        Mrz::new(SIZE, SPECIMEN.iter().map(|l| l.to_string()).collect()).unwrap()
    }

    #[test]
    fn specimen_round_trips() {
        let parsed = parse(&specimen()).unwrap();
        assert_eq!(parsed.core.number().as_str(), "D23145890");
        assert_eq!(parsed.core.nationality_code().as_str(), "UTO");
        assert_eq!(parsed.core.full_name().as_str(), "ERIKSSON, ANNA MARIA");
        let again = compose(&parsed.core, &parsed.optional_data, &parsed.optional_data_2).unwrap();
        assert_eq!(again, specimen());
    }

    #[test]
    fn both_optional_fields_survive() {
        let parsed = parse(&specimen()).unwrap();
        let first = OptionalData::new("A12", 15).unwrap();
        let second = OptionalData::new("B34 5", 11).unwrap();
        let mrz = compose(&parsed.core, &first, &second).unwrap();
        let back = parse(&mrz).unwrap();
        assert_eq!(back.optional_data.as_str(), "A12");
        assert_eq!(back.optional_data_2.as_str(), "B34<5");
    }

    #[test]
    fn number_tamper_detected() {
        let mut lines: Vec<String> = SPECIMEN.iter().map(|l| l.to_string()).collect();
        lines[0].replace_range(14..15, "8");
        assert!(matches!(
            parse(&Mrz::new(SIZE, lines).unwrap()),
            Err(FormatError::CheckDigitMismatch { field: "number", .. })
        ));
    }

    #[test]
    fn lines_are_thirty_wide() {
        let mrz = compose(&parse(&specimen()).unwrap().core, &OptionalData::default(), &OptionalData::default()).unwrap();
        assert!(mrz.lines().iter().all(|l| l.len() == 30));
    }
}

//! # TD2
//!
//! ```text
//! line 1: I<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<
//! line 2: D231458907UTO7408122F1204159<<<<<<<6
//!         |number|cd|nat|birth|cd|sex|expiry|cd|optional(7)|composite
//! ```

use tdoc_core::{check_digit, CoreFields, FormatError, OptionalData};

use crate::layout::{
    char_at, ensure_ascii, identity_run, slice, verify_digit, verify_identity_run, DocumentSize,
    Mrz, ParsedMrz, RawIdentity,
};

const SIZE: DocumentSize = DocumentSize::Td2;

/// Compose the two TD2 lines.
pub fn compose(core: &CoreFields, optional_data: &OptionalData) -> Result<Mrz, FormatError> {
    let line1 = format!(
        "{}{}{}",
        core.type_code_mrz(),
        core.authority_code_mrz(),
        core.full_name_mrz(SIZE.name_width())
    );
    let mut line2 = identity_run(&core.number_mrz(), core);
    line2.push_str(&optional_data.to_mrz(SIZE.optional_data_width()));
    line2.push(check_digit::compute(&composite_data(&line2)));
    Mrz::new(SIZE, vec![line1, line2])
}

fn composite_data(line2: &str) -> String {
    [slice(line2, 0, 10), slice(line2, 13, 20), slice(line2, 21, 35)].concat()
}

/// Parse and verify a TD2 MRZ.
pub fn parse(mrz: &Mrz) -> Result<ParsedMrz, FormatError> {
    let mrz = Mrz::new(SIZE, mrz.lines().to_vec())?;
    ensure_ascii(&mrz)?;
    let [line1, line2] = [&mrz.lines()[0], &mrz.lines()[1]];

    verify_identity_run(line2)?;
    verify_digit("composite", &composite_data(line2), char_at(line2, 35))?;

    let core = RawIdentity {
        type_code: slice(line1, 0, 2),
        authority: slice(line1, 2, 5),
        name: slice(line1, 5, 36),
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
        optional_data: OptionalData::from_mrz(slice(line2, 28, 35)),
        optional_data_2: OptionalData::default(),
    })
}

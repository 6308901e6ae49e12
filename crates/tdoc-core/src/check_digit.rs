//! # MRZ Check Digits
//!
//! ICAO 9303 Part 3 §4.9 check digit computation: each character is mapped
//! to a value, multiplied by the repeating weights `7, 3, 1`, and the sum is
//! taken modulo 10.
//!
//! | Character | Value |
//! |-----------|-------|
//! | `0`-`9`   | 0-9   |
//! | `A`-`Z`   | 10-35 |
//! | `<`       | 0     |
//!
//! Characters outside this alphabet also count as 0. Callers that need to
//! reject malformed input validate the alphabet before computing.

/// The repeating weight sequence.
pub const WEIGHTS: [u32; 3] = [7, 3, 1];

/// Map a single MRZ character to its check digit value.
pub fn char_value(c: char) -> u32 {
    match c {
        '0'..='9' => c as u32 - '0' as u32,
        'A'..='Z' => c as u32 - 'A' as u32 + 10,
        _ => 0,
    }
}

/// Compute the check digit of `text`.
pub fn compute(text: &str) -> char {
    let sum: u32 = text
        .chars()
        .zip(WEIGHTS.iter().cycle())
        .map(|(c, w)| char_value(c) * w)
        .sum();
    digit_char(sum % 10)
}

/// Compute the check digit of `text` as a one-character string.
pub fn compute_str(text: &str) -> String {
    compute(text).to_string()
}

/// Returns true when `digit` is the check digit of `text`.
pub fn verify(text: &str, digit: char) -> bool {
    compute(text) == digit
}

fn digit_char(d: u32) -> char {
    (b'0' + (d % 10) as u8) as char
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_number_example() {
        assert_eq!(compute("362142069"), '9');
        assert_eq!(compute_str("362142069"), "9");
    }

    #[test]
    fn icao_specimen_values() {
        // ICAO 9303 Part 3 worked example.
        assert_eq!(compute("520727"), '3');
        assert_eq!(compute("L898902C3"), '6');
        assert_eq!(compute("740812"), '2');
        assert_eq!(compute("120415"), '9');
    }

    #[test]
    fn empty_and_filler_yield_zero() {
        assert_eq!(compute(""), '0');
        assert_eq!(compute("<<<<<<<<<<<<<<"), '0');
    }

    #[test]
    fn unknown_characters_count_as_zero() {
        assert_eq!(compute("a1"), compute("<1"));
        assert_eq!(compute("é9"), compute("<9"));
    }

    #[test]
    fn verify_matches_compute() {
        assert!(verify("362142069", '9'));
        assert!(!verify("362142069", '8'));
    }

    #[test]
    fn letter_values() {
        assert_eq!(char_value('A'), 10);
        assert_eq!(char_value('Z'), 35);
        assert_eq!(char_value('<'), 0);
        assert_eq!(char_value('7'), 7);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The check digit depends only on the input text.
        #[test]
        fn compute_is_deterministic(text in "[A-Z0-9<]{0,44}") {
            prop_assert_eq!(compute(&text), compute(&text));
        }

        /// The result is always a decimal digit.
        #[test]
        fn compute_yields_digit(text in "[A-Z0-9<]{0,44}") {
            prop_assert!(compute(&text).is_ascii_digit());
        }

        /// Appending fillers never changes the digit.
        #[test]
        fn trailing_fillers_are_neutral(text in "[A-Z0-9]{0,20}", n in 0usize..10) {
            let padded = format!("{text}{}", "<".repeat(n));
            prop_assert_eq!(compute(&text), compute(&padded));
        }
    }
}

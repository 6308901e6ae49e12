//! # MRZ Text Projections
//!
//! Pure functions that turn free-form field values into fixed-width
//! Machine-Readable Zone text, and back.
//!
//! ## Contract
//!
//! MRZ output is always exactly the requested width. Overlong names and
//! optional data are truncated and reported with `tracing::warn!`; this is
//! the one place where data loss is specified behavior rather than an error.
//!
//! ## Normalization
//!
//! 1. Unicode NFD decomposition, then combining marks are dropped
//!    (`É` becomes `E`).
//! 2. Apostrophes and commas are removed.
//! 3. Hyphens and spaces become the filler `<`.
//! 4. The result is uppercased and anything outside `A-Z0-9<` is dropped.

use chrono::{Datelike, NaiveDate};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::FormatError;

/// The MRZ filler character.
pub const FILLER: char = '<';

/// Two-digit birth years at or above this value belong to the 1900s.
pub const YEAR_CUTOFF: u32 = 32;

/// Century rule for a two-digit MRZ year.
///
/// Birth dates lie in the past, so they slide around [`YEAR_CUTOFF`].
/// Expiry and validity dates lie ahead of issuance and always expand
/// forward into the 2000s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearWindow {
    /// `yy >= YEAR_CUTOFF` is 19yy, anything lower is 20yy.
    Birth,
    /// Always 20yy.
    Validity,
}

/// Normalize free text into the MRZ alphabet.
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| !matches!(c, '\'' | '\u{2019}' | ','))
        .map(|c| match c {
            '-' | ' ' => FILLER,
            other => other,
        })
        .flat_map(char::to_uppercase)
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || *c == FILLER)
        .collect()
}

/// Uppercase `text` and right-pad it with fillers to `length` characters.
///
/// Text already at or beyond `length` is returned uppercased but unchanged.
pub fn pad(text: &str, length: usize) -> String {
    let mut out = text.to_uppercase();
    let current = out.chars().count();
    if current < length {
        out.extend(std::iter::repeat(FILLER).take(length - current));
    }
    out
}

/// Truncate to `length` characters (warning on loss), then pad.
pub fn fit(text: &str, length: usize, field: &'static str) -> String {
    let actual = text.chars().count();
    if actual > length {
        tracing::warn!(field, max = length, actual, "value truncated to fit the MRZ");
        let truncated: String = text.chars().take(length).collect();
        return pad(&truncated, length);
    }
    pad(text, length)
}

/// Project a full name into an MRZ name field of `length` characters.
///
/// Only the primary script variant (the text before the first `/`) is used.
/// The first `", "` separates the primary from the secondary identifier and
/// becomes `<<`.
pub fn name_to_mrz(full_name: &str, length: usize) -> String {
    let primary = full_name.split('/').next().unwrap_or_default().trim();
    let joined = primary.replacen(", ", "<<", 1);
    fit(&normalize(&joined), length, "name")
}

/// Project optional data into an MRZ field of `length` characters.
pub fn optional_data_to_mrz(data: &str, length: usize) -> String {
    fit(&normalize(data), length, "optional data")
}

/// Reverse of [`name_to_mrz`]: `SMITH<<JOHN<PAUL<<<` becomes `SMITH, JOHN PAUL`.
pub fn mrz_name_to_full_name(field: &str) -> String {
    let trimmed = field.trim_end_matches(FILLER);
    match trimmed.split_once("<<") {
        Some((primary, secondary)) => {
            let primary = filler_to_space(primary);
            let secondary = filler_to_space(secondary.trim_start_matches(FILLER));
            if secondary.is_empty() {
                primary
            } else {
                format!("{primary}, {secondary}")
            }
        }
        None => filler_to_space(trimmed),
    }
}

/// Strip trailing fillers and map the remaining fillers to spaces.
pub fn mrz_field_to_text(field: &str) -> String {
    filler_to_space(field.trim_end_matches(FILLER))
}

fn filler_to_space(text: &str) -> String {
    text.split(FILLER)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a date as MRZ `YYMMDD`.
pub fn date_to_mrz(date: NaiveDate) -> String {
    date.format("%y%m%d").to_string()
}

/// Expand a two-digit year under `window`.
pub fn expand_two_digit_year(yy: u32, window: YearWindow) -> i32 {
    match window {
        YearWindow::Birth if yy >= YEAR_CUTOFF => 1900 + yy as i32,
        _ => 2000 + yy as i32,
    }
}

/// Parse an MRZ `YYMMDD` date.
///
/// # Errors
///
/// Returns [`FormatError::InvalidDate`] if the text is not six digits or
/// does not name a calendar date.
pub fn date_from_mrz(
    text: &str,
    field: &'static str,
    window: YearWindow,
) -> Result<NaiveDate, FormatError> {
    let invalid = || FormatError::InvalidDate {
        field,
        value: text.to_string(),
    };
    if text.len() != 6 || !text.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let yy: u32 = text[0..2].parse().map_err(|_| invalid())?;
    let mm: u32 = text[2..4].parse().map_err(|_| invalid())?;
    let dd: u32 = text[4..6].parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(expand_two_digit_year(yy, window), mm, dd).ok_or_else(invalid)
}

/// True if `date` survives a `YYMMDD` round trip under `window`.
pub fn date_is_mrz_representable(date: NaiveDate, window: YearWindow) -> bool {
    let yy = (date.year().rem_euclid(100)) as u32;
    expand_two_digit_year(yy, window) == date.year()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Fitted output always has exactly the requested width.
        #[test]
        fn fit_has_exact_width(text in "[A-Z0-9<]{0,60}", width in 1usize..45) {
            prop_assert_eq!(fit(&text, width, "test").chars().count(), width);
        }

        /// Normalized text only contains MRZ characters.
        #[test]
        fn normalize_yields_mrz_alphabet(text in "\\PC{0,40}") {
            let out = normalize(&text);
            prop_assert!(out.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == FILLER));
        }

        /// Birth dates in 1932-2031 and validity dates in 2000-2099 come
        /// back from `YYMMDD` unchanged.
        #[test]
        fn dates_inside_window_round_trip(
            birth_year in 1932i32..=2031,
            validity_year in 2000i32..=2099,
            month in 1u32..=12,
            day in 1u32..=28,
        ) {
            let birth = NaiveDate::from_ymd_opt(birth_year, month, day).unwrap();
            let expiry = NaiveDate::from_ymd_opt(validity_year, month, day).unwrap();
            prop_assert_eq!(
                date_from_mrz(&date_to_mrz(birth), "birthDate", YearWindow::Birth).unwrap(),
                birth
            );
            prop_assert_eq!(
                date_from_mrz(&date_to_mrz(expiry), "expirationDate", YearWindow::Validity).unwrap(),
                expiry
            );
        }
    }
}

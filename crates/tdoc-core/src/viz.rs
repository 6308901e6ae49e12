//! # Visual Inspection Zone Projections
//!
//! Uppercase display strings for the human-readable part of a document.
//! Rendering code consumes these as opaque text.

use chrono::NaiveDate;

/// Format a date as `DD MMM YYYY`, uppercase (e.g. `17 APR 1998`).
pub fn date_to_viz(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string().to_uppercase()
}

/// Uppercase free text for display.
pub fn text_to_viz(text: &str) -> String {
    text.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viz_date_format() {
        let d = NaiveDate::from_ymd_opt(1998, 4, 17).unwrap();
        assert_eq!(date_to_viz(d), "17 APR 1998");
        let d = NaiveDate::from_ymd_opt(2033, 8, 3).unwrap();
        assert_eq!(date_to_viz(d), "03 AUG 2033");
    }

    #[test]
    fn viz_text_uppercases() {
        assert_eq!(text_to_viz(" Zoë Smith "), "ZOË SMITH");
    }
}

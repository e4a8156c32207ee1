//! Field validation for user-entered film data
//!
//! Every function returns either the normalized value or the reason string
//! that the conversation engine sends back as a re-prompt.

use chrono::{Datelike, Utc};

/// Maximum length of a film name
pub const NAME_MAX_LEN: usize = 100;
/// Maximum length of a genre
pub const GENRE_MAX_LEN: usize = 50;
/// Maximum length of a description
pub const DESCRIPTION_MAX_LEN: usize = 500;
/// Maximum length of a tag answer
pub const TAG_MAX_LEN: usize = 10;

/// Earliest accepted release year (first film ever made)
pub const MIN_YEAR: i64 = 1888;

/// Latest accepted release year: five years into the future
pub fn max_year() -> i64 {
    Utc::now().year() as i64 + 5
}

/// Trim and bounds-check a free-text field
pub fn validate_text(text: &str, max_len: usize) -> Result<String, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("Field cannot be empty.".to_string());
    }
    if text.chars().count() > max_len {
        return Err(format!("Too long (max {} characters).", max_len));
    }
    Ok(text.to_string())
}

/// Parse a rating in [1, 10]; a comma decimal separator is accepted
pub fn parse_rating(input: &str) -> Result<f64, String> {
    let normalized = input.trim().replace(',', ".");
    let rating: f64 = normalized
        .parse()
        .map_err(|_| "Please enter a valid number between 1 and 10".to_string())?;
    if (1.0..=10.0).contains(&rating) {
        Ok(rating)
    } else {
        Err("Enter a number from 1 to 10".to_string())
    }
}

/// Parse a release year in [1888, current year + 5]
pub fn parse_year(input: &str) -> Result<i64, String> {
    let year: i64 = input
        .trim()
        .parse()
        .map_err(|_| "Please enter a valid numerical year.".to_string())?;
    let max = max_year();
    if (MIN_YEAR..=max).contains(&year) {
        Ok(year)
    } else {
        Err(format!("Please enter a valid year ({}-{})", MIN_YEAR, max))
    }
}

/// Optional URL fields: anything that is not an http(s) link, including the
/// "skip" keyword, silently becomes no value. Part of the field contract,
/// not an error path.
pub fn normalize_url(input: &str) -> Option<String> {
    let url = input.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        Some(url.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_trimmed_and_bounded() {
        assert_eq!(validate_text("  Alien  ", 100), Ok("Alien".to_string()));
        assert!(validate_text("   ", 100).is_err());
        assert!(validate_text("", 100).is_err());
        assert_eq!(
            validate_text("abcdef", 5),
            Err("Too long (max 5 characters).".to_string())
        );
    }

    #[test]
    fn rating_accepts_bounds_and_comma_decimal() {
        assert_eq!(parse_rating("1"), Ok(1.0));
        assert_eq!(parse_rating("10"), Ok(10.0));
        assert_eq!(parse_rating("7,5"), Ok(7.5));
        assert_eq!(parse_rating(" 5.5 "), Ok(5.5));
    }

    #[test]
    fn rating_rejects_out_of_range_and_garbage() {
        assert!(parse_rating("0.9").is_err());
        assert!(parse_rating("10.1").is_err());
        assert!(parse_rating("11").is_err());
        assert!(parse_rating("great").is_err());
    }

    #[test]
    fn year_accepts_valid_range() {
        assert_eq!(parse_year("1888"), Ok(1888));
        assert_eq!(parse_year("1999"), Ok(1999));
        let max = max_year();
        assert_eq!(parse_year(&max.to_string()), Ok(max));
    }

    #[test]
    fn year_rejects_out_of_range_and_garbage() {
        assert!(parse_year("1887").is_err());
        assert!(parse_year(&(max_year() + 1).to_string()).is_err());
        assert!(parse_year("nineteen").is_err());
    }

    #[test]
    fn url_coercion_is_silent() {
        assert_eq!(
            normalize_url("https://example.com/a.jpg"),
            Some("https://example.com/a.jpg".to_string())
        );
        assert_eq!(
            normalize_url("http://example.com"),
            Some("http://example.com".to_string())
        );
        assert_eq!(normalize_url("skip"), None);
        assert_eq!(normalize_url("ftp://example.com"), None);
        assert_eq!(normalize_url("just words"), None);
    }
}

//! Numeric normalization for string-typed numeric fields.
//!
//! Funding amounts, check sizes and success rates arrive as formatted text
//! (`"$1,200,000"`, `"85%"`, `"2.5M"`). The normalizer keeps only ASCII
//! digits and decimal points and parses what is left. Anything that still
//! doesn't parse, including an empty remainder, becomes `0.0`.
//!
//! Note that unit suffixes are dropped, not interpreted: `"2.5M"` is `2.5`.

/// Strip every character that is not a digit or `.` and parse the rest.
///
/// Never fails and always returns a finite value.
///
/// ```
/// use data_loader::normalize::normalize;
///
/// assert_eq!(normalize("$1,200,000"), 1_200_000.0);
/// assert_eq!(normalize("n/a"), 0.0);
/// ```
pub fn normalize(raw: &str) -> f64 {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if kept.is_empty() {
        return 0.0;
    }

    // "1.2.3" or a lone "." survive the strip but are still malformed, and
    // more digits than f64 can hold parse to infinity
    kept.parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Same as [`normalize`], treating an absent cell as empty.
pub fn normalize_opt(raw: Option<&str>) -> f64 {
    raw.map(normalize).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_formatting_is_stripped() {
        assert_eq!(normalize("$1,200,000"), 1_200_000.0);
        assert_eq!(normalize("USD 500,000.50"), 500_000.5);
    }

    #[test]
    fn test_plain_numbers_pass_through() {
        assert_eq!(normalize("500000"), 500_000.0);
        assert_eq!(normalize("0.75"), 0.75);
        assert_eq!(normalize(".5"), 0.5);
    }

    #[test]
    fn test_empty_and_non_numeric_default_to_zero() {
        assert_eq!(normalize(""), 0.0);
        assert_eq!(normalize("unknown"), 0.0);
        assert_eq!(normalize("."), 0.0);
        assert_eq!(normalize_opt(None), 0.0);
    }

    #[test]
    fn test_malformed_remainder_defaults_to_zero() {
        assert_eq!(normalize("1.2.3"), 0.0);
    }

    #[test]
    fn test_overflowing_digits_default_to_zero() {
        let huge = "9".repeat(400);
        assert_eq!(normalize(&huge), 0.0);
        assert_eq!(normalize(&format!("${}", huge)), 0.0);
        // still finite just below the limit
        assert!(normalize(&"9".repeat(300)).is_finite());
    }

    #[test]
    fn test_sign_and_exponent_are_stripped() {
        // '-' and 'e' are not kept, so these collapse to their digits
        assert_eq!(normalize("-42"), 42.0);
        assert_eq!(normalize("1e6"), 16.0);
    }

    #[test]
    fn test_percent_and_units() {
        assert_eq!(normalize("85%"), 85.0);
        assert_eq!(normalize("2.5M"), 2.5);
    }
}

//! Lexical grammars of the XBRL item types
//!
//! These checks decide whether a canonical value is acceptable as the text
//! content of a fact element. They never rewrite the value.

use std::sync::OnceLock;

use regex::Regex;

/// `xs:decimal`: optional sign, ASCII digits with an optional fraction
pub fn is_decimal(value: &str) -> bool {
    static DECIMAL_RE: OnceLock<Regex> = OnceLock::new();
    let re = DECIMAL_RE
        .get_or_init(|| Regex::new(r"^[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)$").unwrap());
    re.is_match(value)
}

/// `xs:integer`: optional sign and digits only
pub fn is_integer(value: &str) -> bool {
    static INTEGER_RE: OnceLock<Regex> = OnceLock::new();
    let re = INTEGER_RE.get_or_init(|| Regex::new(r"^[+-]?[0-9]+$").unwrap());
    re.is_match(value)
}

/// ISO-8601 calendar date `YYYY-MM-DD` with month 1-12 and day 1-31
///
/// Day-of-month is not checked against the month length.
pub fn is_iso_date(value: &str) -> bool {
    static DATE_RE: OnceLock<Regex> = OnceLock::new();
    let re =
        DATE_RE.get_or_init(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").unwrap());
    match re.captures(value) {
        Some(caps) => {
            let month: u32 = caps[2].parse().unwrap_or(0);
            let day: u32 = caps[3].parse().unwrap_or(0);
            (1..=12).contains(&month) && (1..=31).contains(&day)
        }
        None => false,
    }
}

/// `xs:boolean` in its canonical form
pub fn is_boolean(value: &str) -> bool {
    matches!(value, "true" | "false")
}

/// XML NCName, restricted to the ASCII subset used by taxonomy concepts
pub fn is_ncname(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal() {
        assert!(is_decimal("1234.56"));
        assert!(is_decimal("-0.5"));
        assert!(is_decimal("+12"));
        assert!(is_decimal(".5"));
        assert!(is_decimal("12."));
        assert!(!is_decimal(""));
        assert!(!is_decimal("1.2.3"));
        assert!(!is_decimal("1e5"));
        assert!(!is_decimal("NaN"));
        assert!(!is_decimal("inf"));
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        // Fullwidth and Arabic-Indic digits are not xs:decimal digits
        assert!(!is_decimal("\u{ff11}\u{ff12}\u{ff13}.\u{ff14}\u{ff15}"));
        assert!(!is_decimal("\u{661}\u{662}\u{663}.\u{665}"));
        assert!(!is_integer("\u{ff12}\u{ff15}\u{ff10}"));
        assert!(!is_iso_date("\u{ff12}\u{ff10}\u{ff12}\u{ff15}-12-31"));
        assert!(!is_iso_date("2025-\u{661}\u{662}-31"));
    }

    #[test]
    fn test_integer() {
        assert!(is_integer("250"));
        assert!(is_integer("-3"));
        assert!(!is_integer("250.0"));
    }

    #[test]
    fn test_iso_date() {
        assert!(is_iso_date("2025-12-31"));
        assert!(is_iso_date("2025-02-31"));
        assert!(!is_iso_date("2025-13-01"));
        assert!(!is_iso_date("2025-00-10"));
        assert!(!is_iso_date("31.12.2025"));
    }

    #[test]
    fn test_ncname() {
        assert!(is_ncname("EconomicPerformanceRevenue"));
        assert!(is_ncname("_x-1.2"));
        assert!(!is_ncname("1Revenue"));
        assert!(!is_ncname("Rev enue"));
        assert!(!is_ncname(""));
    }
}

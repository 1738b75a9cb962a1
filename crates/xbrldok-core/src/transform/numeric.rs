//! Numeric transformations
//!
//! Thousands separators are dropped, the decimal marker becomes a dot, and
//! the result must be an `xs:decimal`. Whitespace of any kind (including
//! the no-break spaces Word inserts) counts as a thousands separator.

use std::sync::OnceLock;

use regex::Regex;

use super::{Transform, TransformError};
use crate::lexical::is_decimal;

/// `1,234.56` → `1234.56`
#[derive(Debug, Clone, Copy, Default)]
pub struct NumDotDecimal;

/// `1 234,56` → `1234.56`
#[derive(Debug, Clone, Copy, Default)]
pub struct NumCommaDecimal;

/// `1 234,56 EUR` → `1234.56`
#[derive(Debug, Clone, Copy, Default)]
pub struct NumUnitDecimal;

fn strip_separators(raw: &str, separator: char) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != separator)
        .collect()
}

fn checked(raw: &str, cleaned: String, expected: &str) -> Result<String, TransformError> {
    if is_decimal(&cleaned) {
        Ok(cleaned)
    } else {
        Err(TransformError::new(raw, expected))
    }
}

impl Transform for NumDotDecimal {
    fn name(&self) -> &'static str {
        "ixt:num-dot-decimal"
    }

    fn input_pattern(&self) -> &'static str {
        "digits with optional comma or space thousands separators and a dot decimal marker (1,234.56)"
    }

    fn output_form(&self) -> &'static str {
        "xs:decimal"
    }

    fn apply(&self, raw: &str) -> Result<String, TransformError> {
        checked(raw, strip_separators(raw, ','), self.input_pattern())
    }
}

impl Transform for NumCommaDecimal {
    fn name(&self) -> &'static str {
        "ixt:num-comma-decimal"
    }

    fn input_pattern(&self) -> &'static str {
        "digits with optional dot or space thousands separators and a comma decimal marker (1 234,56)"
    }

    fn output_form(&self) -> &'static str {
        "xs:decimal"
    }

    fn apply(&self, raw: &str) -> Result<String, TransformError> {
        let cleaned = strip_separators(raw, '.').replace(',', ".");
        checked(raw, cleaned, self.input_pattern())
    }
}

impl Transform for NumUnitDecimal {
    fn name(&self) -> &'static str {
        "ixt:num-unit-decimal"
    }

    fn input_pattern(&self) -> &'static str {
        "a number followed by a three-letter unit or currency code (1 234,56 EUR)"
    }

    fn output_form(&self) -> &'static str {
        "xs:decimal"
    }

    fn apply(&self, raw: &str) -> Result<String, TransformError> {
        static UNIT_RE: OnceLock<Regex> = OnceLock::new();
        let re = UNIT_RE.get_or_init(|| Regex::new(r"^([+-]?[0-9\s,.]+?)\s*[A-Z]{3}$").unwrap());

        let caps = re
            .captures(raw.trim())
            .ok_or_else(|| TransformError::new(raw, self.input_pattern()))?;
        let number = &caps[1];

        // The rightmost marker is the decimal one when both appear.
        let comma_decimal = match (number.rfind(','), number.rfind('.')) {
            (Some(comma), Some(dot)) => comma > dot,
            (Some(_), None) => true,
            _ => false,
        };

        let result = if comma_decimal {
            NumCommaDecimal.apply(number)
        } else {
            NumDotDecimal.apply(number)
        };
        result.map_err(|_| TransformError::new(raw, self.input_pattern()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_decimal() {
        assert_eq!(NumDotDecimal.apply("1,234.56").unwrap(), "1234.56");
        assert_eq!(NumDotDecimal.apply(" 1 234 567.89 ").unwrap(), "1234567.89");
        assert_eq!(NumDotDecimal.apply("250").unwrap(), "250");
        assert_eq!(NumDotDecimal.apply("-12.5").unwrap(), "-12.5");
    }

    #[test]
    fn test_dot_decimal_rejects() {
        for raw in ["", "abc", "1.234.56", "12,5 EUR", "1e6", "NaN"] {
            let err = NumDotDecimal.apply(raw).unwrap_err();
            assert_eq!(err.value, raw);
        }
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        let fullwidth = "\u{ff11}\u{ff12}\u{ff13}.\u{ff14}\u{ff15}";
        let arabic_indic = "\u{661}\u{662}\u{663},\u{665}";
        assert!(NumDotDecimal.apply(fullwidth).is_err());
        assert!(NumCommaDecimal.apply(arabic_indic).is_err());
        assert!(NumUnitDecimal.apply(&format!("{} EUR", arabic_indic)).is_err());
    }

    #[test]
    fn test_comma_decimal() {
        assert_eq!(NumCommaDecimal.apply("1 234,56").unwrap(), "1234.56");
        assert_eq!(NumCommaDecimal.apply("1.234.567,89").unwrap(), "1234567.89");
        assert_eq!(NumCommaDecimal.apply("987 654,32").unwrap(), "987654.32");
        assert_eq!(NumCommaDecimal.apply("127").unwrap(), "127");
    }

    #[test]
    fn test_comma_decimal_with_no_break_spaces() {
        assert_eq!(
            NumCommaDecimal.apply("1\u{a0}234\u{202f}567,89").unwrap(),
            "1234567.89"
        );
    }

    #[test]
    fn test_comma_decimal_parses_to_intended_value() {
        let cases = [
            ("1 234,56", 1234.56),
            ("12 345,67", 12345.67),
            ("1.000.000,5", 1000000.5),
            ("0,01", 0.01),
        ];
        for (raw, expected) in cases {
            let value: f64 = NumCommaDecimal.apply(raw).unwrap().parse().unwrap();
            assert!((value - expected).abs() < 1e-9, "{} -> {}", raw, value);
        }
    }

    #[test]
    fn test_comma_decimal_rejects() {
        assert!(NumCommaDecimal.apply("1,234,56").is_err());
        assert!(NumCommaDecimal.apply("twelve").is_err());
        assert!(NumCommaDecimal.apply("   ").is_err());
    }

    #[test]
    fn test_unit_decimal() {
        assert_eq!(NumUnitDecimal.apply("1 234,56 EUR").unwrap(), "1234.56");
        assert_eq!(NumUnitDecimal.apply("1,234.56 USD").unwrap(), "1234.56");
        assert_eq!(NumUnitDecimal.apply("1.234,56EUR").unwrap(), "1234.56");
        assert!(NumUnitDecimal.apply("500 GJ ").is_err());
        assert_eq!(NumUnitDecimal.apply("500 CHF").unwrap(), "500");
    }

    #[test]
    fn test_unit_decimal_requires_code() {
        let err = NumUnitDecimal.apply("1 234,56").unwrap_err();
        assert_eq!(err.value, "1 234,56");
        assert!(err.expected.contains("three-letter"));
        assert!(NumUnitDecimal.apply("1 234,56 eur").is_err());
        assert!(NumUnitDecimal.apply("EUR").is_err());
    }
}

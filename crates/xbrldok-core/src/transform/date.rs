//! Date transformations
//!
//! All date transformations produce `YYYY-MM-DD`. Day and month are range
//! checked (1-31, 1-12); the day is not checked against the length of the
//! month and leap years are not considered, so `31.02.2025` is accepted.

use std::sync::OnceLock;

use regex::Regex;

use super::{Transform, TransformError};

/// `31.12.2025` → `2025-12-31`
#[derive(Debug, Clone, Copy, Default)]
pub struct DateDayMonthYear;

/// `31/12/2025` → `2025-12-31`
#[derive(Debug, Clone, Copy, Default)]
pub struct DateDayMonthYearSlash;

/// `12/31/2025` → `2025-12-31`
#[derive(Debug, Clone, Copy, Default)]
pub struct DateMonthDayYear;

#[derive(Debug, Clone, Copy)]
enum FieldOrder {
    DayMonthYear,
    MonthDayYear,
}

fn dotted_re() -> &'static Regex {
    static DOTTED_RE: OnceLock<Regex> = OnceLock::new();
    DOTTED_RE.get_or_init(|| Regex::new(r"^([0-9]{2})\.([0-9]{2})\.([0-9]{4})$").unwrap())
}

fn slashed_re() -> &'static Regex {
    static SLASHED_RE: OnceLock<Regex> = OnceLock::new();
    SLASHED_RE.get_or_init(|| Regex::new(r"^([0-9]{2})/([0-9]{2})/([0-9]{4})$").unwrap())
}

fn parse_date(
    raw: &str,
    re: &Regex,
    order: FieldOrder,
    expected: &str,
) -> Result<String, TransformError> {
    let caps = re
        .captures(raw.trim())
        .ok_or_else(|| TransformError::new(raw, expected))?;

    let (day, month) = match order {
        FieldOrder::DayMonthYear => (&caps[1], &caps[2]),
        FieldOrder::MonthDayYear => (&caps[2], &caps[1]),
    };
    let year = &caps[3];

    let day_num: u32 = day.parse().unwrap_or(0);
    if !(1..=31).contains(&day_num) {
        return Err(TransformError::new(
            raw,
            format!("{} with day between 01 and 31", expected),
        ));
    }
    let month_num: u32 = month.parse().unwrap_or(0);
    if !(1..=12).contains(&month_num) {
        return Err(TransformError::new(
            raw,
            format!("{} with month between 01 and 12", expected),
        ));
    }

    Ok(format!("{}-{}-{}", year, month, day))
}

impl Transform for DateDayMonthYear {
    fn name(&self) -> &'static str {
        "ixt:date-day-month-year"
    }

    fn input_pattern(&self) -> &'static str {
        "DD.MM.YYYY"
    }

    fn output_form(&self) -> &'static str {
        "YYYY-MM-DD"
    }

    fn apply(&self, raw: &str) -> Result<String, TransformError> {
        parse_date(
            raw,
            dotted_re(),
            FieldOrder::DayMonthYear,
            self.input_pattern(),
        )
    }
}

impl Transform for DateDayMonthYearSlash {
    fn name(&self) -> &'static str {
        "ixt:date-day-month-year-slash"
    }

    fn input_pattern(&self) -> &'static str {
        "DD/MM/YYYY"
    }

    fn output_form(&self) -> &'static str {
        "YYYY-MM-DD"
    }

    fn apply(&self, raw: &str) -> Result<String, TransformError> {
        parse_date(
            raw,
            slashed_re(),
            FieldOrder::DayMonthYear,
            self.input_pattern(),
        )
    }
}

impl Transform for DateMonthDayYear {
    fn name(&self) -> &'static str {
        "ixt:date-month-day-year"
    }

    fn input_pattern(&self) -> &'static str {
        "MM/DD/YYYY"
    }

    fn output_form(&self) -> &'static str {
        "YYYY-MM-DD"
    }

    fn apply(&self, raw: &str) -> Result<String, TransformError> {
        parse_date(
            raw,
            slashed_re(),
            FieldOrder::MonthDayYear,
            self.input_pattern(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_month_year() {
        assert_eq!(DateDayMonthYear.apply("31.12.2025").unwrap(), "2025-12-31");
        assert_eq!(DateDayMonthYear.apply(" 01.01.2024 ").unwrap(), "2024-01-01");
    }

    #[test]
    fn test_day_month_year_all_ranges() {
        for day in 1..=31u32 {
            for month in 1..=12u32 {
                let raw = format!("{:02}.{:02}.2025", day, month);
                let expected = format!("2025-{:02}-{:02}", month, day);
                assert_eq!(DateDayMonthYear.apply(&raw).unwrap(), expected);
            }
        }
    }

    #[test]
    fn test_out_of_range_rejected() {
        let err = DateDayMonthYear.apply("45.13.2025").unwrap_err();
        assert_eq!(err.value, "45.13.2025");
        assert!(err.expected.starts_with("DD.MM.YYYY"));
        assert!(DateDayMonthYear.apply("00.12.2025").is_err());
        assert!(DateDayMonthYear.apply("15.00.2025").is_err());
        assert!(DateDayMonthYear.apply("15.13.2025").is_err());
    }

    #[test]
    fn test_wrong_shape_rejected() {
        assert!(DateDayMonthYear.apply("1.12.2025").is_err());
        assert!(DateDayMonthYear.apply("31/12/2025").is_err());
        assert!(DateDayMonthYear.apply("2025-12-31").is_err());
        assert!(DateDayMonthYear.apply("31.12.25").is_err());
    }

    #[test]
    fn test_non_ascii_digits_rejected() {
        assert!(DateDayMonthYear
            .apply("31.12.\u{ff12}\u{ff10}\u{ff12}\u{ff15}")
            .is_err());
        assert!(DateDayMonthYearSlash
            .apply("\u{663}\u{661}/12/2025")
            .is_err());
    }

    #[test]
    fn test_calendar_is_not_checked() {
        assert_eq!(DateDayMonthYear.apply("31.02.2025").unwrap(), "2025-02-31");
        assert_eq!(DateDayMonthYear.apply("29.02.2023").unwrap(), "2023-02-29");
    }

    #[test]
    fn test_slash_variants() {
        assert_eq!(
            DateDayMonthYearSlash.apply("31/12/2025").unwrap(),
            "2025-12-31"
        );
        assert_eq!(DateMonthDayYear.apply("12/31/2025").unwrap(), "2025-12-31");
        assert!(DateDayMonthYearSlash.apply("12/31/2025").is_err());
        assert!(DateMonthDayYear.apply("31/12/2025").is_err());
        assert!(DateMonthDayYear.apply("31.12.2025").is_err());
    }
}

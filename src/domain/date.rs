//! Date parsing and half-open date ranges

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::domain::error::{DomainError, DomainResult};

/// Format used for dates on the command line, in task files and in JSON output.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` string into a timestamp at midnight.
pub fn parse_date(value: &str) -> DomainResult<NaiveDateTime> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(|date| date.and_time(NaiveTime::MIN))
        .map_err(|source| DomainError::InvalidDate {
            value: value.to_string(),
            source,
        })
}

/// Parse an optional date string, keeping only the calendar day.
///
/// A blank string is treated as an absent bound.
pub fn parse_optional_date(value: Option<&str>) -> DomainResult<Option<NaiveDate>> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| parse_date(v).map(|dt| dt.date()))
        .transpose()
}

/// Format a date the way output files key their entries.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Half-open interval `[begin, end)` of calendar days. Missing bounds are open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub begin: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Build a range, rejecting `begin > end` when both bounds are given.
    ///
    /// `begin == end` is a valid empty range.
    pub fn new(begin: Option<NaiveDate>, end: Option<NaiveDate>) -> DomainResult<Self> {
        if let (Some(b), Some(e)) = (begin, end) {
            if b > e {
                return Err(DomainError::InvalidDateRange { begin: b, end: e });
            }
        }
        Ok(Self { begin, end })
    }

    /// Range without bounds.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Parse both bounds from optional `YYYY-MM-DD` strings.
    pub fn parse(begin: Option<&str>, end: Option<&str>) -> DomainResult<Self> {
        Self::new(parse_optional_date(begin)?, parse_optional_date(end)?)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.begin.map_or(true, |b| date >= b) && self.end.map_or(true, |e| date < e)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let begin = self.begin.map(format_date).unwrap_or_else(|| "-inf".into());
        let end = self.end.map(format_date).unwrap_or_else(|| "+inf".into());
        write!(f, "[{begin}, {end})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn given_valid_date_when_parsing_then_returns_midnight() {
        let parsed = parse_date("2020-01-01").unwrap();
        assert_eq!(parsed.date(), day(2020, 1, 1));
        assert_eq!(parsed.time(), NaiveTime::MIN);
    }

    #[rstest]
    #[case("")]
    #[case("2020/01/01")]
    #[case("01-01-2020")]
    #[case("2020-13-01")]
    #[case("2020-02-30")]
    #[case("2020-01-01T00:00")]
    #[case("yesterday")]
    fn given_malformed_date_when_parsing_then_fails(#[case] value: &str) {
        let err = parse_date(value).unwrap_err();
        assert!(matches!(err, DomainError::InvalidDate { .. }));
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }

    #[test]
    fn given_half_open_range_when_checking_then_end_is_excluded() {
        let range = DateRange::new(Some(day(2020, 1, 1)), Some(day(2020, 1, 2))).unwrap();
        assert!(!range.contains(day(2019, 12, 31)));
        assert!(range.contains(day(2020, 1, 1)));
        assert!(!range.contains(day(2020, 1, 2)));
    }

    #[test]
    fn given_open_bounds_when_checking_then_accepts_everything_on_open_side() {
        let range = DateRange::new(None, Some(day(2020, 1, 2))).unwrap();
        assert!(range.contains(day(1999, 1, 1)));
        assert!(!range.contains(day(2020, 1, 2)));
        assert!(DateRange::unbounded().contains(day(2100, 1, 1)));
    }

    #[test]
    fn given_begin_after_end_when_building_range_then_fails() {
        let err = DateRange::parse(Some("2020-01-03"), Some("2020-01-02")).unwrap_err();
        assert!(matches!(err, DomainError::InvalidDateRange { .. }));
    }

    #[test]
    fn given_equal_bounds_when_building_range_then_range_is_empty() {
        let range = DateRange::parse(Some("2020-01-02"), Some("2020-01-02")).unwrap();
        assert!(!range.contains(day(2020, 1, 1)));
        assert!(!range.contains(day(2020, 1, 2)));
    }

    #[rstest]
    #[case(Some(""), None)]
    #[case(None, Some("  "))]
    #[case(Some(""), Some(""))]
    fn given_blank_bound_when_parsing_range_then_bound_is_open(
        #[case] begin: Option<&str>,
        #[case] end: Option<&str>,
    ) {
        let range = DateRange::parse(begin, end).unwrap();
        assert_eq!(range, DateRange::unbounded());
    }

    #[test]
    fn test_range_display() {
        let range = DateRange::parse(Some("2020-01-01"), None).unwrap();
        assert_eq!(range.to_string(), "[2020-01-01, +inf)");
    }
}

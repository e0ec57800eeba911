//! Partial date parsing and report-period filtering.

use chrono::NaiveDate;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static PARTIAL_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})(?:-(\d{1,2})(?:-(\d{1,2}))?)?$").expect("partial date pattern is valid")
});

/// How much of a partial date was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    Year,
    Month,
    Day,
}

/// A researchmap date string (`YYYY`, `YYYY-MM` or `YYYY-MM-DD`).
///
/// Missing parts are anchored to the first month / first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialDate {
    date: NaiveDate,
    precision: Precision,
}

impl PartialDate {
    /// Parse a partial date, trying year, then year-month, then full date.
    pub fn parse(s: &str) -> Option<Self> {
        let caps = PARTIAL_DATE_RE.captures(s.trim())?;
        let year: i32 = caps.get(1)?.as_str().parse().ok()?;
        let month = caps.get(2).map(|m| m.as_str().parse::<u32>()).transpose().ok()?;
        let day = caps.get(3).map(|d| d.as_str().parse::<u32>()).transpose().ok()?;

        let (date, precision) = match (month, day) {
            (None, _) => (NaiveDate::from_ymd_opt(year, 1, 1)?, Precision::Year),
            (Some(m), None) => (NaiveDate::from_ymd_opt(year, m, 1)?, Precision::Month),
            (Some(m), Some(d)) => (NaiveDate::from_ymd_opt(year, m, d)?, Precision::Day),
        };
        Some(Self { date, precision })
    }

    /// Calendar date this partial date is anchored to
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }
}

impl fmt::Display for PartialDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pattern = match self.precision {
            Precision::Year => "%Y",
            Precision::Month => "%Y-%m",
            Precision::Day => "%Y-%m-%d",
        };
        write!(f, "{}", self.date.format(pattern))
    }
}

/// Parse a researchmap date string into the calendar date used for filtering.
pub fn parse_partial_date(s: &str) -> Option<NaiveDate> {
    PartialDate::parse(s).map(|p| p.date())
}

/// Inclusive report period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }
}

/// True when `date` lies within `range`, both ends included.
///
/// A range missing either bound admits nothing.
pub fn in_range(date: NaiveDate, range: &DateRange) -> bool {
    match (range.from, range.to) {
        (Some(from), Some(to)) => from <= date && date <= to,
        _ => false,
    }
}

/// Filter predicate applied to an item's raw date string.
///
/// With no range every item passes; with a range, unparseable dates fail.
pub fn passes(raw_date: &str, range: Option<&DateRange>) -> bool {
    match range {
        None => true,
        Some(range) => parse_partial_date(raw_date).is_some_and(|d| in_range(d, range)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn test_parse_granularities() {
        assert_eq!(parse_partial_date("2021"), Some(ymd(2021, 1, 1)));
        assert_eq!(parse_partial_date("2021-07"), Some(ymd(2021, 7, 1)));
        assert_eq!(parse_partial_date("2021-07-15"), Some(ymd(2021, 7, 15)));
        assert_eq!(parse_partial_date("2021-7-5"), Some(ymd(2021, 7, 5)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_partial_date(""), None);
        assert_eq!(parse_partial_date("2021/07/15"), None);
        assert_eq!(parse_partial_date("2021-02-30"), None);
        assert_eq!(parse_partial_date("21-07"), None);
    }

    #[test]
    fn test_reformat_is_idempotent() {
        for raw in ["1999", "2004-11", "2024-02-29"] {
            let parsed = PartialDate::parse(raw).expect("parses");
            assert_eq!(parsed.to_string(), raw);
            assert_eq!(PartialDate::parse(&parsed.to_string()), Some(parsed));
        }
    }

    #[test]
    fn test_in_range_is_inclusive() {
        let range = DateRange::new(ymd(2021, 4, 1), ymd(2022, 3, 31));
        assert!(in_range(ymd(2021, 4, 1), &range));
        assert!(in_range(ymd(2022, 3, 31), &range));
        assert!(!in_range(ymd(2021, 3, 31), &range));
        assert!(!in_range(ymd(2022, 4, 1), &range));
    }

    #[test]
    fn test_half_open_range_admits_nothing() {
        let range = DateRange {
            from: Some(ymd(2021, 4, 1)),
            to: None,
        };
        assert!(!in_range(ymd(2021, 5, 1), &range));
    }

    #[test]
    fn test_passes() {
        let range = DateRange::new(ymd(2021, 4, 1), ymd(2022, 3, 31));
        assert!(passes("anything", None));
        assert!(passes("2021-05", Some(&range)));
        // a bare year anchors to January 1st
        assert!(!passes("2021", Some(&range)));
        assert!(!passes("unknown", Some(&range)));
        assert!(!passes("", Some(&range)));
    }
}

//! Date range specifications for high/low fee seasons
//!
//! A spec is one or more `start-end` pairs separated by `;`. The textual
//! format is detected once from the first pair and applied to every pair:
//!
//! - `YYYYMMDD-YYYYMMDD`
//! - `YYMMDD-YYMMDD`
//! - `MMDD-MMDD`
//! - `MM-MM`
//! - `october-march` (full month names)
//! - `oct-mar` (three letter abbreviations)
//!
//! Whitespace anywhere in the spec is ignored.

use crate::error::{PriceError, Result};
use chrono::{Datelike, NaiveDate};

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Detected textual format of a date range spec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `YYYYMMDD`
    FullDate,
    /// `YYMMDD`, century taken from the reference year
    ShortDate,
    /// `MMDD`, recurring every year
    MonthDay,
    /// `MM`, recurring every year
    Month,
    /// `january`..`december`
    MonthName,
    /// `jan`..`dec`
    MonthAbbrev,
}

impl DateFormat {
    /// strftime-style label of the format
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullDate => "%Y%m%d",
            Self::ShortDate => "%y%m%d",
            Self::MonthDay => "%m%d",
            Self::Month => "%m",
            Self::MonthName => "%B",
            Self::MonthAbbrev => "%b",
        }
    }
}

/// A comparable position in the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarPoint {
    /// A concrete date
    Date(NaiveDate),
    /// A month/day position that repeats every year
    Annual { month: u32, day: u32 },
}

impl CalendarPoint {
    /// Concrete date of this point in the given year
    pub fn resolve(&self, year: i32) -> Option<NaiveDate> {
        match *self {
            Self::Date(d) => Some(d),
            Self::Annual { month, day } => NaiveDate::from_ymd_opt(year, month, day),
        }
    }
}

/// One parsed `start-end` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: CalendarPoint,
    pub end: CalendarPoint,
}

impl DateRange {
    /// True when `date` lies strictly between start and end.
    ///
    /// The endpoints themselves are outside the range. Recurring ranges whose
    /// end comes before their start (`october-march`) wrap over new year.
    pub fn contains_strictly(&self, date: NaiveDate) -> bool {
        match (self.start, self.end) {
            (CalendarPoint::Date(start), CalendarPoint::Date(end)) => start < date && date < end,
            (
                CalendarPoint::Annual {
                    month: sm,
                    day: sd,
                },
                CalendarPoint::Annual {
                    month: em,
                    day: ed,
                },
            ) => {
                let d = (date.month(), date.day());
                let (s, e) = ((sm, sd), (em, ed));
                if s <= e {
                    s < d && d < e
                } else {
                    s < d || d < e
                }
            }
            _ => false,
        }
    }
}

fn strip_whitespace(spec: &str) -> String {
    spec.chars().filter(|c| !c.is_whitespace()).collect()
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Detect the format of a date range spec from its first range.
pub fn detect_format(spec: &str) -> Result<DateFormat> {
    let compact = strip_whitespace(spec);
    let first_range = compact.split(';').next().unwrap_or_default();
    let mut endpoints = first_range.split('-');
    let first = endpoints.next().unwrap_or_default();
    if first.is_empty() {
        return Err(PriceError::invalid_format(format!(
            "no start date in '{}'",
            spec
        )));
    }

    if is_all_digits(first) {
        return match first.len() {
            8 => Ok(DateFormat::FullDate),
            6 => Ok(DateFormat::ShortDate),
            4 => Ok(DateFormat::MonthDay),
            2 => Ok(DateFormat::Month),
            n => Err(PriceError::invalid_format(format!(
                "unsupported {}-digit date '{}'",
                n, first
            ))),
        };
    }

    if first.chars().count() != 3 {
        return Ok(DateFormat::MonthName);
    }
    // "may" is both a full name and an abbreviation; the end decides
    match endpoints.next() {
        Some(second) if second.chars().count() == 3 => Ok(DateFormat::MonthAbbrev),
        _ => Ok(DateFormat::MonthName),
    }
}

/// Parse every range of `spec` using the given format.
///
/// `reference_year` supplies the century of two-digit years and validates
/// recurring month/day endpoints (`0229` only parses in a leap year).
pub fn parse(spec: &str, format: DateFormat, reference_year: i32) -> Result<Vec<DateRange>> {
    let compact = strip_whitespace(spec);
    let mut ranges = Vec::new();

    for piece in compact.split(';').filter(|p| !p.is_empty()) {
        let parts: Vec<&str> = piece.split('-').collect();
        let [start, end] = parts.as_slice() else {
            return Err(PriceError::invalid_format(format!(
                "expected 'start-end', got '{}'",
                piece
            )));
        };
        ranges.push(DateRange {
            start: parse_endpoint(start, format, reference_year)?,
            end: parse_endpoint(end, format, reference_year)?,
        });
    }

    Ok(ranges)
}

/// Detect the format and parse in one step. A blank spec yields no ranges.
pub fn parse_date_ranges(spec: &str, reference_year: i32) -> Result<Vec<DateRange>> {
    if spec.trim().is_empty() {
        return Ok(Vec::new());
    }
    let format = detect_format(spec)?;
    parse(spec, format, reference_year)
}

fn parse_endpoint(text: &str, format: DateFormat, reference_year: i32) -> Result<CalendarPoint> {
    let invalid = || {
        PriceError::invalid_format(format!(
            "'{}' does not match format {}",
            text,
            format.as_str()
        ))
    };

    match format {
        DateFormat::FullDate => {
            if text.len() != 8 || !is_all_digits(text) {
                return Err(invalid());
            }
            let year = digits(text, 0..4).ok_or_else(invalid)?;
            let month = digits(text, 4..6).ok_or_else(invalid)?;
            let day = digits(text, 6..8).ok_or_else(invalid)?;
            NaiveDate::from_ymd_opt(year as i32, month, day)
                .map(CalendarPoint::Date)
                .ok_or_else(invalid)
        }
        DateFormat::ShortDate => {
            if text.len() != 6 || !is_all_digits(text) {
                return Err(invalid());
            }
            let century = reference_year.div_euclid(100) * 100;
            let year = century + digits(text, 0..2).ok_or_else(invalid)? as i32;
            let month = digits(text, 2..4).ok_or_else(invalid)?;
            let day = digits(text, 4..6).ok_or_else(invalid)?;
            NaiveDate::from_ymd_opt(year, month, day)
                .map(CalendarPoint::Date)
                .ok_or_else(invalid)
        }
        DateFormat::MonthDay => {
            if text.len() != 4 || !is_all_digits(text) {
                return Err(invalid());
            }
            let month = digits(text, 0..2).ok_or_else(invalid)?;
            let day = digits(text, 2..4).ok_or_else(invalid)?;
            annual(reference_year, month, day).ok_or_else(invalid)
        }
        DateFormat::Month => {
            if text.len() != 2 || !is_all_digits(text) {
                return Err(invalid());
            }
            let month = digits(text, 0..2).ok_or_else(invalid)?;
            annual(reference_year, month, 1).ok_or_else(invalid)
        }
        DateFormat::MonthName => {
            let lower = text.to_lowercase();
            let month = MONTH_NAMES
                .iter()
                .position(|name| *name == lower)
                .ok_or_else(invalid)?;
            annual(reference_year, month as u32 + 1, 1).ok_or_else(invalid)
        }
        DateFormat::MonthAbbrev => {
            let lower = text.to_lowercase();
            if lower.chars().count() != 3 {
                return Err(invalid());
            }
            let month = MONTH_NAMES
                .iter()
                .position(|name| name.starts_with(lower.as_str()))
                .ok_or_else(invalid)?;
            annual(reference_year, month as u32 + 1, 1).ok_or_else(invalid)
        }
    }
}

fn digits(text: &str, range: std::ops::Range<usize>) -> Option<u32> {
    text.get(range)?.parse().ok()
}

fn annual(reference_year: i32, month: u32, day: u32) -> Option<CalendarPoint> {
    NaiveDate::from_ymd_opt(reference_year, month, day)
        .map(|_| CalendarPoint::Annual { month, day })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn detects_numeric_formats_by_digit_count() {
        assert_eq!(
            detect_format("20241001-20250331").unwrap(),
            DateFormat::FullDate
        );
        assert_eq!(detect_format("241001 - 250331").unwrap(), DateFormat::ShortDate);
        assert_eq!(detect_format("1001-0331").unwrap(), DateFormat::MonthDay);
        assert_eq!(detect_format("10 - 03").unwrap(), DateFormat::Month);
        assert!(detect_format("100-200").is_err());
    }

    #[test]
    fn may_is_resolved_by_second_endpoint() {
        assert_eq!(detect_format("may-sep").unwrap(), DateFormat::MonthAbbrev);
        assert_eq!(
            detect_format("may-september").unwrap(),
            DateFormat::MonthName
        );
        assert_eq!(detect_format("October - April").unwrap(), DateFormat::MonthName);
    }

    #[test]
    fn format_of_first_range_applies_to_all() {
        // second range is in another format and must fail
        let err = parse_date_ranges("1001-1231; 01-03", 2024).unwrap_err();
        assert!(matches!(err, PriceError::InvalidFormat { .. }));
    }

    #[test]
    fn short_date_takes_reference_century() {
        let ranges = parse_date_ranges("241001-250331", 2024).unwrap();
        assert_eq!(ranges[0].start, CalendarPoint::Date(ymd(2024, 10, 1)));
        assert_eq!(ranges[0].end, CalendarPoint::Date(ymd(2025, 3, 31)));
    }

    #[test]
    fn month_formats_are_recurring() {
        let ranges = parse_date_ranges("oct-mar", 2024).unwrap();
        assert_eq!(ranges[0].start, CalendarPoint::Annual { month: 10, day: 1 });
        assert_eq!(ranges[0].end.resolve(2030), Some(ymd(2030, 3, 1)));
    }

    #[test]
    fn leap_day_depends_on_reference_year() {
        assert!(parse_date_ranges("0229-0301", 2024).is_ok());
        assert!(parse_date_ranges("0229-0301", 2025).is_err());
    }

    #[test]
    fn wrapping_annual_range() {
        let r = parse_date_ranges("1001-0401", 2024).unwrap()[0];
        assert!(r.contains_strictly(ymd(2024, 12, 24)));
        assert!(r.contains_strictly(ymd(2025, 1, 15)));
        assert!(!r.contains_strictly(ymd(2024, 10, 1)));
        assert!(!r.contains_strictly(ymd(2025, 4, 1)));
        assert!(!r.contains_strictly(ymd(2025, 6, 1)));
    }

    #[test]
    fn blank_spec_has_no_ranges() {
        assert!(parse_date_ranges("  ", 2024).unwrap().is_empty());
    }
}

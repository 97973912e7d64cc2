//! Time-of-day windows for load levels
//!
//! Windows are written `HH:MM-HH:MM` or `HH-HH`; several windows are joined
//! with `;` (a `,` is accepted too). Only the hour part is significant.

use crate::error::{PriceError, Result};

/// One `start-end` window in whole hours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl TimeWindow {
    /// Strict match: `start_hour < hour < end_hour`.
    ///
    /// The boundary hours are excluded on both sides, so `00-06` covers
    /// hours 1 through 5 only.
    pub fn contains_hour(&self, hour: u32) -> bool {
        self.start_hour < hour && hour < self.end_hour
    }
}

/// Parse a time range spec into windows. A blank spec yields no windows.
pub fn parse_time_ranges(spec: &str) -> Result<Vec<TimeWindow>> {
    let compact: String = spec.chars().filter(|c| !c.is_whitespace()).collect();
    let mut windows = Vec::new();

    for piece in compact.split([';', ',']).filter(|p| !p.is_empty()) {
        let parts: Vec<&str> = piece.split('-').collect();
        if parts.len() < 2 {
            return Err(PriceError::invalid_range(format!(
                "expected 'HH:MM-HH:MM', got '{}'",
                piece
            )));
        }
        windows.push(TimeWindow {
            start_hour: parse_hour(parts[0], piece)?,
            end_hour: parse_hour(parts[1], piece)?,
        });
    }

    Ok(windows)
}

fn parse_hour(text: &str, piece: &str) -> Result<u32> {
    let invalid = || PriceError::invalid_range(format!("invalid hour '{}' in '{}'", text, piece));
    let hour_part = text.split(':').next().unwrap_or_default();
    if hour_part.is_empty() || !hour_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    // single digit hours compare like their zero-padded form
    let padded = format!("{:0>2}", hour_part);
    let hour: u32 = padded.parse().map_err(|_| invalid())?;
    if hour > 24 {
        return Err(PriceError::invalid_range(format!(
            "hour {} out of range in '{}'",
            hour, piece
        )));
    }
    Ok(hour)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_colon_and_bare_hours() {
        let w = parse_time_ranges("06:00 - 17:00; 21-24").unwrap();
        assert_eq!(
            w,
            vec![
                TimeWindow {
                    start_hour: 6,
                    end_hour: 17
                },
                TimeWindow {
                    start_hour: 21,
                    end_hour: 24
                },
            ]
        );
    }

    #[test]
    fn single_digit_hours_and_comma_separator() {
        let w = parse_time_ranges("0-6, 9:30-12").unwrap();
        assert_eq!(w[0].start_hour, 0);
        assert_eq!(w[0].end_hour, 6);
        assert_eq!(w[1].start_hour, 9);
    }

    #[test]
    fn missing_dash_is_invalid_range() {
        let err = parse_time_ranges("06:00").unwrap_err();
        assert!(matches!(err, PriceError::InvalidRange { .. }));
        assert!(parse_time_ranges("06-17; 21").is_err());
    }

    #[test]
    fn non_numeric_and_out_of_range_hours() {
        assert!(parse_time_ranges("ab-cd").is_err());
        assert!(parse_time_ranges("20-25").is_err());
    }

    #[test]
    fn boundary_hours_do_not_match() {
        let w = TimeWindow {
            start_hour: 0,
            end_hour: 6,
        };
        assert!(!w.contains_hour(0));
        assert!(w.contains_hour(1));
        assert!(w.contains_hour(5));
        assert!(!w.contains_hour(6));
    }
}

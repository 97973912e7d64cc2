//! High/low fee season resolution

use crate::tariff::date_range::DateRange;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Fee season of a calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    /// High fee period (typically winter)
    High,
    /// Low fee period (typically summer)
    Low,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Low => "low",
        }
    }
}

/// Whether `date` falls strictly inside any of the high fee ranges.
///
/// A date equal to a range's start or end is not inside it. Dates outside
/// every range are low season; the low fee ranges are never consulted.
pub fn is_high_season(date: NaiveDate, high_fee_ranges: &[DateRange]) -> bool {
    high_fee_ranges.iter().any(|r| r.contains_strictly(date))
}

/// Season of `date` given the configured high fee ranges
pub fn season_for(date: NaiveDate, high_fee_ranges: &[DateRange]) -> Season {
    if is_high_season(date, high_fee_ranges) {
        Season::High
    } else {
        Season::Low
    }
}

/// Built-in calendar season: October through March is the high fee period.
pub fn calendar_season(date: NaiveDate) -> Season {
    match date.month() {
        10..=12 | 1..=3 => Season::High,
        _ => Season::Low,
    }
}

/// The season tomorrow switches to, if it differs from today's
pub fn season_transition(today: Season, tomorrow: Season) -> Option<Season> {
    (today != tomorrow).then_some(tomorrow)
}

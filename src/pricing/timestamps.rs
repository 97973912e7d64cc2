use crate::error::{PriceError, Result};
use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, TimeZone};
use serde::{Deserialize, Serialize};

/// One interval of a day with its price, timestamps in ISO-8601 with offset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedPrice {
    pub start: String,
    pub end: String,
    pub value: f64,
}

/// First instant of `date` in `tz`
pub fn local_midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Result<DateTime<Tz>> {
    let naive = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| PriceError::generic(format!("no midnight on {}", date)))?;
    tz.from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| PriceError::generic(format!("midnight of {} does not exist locally", date)))
}

/// Attach start/end timestamps to a day's values.
///
/// Intervals are `24h / values.len()` long and counted from `day_start`.
pub fn with_timestamps<Tz: TimeZone>(values: &[f64], day_start: &DateTime<Tz>) -> Vec<TimedPrice>
where
    Tz::Offset: std::fmt::Display,
{
    if values.is_empty() {
        return Vec::new();
    }
    let step = Duration::milliseconds(super::interval_millis(values.len()));
    values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let start = day_start.clone() + step * i as i32;
            let end = start.clone() + step;
            TimedPrice {
                start: start.to_rfc3339_opts(SecondsFormat::Secs, false),
                end: end.to_rfc3339_opts(SecondsFormat::Secs, false),
                value: *value,
            }
        })
        .collect()
}

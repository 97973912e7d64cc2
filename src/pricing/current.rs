use chrono::{DateTime, TimeZone};

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Length in milliseconds of one interval of a day split into `len`
/// intervals
pub fn interval_millis(len: usize) -> i64 {
    match i64::try_from(len) {
        Ok(n) if n > 0 => DAY_MILLIS / n,
        _ => 0,
    }
}

/// Index of the interval of `interval_millis` containing `now`, counted
/// from `day_start`. `now` on a boundary belongs to the interval starting
/// there.
pub fn interval_index<Tz: TimeZone>(
    now: &DateTime<Tz>,
    day_start: &DateTime<Tz>,
    interval_millis: i64,
) -> Option<usize> {
    if interval_millis <= 0 {
        return None;
    }
    let elapsed_ms = now.timestamp_millis() - day_start.timestamp_millis();
    if elapsed_ms < 0 {
        return None;
    }
    usize::try_from(elapsed_ms / interval_millis).ok()
}

/// Value of the interval containing `now`, or `None` outside the series
pub fn select_current<Tz: TimeZone>(
    now: &DateTime<Tz>,
    day_start: &DateTime<Tz>,
    series: &[f64],
    interval_millis: i64,
) -> Option<f64> {
    interval_index(now, day_start, interval_millis).and_then(|i| series.get(i).copied())
}

use chrono::{Duration, NaiveDate, TimeZone};
use chrono_tz::Europe::Copenhagen;
use elprice::pricing::{interval_millis, local_midnight, select_current, with_timestamps};

#[test]
fn exact_boundary_selects_interval_starting_there() {
    let start = Copenhagen.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap();
    let series: Vec<f64> = (0..24).map(f64::from).collect();

    let at_ten = start + Duration::hours(10);
    assert_eq!(select_current(&at_ten, &start, &series, 3_600_000), Some(10.0));

    let just_before = at_ten - Duration::milliseconds(1);
    assert_eq!(select_current(&just_before, &start, &series, 3_600_000), Some(9.0));
}

#[test]
fn quarter_hour_series() {
    let start = Copenhagen.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap();
    let series: Vec<f64> = (0..96).map(f64::from).collect();
    let now = start + Duration::minutes(15 * 37 + 14);
    assert_eq!(
        select_current(&now, &start, &series, interval_millis(series.len())),
        Some(37.0)
    );
}

#[test]
fn last_interval_ends_at_next_midnight() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    let start = local_midnight(date, &Copenhagen).unwrap();
    let series = vec![1.5; 24];
    let last = start + Duration::minutes(23 * 60 + 59);
    assert_eq!(select_current(&last, &start, &series, 3_600_000), Some(1.5));
    let next_day = start + Duration::hours(24);
    assert_eq!(select_current(&next_day, &start, &series, 3_600_000), None);

    let stamped = with_timestamps(&series, &start);
    assert_eq!(stamped[23].end, "2024-03-06T00:00:00+01:00");
}

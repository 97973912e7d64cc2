use chrono::{Datelike, NaiveDate};
use elprice::error::PriceError;
use elprice::tariff::date_range::{CalendarPoint, DateFormat, detect_format, parse};
use elprice::tariff::parse_date_ranges;

#[test]
fn eight_digit_spec_is_full_date_with_matching_years() {
    let spec = "20231001-20240331; 20241001 - 20250331";
    assert_eq!(detect_format(spec).unwrap(), DateFormat::FullDate);

    let ranges = parse(spec, DateFormat::FullDate, 2024).unwrap();
    assert_eq!(ranges.len(), 2);
    let years: Vec<i32> = ranges
        .iter()
        .flat_map(|r| [r.start, r.end])
        .map(|p| match p {
            CalendarPoint::Date(d) => d.year(),
            CalendarPoint::Annual { .. } => panic!("anchored format produced annual point"),
        })
        .collect();
    assert_eq!(years, vec![2023, 2024, 2024, 2025]);
}

#[test]
fn every_format_is_detected() {
    let cases = [
        ("20240101-20240301", DateFormat::FullDate),
        ("240101-240301", DateFormat::ShortDate),
        ("0101-0301", DateFormat::MonthDay),
        ("01-03", DateFormat::Month),
        ("january-march", DateFormat::MonthName),
        ("jan-mar", DateFormat::MonthAbbrev),
        ("May-Aug", DateFormat::MonthAbbrev),
        ("May-August", DateFormat::MonthName),
    ];
    for (spec, expected) in cases {
        assert_eq!(detect_format(spec).unwrap(), expected, "{}", spec);
        assert!(parse_date_ranges(spec, 2024).is_ok(), "{}", spec);
    }
}

#[test]
fn unparsable_endpoints_are_invalid_format() {
    for spec in ["20240230-20240301", "13-02", "jan-xyz", "octember-march", "0101"] {
        let err = parse_date_ranges(spec, 2024).unwrap_err();
        assert!(
            matches!(err, PriceError::InvalidFormat { .. }),
            "{}: {:?}",
            spec,
            err
        );
    }
}

#[test]
fn month_endpoints_resolve_to_first_of_month() {
    let range = parse_date_ranges("03-09", 2024).unwrap()[0];
    let first = |p: CalendarPoint| p.resolve(2026).unwrap();
    assert_eq!(first(range.start), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
    assert_eq!(first(range.end), NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());
}

use elprice::error::PriceError;

#[test]
fn error_constructors_group_1() {
    assert!(matches!(
        PriceError::invalid_format("x"),
        PriceError::InvalidFormat { .. }
    ));
    assert!(matches!(
        PriceError::invalid_range("x"),
        PriceError::InvalidRange { .. }
    ));
    assert!(matches!(
        PriceError::data_unavailable("x"),
        PriceError::DataUnavailable { .. }
    ));
    assert!(matches!(PriceError::config("x"), PriceError::Config { .. }));
}

#[test]
fn error_constructors_group_2() {
    assert!(matches!(
        PriceError::external_lookup("x"),
        PriceError::ExternalLookup { .. }
    ));
    assert!(matches!(
        PriceError::validation("f", "m"),
        PriceError::Validation { .. }
    ));
    assert!(matches!(PriceError::io("x"), PriceError::Io { .. }));
    assert!(matches!(PriceError::generic("x"), PriceError::Generic { .. }));
}

#[test]
fn conversions() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    assert!(matches!(PriceError::from(io), PriceError::Io { .. }));

    let json = serde_json::from_str::<Vec<f64>>("[1,").unwrap_err();
    assert!(matches!(
        PriceError::from(json),
        PriceError::Serialization { .. }
    ));

    let yaml = serde_yaml::from_str::<Vec<f64>>("[1, x]").unwrap_err();
    assert!(matches!(
        PriceError::from(yaml),
        PriceError::Serialization { .. }
    ));
}

#[test]
fn display_messages() {
    let e = PriceError::validation("field", "bad");
    let s = format!("{}", e);
    assert!(s.contains("Validation error"));

    let e = PriceError::invalid_range("06:00");
    assert_eq!(format!("{}", e), "Invalid time range: 06:00");
}

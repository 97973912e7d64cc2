use chrono::TimeZone;
use chrono_tz::Europe::Copenhagen;
use elprice::config::Config;
use elprice::sensor::PriceSensor;
use elprice::tariff::{Season, TariffOrigin};
use std::fs;

fn config_in(dir: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.source.file = dir.join("nordpool.json").to_string_lossy().to_string();
    config.source.wait_attempts = 2;
    config.source.wait_delay_ms = 1;
    config.charges.flat_charge = 0.0;
    config.charges.tax_percent = 25.0;
    config
}

#[tokio::test]
async fn lookup_tariffs_drive_totals() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    let charges = dir.path().join("charges.json");
    config.tariffs.enabled = true;
    config.tariffs.file = Some(charges.to_string_lossy().to_string());

    let today: Vec<String> = (0..24).map(|h| format!("{}.0", h)).collect();
    fs::write(
        &config.source.file,
        format!(
            r#"{{"today":[{}],"tomorrow":[],"tomorrow_valid":false}}"#,
            today.join(",")
        ),
    )
    .unwrap();
    fs::write(
        &charges,
        r#"{"transmissions_nettarif":0.1,"systemtarif":0.1,"elafgift":0.8,"nettarif_c":[0.0,0.0,0.0,0.0,0.0,0.0,1.0,1.0,1.0,1.0,1.0,1.0,1.0,1.0,1.0,1.0,1.0,2.0,2.0,2.0,2.0,1.0,1.0,1.0]}"#,
    )
    .unwrap();

    let sensor = PriceSensor::from_config(config).unwrap();
    let now = Copenhagen.with_ymd_and_hms(2024, 11, 20, 18, 10, 0).unwrap();
    let snap = sensor.update(now).await.unwrap();

    assert_eq!(snap.tariff_origin, Some(TariffOrigin::Lookup));
    assert_eq!(snap.energy_tax, 0.8);
    // (18 + 1.0 + 2.0) * 1.25
    assert_eq!(snap.state, Some(26.25));
    assert_eq!(snap.current_raw_price, Some(18.0));
    assert_eq!(snap.current_variable_fee, Some(2.0));
    assert_eq!(snap.current_tax, Some(5.25));
    assert_eq!(snap.total_fees.fixed, 1.0);
    assert!(snap.tomorrow.is_empty());
    assert!(snap.raw_tomorrow.is_empty());
    assert_eq!(snap.raw_today[18].start, "2024-11-20T18:00:00+01:00");
    assert_eq!(snap.raw_today[18].value, 26.25);
}

#[tokio::test]
async fn failed_lookup_falls_back_to_default_table() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.tariffs.enabled = true;
    config.tariffs.file = Some(dir.path().join("missing.json").to_string_lossy().to_string());
    fs::write(
        &config.source.file,
        r#"{"today":[1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1,1],"tomorrow":[2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2,2],"tomorrow_valid":true}"#,
    )
    .unwrap();

    let sensor = PriceSensor::from_config(config).unwrap();
    let now = Copenhagen.with_ymd_and_hms(2024, 2, 28, 3, 0, 0).unwrap();
    let snap = sensor.update(now).await.unwrap();

    assert_eq!(snap.tariff_origin, Some(TariffOrigin::Default));
    assert_eq!(snap.transmission_fee, 0.058);
    // February low load rate: (1 + 0.12 + 0.1837) * 1.25
    assert_eq!(snap.state, Some(1.63));
    assert_eq!(snap.tomorrow.len(), 24);
    assert!(snap.tomorrow_valid);
    assert_eq!(snap.season_today, Some(Season::High));
    assert_eq!(snap.season_transition, None);
}

#[tokio::test]
async fn configured_schedule_with_quarter_hour_prices() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.schedule.high_fee_dates = "oct-apr".to_string();
    config.schedule.low_load_times = "00-06".to_string();
    config.schedule.high_load_times = "06-17; 21-24".to_string();
    config.schedule.peak_load_times = "17-21".to_string();
    let quarters = vec!["0.5"; 96].join(",");
    fs::write(
        &config.source.file,
        format!(r#"{{"today":[{}]}}"#, quarters),
    )
    .unwrap();

    let sensor = PriceSensor::from_config(config).unwrap();
    let now = Copenhagen.with_ymd_and_hms(2024, 7, 1, 19, 50, 0).unwrap();
    let snap = sensor.update(now).await.unwrap();

    assert_eq!(snap.tariff_origin, Some(TariffOrigin::Schedule));
    assert_eq!(snap.today.len(), 96);
    assert_eq!(snap.total_fees.variable.len(), 96);
    // 19:45 slot, low season peak rate
    assert_eq!(snap.current_variable_fee, Some(0.6633));
    assert_eq!(snap.raw_today[79].start, "2024-07-01T19:45:00+02:00");
    assert_eq!(snap.season_today, Some(Season::Low));
}

use super::*;

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            charges: ChargesConfig::default(),
            schedule: ScheduleConfig::default(),
            tariffs: TariffsConfig::default(),
            update: UpdateConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
            timezone: "Europe/Copenhagen".to_string(),
            currency: "DKK".to_string(),
            country: "Denmark".to_string(),
            region: "DK2".to_string(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            price_sensor: "sensor.nordpool_kwh_dk2_dkk".to_string(),
            file: "/data/nordpool.json".to_string(),
            wait_attempts: 30,
            wait_delay_ms: 1000,
        }
    }
}

impl Default for ChargesConfig {
    fn default() -> Self {
        Self {
            flat_charge: 0.0,
            tax_percent: 25.0,
        }
    }
}

// Radius/Andel published rates, converted from øre to DKK per kWh
impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            high_fee_dates: String::new(),
            low_fee_dates: String::new(),
            low_load_times: String::new(),
            high_load_times: String::new(),
            peak_load_times: String::new(),
            high_dates_low_load: 0.1701,
            high_dates_high_load: 0.5103,
            high_dates_peak_load: 1.5308,
            low_dates_low_load: 0.1701,
            low_dates_high_load: 0.2551,
            low_dates_peak_load: 0.6633,
        }
    }
}

impl Default for TariffsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            file: None,
            default_table: DefaultTableMode::Monthly,
        }
    }
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            scan_interval_secs: 600,
            debounce_ms: 100,
            watch_source: true,
            watch_interval_ms: 1000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            console_level: None,
            file_level: None,
            file: "/tmp/elprice.log".to_string(),
            backup_count: 5,
            console_output: true,
            json_format: false,
        }
    }
}

//! Configuration management for Elprice
//!
//! This module handles loading, validation, and management of the application
//! configuration from YAML files.

mod defaults;
pub mod validators;

use crate::error::{PriceError, Result};
use crate::pricing::FixedCharges;
use crate::tariff::{DefaultTableMode, LoadWindows, SeasonalRates, TariffRates, parse_date_ranges};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::Path;
use validators::{number_or_text, percentage_or_text, validate_entity_id};

pub use validators::{parse_number, parse_percentage};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where raw spot prices come from
    pub source: SourceConfig,

    /// Flat surcharge and tax
    pub charges: ChargesConfig,

    /// Seasonal and time-of-day tariff schedule
    pub schedule: ScheduleConfig,

    /// Tariff lookup and default table selection
    pub tariffs: TariffsConfig,

    /// Update cadence
    pub update: UpdateConfig,

    /// Snapshot output
    pub output: OutputConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// IANA timezone used for day boundaries and timestamps
    pub timezone: String,

    pub currency: String,
    pub country: String,
    pub region: String,
}

/// Raw price source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Entity id of the upstream spot price sensor
    pub price_sensor: String,

    /// JSON document holding the sensor's `today`/`tomorrow` attributes
    pub file: String,

    /// How many times to look for the source before giving up
    pub wait_attempts: u32,

    /// Delay between attempts in milliseconds
    pub wait_delay_ms: u64,
}

/// Fixed charges applied on every interval
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargesConfig {
    /// Flat per-kWh surcharge
    #[serde(deserialize_with = "number_or_text")]
    pub flat_charge: f64,

    /// Tax in percent, applied after all other fees
    #[serde(deserialize_with = "percentage_or_text")]
    pub tax_percent: f64,
}

/// Fee seasons, load windows and the rate of each combination
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Date ranges of the high fee season, e.g. `october-march`
    pub high_fee_dates: String,

    /// Date ranges of the low fee season (validated, not consulted)
    pub low_fee_dates: String,

    /// Time windows, e.g. `00:00-06:00`
    pub low_load_times: String,
    pub high_load_times: String,
    pub peak_load_times: String,

    #[serde(deserialize_with = "number_or_text")]
    pub high_dates_low_load: f64,
    #[serde(deserialize_with = "number_or_text")]
    pub high_dates_high_load: f64,
    #[serde(deserialize_with = "number_or_text")]
    pub high_dates_peak_load: f64,
    #[serde(deserialize_with = "number_or_text")]
    pub low_dates_low_load: f64,
    #[serde(deserialize_with = "number_or_text")]
    pub low_dates_high_load: f64,
    #[serde(deserialize_with = "number_or_text")]
    pub low_dates_peak_load: f64,
}

/// Tariff lookup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TariffsConfig {
    /// Use the tariff lookup document when available
    pub enabled: bool,

    /// JSON document with the charges of the metering point
    pub file: Option<String>,

    /// Default hourly table used when no lookup and no schedule is available
    pub default_table: DefaultTableMode,
}

/// Update loop timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateConfig {
    /// Periodic recompute interval in seconds
    pub scan_interval_secs: u64,

    /// Batch window for upstream change notifications
    pub debounce_ms: u64,

    /// Poll the source file modification time and trigger on change
    pub watch_source: bool,

    /// Poll interval of the source watcher in milliseconds
    pub watch_interval_ms: u64,
}

/// Snapshot output
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Write every published snapshot to this file as JSON
    pub file: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Console level override
    pub console_level: Option<String>,

    /// File level override
    pub file_level: Option<String>,

    /// Log file or directory; empty disables file logging
    pub file: String,

    /// Number of rotated files to keep
    pub backup_count: u32,

    /// Whether to log to console
    pub console_output: bool,

    /// Whether to use JSON format
    pub json_format: bool,
}

impl ChargesConfig {
    pub fn fixed_charges(&self) -> FixedCharges {
        FixedCharges {
            flat_charge: self.flat_charge,
            tax_percent: self.tax_percent,
        }
    }
}

impl ScheduleConfig {
    /// Rates per load level for both seasons
    pub fn seasonal_rates(&self) -> SeasonalRates {
        SeasonalRates {
            high_season: TariffRates {
                low: self.high_dates_low_load,
                high: self.high_dates_high_load,
                peak: self.high_dates_peak_load,
            },
            low_season: TariffRates {
                low: self.low_dates_low_load,
                high: self.low_dates_high_load,
                peak: self.low_dates_peak_load,
            },
        }
    }

    pub fn load_windows(&self) -> Result<LoadWindows> {
        LoadWindows::parse(
            &self.low_load_times,
            &self.high_load_times,
            &self.peak_load_times,
        )
    }

    fn rates(&self) -> [(&'static str, f64); 6] {
        [
            ("schedule.high_dates_low_load", self.high_dates_low_load),
            ("schedule.high_dates_high_load", self.high_dates_high_load),
            ("schedule.high_dates_peak_load", self.high_dates_peak_load),
            ("schedule.low_dates_low_load", self.low_dates_low_load),
            ("schedule.low_dates_high_load", self.low_dates_high_load),
            ("schedule.low_dates_peak_load", self.low_dates_peak_load),
        ]
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from the first default location that exists
    pub fn load() -> Result<Self> {
        let default_paths = [
            "elprice_config.yaml",
            "/data/elprice_config.yaml",
            "/etc/elprice/config.yaml",
        ];

        for path in &default_paths {
            if Path::new(path).exists() {
                return Self::from_file(path);
            }
        }

        // Fall back to default configuration
        Ok(Config::default())
    }

    /// Save configuration to a YAML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parsed timezone
    pub fn tz(&self) -> Result<Tz> {
        self.timezone.parse::<Tz>().map_err(|_| {
            PriceError::validation(
                "timezone".to_string(),
                format!("Unknown timezone '{}'", self.timezone),
            )
        })
    }

    /// Validate the configuration
    ///
    /// Schedule specs are parsed against `reference_year`; unparsable specs
    /// surface their `InvalidFormat` / `InvalidRange` error unchanged.
    pub fn validate_for_year(&self, reference_year: i32) -> Result<()> {
        validate_entity_id("source.price_sensor", &self.source.price_sensor)?;

        if !self.charges.flat_charge.is_finite() || self.charges.flat_charge < 0.0 {
            return Err(PriceError::validation(
                "charges.flat_charge",
                "Must be a finite, non-negative number",
            ));
        }

        if !(0.0..=100.0).contains(&self.charges.tax_percent) {
            return Err(PriceError::validation(
                "charges.tax_percent",
                "Must be between 0 and 100",
            ));
        }

        for (field, value) in self.schedule.rates() {
            if !value.is_finite() {
                return Err(PriceError::validation(field, "Must be a finite number"));
            }
        }

        if self.update.scan_interval_secs == 0 {
            return Err(PriceError::validation(
                "update.scan_interval_secs",
                "Must be greater than 0",
            ));
        }

        if self.update.watch_source && self.update.watch_interval_ms == 0 {
            return Err(PriceError::validation(
                "update.watch_interval_ms",
                "Must be greater than 0",
            ));
        }

        self.tz()?;

        parse_date_ranges(&self.schedule.high_fee_dates, reference_year)?;
        parse_date_ranges(&self.schedule.low_fee_dates, reference_year)?;
        self.schedule.load_windows()?;

        Ok(())
    }

    /// Validate against the current year
    pub fn validate(&self) -> Result<()> {
        use chrono::Datelike;
        self.validate_for_year(chrono::Utc::now().year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.update.scan_interval_secs, 600);
        assert_eq!(config.update.debounce_ms, 100);
        assert_eq!(config.charges.tax_percent, 25.0);
        assert_eq!(config.currency, "DKK");
        assert_eq!(config.tariffs.default_table, DefaultTableMode::Monthly);
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate_for_year(2024).is_ok());

        config.source.price_sensor = String::new();
        assert!(config.validate_for_year(2024).is_err());

        config = Config::default();
        config.update.scan_interval_secs = 0;
        assert!(config.validate_for_year(2024).is_err());

        config = Config::default();
        config.charges.tax_percent = 125.0;
        assert!(config.validate_for_year(2024).is_err());

        config = Config::default();
        config.schedule.low_dates_peak_load = f64::NAN;
        assert!(config.validate_for_year(2024).is_err());
    }

    #[test]
    fn test_schedule_errors_surface_unchanged() {
        let mut config = Config::default();
        config.schedule.high_fee_dates = "1001-13".to_string();
        let err = config.validate_for_year(2024).unwrap_err();
        assert!(matches!(err, PriceError::InvalidFormat { .. }));

        config = Config::default();
        config.schedule.peak_load_times = "17".to_string();
        let err = config.validate_for_year(2024).unwrap_err();
        assert!(matches!(err, PriceError::InvalidRange { .. }));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let deserialized: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.source.price_sensor, deserialized.source.price_sensor);
        assert_eq!(
            config.schedule.high_dates_peak_load,
            deserialized.schedule.high_dates_peak_load
        );
    }

    #[test]
    fn test_amounts_accept_text() {
        let yaml = "charges:\n  flat_charge: \"1,5\"\n  tax_percent: 25\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.charges.flat_charge, 1.5);
        assert_eq!(config.charges.tax_percent, 25.0);
        assert_eq!(config.timezone, "Europe/Copenhagen");
    }

    #[test]
    fn test_tax_accepts_percent_sign() {
        let yaml = "charges:\n  tax_percent: \"25 %\"\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.charges.tax_percent, 25.0);

        let yaml = "charges:\n  tax_percent: \"lots\"\n";
        assert!(serde_yaml::from_str::<Config>(yaml).is_err());
    }
}

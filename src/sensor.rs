//! Total price sensor
//!
//! One update tick: read raw prices, resolve the tariffs of today and
//! tomorrow, aggregate, pick the current interval and assemble the published
//! snapshot with its attributes.

use crate::config::Config;
use crate::error::{PriceError, Result};
use crate::logging::{LogContext, StructuredLogger, get_logger_with_context};
use crate::pricing::{
    FeeBreakdown, PriceAggregator, TimedPrice, interval_index, interval_millis, local_midnight,
    round3, with_timestamps,
};
use crate::source::{
    JsonFilePriceSource, JsonFileTariffProvider, PriceSource, RawPrices, TariffProvider,
    wait_for_source,
};
use crate::tariff::{
    DEFAULT_TARIFFS, Season, TariffLookup, TariffOrigin, TariffSchedule, season_transition,
};
use chrono::{DateTime, Datelike, SecondsFormat};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub const SENSOR_NAME: &str = "total_electricity_price";
pub const ENTITY_ID: &str = "sensor.total_electricity_price";

/// Published state of the sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub name: String,
    pub entity_id: String,
    /// Total price of the current interval
    pub state: Option<f64>,
    pub available: bool,

    pub today: Vec<f64>,
    pub tomorrow: Vec<f64>,
    pub today_valid: bool,
    pub tomorrow_valid: bool,
    pub raw_today: Vec<TimedPrice>,
    pub raw_tomorrow: Vec<TimedPrice>,
    pub total_fees: FeeBreakdown,
    pub total_fees_tomorrow: FeeBreakdown,

    #[serde(rename = "transmissions_nettarif")]
    pub transmission_fee: f64,
    #[serde(rename = "systemtarif")]
    pub system_tariff: f64,
    #[serde(rename = "elafgift")]
    pub energy_tax: f64,

    pub current_raw_price: Option<f64>,
    pub current_variable_fee: Option<f64>,
    pub current_tax: Option<f64>,

    pub season_today: Option<Season>,
    pub season_tomorrow: Option<Season>,
    /// Season tomorrow switches to, when it differs from today's
    pub season_transition: Option<Season>,
    pub tariff_origin: Option<TariffOrigin>,

    pub currency: String,
    pub country: String,
    pub region: String,
    pub state_class: String,
    pub icon: String,
    pub last_updated: Option<String>,
}

impl PriceSnapshot {
    /// Snapshot published before the first successful update
    pub fn pending(config: &Config) -> Self {
        Self {
            name: SENSOR_NAME.to_string(),
            entity_id: ENTITY_ID.to_string(),
            state: None,
            available: false,
            today: Vec::new(),
            tomorrow: Vec::new(),
            today_valid: false,
            tomorrow_valid: false,
            raw_today: Vec::new(),
            raw_tomorrow: Vec::new(),
            total_fees: FeeBreakdown::default(),
            total_fees_tomorrow: FeeBreakdown::default(),
            transmission_fee: 0.0,
            system_tariff: 0.0,
            energy_tax: 0.0,
            current_raw_price: None,
            current_variable_fee: None,
            current_tax: None,
            season_today: None,
            season_tomorrow: None,
            season_transition: None,
            tariff_origin: None,
            currency: config.currency.clone(),
            country: config.country.clone(),
            region: config.region.clone(),
            state_class: "total".to_string(),
            icon: "mdi:flash".to_string(),
            last_updated: None,
        }
    }

    /// Copy of this snapshot flagged unavailable
    pub fn as_unavailable(&self) -> Self {
        Self {
            available: false,
            ..self.clone()
        }
    }
}

/// Computes the total electricity price from a spot price source
pub struct PriceSensor {
    config: Config,
    tz: Tz,
    source: Arc<dyn PriceSource>,
    tariffs: Option<Arc<dyn TariffProvider>>,
    aggregator: PriceAggregator,
    logger: StructuredLogger,
}

impl PriceSensor {
    pub fn new(
        config: Config,
        source: Arc<dyn PriceSource>,
        tariffs: Option<Arc<dyn TariffProvider>>,
    ) -> Result<Self> {
        let tz = config.tz()?;
        let logger = get_logger_with_context(
            LogContext::new("sensor").with_sensor_id(&config.source.price_sensor),
        );
        let aggregator = PriceAggregator::with_logger(get_logger_with_context(
            LogContext::new("aggregate").with_sensor_id(&config.source.price_sensor),
        ));
        Ok(Self {
            config,
            tz,
            source,
            tariffs,
            aggregator,
            logger,
        })
    }

    /// Sensor backed by the JSON files named in `config`
    pub fn from_config(config: Config) -> Result<Self> {
        let source: Arc<dyn PriceSource> = Arc::new(JsonFilePriceSource::new(
            &config.source.price_sensor,
            &config.source.file,
        ));
        let tariffs: Option<Arc<dyn TariffProvider>> = match &config.tariffs.file {
            Some(path) if config.tariffs.enabled => {
                Some(Arc::new(JsonFileTariffProvider::new(path)))
            }
            _ => None,
        };
        Self::new(config, source, tariffs)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Run one update: fetch, resolve and compute.
    ///
    /// A source that never shows up degrades to zero prices flagged invalid;
    /// a failed tariff lookup falls back to the configured schedule or the
    /// default table.
    pub async fn update(&self, now: DateTime<Tz>) -> Result<PriceSnapshot> {
        let delay = Duration::from_millis(self.config.source.wait_delay_ms);
        let raw = match wait_for_source(
            self.source.as_ref(),
            self.config.source.wait_attempts,
            delay,
            &self.logger,
        )
        .await
        {
            Ok(raw) => raw,
            Err(PriceError::DataUnavailable { message }) => {
                self.logger
                    .error(&format!("{}. Skipping calculation.", message));
                RawPrices::default()
            }
            Err(e) => return Err(e),
        };

        let lookup = match &self.tariffs {
            Some(provider) => match provider.fetch_tariffs().await {
                Ok(lookup) => Some(lookup),
                Err(e) => {
                    self.logger
                        .warn(&format!("Failed to fetch tariffs, using defaults: {}", e));
                    None
                }
            },
            None => None,
        };

        self.compute(now, &raw, lookup.as_ref())
    }

    /// Compute the snapshot for `now` from already fetched inputs
    pub fn compute(
        &self,
        now: DateTime<Tz>,
        raw: &RawPrices,
        lookup: Option<&TariffLookup>,
    ) -> Result<PriceSnapshot> {
        let now = now.with_timezone(&self.tz);
        let today = now.date_naive();
        let tomorrow = today
            .succ_opt()
            .ok_or_else(|| PriceError::generic(format!("no day after {}", today)))?;

        let schedule = TariffSchedule::from_config(
            &self.config.schedule,
            self.config.tariffs.default_table,
            today.year(),
        )?;
        let tariff_today = schedule.resolve_day(today, lookup, &DEFAULT_TARIFFS)?;
        let tariff_tomorrow = schedule.resolve_day(tomorrow, lookup, &DEFAULT_TARIFFS)?;
        if tariff_today.origin == TariffOrigin::Default {
            self.logger.debug(&format!(
                "Using default {} season tariffs",
                tariff_today.season.as_str()
            ));
        }

        let charges = self.config.charges.fixed_charges();
        let prices = self.aggregator.aggregate(
            raw.today.as_deref(),
            raw.tomorrow.as_deref(),
            &charges,
            &tariff_today,
            &tariff_tomorrow,
        )?;

        let today_start = local_midnight(today, &self.tz)?;
        let tomorrow_start = local_midnight(tomorrow, &self.tz)?;

        let index = interval_index(&now, &today_start, interval_millis(prices.today.len()));
        let state = index.and_then(|i| prices.today.get(i).copied());
        let current_raw_price = index.and_then(|i| raw.today.as_ref()?.get(i).copied());
        let current_variable_fee = index.and_then(|i| prices.fees_today.variable.get(i).copied());
        let current_tax = match (state, current_raw_price, current_variable_fee) {
            (Some(total), Some(raw_price), Some(fee)) => {
                let before_tax =
                    round3(raw_price + tariff_today.network.total() + fee + charges.flat_charge);
                Some(round3(total - before_tax))
            }
            _ => None,
        };

        let raw_today = with_timestamps(&prices.today, &today_start);
        let raw_tomorrow = with_timestamps(&prices.tomorrow, &tomorrow_start);

        Ok(PriceSnapshot {
            state,
            available: true,
            today_valid: prices.today_valid,
            tomorrow_valid: prices.tomorrow_valid,
            raw_today,
            raw_tomorrow,
            transmission_fee: tariff_today.network.transmission,
            system_tariff: tariff_today.network.system,
            energy_tax: tariff_today.network.energy_tax,
            current_raw_price,
            current_variable_fee,
            current_tax,
            season_today: Some(tariff_today.season),
            season_tomorrow: Some(tariff_tomorrow.season),
            season_transition: season_transition(tariff_today.season, tariff_tomorrow.season),
            tariff_origin: Some(tariff_today.origin),
            last_updated: Some(now.to_rfc3339_opts(SecondsFormat::Secs, false)),
            today: prices.today,
            tomorrow: prices.tomorrow,
            total_fees: prices.fees_today,
            total_fees_tomorrow: prices.fees_tomorrow,
            ..PriceSnapshot::pending(&self.config)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct Fixed(Option<RawPrices>);

    #[async_trait::async_trait]
    impl PriceSource for Fixed {
        fn id(&self) -> &str {
            "sensor.fixed"
        }
        async fn fetch(&self) -> Result<Option<RawPrices>> {
            Ok(self.0.clone())
        }
    }

    fn sensor(raw: Option<RawPrices>) -> PriceSensor {
        let mut config = Config::default();
        config.charges.flat_charge = 2.0;
        config.source.wait_attempts = 1;
        config.source.wait_delay_ms = 0;
        PriceSensor::new(config, Arc::new(Fixed(raw)), None).unwrap()
    }

    #[test]
    fn current_interval_and_attributes() {
        let sensor = sensor(None);
        let now = chrono_tz::Europe::Copenhagen
            .with_ymd_and_hms(2024, 9, 30, 14, 30, 0)
            .unwrap();
        let raw = RawPrices {
            today: Some((0..24).map(f64::from).collect()),
            tomorrow: None,
        };
        let snap = sensor.compute(now, &raw, None).unwrap();
        assert!(snap.available);
        assert_eq!(snap.current_raw_price, Some(14.0));
        assert_eq!(snap.state, Some(snap.today[14]));
        assert_eq!(snap.raw_today[14].start, "2024-09-30T14:00:00+02:00");
        assert_eq!(snap.season_today, Some(Season::Low));
        assert_eq!(snap.season_transition, Some(Season::High));
        assert_eq!(snap.currency, "DKK");
        assert_eq!(snap.state_class, "total");
        assert!(snap.tomorrow.is_empty());
        assert!(!snap.tomorrow_valid);
    }

    #[tokio::test]
    async fn missing_source_degrades_to_zeros() {
        let sensor = sensor(None);
        let now = chrono_tz::Europe::Copenhagen
            .with_ymd_and_hms(2024, 1, 10, 8, 0, 0)
            .unwrap();
        let snap = sensor.update(now).await.unwrap();
        assert!(snap.available);
        assert!(!snap.today_valid);
        assert_eq!(snap.today, vec![0.0; 24]);
        assert_eq!(snap.current_raw_price, None);
    }
}

//! Tariff resolution
//!
//! Turns the configured seasons, load windows and rates (or a tariff lookup
//! result, or the static default table) into the network add-ons and the
//! hourly variable fee of one calendar day.

pub mod date_range;
pub mod load_window;
pub mod season;
pub mod table;
pub mod time_range;

use crate::config::ScheduleConfig;
use crate::error::{PriceError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub use date_range::{DateFormat, DateRange, detect_format, parse_date_ranges};
pub use load_window::{LoadLevel, LoadWindows, TariffRates, classify_hour};
pub use season::{Season, calendar_season, is_high_season, season_for, season_transition};
pub use table::{
    DEFAULT_TARIFFS, DefaultTableMode, DefaultTariffTable, NetworkCharges, TariffLookup,
};
pub use time_range::{TimeWindow, parse_time_ranges};

/// Rates per load level for each fee season
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SeasonalRates {
    pub high_season: TariffRates,
    pub low_season: TariffRates,
}

impl SeasonalRates {
    pub fn for_season(&self, season: Season) -> &TariffRates {
        match season {
            Season::High => &self.high_season,
            Season::Low => &self.low_season,
        }
    }
}

/// Where a day's tariffs came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TariffOrigin {
    /// Tariff lookup result
    Lookup,
    /// Configured load windows and rates
    Schedule,
    /// Static default table
    Default,
}

/// Resolved tariffs of one calendar day
#[derive(Debug, Clone, PartialEq)]
pub struct DayTariff {
    pub date: NaiveDate,
    pub season: Season,
    pub network: NetworkCharges,
    /// Variable fee per hour of the day
    pub hourly: Vec<f64>,
    pub origin: TariffOrigin,
}

/// Parsed tariff schedule, rebuilt on every update tick
#[derive(Debug, Clone, Default)]
pub struct TariffSchedule {
    pub high_fee_dates: Vec<DateRange>,
    pub low_fee_dates: Vec<DateRange>,
    pub windows: LoadWindows,
    pub rates: SeasonalRates,
    pub default_mode: DefaultTableMode,
}

impl TariffSchedule {
    /// Parse the configured schedule against `reference_year`
    pub fn from_config(
        config: &ScheduleConfig,
        default_mode: DefaultTableMode,
        reference_year: i32,
    ) -> Result<Self> {
        Ok(Self {
            high_fee_dates: parse_date_ranges(&config.high_fee_dates, reference_year)?,
            low_fee_dates: parse_date_ranges(&config.low_fee_dates, reference_year)?,
            windows: config.load_windows()?,
            rates: config.seasonal_rates(),
            default_mode,
        })
    }

    /// Fee season of `date`.
    ///
    /// Dates outside every configured high fee range are low season. Only
    /// when neither windows nor high fee dates are configured does the
    /// default table's calendar season apply.
    pub fn season(&self, date: NaiveDate) -> Season {
        if self.windows.is_empty() && self.high_fee_dates.is_empty() {
            calendar_season(date)
        } else {
            season_for(date, &self.high_fee_dates)
        }
    }

    /// Resolve the tariffs of `date`.
    ///
    /// A lookup result wins; without one the configured windows and rates
    /// apply, and without windows the default table is used.
    pub fn resolve_day(
        &self,
        date: NaiveDate,
        lookup: Option<&TariffLookup>,
        table: &DefaultTariffTable,
    ) -> Result<DayTariff> {
        let season = self.season(date);

        if let Some(lookup) = lookup {
            let network = lookup.network();
            if !network.is_finite() || lookup.hourly_network_tariff.iter().any(|v| !v.is_finite())
            {
                return Err(PriceError::config("tariff lookup contains non-finite charges"));
            }
            let hourly = if lookup.hourly_network_tariff.is_empty() {
                self.schedule_hourly(date, season, table)?
            } else {
                lookup.hourly_network_tariff.clone()
            };
            return Ok(DayTariff {
                date,
                season,
                network,
                hourly,
                origin: TariffOrigin::Lookup,
            });
        }

        let origin = if self.windows.is_empty() {
            TariffOrigin::Default
        } else {
            TariffOrigin::Schedule
        };
        Ok(DayTariff {
            date,
            season,
            network: table.network,
            hourly: self.schedule_hourly(date, season, table)?,
            origin,
        })
    }

    fn schedule_hourly(
        &self,
        date: NaiveDate,
        season: Season,
        table: &DefaultTariffTable,
    ) -> Result<Vec<f64>> {
        if self.windows.is_empty() {
            return Ok(table
                .hourly(self.default_mode, date.month(), season)
                .to_vec());
        }
        let rates = self.rates.for_season(season);
        if !rates.is_finite() {
            return Err(PriceError::config(format!(
                "{} season rates must be finite numbers",
                season.as_str()
            )));
        }
        Ok(rates.hourly_fees(&self.windows))
    }
}

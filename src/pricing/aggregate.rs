use crate::error::{PriceError, Result};
use crate::logging::{StructuredLogger, get_logger};
use crate::tariff::DayTariff;
use serde::{Deserialize, Serialize};

/// Flat surcharge and tax applied to every interval
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FixedCharges {
    pub flat_charge: f64,
    pub tax_percent: f64,
}

impl FixedCharges {
    pub fn tax_factor(&self) -> f64 {
        1.0 + self.tax_percent / 100.0
    }
}

/// Fixed and per-interval variable fees of one day
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeeBreakdown {
    /// Transmission + system tariff + energy tax
    pub fixed: f64,
    /// Variable network fee of every interval
    pub variable: Vec<f64>,
}

/// Total prices for today and tomorrow
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregatedPrices {
    pub today: Vec<f64>,
    pub tomorrow: Vec<f64>,
    pub today_valid: bool,
    pub tomorrow_valid: bool,
    pub fees_today: FeeBreakdown,
    pub fees_tomorrow: FeeBreakdown,
}

/// How an hourly fee array was fitted to a price series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Exact,
    /// Each value repeated this many times
    Repeated(usize),
    /// This many zeros appended
    Padded(usize),
    /// This many trailing values dropped
    Truncated(usize),
}

const HOURS_PER_DAY: usize = 24;

/// Round half away from zero to 3 decimals
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Fit `fees` to a series of `len` intervals.
///
/// Only a full 24 hour array is repeated, `len / 24` times per hour (96
/// quarter hours get each hourly fee four times). Anything else is padded
/// with zeros or truncated.
pub fn align_to_resolution(fees: &[f64], len: usize) -> (Vec<f64>, Alignment) {
    if fees.len() == len {
        return (fees.to_vec(), Alignment::Exact);
    }
    if fees.len() == HOURS_PER_DAY && len > HOURS_PER_DAY && len % HOURS_PER_DAY == 0 {
        let factor = len / HOURS_PER_DAY;
        let repeated = fees
            .iter()
            .flat_map(|fee| std::iter::repeat_n(*fee, factor))
            .collect();
        return (repeated, Alignment::Repeated(factor));
    }
    if fees.len() < len {
        let mut padded = fees.to_vec();
        padded.resize(len, 0.0);
        (padded, Alignment::Padded(len - fees.len()))
    } else {
        (fees[..len].to_vec(), Alignment::Truncated(fees.len() - len))
    }
}

/// Sums spot price and fees, then applies tax
#[derive(Debug, Clone)]
pub struct PriceAggregator {
    logger: StructuredLogger,
}

impl Default for PriceAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceAggregator {
    pub fn new() -> Self {
        Self {
            logger: get_logger("aggregate"),
        }
    }

    pub fn with_logger(logger: StructuredLogger) -> Self {
        Self { logger }
    }

    /// Compute total prices for today and tomorrow.
    ///
    /// A missing or empty `raw_today` yields 24 zeros flagged invalid; a
    /// missing or empty `raw_tomorrow` yields an empty, invalid series. Only
    /// non-finite charges or tariffs fail.
    pub fn aggregate(
        &self,
        raw_today: Option<&[f64]>,
        raw_tomorrow: Option<&[f64]>,
        charges: &FixedCharges,
        tariff_today: &DayTariff,
        tariff_tomorrow: &DayTariff,
    ) -> Result<AggregatedPrices> {
        check_finite(charges, tariff_today)?;
        check_finite(charges, tariff_tomorrow)?;

        let (today, fees_today, today_valid) = match raw_today.filter(|r| !r.is_empty()) {
            Some(raw) => {
                let (totals, fees) = self.day_totals("today", raw, charges, tariff_today);
                (totals, fees, true)
            }
            None => {
                self.logger
                    .warn("No raw prices for today, publishing zeros");
                let fees = FeeBreakdown {
                    fixed: round3(tariff_today.network.total()),
                    variable: align_to_resolution(&tariff_today.hourly, 24).0,
                };
                (vec![0.0; 24], fees, false)
            }
        };

        let (tomorrow, fees_tomorrow, tomorrow_valid) =
            match raw_tomorrow.filter(|r| !r.is_empty()) {
                Some(raw) => {
                    let (totals, fees) =
                        self.day_totals("tomorrow", raw, charges, tariff_tomorrow);
                    (totals, fees, true)
                }
                None => {
                    self.logger.debug("No raw prices for tomorrow yet");
                    (Vec::new(), FeeBreakdown::default(), false)
                }
            };

        Ok(AggregatedPrices {
            today,
            tomorrow,
            today_valid,
            tomorrow_valid,
            fees_today,
            fees_tomorrow,
        })
    }

    fn day_totals(
        &self,
        day: &str,
        raw: &[f64],
        charges: &FixedCharges,
        tariff: &DayTariff,
    ) -> (Vec<f64>, FeeBreakdown) {
        let logger = self.logger.for_day(day);
        let (variable, alignment) = align_to_resolution(&tariff.hourly, raw.len());
        match alignment {
            Alignment::Exact => {}
            Alignment::Repeated(n) => logger.debug(&format!(
                "Hourly fees repeated {} times for {} prices",
                n,
                raw.len()
            )),
            Alignment::Padded(n) => logger.warn(&format!(
                "{} variable fees for {} prices, padded {} intervals with zero",
                tariff.hourly.len(),
                raw.len(),
                n
            )),
            Alignment::Truncated(n) => logger.warn(&format!(
                "{} variable fees for {} prices, dropped {} trailing fees",
                tariff.hourly.len(),
                raw.len(),
                n
            )),
        }

        let network = tariff.network.total();
        let factor = charges.tax_factor();
        let totals = raw
            .iter()
            .zip(&variable)
            .enumerate()
            .map(|(i, (price, fee))| {
                let price = if price.is_finite() {
                    *price
                } else {
                    logger.warn(&format!("Non-finite raw price at interval {}, using 0", i));
                    0.0
                };
                let before_tax = round3(price + network + fee + charges.flat_charge);
                round3(before_tax * factor)
            })
            .collect();

        let fees = FeeBreakdown {
            fixed: round3(network),
            variable,
        };
        (totals, fees)
    }
}

fn check_finite(charges: &FixedCharges, tariff: &DayTariff) -> Result<()> {
    if !charges.flat_charge.is_finite() || !charges.tax_percent.is_finite() {
        return Err(PriceError::config("flat charge and tax must be finite numbers"));
    }
    if !tariff.network.is_finite() || tariff.hourly.iter().any(|v| !v.is_finite()) {
        return Err(PriceError::config(format!(
            "tariffs for {} contain non-finite values",
            tariff.date
        )));
    }
    Ok(())
}

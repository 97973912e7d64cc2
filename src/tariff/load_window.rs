//! Load level classification of the hours of a day

use crate::error::Result;
use crate::tariff::time_range::{TimeWindow, parse_time_ranges};
use serde::{Deserialize, Serialize};

/// Demand level of an hour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadLevel {
    Low,
    High,
    Peak,
    /// No window matched; no variable fee applies
    None,
}

/// Classify `hour` against the low, high and peak windows.
///
/// Low wins over high and high over peak when windows overlap.
pub fn classify_hour(
    hour: u32,
    low: &[TimeWindow],
    high: &[TimeWindow],
    peak: &[TimeWindow],
) -> LoadLevel {
    if low.iter().any(|w| w.contains_hour(hour)) {
        LoadLevel::Low
    } else if high.iter().any(|w| w.contains_hour(hour)) {
        LoadLevel::High
    } else if peak.iter().any(|w| w.contains_hour(hour)) {
        LoadLevel::Peak
    } else {
        LoadLevel::None
    }
}

/// Parsed low/high/peak windows of a tariff schedule
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadWindows {
    pub low: Vec<TimeWindow>,
    pub high: Vec<TimeWindow>,
    pub peak: Vec<TimeWindow>,
}

impl LoadWindows {
    pub fn parse(low: &str, high: &str, peak: &str) -> Result<Self> {
        Ok(Self {
            low: parse_time_ranges(low)?,
            high: parse_time_ranges(high)?,
            peak: parse_time_ranges(peak)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.low.is_empty() && self.high.is_empty() && self.peak.is_empty()
    }

    pub fn classify_hour(&self, hour: u32) -> LoadLevel {
        classify_hour(hour, &self.low, &self.high, &self.peak)
    }

    /// Load level of every hour 0..24
    pub fn levels(&self) -> [LoadLevel; 24] {
        let mut levels = [LoadLevel::None; 24];
        for (hour, level) in levels.iter_mut().enumerate() {
            *level = self.classify_hour(hour as u32);
        }
        levels
    }
}

/// Rates per load level for one season
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TariffRates {
    pub low: f64,
    pub high: f64,
    pub peak: f64,
}

impl TariffRates {
    pub fn rate(&self, level: LoadLevel) -> f64 {
        match level {
            LoadLevel::Low => self.low,
            LoadLevel::High => self.high,
            LoadLevel::Peak => self.peak,
            LoadLevel::None => 0.0,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.low.is_finite() && self.high.is_finite() && self.peak.is_finite()
    }

    /// Variable fee of every hour 0..24 under `windows`
    pub fn hourly_fees(&self, windows: &LoadWindows) -> Vec<f64> {
        windows.levels().iter().map(|l| self.rate(*l)).collect()
    }
}

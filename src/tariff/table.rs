//! Static default tariffs and the tariff lookup data set
//!
//! The default table is the backstop used when no live tariff lookup result
//! is available. It is a read-only static and is only ever borrowed.

use crate::tariff::season::Season;
use serde::{Deserialize, Serialize};

/// Network add-ons charged on every interval
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NetworkCharges {
    /// Transmission net tariff
    pub transmission: f64,
    /// System tariff
    pub system: f64,
    /// Electricity tax
    pub energy_tax: f64,
}

impl NetworkCharges {
    pub fn total(&self) -> f64 {
        self.transmission + self.system + self.energy_tax
    }

    pub fn is_finite(&self) -> bool {
        self.transmission.is_finite() && self.system.is_finite() && self.energy_tax.is_finite()
    }
}

/// Which default hourly profile applies when falling back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultTableMode {
    /// One profile per calendar month
    #[default]
    Monthly,
    /// One profile per season (summer/winter)
    Seasonal,
}

/// Default hourly network tariffs
#[derive(Debug)]
pub struct DefaultTariffTable {
    pub network: NetworkCharges,
    pub monthly: [[f64; 24]; 12],
    /// Low fee season profile
    pub summer: [f64; 24],
    /// High fee season profile
    pub winter: [f64; 24],
}

impl DefaultTariffTable {
    /// Profile of a calendar month (1-12); out of range months clamp
    pub fn for_month(&self, month: u32) -> &[f64; 24] {
        let idx = month.clamp(1, 12) as usize - 1;
        &self.monthly[idx]
    }

    pub fn for_season(&self, season: Season) -> &[f64; 24] {
        match season {
            Season::High => &self.winter,
            Season::Low => &self.summer,
        }
    }

    pub fn hourly(&self, mode: DefaultTableMode, month: u32, season: Season) -> &[f64; 24] {
        match mode {
            DefaultTableMode::Monthly => self.for_month(month),
            DefaultTableMode::Seasonal => self.for_season(season),
        }
    }
}

// 00-06 low load, 06-17 high, 17-21 peak, 21-24 high
const fn day_profile(low: f64, high: f64, peak: f64) -> [f64; 24] {
    let mut profile = [high; 24];
    let mut hour = 0;
    while hour < 24 {
        if hour < 6 {
            profile[hour] = low;
        } else if hour >= 17 && hour < 21 {
            profile[hour] = peak;
        }
        hour += 1;
    }
    profile
}

const WINTER: [f64; 24] = day_profile(0.1509, 0.4528, 1.3584);
const SUMMER: [f64; 24] = day_profile(0.1509, 0.2264, 0.5887);

pub static DEFAULT_TARIFFS: DefaultTariffTable = DefaultTariffTable {
    network: NetworkCharges {
        transmission: 0.058,
        system: 0.054,
        energy_tax: 0.008,
    },
    monthly: [
        day_profile(0.1701, 0.5103, 1.5308),
        day_profile(0.1837, 0.5511, 1.6533),
        WINTER,
        SUMMER,
        SUMMER,
        SUMMER,
        SUMMER,
        SUMMER,
        SUMMER,
        WINTER,
        WINTER,
        WINTER,
    ],
    summer: SUMMER,
    winter: WINTER,
};

/// Result of a tariff lookup for a metering point
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TariffLookup {
    #[serde(rename = "transmissions_nettarif", default)]
    pub transmission_fee: f64,
    #[serde(rename = "systemtarif", default)]
    pub system_tariff: f64,
    #[serde(rename = "elafgift", default)]
    pub energy_tax: f64,
    /// Hourly network tariff, normally 24 values
    #[serde(rename = "nettarif_c", default)]
    pub hourly_network_tariff: Vec<f64>,
}

impl TariffLookup {
    pub fn network(&self) -> NetworkCharges {
        NetworkCharges {
            transmission: self.transmission_fee,
            system: self.system_tariff,
            energy_tax: self.energy_tax,
        }
    }
}

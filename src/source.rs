//! Raw price and tariff collaborators
//!
//! The engine never fetches anything itself. A [`PriceSource`] hands it the
//! raw spot series of today and tomorrow, a [`TariffProvider`] the charges of
//! the metering point. Both have JSON file implementations that read the
//! documents an upstream integration keeps up to date.

use crate::error::{PriceError, Result};
use crate::logging::{StructuredLogger, get_logger};
use crate::tariff::TariffLookup;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Raw spot prices of today and tomorrow; `None` when not published
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPrices {
    pub today: Option<Vec<f64>>,
    pub tomorrow: Option<Vec<f64>>,
}

/// Supplier of raw spot prices
#[async_trait::async_trait]
pub trait PriceSource: Send + Sync {
    /// Identifier used in logs
    fn id(&self) -> &str;

    /// Current raw prices, or `None` while the source does not exist yet
    async fn fetch(&self) -> Result<Option<RawPrices>>;
}

/// Supplier of tariff lookup results
#[async_trait::async_trait]
pub trait TariffProvider: Send + Sync {
    async fn fetch_tariffs(&self) -> Result<TariffLookup>;
}

/// Shape of a spot price sensor's attributes
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SpotPriceDocument {
    today: Option<Vec<Option<f64>>>,
    tomorrow: Option<Vec<Option<f64>>>,
    tomorrow_valid: Option<bool>,
}

/// Convert a published series; unpublished entries count as zero and a
/// series without a single value is absent.
fn normalize_series(series: Option<Vec<Option<f64>>>) -> Option<Vec<f64>> {
    let series = series?;
    if series.iter().all(Option::is_none) {
        return None;
    }
    Some(series.into_iter().map(|v| v.unwrap_or(0.0)).collect())
}

impl SpotPriceDocument {
    fn into_raw(self) -> RawPrices {
        let tomorrow = if self.tomorrow_valid == Some(false) {
            None
        } else {
            normalize_series(self.tomorrow)
        };
        RawPrices {
            today: normalize_series(self.today),
            tomorrow,
        }
    }
}

/// Parse a spot price sensor document
pub fn parse_price_document(json: &str) -> Result<RawPrices> {
    let doc: SpotPriceDocument = serde_json::from_str(json)?;
    Ok(doc.into_raw())
}

/// Reads the spot price sensor document from a JSON file
pub struct JsonFilePriceSource {
    sensor_id: String,
    path: PathBuf,
    logger: StructuredLogger,
}

impl JsonFilePriceSource {
    pub fn new<P: AsRef<Path>>(sensor_id: &str, path: P) -> Self {
        Self {
            sensor_id: sensor_id.to_string(),
            path: path.as_ref().to_path_buf(),
            logger: get_logger("source"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl PriceSource for JsonFilePriceSource {
    fn id(&self) -> &str {
        &self.sensor_id
    }

    async fn fetch(&self) -> Result<Option<RawPrices>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let raw = parse_price_document(&contents)?;
        self.logger.debug(&format!(
            "Read {} today / {} tomorrow prices from {}",
            raw.today.as_ref().map_or(0, Vec::len),
            raw.tomorrow.as_ref().map_or(0, Vec::len),
            self.path.display()
        ));
        Ok(Some(raw))
    }
}

/// Reads the charges of a metering point from a JSON file
pub struct JsonFileTariffProvider {
    path: PathBuf,
}

impl JsonFileTariffProvider {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait::async_trait]
impl TariffProvider for JsonFileTariffProvider {
    async fn fetch_tariffs(&self) -> Result<TariffLookup> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            PriceError::external_lookup(format!("{}: {}", self.path.display(), e))
        })?;
        serde_json::from_str(&contents).map_err(|e| {
            PriceError::external_lookup(format!("{}: {}", self.path.display(), e))
        })
    }
}

/// Ask `source` for prices up to `attempts` times, `delay` apart.
///
/// Fetch errors count as a missed attempt. Gives up with `DataUnavailable`.
pub async fn wait_for_source(
    source: &dyn PriceSource,
    attempts: u32,
    delay: Duration,
    logger: &StructuredLogger,
) -> Result<RawPrices> {
    let attempts = attempts.max(1);
    for attempt in 1..=attempts {
        match source.fetch().await {
            Ok(Some(raw)) => return Ok(raw),
            Ok(None) => logger.warn(&format!(
                "Waiting for sensor '{}' to become available ({}/{})",
                source.id(),
                attempt,
                attempts
            )),
            Err(e) => logger.warn(&format!(
                "Reading sensor '{}' failed ({}/{}): {}",
                source.id(),
                attempt,
                attempts,
                e
            )),
        }
        if attempt < attempts {
            tokio::time::sleep(delay).await;
        }
    }
    Err(PriceError::data_unavailable(format!(
        "sensor '{}' did not become available after {} attempts",
        source.id(),
        attempts
    )))
}

//! # Elprice - total electricity price engine
//!
//! Augments a day-ahead spot price feed with grid tariffs, taxes and fixed
//! charges to produce the total price of every interval of today and
//! tomorrow, plus the price right now.
//!
//! ## Architecture
//!
//! Data flows one way, from raw inputs to the published snapshot:
//!
//! - `tariff`: date/time range parsing, fee seasons, load windows and the
//!   static default tariff table
//! - `pricing`: aggregation of spot price, fees and tax; current interval
//!   selection; timestamped series
//! - `source`: raw price and tariff lookup collaborators
//! - `sensor`: one update tick producing a `PriceSnapshot`
//! - `service`: timer and change driven update loop
//! - `publish`: snapshot output
//! - `config`: YAML configuration and validation
//! - `logging`: structured logging and tracing

pub mod config;
pub mod error;
pub mod logging;
pub mod pricing;
pub mod publish;
pub mod sensor;
pub mod service;
pub mod source;
pub mod tariff;

// Re-export commonly used types
pub use config::Config;
pub use error::{PriceError, Result};
pub use sensor::{PriceSensor, PriceSnapshot};
pub use service::{PriceService, ServiceHandle};

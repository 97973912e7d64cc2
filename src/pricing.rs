//! Price aggregation
//!
//! Raw spot price + network add-ons + variable fee + flat charge, then tax,
//! per interval; plus selection of the interval containing "now" and the
//! timestamped form of a day's prices.

mod aggregate;
mod current;
mod timestamps;

pub use aggregate::{
    AggregatedPrices, Alignment, FeeBreakdown, FixedCharges, PriceAggregator,
    align_to_resolution, round3,
};
pub use current::{interval_index, interval_millis, select_current};
pub use timestamps::{TimedPrice, local_midnight, with_timestamps};

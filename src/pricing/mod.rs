//! Day-ahead electricity prices
//!
//! Fetching the raw day from the upstream API lives in `client`; converting it
//! into the units the threshold is expressed in lives in `normalize`.

pub mod client;
pub mod normalize;
pub mod types;

pub use client::{NordPoolClient, PricingClient, select_day};
pub use normalize::{normalize, round_price};
pub use types::{CurrencyUnit, EnergyUnit, HOURS_PER_DAY, NormalizeOptions, PriceSeries, PriceSummary};

use crate::error::{NordplugError, Result};
use serde::{Deserialize, Serialize};

/// Number of hourly windows in one price day
pub const HOURS_PER_DAY: usize = 24;

/// Energy unit the price is expressed per
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnergyUnit {
    /// Per kilowatt-hour
    #[default]
    Kilo,
    /// Per megawatt-hour, as published upstream
    Mega,
}

impl EnergyUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kilo => "kWh",
            Self::Mega => "MWh",
        }
    }
}

/// Currency unit the price is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyUnit {
    /// Whole currency units (e.g. EUR), as published upstream
    Base,
    /// Hundredths of the currency (e.g. euro cents)
    #[default]
    Cents,
}

impl CurrencyUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Cents => "cents",
        }
    }
}

/// Conversion applied to an upstream price day
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizeOptions {
    pub energy_unit: EnergyUnit,
    pub currency_unit: CurrencyUnit,
    /// VAT percentage to add on top, e.g. `20.0`
    pub vat_percentage: Option<f64>,
}

/// One price per hour of a day; index `i` covers `[i:00, i+1:00)`
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries(Vec<f64>);

impl PriceSeries {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Price for the window starting at `hour` (0-23)
    pub fn price_at(&self, hour: u32) -> Option<f64> {
        self.0.get(hour as usize).copied()
    }

    pub fn summary(&self) -> PriceSummary {
        let min = self.0.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = self.0.iter().sum::<f64>() / self.0.len() as f64;
        PriceSummary { min, max, mean }
    }
}

impl TryFrom<Vec<f64>> for PriceSeries {
    type Error = NordplugError;

    fn try_from(prices: Vec<f64>) -> Result<Self> {
        if prices.len() != HOURS_PER_DAY {
            return Err(NordplugError::invalid_price_series(prices.len()));
        }
        if let Some(hour) = prices.iter().position(|p| !p.is_finite()) {
            return Err(NordplugError::validation(
                "prices",
                format!("price for hour {} is not a finite number", hour),
            ));
        }
        Ok(Self(prices))
    }
}

/// Day statistics for diagnostics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

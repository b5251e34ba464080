//! Unit, currency and VAT conversion of an upstream price day.
//!
//! Upstream prices are per MWh in whole currency units without VAT. The steps
//! run in a fixed order because rounding happens last.

use crate::error::{NordplugError, Result};
use crate::pricing::types::{CurrencyUnit, EnergyUnit, HOURS_PER_DAY, NormalizeOptions, PriceSeries};

/// Round to two decimals, halves away from zero
pub fn round_price(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

/// Convert a raw MWh/base-currency day into the requested units
pub fn normalize(raw_prices: &[f64], options: &NormalizeOptions) -> Result<PriceSeries> {
    if raw_prices.len() != HOURS_PER_DAY {
        return Err(NordplugError::invalid_price_series(raw_prices.len()));
    }
    if let Some(vat) = options.vat_percentage
        && (!vat.is_finite() || vat < 0.0)
    {
        return Err(NordplugError::validation(
            "vat_percentage",
            format!("must be a non-negative number, got {}", vat),
        ));
    }

    let prices = raw_prices
        .iter()
        .map(|&p| {
            let mut p = p;
            if options.energy_unit == EnergyUnit::Kilo {
                p /= 1000.0;
            }
            if options.currency_unit == CurrencyUnit::Cents {
                p *= 100.0;
            }
            if let Some(vat) = options.vat_percentage {
                p += p * (vat / 100.0);
            }
            round_price(p)
        })
        .collect::<Vec<_>>();

    PriceSeries::try_from(prices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(energy_unit: EnergyUnit, currency_unit: CurrencyUnit, vat: Option<f64>) -> NormalizeOptions {
        NormalizeOptions {
            energy_unit,
            currency_unit,
            vat_percentage: vat,
        }
    }

    #[test]
    fn kilo_cents_without_vat() {
        let out = normalize(&[50.0; 24], &opts(EnergyUnit::Kilo, CurrencyUnit::Cents, None)).unwrap();
        assert!(out.as_slice().iter().all(|&p| (p - 5.0).abs() < 1e-9));
    }

    #[test]
    fn kilo_cents_with_vat() {
        let out = normalize(
            &[50.0; 24],
            &opts(EnergyUnit::Kilo, CurrencyUnit::Cents, Some(20.0)),
        )
        .unwrap();
        assert!(out.as_slice().iter().all(|&p| (p - 6.0).abs() < 1e-9));
    }

    #[test]
    fn mega_base_only_rounds() {
        let out = normalize(&[12.3456; 24], &opts(EnergyUnit::Mega, CurrencyUnit::Base, None)).unwrap();
        assert_eq!(out.price_at(0), Some(12.35));
    }

    #[test]
    fn kilo_base_rounds_small_values_to_two_decimals() {
        // 123.4 EUR/MWh -> 0.1234 EUR/kWh
        let out = normalize(&[123.4; 24], &opts(EnergyUnit::Kilo, CurrencyUnit::Base, None)).unwrap();
        assert_eq!(out.price_at(12), Some(0.12));
    }

    #[test]
    fn negative_prices_keep_sign() {
        let out = normalize(&[-10.0; 24], &opts(EnergyUnit::Kilo, CurrencyUnit::Cents, Some(24.0))).unwrap();
        assert!((out.price_at(0).unwrap() + 1.24).abs() < 1e-9);
    }

    #[test]
    fn wrong_length_reports_actual_length() {
        let err = normalize(&[1.0; 23], &NormalizeOptions::default()).unwrap_err();
        assert!(matches!(err, NordplugError::InvalidPriceSeries { len: 23 }));
        let err = normalize(&[1.0; 25], &NormalizeOptions::default()).unwrap_err();
        assert!(matches!(err, NordplugError::InvalidPriceSeries { len: 25 }));
    }

    #[test]
    fn negative_vat_is_rejected() {
        let err = normalize(&[1.0; 24], &opts(EnergyUnit::Kilo, CurrencyUnit::Cents, Some(-5.0))).unwrap_err();
        assert!(matches!(err, NordplugError::Validation { .. }));
    }

    #[test]
    fn round_price_halves_away_from_zero() {
        assert_eq!(round_price(0.125), 0.13);
        assert_eq!(round_price(-0.125), -0.13);
        assert_eq!(round_price(2.5), 2.5);
    }
}

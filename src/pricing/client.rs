use crate::config::PricingSettings;
use crate::error::{NordplugError, Result};
use crate::logging::get_logger;
use crate::pricing::types::PriceSeries;
use chrono::NaiveDate;
use reqwest::header::{ACCEPT, USER_AGENT};
use std::collections::BTreeMap;

/// Upstream response: ISO date -> 24 hourly prices (MWh, base currency, no VAT)
///
/// Entries stay undecoded until selected, so a malformed day that was not
/// asked for does not spoil the one that was.
pub type DailyPriceMap = BTreeMap<String, serde_json::Value>;

/// Source of raw day-ahead prices
#[async_trait::async_trait]
pub trait PricingClient: Send + Sync {
    /// Raw prices for `country` on `date`, per MWh in base currency
    async fn fetch_daily_prices(&self, country: &str, date: NaiveDate) -> Result<PriceSeries>;
}

/// Pick one day out of the upstream response
pub fn select_day(mut response: DailyPriceMap, date: NaiveDate) -> Result<PriceSeries> {
    let key = date.format("%Y-%m-%d").to_string();
    match response.remove(&key) {
        Some(prices) => {
            let prices: Vec<f64> = serde_json::from_value(prices).map_err(|e| {
                NordplugError::serialization(format!("Prices for {} are malformed: {}", key, e))
            })?;
            PriceSeries::try_from(prices)
        }
        None => Err(NordplugError::date_not_available(
            key,
            response.into_keys().collect(),
        )),
    }
}

/// Parse a raw response body
pub fn parse_price_response(body: &str) -> Result<DailyPriceMap> {
    Ok(serde_json::from_str(body)?)
}

/// Client for the public Nord Pool price mirror
pub struct NordPoolClient {
    http: reqwest::Client,
    base_url: String,
    logger: crate::logging::StructuredLogger,
}

impl NordPoolClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://nordpoolprice.codeborne.com/api/prices";

    pub fn new(settings: &PricingSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: settings.api_url.trim_end_matches('/').to_string(),
            logger: get_logger("nordpool"),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait::async_trait]
impl PricingClient for NordPoolClient {
    async fn fetch_daily_prices(&self, country: &str, date: NaiveDate) -> Result<PriceSeries> {
        self.logger
            .debug(&format!("Requesting prices for country={} date={}", country, date));

        let resp = self
            .http
            .get(&self.base_url)
            .query(&[("country", country)])
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, concat!("nordplug/", env!("CARGO_PKG_VERSION")))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            self.logger
                .error(&format!("Nord Pool API error: {}", status));
            return Err(NordplugError::price_fetch(status.as_u16(), body));
        }

        let days = parse_price_response(&body)?;
        self.logger.debug(&format!(
            "Received {} day(s) of prices: {}",
            days.len(),
            days.keys().cloned().collect::<Vec<_>>().join(", ")
        ));
        select_day(days, date)
    }
}

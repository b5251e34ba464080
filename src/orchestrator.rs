//! One invocation: fetch today's prices, pick the current hour, switch the plug.
//!
//! Stages run strictly in order and any failure aborts the invocation before
//! a power command is issued.

use crate::clock::wall_clock_now;
use crate::config::Config;
use crate::device::{DeviceController, PowerState};
use crate::error::{NordplugError, Result};
use crate::logging::{LogContext, StructuredLogger, get_logger_with_context, new_invocation_id};
use crate::pricing::{PricingClient, normalize};
use chrono::{NaiveDate, NaiveDateTime, Timelike};

/// Invocation stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    FetchPrices,
    SelectHour,
    ResolveDevice,
    Command,
    End,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::FetchPrices => "fetch_prices",
            Self::SelectHour => "select_hour",
            Self::ResolveDevice => "resolve_device",
            Self::Command => "command",
            Self::End => "end",
        }
    }
}

/// On while the price is strictly below the threshold
pub fn decide_power(price: f64, threshold: i64) -> PowerState {
    PowerState::from(price < threshold as f64)
}

/// What a successful invocation did
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub invocation_id: String,
    pub date: NaiveDate,
    pub hour: u32,
    /// Normalized price of the current hour
    pub price: f64,
    pub threshold: i64,
    pub command: PowerState,
    pub device_id: String,
}

pub struct Orchestrator<'a> {
    config: &'a Config,
    pricing: &'a dyn PricingClient,
    devices: &'a dyn DeviceController,
    invocation_id: String,
    logger: StructuredLogger,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        config: &'a Config,
        pricing: &'a dyn PricingClient,
        devices: &'a dyn DeviceController,
    ) -> Self {
        Self::with_invocation_id(config, pricing, devices, new_invocation_id())
    }

    pub fn with_invocation_id(
        config: &'a Config,
        pricing: &'a dyn PricingClient,
        devices: &'a dyn DeviceController,
        invocation_id: String,
    ) -> Self {
        let logger = get_logger_with_context(
            LogContext::new("orchestrator")
                .with_invocation_id(invocation_id.clone())
                .with_field("device", config.device_id.clone())
                .with_field("country", config.country.clone()),
        );
        Self {
            config,
            pricing,
            devices,
            invocation_id,
            logger,
        }
    }

    pub fn invocation_id(&self) -> &str {
        &self.invocation_id
    }

    pub fn logger(&self) -> &StructuredLogger {
        &self.logger
    }

    /// Run against the current wall clock
    pub async fn run(&self) -> Result<RunOutcome> {
        let now = wall_clock_now(self.config.settings.timezone.as_deref())?;
        self.run_at(now).await
    }

    /// Run as if the local wall clock read `now`
    pub async fn run_at(&self, now: NaiveDateTime) -> Result<RunOutcome> {
        self.enter(Stage::Start);
        let date = now.date();

        self.enter(Stage::FetchPrices);
        let raw = self
            .pricing
            .fetch_daily_prices(&self.config.country, date)
            .await
            .map_err(|e| self.fail(Stage::FetchPrices, e))?;
        let prices = normalize(raw.as_slice(), &self.config.normalize_options())
            .map_err(|e| self.fail(Stage::FetchPrices, e))?;
        let summary = prices.summary();
        self.logger.debug(&format!(
            "Prices for {} in {}/{}: min={:.2} max={:.2} mean={:.2}",
            date,
            self.config.settings.pricing.currency_unit.as_str(),
            self.config.settings.pricing.energy_unit.as_str(),
            summary.min,
            summary.max,
            summary.mean
        ));

        self.enter(Stage::SelectHour);
        let hour = now.hour();
        let price = prices.price_at(hour).ok_or_else(|| {
            self.fail(
                Stage::SelectHour,
                NordplugError::validation("hour", format!("no price for hour {}", hour)),
            )
        })?;
        let threshold = self.config.price_threshold;
        let command = decide_power(price, threshold);
        self.logger.info(&format!(
            "hour={} price={:.2} threshold={} -> {}",
            hour, price, threshold, command
        ));

        self.enter(Stage::ResolveDevice);
        let plug = self
            .devices
            .resolve_device(&self.config.device_id)
            .await
            .map_err(|e| self.fail(Stage::ResolveDevice, e))?;

        self.enter(Stage::Command);
        plug.set_power(command)
            .await
            .map_err(|e| self.fail(Stage::Command, e))?;

        self.enter(Stage::End);
        Ok(RunOutcome {
            invocation_id: self.invocation_id.clone(),
            date,
            hour,
            price,
            threshold,
            command,
            device_id: plug.info().id.clone(),
        })
    }

    fn enter(&self, stage: Stage) {
        self.logger.debug(&format!("stage={}", stage.as_str()));
    }

    fn fail(&self, stage: Stage, err: NordplugError) -> NordplugError {
        self.logger
            .error(&format!("Invocation aborted at {}: {}", stage.as_str(), err));
        err
    }
}

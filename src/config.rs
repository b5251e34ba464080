//! Configuration management for Nordplug
//!
//! The invocation settings (credentials, device, VAT, country, threshold) come
//! from the environment and a secret store and must all be present. Ambient
//! settings (endpoints, units, logging, timezone) are optional: they default,
//! may be loaded from a YAML file and can be overridden from the environment.

pub mod defaults;
pub mod secrets;

use crate::error::{NordplugError, Result};
use crate::pricing::{CurrencyUnit, EnergyUnit, NormalizeOptions};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub use secrets::{EnvSecretStore, SecretStore, YamlSecretStore, select_secret_store};

pub const DEVICE_ID_ENV: &str = "MI_DEVICE_ID";
pub const VAT_PERCENTAGE_ENV: &str = "VAT_PERCENTAGE";
pub const COUNTRY_ENV: &str = "COUNTRY";
pub const PRICE_THRESHOLD_ENV: &str = "PRICE_THRESHOLD";

/// Path of an optional YAML settings file
pub const SETTINGS_PATH_ENV: &str = "NORDPLUG_SETTINGS";

/// Read-only view of environment-style settings
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Device-cloud account credentials
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Everything one invocation needs; built once and never mutated
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,

    /// Device id as listed by the device cloud
    pub device_id: String,

    /// VAT added on top of the spot price, in percent
    pub vat_percentage: u32,

    /// Country code understood by the pricing API (e.g. `ee`)
    pub country: String,

    /// Switch on while the normalized price is strictly below this
    pub price_threshold: i64,

    pub settings: Settings,
}

/// Ambient settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// IANA timezone for the wall-clock hour; process local time when unset
    pub timezone: Option<String>,

    pub pricing: PricingSettings,

    pub cloud: CloudSettings,

    pub logging: LoggingConfig,

    /// Names of the secret-store parameters holding the credentials
    pub parameters: ParameterNames,
}

/// Pricing API configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PricingSettings {
    /// Endpoint returning a date -> prices map, queried with `?country=`
    pub api_url: String,

    /// Energy unit prices are compared in
    pub energy_unit: EnergyUnit,

    /// Currency unit prices are compared in
    pub currency_unit: CurrencyUnit,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Device cloud configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CloudSettings {
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    pub level: String,

    /// Whether to use JSON format
    pub json_format: bool,

    /// Whether to log to console
    pub console_output: bool,

    /// Directory for daily-rotated log files; no file sink when unset
    pub file: Option<String>,

    /// Number of rotated files to keep
    pub backup_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ParameterNames {
    pub username: String,
    pub password: String,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&contents)?;
        Ok(settings)
    }

    /// Defaults, then the optional settings file, then environment overrides
    pub fn load(env: &dyn EnvSource) -> Result<Self> {
        let mut settings = match env.var(SETTINGS_PATH_ENV) {
            Some(path) if !path.trim().is_empty() => Self::from_file(path.trim())?,
            _ => Settings::default(),
        };
        settings.apply_env_overrides(env)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn apply_env_overrides(&mut self, env: &dyn EnvSource) -> Result<()> {
        if let Some(tz) = optional(env, "TIMEZONE") {
            self.timezone = Some(tz);
        }
        if let Some(level) = optional(env, "LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(json) = optional(env, "LOG_JSON") {
            self.logging.json_format = parse_flag("LOG_JSON", &json)?;
        }
        if let Some(url) = optional(env, "PRICE_API_URL") {
            self.pricing.api_url = url;
        }
        if let Some(url) = optional(env, "DEVICE_CLOUD_URL") {
            self.cloud.base_url = url;
        }
        if let Some(secs) = optional(env, "HTTP_TIMEOUT_SECS") {
            let secs = secs.parse::<u64>().map_err(|_| {
                NordplugError::config(format!(
                    "HTTP_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                    secs
                ))
            })?;
            self.pricing.timeout_secs = secs;
            self.cloud.timeout_secs = secs;
        }
        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        if self.pricing.api_url.trim().is_empty() {
            return Err(NordplugError::validation(
                "pricing.api_url",
                "URL cannot be empty",
            ));
        }
        if self.cloud.base_url.trim().is_empty() {
            return Err(NordplugError::validation(
                "cloud.base_url",
                "URL cannot be empty",
            ));
        }
        if self.pricing.timeout_secs == 0 {
            return Err(NordplugError::validation(
                "pricing.timeout_secs",
                "Must be greater than 0",
            ));
        }
        if self.cloud.timeout_secs == 0 {
            return Err(NordplugError::validation(
                "cloud.timeout_secs",
                "Must be greater than 0",
            ));
        }
        if let Some(tz) = &self.timezone {
            crate::clock::parse_timezone(tz)?;
        }
        crate::logging::parse_log_level(&self.logging.level)?;
        if self.parameters.username.trim().is_empty() || self.parameters.password.trim().is_empty()
        {
            return Err(NordplugError::validation(
                "parameters",
                "Parameter names cannot be empty",
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Load everything from the process environment and the configured secret store
    pub fn load() -> Result<Self> {
        let env = ProcessEnv;
        let settings = Settings::load(&env)?;
        Self::load_with_settings(&env, settings)
    }

    /// Load invocation settings from `env` on top of already-loaded ambient settings
    pub fn load_with_settings(env: &dyn EnvSource, settings: Settings) -> Result<Self> {
        let secrets = select_secret_store(env)?;
        Self::from_sources(env, secrets.as_ref(), settings)
    }

    /// Build from explicit sources; the first missing key aborts
    pub fn from_sources(
        env: &dyn EnvSource,
        secrets: &dyn SecretStore,
        settings: Settings,
    ) -> Result<Self> {
        let username = required_secret(secrets, &settings.parameters.username, "Username")?;
        let password = required_secret(secrets, &settings.parameters.password, "Password")?;

        let device_id = required(env, DEVICE_ID_ENV, "Mi device id")?;
        let vat_percentage = required_number(env, VAT_PERCENTAGE_ENV, "Vat percentage")?;
        let country = required(env, COUNTRY_ENV, "Country")?;
        let price_threshold = required_number(env, PRICE_THRESHOLD_ENV, "Price threshold")?;

        Ok(Self {
            credentials: Credentials { username, password },
            device_id,
            vat_percentage,
            country,
            price_threshold,
            settings,
        })
    }

    /// Conversion the orchestrator applies to the upstream day
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            energy_unit: self.settings.pricing.energy_unit,
            currency_unit: self.settings.pricing.currency_unit,
            vat_percentage: Some(f64::from(self.vat_percentage)),
        }
    }
}

fn optional(env: &dyn EnvSource, key: &str) -> Option<String> {
    env.var(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(key: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => Err(NordplugError::config(format!(
            "{} must be true or false, got '{}'",
            key, raw
        ))),
    }
}

fn required(env: &dyn EnvSource, key: &str, what: &str) -> Result<String> {
    optional(env, key).ok_or_else(|| {
        NordplugError::config(format!(
            "{} not set. Set {} in the function environment variables.",
            what, key
        ))
    })
}

fn required_number<T: std::str::FromStr>(env: &dyn EnvSource, key: &str, what: &str) -> Result<T> {
    let raw = required(env, key, what)?;
    raw.parse::<T>().map_err(|_| {
        NordplugError::config(format!(
            "{} ({}) must be a whole number, got '{}'",
            what, key, raw
        ))
    })
}

fn required_secret(store: &dyn SecretStore, name: &str, what: &str) -> Result<String> {
    store.get_parameter(name)?.ok_or_else(|| {
        NordplugError::config(format!(
            "{} not set. Set parameter {} in the {} manually.",
            what,
            name,
            store.describe()
        ))
    })
}

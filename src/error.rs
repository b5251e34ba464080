//! Error types and handling for Nordplug
//!
//! Every failure aborts the whole invocation, so the variants map directly to
//! what went wrong rather than to any recovery strategy.

use thiserror::Error;

/// Result type alias for Nordplug operations
pub type Result<T> = std::result::Result<T, NordplugError>;

/// Main error type for Nordplug
#[derive(Debug, Error)]
pub enum NordplugError {
    /// Missing or malformed credential or environment setting
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Upstream price list did not hold one value per hour
    #[error("Invalid price series: expected 24 hourly prices, got {len}")]
    InvalidPriceSeries { len: usize },

    /// Pricing API answered with a non-success status
    #[error(
        "Price fetch error: HTTP {status}. Consider checking if the country code is correct. Full response:\n{body}"
    )]
    PriceFetch { status: u16, body: String },

    /// Pricing API has no entry for the requested day
    #[error("No prices for date {date}. Available dates are: {}", .available.join(", "))]
    DateNotAvailable {
        date: String,
        available: Vec<String>,
    },

    /// Configured device id is not part of the account
    #[error(
        "Device {device_id} not found in your devices. Available devices are: {}",
        .available.join(", ")
    )]
    DeviceNotFound {
        device_id: String,
        available: Vec<String>,
    },

    /// Power command could not be delivered
    #[error("Device command error: {message}")]
    DeviceCommand { message: String },

    /// Authentication/authorization errors
    #[error("Authentication error: {message}")]
    Auth { message: String },

    /// Network-related errors
    #[error("Network error: {message}")]
    Network { message: String },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File I/O errors
    #[error("I/O error: {message}")]
    Io { message: String },

    /// Validation errors
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },
}

impl NordplugError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        NordplugError::Config {
            message: message.into(),
        }
    }

    /// Create a new invalid price series error
    pub fn invalid_price_series(len: usize) -> Self {
        NordplugError::InvalidPriceSeries { len }
    }

    /// Create a new price fetch error
    pub fn price_fetch<S: Into<String>>(status: u16, body: S) -> Self {
        NordplugError::PriceFetch {
            status,
            body: body.into(),
        }
    }

    /// Create a new missing date error
    pub fn date_not_available<S: Into<String>>(date: S, available: Vec<String>) -> Self {
        NordplugError::DateNotAvailable {
            date: date.into(),
            available,
        }
    }

    /// Create a new device not found error
    pub fn device_not_found<S: Into<String>>(device_id: S, available: Vec<String>) -> Self {
        NordplugError::DeviceNotFound {
            device_id: device_id.into(),
            available,
        }
    }

    /// Create a new device command error
    pub fn device_command<S: Into<String>>(message: S) -> Self {
        NordplugError::DeviceCommand {
            message: message.into(),
        }
    }

    /// Create a new auth error
    pub fn auth<S: Into<String>>(message: S) -> Self {
        NordplugError::Auth {
            message: message.into(),
        }
    }

    /// Create a new network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        NordplugError::Network {
            message: message.into(),
        }
    }

    /// Create a new serialization error
    pub fn serialization<S: Into<String>>(message: S) -> Self {
        NordplugError::Serialization {
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        NordplugError::Io {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        NordplugError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for NordplugError {
    fn from(err: std::io::Error) -> Self {
        NordplugError::io(err.to_string())
    }
}

impl From<serde_yaml::Error> for NordplugError {
    fn from(err: serde_yaml::Error) -> Self {
        NordplugError::serialization(err.to_string())
    }
}

impl From<serde_json::Error> for NordplugError {
    fn from(err: serde_json::Error) -> Self {
        NordplugError::serialization(err.to_string())
    }
}

impl From<reqwest::Error> for NordplugError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            NordplugError::serialization(err.to_string())
        } else {
            NordplugError::network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = NordplugError::config("test config error");
        assert!(matches!(err, NordplugError::Config { .. }));

        let err = NordplugError::invalid_price_series(23);
        assert!(matches!(err, NordplugError::InvalidPriceSeries { len: 23 }));

        let err = NordplugError::validation("field", "test validation error");
        assert!(matches!(err, NordplugError::Validation { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = NordplugError::config("test error");
        assert_eq!(format!("{}", err), "Configuration error: test error");

        let err = NordplugError::invalid_price_series(25);
        assert_eq!(
            format!("{}", err),
            "Invalid price series: expected 24 hourly prices, got 25"
        );

        let err = NordplugError::date_not_available(
            "2024-01-18",
            vec!["2024-01-16".to_string(), "2024-01-17".to_string()],
        );
        assert_eq!(
            format!("{}", err),
            "No prices for date 2024-01-18. Available dates are: 2024-01-16, 2024-01-17"
        );
    }
}

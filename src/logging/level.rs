use crate::error::{NordplugError, Result};
use tracing::Level;

/// Parse log level string to tracing Level
pub fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.trim().to_uppercase().as_str() {
        "TRACE" => Ok(Level::TRACE),
        "DEBUG" => Ok(Level::DEBUG),
        "INFO" => Ok(Level::INFO),
        "WARN" | "WARNING" => Ok(Level::WARN),
        "ERROR" => Ok(Level::ERROR),
        _ => Err(NordplugError::config(format!(
            "Invalid log level: {}",
            level_str
        ))),
    }
}

/// Default directive set when `RUST_LOG` is not given
pub fn default_directives(level: Level) -> String {
    format!(
        "nordplug={},reqwest=warn,hyper=warn,hyper_util=warn",
        level.as_str().to_lowercase()
    )
}

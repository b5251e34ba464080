//! Structured logging and tracing for Nordplug
//!
//! Console output (plain or JSON) plus an optional daily-rotated file sink.
//! Initialisation happens once per process; later calls are no-ops.

mod level;
mod structured;

pub use level::{default_directives, parse_log_level};
pub use structured::{
    LogContext, StructuredLogger, get_logger, get_logger_with_context, new_invocation_id,
};

use crate::config::LoggingConfig;
use crate::error::{NordplugError, Result};
use once_cell::sync::{Lazy, OnceCell};
use std::path::Path;
use std::sync::{Mutex, Once};
use tracing::{Level, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// Flushes the file sink when dropped in `shutdown`
static LOG_GUARD: Lazy<Mutex<Option<WorkerGuard>>> = Lazy::new(|| Mutex::new(None));
static INIT_ONCE: Once = Once::new();
static INIT_ERROR: OnceCell<String> = OnceCell::new();

/// Initialize logging system based on configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    INIT_ONCE.call_once(|| {
        if let Err(e) = try_init(config) {
            let _ = INIT_ERROR.set(e.to_string());
        }
    });

    if let Some(err) = INIT_ERROR.get() {
        return Err(NordplugError::config(err.clone()));
    }
    Ok(())
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

fn file_logging_disabled() -> bool {
    cfg!(test) || std::env::var_os("NORDPLUG_DISABLE_FILE_LOG").is_some()
}

fn try_init(config: &LoggingConfig) -> Result<()> {
    let level = parse_log_level(&config.level)?;
    let filter = build_env_filter(level);

    let console_layer = config.console_output.then(|| {
        let base = fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false);
        if config.json_format {
            base.json().boxed()
        } else {
            base.boxed()
        }
    });

    let file_dir = config.file.as_deref().filter(|_| !file_logging_disabled());
    let file_layer = match file_dir {
        Some(dir) => {
            let appender = rolling::Builder::new()
                .rotation(rolling::Rotation::DAILY)
                .filename_prefix("nordplug")
                .filename_suffix("log")
                .max_log_files(config.backup_count.max(1) as usize)
                .build({
                    // A file path logs into its parent directory
                    let p = Path::new(dir);
                    if p.extension().is_some() {
                        p.parent().unwrap_or(p)
                    } else {
                        p
                    }
                })
                .map_err(|e| {
                    NordplugError::io(format!("Failed to create log file appender: {}", e))
                })?;
            let (writer, guard) = non_blocking(appender);
            if let Ok(mut slot) = LOG_GUARD.lock() {
                *slot = Some(guard);
            }
            let base = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false);
            Some(if config.json_format {
                base.json().boxed()
            } else {
                base.boxed()
            })
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| NordplugError::config(format!("Failed to install log subscriber: {}", e)))?;

    info!(
        "Logging initialized - level: {:?}, json: {}, file: {}",
        level,
        config.json_format,
        file_dir.unwrap_or("none")
    );
    Ok(())
}

/// Flush and close the file sink, if any
pub fn shutdown() {
    if let Ok(mut slot) = LOG_GUARD.lock() {
        slot.take();
    }
}

//! # Nordplug - spot-price driven smart plug switching
//!
//! Run once per hour by a scheduler: fetch today's day-ahead electricity
//! prices, convert them to the configured units with VAT, and switch a single
//! smart plug on when the current hour is cheaper than the threshold.
//!
//! ## Architecture
//!
//! - `config`: Invocation settings, ambient settings and secret lookup
//! - `logging`: Structured logging and tracing
//! - `pricing`: Price API client and unit/VAT normalization
//! - `device`: Device cloud client and plug control
//! - `orchestrator`: The fetch, select, resolve and command sequence
//! - `handler`: Process entry point wiring the real collaborators
//! - `clock`: Wall-clock time in the configured timezone

pub mod clock;
pub mod config;
pub mod device;
pub mod error;
pub mod handler;
pub mod logging;
pub mod orchestrator;
pub mod pricing;

// Re-export commonly used types
pub use config::Config;
pub use error::{NordplugError, Result};
pub use orchestrator::{Orchestrator, RunOutcome};

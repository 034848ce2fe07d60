//! Logging bootstrap
//!
//! The engine crates only emit `tracing` events. A host picks a
//! [`LogLevel`] (usually from the `log_level` key of its engine
//! configuration) and installs one subscriber at startup. `RUST_LOG`
//! always takes precedence over the configured level.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::error::Error;

/// Crates whose events the level applies to; everything else stays at warn
const ENGINE_TARGETS: [&str; 3] = ["lteho_common", "lteho_fuzzy", "lteho_engine"];

/// Verbosity of the engine crates
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Every membership grade and neighbour score
    Trace,
    /// Per-report decisions and skipped neighbours
    Debug,
    /// Dispatched handovers and configuration
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    const ALL: [LogLevel; 5] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// `EnvFilter` directive: `level` for the engine crates, warn elsewhere
    pub fn directive(self) -> String {
        let mut directive = String::from("warn");
        for target in ENGINE_TARGETS {
            directive.push_str(&format!(",{}={}", target, self.as_str()));
        }
        directive
    }
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        if s == "warning" {
            return Ok(LogLevel::Warn);
        }
        LogLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| Error::Config(format!("unknown log level: {s}")))
    }
}

fn env_or(directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
}

/// Installs the global subscriber for the engine crates at `level`.
///
/// Fails with [`Error::Logging`] when a subscriber is already installed.
///
/// ```
/// use lteho_common::logging::{init_logging, LogLevel};
///
/// init_logging(LogLevel::Debug).ok();
/// ```
pub fn init_logging(level: LogLevel) -> Result<(), Error> {
    init_logging_with_filter(&level.directive())
}

/// Installs the global subscriber with an arbitrary `EnvFilter` directive.
///
/// ```
/// use lteho_common::logging::init_logging_with_filter;
///
/// // Scores from the fuzzy evaluator only
/// init_logging_with_filter("info,lteho_engine::evaluator=trace").ok();
/// ```
pub fn init_logging_with_filter(directive: &str) -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(env_or(directive))
        .with_target(true)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}

/// Subscriber for `cargo test`: output goes through the test harness
/// capture. Fails like [`init_logging`] when called twice in one process.
pub fn init_test_logging(level: LogLevel) -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(env_or(&level.directive()))
        .with_test_writer()
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}

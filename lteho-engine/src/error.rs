//! Error types for the handover engine

use lteho_common::CellId;
use lteho_fuzzy::FuzzyError;
use thiserror::Error;

use crate::meas_config::{MeasId, Quantity};

/// Errors raised while configuring the engine. All of them are fatal to
/// engine startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Threshold outside the quantized range of its quantity
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),

    /// Hysteresis outside [0, 15] dB
    #[error("Invalid hysteresis: {0}")]
    InvalidHysteresis(String),

    /// Time-to-trigger not one of the standard values
    #[error("Invalid time-to-trigger: {0} ms")]
    InvalidTimeToTrigger(u32),

    /// Report interval not one of the standard values
    #[error("Invalid report interval: {0} ms")]
    InvalidReportInterval(u32),

    /// Neighbour/A3 offset out of range
    #[error("Invalid offset: {0}")]
    InvalidOffset(String),

    /// Fuzzy abstention threshold outside [0, 1]
    #[error("Invalid abstention threshold: {0}")]
    InvalidAbstentionThreshold(f64),

    /// Fuzzy stale window or predictor window unusable
    #[error("Invalid fuzzy parameter: {0}")]
    InvalidFuzzyParameter(String),

    /// More measurement identities than an RRC connection can carry
    #[error("Too many measurements: at most {max} measurement identities")]
    TooManyMeasurements { max: u8 },

    /// Malformed rule base or membership function
    #[error("Fuzzy rule base error: {0}")]
    Fuzzy(#[from] FuzzyError),

    /// File I/O error
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<ConfigError> for lteho_common::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Io(io) => lteho_common::Error::Io(io),
            ConfigError::Yaml(yaml) => lteho_common::Error::YamlParse(yaml),
            other => lteho_common::Error::Config(other.to_string()),
        }
    }
}

/// Problems with a single measurement report.
///
/// These never reach the host: the engine logs them and skips the
/// offending report or neighbour entry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// Report tagged with a measurement id this engine never registered
    #[error("Ignoring report for unknown measId {0}")]
    UnknownMeasId(MeasId),

    /// Neighbour entry without a required quantity
    #[error("Measurement incomplete: {cell_id} has no {quantity} result")]
    MeasurementIncomplete { cell_id: CellId, quantity: Quantity },

    /// Event that needs neighbour results arrived without any
    #[error("Event for measId {0} received without measurement results from neighbouring cells")]
    NoNeighbourResults(MeasId),
}

//! Engine configuration
//!
//! The strategy and its parameters are selected once, at engine start, from
//! a YAML document:
//!
//! ```yaml
//! algorithm: a2-a4-rsrq
//! serving_cell_threshold: 30
//! neighbour_cell_offset: 1
//! log_level: debug
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use lteho_engine::{load_engine_config, validate_engine_config};
//!
//! let config = load_engine_config("config/handover.yaml")?;
//! validate_engine_config(&config)?;
//! config.init_logging()?;
//! ```

use std::path::Path;
use std::time::Duration;

use lteho_common::LogLevel;
use lteho_fuzzy::{Type1Definition, Type2Definition};
use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_HISTORY_LEN;
use crate::error::ConfigError;
use crate::meas_config::{Hysteresis, ReportInterval, TimeToTrigger, RSRQ_RANGE};
pub use crate::rule_base::RuleBase;

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(flatten)]
    pub algorithm: AlgorithmConfig,
    /// Report interval of every registered event
    #[serde(default = "default_report_interval_ms")]
    pub report_interval_ms: u32,
    /// Verbosity of the engine crates once [`EngineConfig::init_logging`] ran
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmConfig::default(),
            report_interval_ms: default_report_interval_ms(),
            log_level: LogLevel::default(),
        }
    }
}

impl EngineConfig {
    pub fn new(algorithm: AlgorithmConfig) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    pub fn report_interval(&self) -> Result<ReportInterval, ConfigError> {
        ReportInterval::from_ms(self.report_interval_ms)
    }

    /// Installs the global subscriber at `log_level`
    pub fn init_logging(&self) -> Result<(), lteho_common::Error> {
        lteho_common::init_logging(self.log_level)
    }
}

/// Handover algorithm and its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "kebab-case")]
pub enum AlgorithmConfig {
    /// Automatic handover disabled
    NoOp,
    A3Rsrq {
        #[serde(default = "default_hysteresis_db")]
        hysteresis_db: f64,
        #[serde(default = "default_time_to_trigger_ms")]
        time_to_trigger_ms: u32,
    },
    #[serde(rename = "a2-a4-rsrq")]
    A2A4Rsrq {
        #[serde(default = "default_serving_cell_threshold")]
        serving_cell_threshold: u8,
        #[serde(default = "default_neighbour_cell_offset")]
        neighbour_cell_offset: u8,
    },
    #[serde(rename = "type1-fuzzy")]
    Type1Fuzzy(FuzzyConfig<Type1Definition>),
    #[serde(rename = "type2-fuzzy")]
    Type2Fuzzy(FuzzyConfig<Type2Definition>),
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        AlgorithmConfig::A2A4Rsrq {
            serving_cell_threshold: default_serving_cell_threshold(),
            neighbour_cell_offset: default_neighbour_cell_offset(),
        }
    }
}

impl AlgorithmConfig {
    /// A3 with 3 dB hysteresis and 256 ms time-to-trigger
    pub fn a3_rsrq() -> Self {
        AlgorithmConfig::A3Rsrq {
            hysteresis_db: default_hysteresis_db(),
            time_to_trigger_ms: default_time_to_trigger_ms(),
        }
    }

    pub fn a2_a4_rsrq(serving_cell_threshold: u8, neighbour_cell_offset: u8) -> Self {
        AlgorithmConfig::A2A4Rsrq {
            serving_cell_threshold,
            neighbour_cell_offset,
        }
    }

    pub fn type1_fuzzy() -> Self {
        AlgorithmConfig::Type1Fuzzy(FuzzyConfig::default())
    }

    pub fn type2_fuzzy() -> Self {
        AlgorithmConfig::Type2Fuzzy(FuzzyConfig::default())
    }

    /// Configuration tag, as written in YAML
    pub fn name(&self) -> &'static str {
        match self {
            AlgorithmConfig::NoOp => "no-op",
            AlgorithmConfig::A3Rsrq { .. } => "a3-rsrq",
            AlgorithmConfig::A2A4Rsrq { .. } => "a2-a4-rsrq",
            AlgorithmConfig::Type1Fuzzy(_) => "type1-fuzzy",
            AlgorithmConfig::Type2Fuzzy(_) => "type2-fuzzy",
        }
    }
}

/// Parameters shared by both fuzzy variants. `D` is the system definition
/// type of the variant's rule base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyConfig<D> {
    /// A2 threshold: serving RSRQ below which inference runs
    #[serde(default = "default_fuzzy_serving_threshold")]
    pub serving_threshold: u8,
    /// A4 threshold: neighbour RSRQ above which neighbours are reported
    #[serde(default)]
    pub discovery_threshold: u8,
    /// hT must be strictly above this value to trigger
    #[serde(default = "default_abstention_threshold")]
    pub abstention_threshold: f64,
    /// Neighbours not refreshed for longer are ignored; defaults to two
    /// report periods of the variant
    #[serde(default)]
    pub stale_window_ms: Option<u64>,
    /// RSRQ samples kept for trend prediction
    #[serde(default = "default_predictor_window")]
    pub predictor_window: usize,
    /// Replacement for the built-in rule base
    #[serde(default = "Option::default")]
    pub rule_base: Option<RuleBase<D>>,
}

impl<D> Default for FuzzyConfig<D> {
    fn default() -> Self {
        Self {
            serving_threshold: default_fuzzy_serving_threshold(),
            discovery_threshold: 0,
            abstention_threshold: default_abstention_threshold(),
            stale_window_ms: None,
            predictor_window: default_predictor_window(),
            rule_base: None,
        }
    }
}

impl<D> FuzzyConfig<D> {
    /// Stale window, or `default_ms` when not configured
    pub fn stale_window(&self, default_ms: u64) -> Duration {
        Duration::from_millis(self.stale_window_ms.unwrap_or(default_ms))
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        for (what, value) in [
            ("serving", self.serving_threshold),
            ("discovery", self.discovery_threshold),
        ] {
            if !RSRQ_RANGE.contains(&value) {
                return Err(ConfigError::InvalidThreshold(format!(
                    "{} threshold {} outside RSRQ range [{}, {}]",
                    what,
                    value,
                    RSRQ_RANGE.start(),
                    RSRQ_RANGE.end()
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.abstention_threshold) {
            return Err(ConfigError::InvalidAbstentionThreshold(self.abstention_threshold));
        }
        if self.stale_window_ms == Some(0) {
            return Err(ConfigError::InvalidFuzzyParameter(
                "stale_window_ms must be positive".to_string(),
            ));
        }
        if self.predictor_window == 0 {
            return Err(ConfigError::InvalidFuzzyParameter(
                "predictor_window must hold at least one sample".to_string(),
            ));
        }
        Ok(())
    }
}

/// Type-1 stale window: two 120 ms report periods
pub const TYPE1_STALE_WINDOW_MS: u64 = 240;

/// Type-2 stale window: two 180 ms report periods
pub const TYPE2_STALE_WINDOW_MS: u64 = 360;

fn default_report_interval_ms() -> u32 {
    120
}

fn default_hysteresis_db() -> f64 {
    3.0
}

fn default_time_to_trigger_ms() -> u32 {
    256
}

fn default_serving_cell_threshold() -> u8 {
    30
}

fn default_neighbour_cell_offset() -> u8 {
    1
}

fn default_fuzzy_serving_threshold() -> u8 {
    34
}

fn default_abstention_threshold() -> f64 {
    0.75
}

fn default_predictor_window() -> usize {
    DEFAULT_HISTORY_LEN
}

/// Loads an engine configuration from a YAML file.
///
/// Only parses; call [`validate_engine_config`] before building an engine.
pub fn load_engine_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig, ConfigError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    load_engine_config_from_str(&contents)
}

/// Loads an engine configuration from a YAML string.
pub fn load_engine_config_from_str(yaml: &str) -> Result<EngineConfig, ConfigError> {
    Ok(serde_yaml::from_str(yaml)?)
}

/// Validates an engine configuration.
///
/// # Validation Rules
///
/// - Report interval must be a standard ReportInterval value
/// - A3 hysteresis must lie in [0, 15] dB, time-to-trigger must be a
///   standard TimeToTrigger value
/// - A2/A4 serving threshold must be a quantized RSRQ value (0..=34), the
///   neighbour offset must not exceed the RSRQ range
/// - Fuzzy thresholds must be quantized RSRQ values, the abstention
///   threshold must lie in [0, 1], windows must be non-empty; rule bases
///   are checked when the evaluator is built
pub fn validate_engine_config(config: &EngineConfig) -> Result<(), ConfigError> {
    config.report_interval()?;

    match &config.algorithm {
        AlgorithmConfig::NoOp => {}
        AlgorithmConfig::A3Rsrq {
            hysteresis_db,
            time_to_trigger_ms,
        } => {
            Hysteresis::from_db(*hysteresis_db)?;
            TimeToTrigger::from_ms(*time_to_trigger_ms)?;
        }
        AlgorithmConfig::A2A4Rsrq {
            serving_cell_threshold,
            neighbour_cell_offset,
        } => {
            if !RSRQ_RANGE.contains(serving_cell_threshold) {
                return Err(ConfigError::InvalidThreshold(format!(
                    "serving cell threshold {} outside RSRQ range [{}, {}]",
                    serving_cell_threshold,
                    RSRQ_RANGE.start(),
                    RSRQ_RANGE.end()
                )));
            }
            if !RSRQ_RANGE.contains(neighbour_cell_offset) {
                return Err(ConfigError::InvalidOffset(format!(
                    "neighbour cell offset {} outside [{}, {}]",
                    neighbour_cell_offset,
                    RSRQ_RANGE.start(),
                    RSRQ_RANGE.end()
                )));
            }
        }
        AlgorithmConfig::Type1Fuzzy(fuzzy) => fuzzy.validate()?,
        AlgorithmConfig::Type2Fuzzy(fuzzy) => fuzzy.validate()?,
    }
    Ok(())
}

//! Configuration scenarios
//!
//! YAML configurations flow through loading, validation and engine startup.

use integration_tests::test_fixtures::{A2A4_YAML, A3_YAML, TYPE1_YAML, TYPE2_YAML};
use integration_tests::{init_test_logging, RecordingHost, TestResult};
use lteho_common::LogLevel;
use lteho_engine::{
    load_engine_config, load_engine_config_from_str, AlgorithmConfig, ConfigError, EngineConfig,
    EventKind, HandoverEngine,
};

fn start(yaml: &str) -> Result<HandoverEngine<RecordingHost>, ConfigError> {
    let config = load_engine_config_from_str(yaml)?;
    HandoverEngine::new(&config, RecordingHost::new())
}

/// Test an A3 configuration reaches the registered event
#[test]
fn test_a3_from_yaml() -> TestResult {
    init_test_logging();

    let engine = start(A3_YAML)?;
    assert_eq!(engine.algorithm(), "a3-rsrq");

    let meas_id = engine.host().meas_id(EventKind::A3).ok_or("A3 not registered")?;
    let config = engine.configurator().get(meas_id).ok_or("unknown measId")?;
    assert_eq!(config.hysteresis.ie_value(), 5);
    assert_eq!(config.time_to_trigger.to_ms(), 320);
    assert_eq!(config.report_interval.to_ms(), 240);
    Ok(())
}

/// Test A2/A4 thresholds from YAML
#[test]
fn test_a2a4_from_yaml() -> TestResult {
    let engine = start(A2A4_YAML)?;
    let a2 = engine.host().meas_id(EventKind::A2).ok_or("A2 not registered")?;
    assert_eq!(engine.configurator().get(a2).map(|c| c.threshold), Some(25));
    Ok(())
}

/// Test fuzzy parameters from YAML, defaults filling the rest
#[test]
fn test_type2_from_yaml() -> TestResult {
    let config = load_engine_config_from_str(TYPE2_YAML)?;
    let AlgorithmConfig::Type2Fuzzy(fuzzy) = &config.algorithm else {
        return Err("expected type2-fuzzy".into());
    };
    assert_eq!(fuzzy.abstention_threshold, 0.7);
    assert_eq!(fuzzy.serving_threshold, 34);
    assert!(fuzzy.rule_base.is_none());

    let engine = HandoverEngine::new(&config, RecordingHost::new())?;
    assert_eq!(engine.host().registrations(), 2);
    Ok(())
}

/// Test each invalid configuration is fatal at startup
#[test]
fn test_invalid_configs_rejected() {
    let cases = [
        ("algorithm: a3-rsrq\nhysteresis_db: 16.0\n", "hysteresis"),
        ("algorithm: a3-rsrq\ntime_to_trigger_ms: 300\n", "time-to-trigger"),
        ("algorithm: a2-a4-rsrq\nserving_cell_threshold: 35\n", "threshold"),
        ("algorithm: no-op\nreport_interval_ms: 100\n", "report interval"),
        ("algorithm: type1-fuzzy\nabstention_threshold: 1.5\n", "abstention"),
        ("algorithm: type1-fuzzy\npredictor_window: 0\n", "predictor window"),
        ("algorithm: a5-rsrq\n", "unknown algorithm"),
    ];
    for (yaml, what) in cases {
        match start(yaml) {
            Ok(engine) => panic!("{} accepted ({} host calls)", what, engine.host().events().len()),
            Err(e) => tracing::debug!("{} rejected: {}", what, e),
        }
    }
}

/// Test configuration errors convert into the workspace error type
#[test]
fn test_error_conversion() {
    let err = load_engine_config("/nonexistent/lteho.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
    let common: lteho_common::Error = err.into();
    assert!(matches!(common, lteho_common::Error::Io(_)));

    let err = start("algorithm: a3-rsrq\nhysteresis_db: -1.0\n").err().unwrap();
    let common: lteho_common::Error = err.into();
    assert!(matches!(common, lteho_common::Error::Config(_)));

    let err = start("algorithm: a5-rsrq\n").err().unwrap();
    assert!(matches!(err, ConfigError::Yaml(_)));
    let common: lteho_common::Error = err.into();
    assert!(matches!(common, lteho_common::Error::YamlParse(_)));
}

/// Test a type-1 configuration without a rule base loads and starts
#[test]
fn test_type1_from_yaml() -> TestResult {
    let config = load_engine_config_from_str(TYPE1_YAML)?;
    assert_eq!(config.log_level, LogLevel::Debug);
    let AlgorithmConfig::Type1Fuzzy(fuzzy) = &config.algorithm else {
        return Err("expected type1-fuzzy".into());
    };
    assert_eq!(fuzzy.abstention_threshold, 0.8);
    assert!(fuzzy.rule_base.is_none());

    let engine = HandoverEngine::new(&config, RecordingHost::new())?;
    assert_eq!(engine.algorithm(), "type1-fuzzy");
    Ok(())
}

/// Test the configured level installs at most one global subscriber
#[test]
fn test_log_level_installs_once() {
    init_test_logging();

    let config = load_engine_config_from_str(TYPE1_YAML).unwrap();
    assert!(matches!(
        config.init_logging(),
        Err(lteho_common::Error::Logging(_))
    ));
}

/// Test the default configuration is the A2/A4 strategy
#[test]
fn test_default_config() -> TestResult {
    let engine = HandoverEngine::new(&EngineConfig::default(), RecordingHost::new())?;
    assert_eq!(engine.algorithm(), "a2-a4-rsrq");
    Ok(())
}

//! A3 best-neighbour scenarios
//!
//! Drives the engine through the SAP surface with a single A3 event.

use integration_tests::{discovery_report, init_test_logging, RecordingHost, TestUe};
use lteho_common::CellId;
use lteho_engine::{
    AlgorithmConfig, EngineConfig, EventKind, HandoverEngine, HandoverOutcome, MeasurementReport,
    NeighborMeasurement, TriggerResult,
};

fn a3_engine() -> HandoverEngine<RecordingHost> {
    let config = EngineConfig::new(AlgorithmConfig::a3_rsrq());
    HandoverEngine::new(&config, RecordingHost::new()).unwrap()
}

/// Test the engine picks the neighbour with the highest RSRQ
#[test]
fn test_a3_selects_strongest_neighbour() {
    init_test_logging();

    let mut engine = a3_engine();
    let ue = TestUe::new(1, 1);
    let meas_id = engine.host().meas_id(EventKind::A3).unwrap();

    let report = discovery_report(ue.at(1), 12, &[(10, 20), (11, 25), (12, 18)]);
    let decision = engine.on_report(ue.ue_id, meas_id, &report);
    assert_eq!(decision.target_cell_id, Some(CellId(11)));

    assert_eq!(engine.dispatch(&decision), TriggerResult::Dispatched);
    assert_eq!(engine.host().triggers_for(ue.ue_id), vec![CellId(11)]);
}

/// Test the engine registers exactly one A3 event with the configured parameters
#[test]
fn test_a3_registration() {
    let engine = a3_engine();
    assert_eq!(engine.host().registrations(), 1);

    let meas_id = engine.host().meas_id(EventKind::A3).unwrap();
    let config = engine.configurator().get(meas_id).unwrap();
    assert_eq!(config.hysteresis.ie_value(), 6);
    assert_eq!(config.time_to_trigger.to_ms(), 256);
    assert_eq!(config.report_interval.to_ms(), 120);
}

/// Test first-seen wins on equal RSRQ
#[test]
fn test_a3_tie_first_seen() {
    let mut engine = a3_engine();
    let ue = TestUe::new(1, 1);
    let meas_id = engine.host().meas_id(EventKind::A3).unwrap();

    let report = discovery_report(ue.at(1), 12, &[(30, 22), (20, 22)]);
    assert_eq!(
        engine.on_report(ue.ue_id, meas_id, &report).target_cell_id,
        Some(CellId(30))
    );
}

/// Test entries without RSRQ are skipped while the rest of the report is used
#[test]
fn test_a3_incomplete_entries_skipped() {
    init_test_logging();

    let mut engine = a3_engine();
    let ue = TestUe::new(1, 1);
    let meas_id = engine.host().meas_id(EventKind::A3).unwrap();

    let report = MeasurementReport::new(ue.at(1), 40, 12)
        .with_neighbor(NeighborMeasurement::new(CellId(5), Some(60), None))
        .with_neighbor(NeighborMeasurement::complete(CellId(6), 40, 15));
    assert_eq!(
        engine.on_report(ue.ue_id, meas_id, &report).target_cell_id,
        Some(CellId(6))
    );

    let all_zero = discovery_report(ue.at(2), 12, &[(7, 0)]);
    assert!(!engine.on_report(ue.ue_id, meas_id, &all_zero).is_handover());
}

/// Test a report with no neighbour results abstains without side effects
#[test]
fn test_a3_empty_report() {
    let mut engine = a3_engine();
    let ue = TestUe::new(1, 1);
    let meas_id = engine.host().meas_id(EventKind::A3).unwrap();

    let result = engine.on_measurement_report(ue.ue_id, meas_id, &discovery_report(ue.at(1), 12, &[]));
    assert_eq!(result, TriggerResult::Abstained);
    assert!(engine.host().triggers().is_empty());
}

/// Test the serving cell moves with completed handovers and is then excluded
#[test]
fn test_a3_follows_serving_cell() {
    let mut engine = a3_engine();
    let ue = TestUe::new(1, 1);
    let meas_id = engine.host().meas_id(EventKind::A3).unwrap();
    engine.notify_connection_established(ue.ue_id, ue.serving_cell, ue.at(0));

    let report = discovery_report(ue.at(1), 12, &[(1, 30), (2, 20)]);
    assert_eq!(
        engine.on_measurement_report(ue.ue_id, meas_id, &report),
        TriggerResult::Dispatched
    );
    engine.notify_handover_outcome(ue.ue_id, HandoverOutcome::Completed, ue.at(1));

    let report = discovery_report(ue.at(2), 12, &[(1, 30), (2, 20)]);
    engine.on_measurement_report(ue.ue_id, meas_id, &report);
    assert_eq!(engine.host().triggers_for(ue.ue_id), vec![CellId(2), CellId(1)]);
}

/// Test a re-established connection drops the trigger that never got an outcome
#[test]
fn test_a3_reestablishment_releases_trigger() {
    init_test_logging();

    let mut engine = a3_engine();
    let ue = TestUe::new(1, 1);
    let meas_id = engine.host().meas_id(EventKind::A3).unwrap();

    let report = discovery_report(ue.at(1), 12, &[(10, 20), (11, 25), (12, 18)]);
    assert_eq!(
        engine.on_measurement_report(ue.ue_id, meas_id, &report),
        TriggerResult::Dispatched
    );
    assert_eq!(
        engine.on_measurement_report(ue.ue_id, meas_id, &report),
        TriggerResult::Suppressed
    );

    // Radio link failure: the UE comes back on its original cell with no outcome
    engine.notify_connection_established(ue.ue_id, CellId(1), ue.at(2));
    assert_eq!(engine.stats().released, 1);

    let report = discovery_report(ue.at(3), 12, &[(10, 20), (11, 25), (12, 18)]);
    assert_eq!(
        engine.on_measurement_report(ue.ue_id, meas_id, &report),
        TriggerResult::Dispatched
    );
    assert_eq!(engine.host().triggers_for(ue.ue_id), vec![CellId(11), CellId(11)]);

    // The second trigger completes normally
    engine.notify_handover_outcome(ue.ue_id, HandoverOutcome::Completed, ue.at(4));
    let state = engine.cache().state(ue.ue_id).unwrap();
    assert_eq!(state.serving_cell(), Some(CellId(11)));
    assert_eq!(state.serving_since(), Some(ue.at(4)));
    assert_eq!(engine.stats().completed, 1);
}

/// Test outcomes for a UE the engine has never seen leave no state behind
#[test]
fn test_a3_unknown_ue_outcome_ignored() {
    let mut engine = a3_engine();
    let ue = TestUe::new(9, 1);

    assert!(!engine.acknowledge(ue.ue_id, HandoverOutcome::Completed));
    engine.notify_handover_outcome(ue.ue_id, HandoverOutcome::Failed, ue.at(1));
    assert_eq!(engine.cache().ue_count(), 0);
}

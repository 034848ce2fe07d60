//! A2/A4 threshold-plus-offset scenarios
//!
//! A4 reports populate the neighbour cache; A2 reports compare the best
//! cached neighbour against serving RSRQ plus the configured offset.

use integration_tests::{discovery_report, init_test_logging, serving_report, RecordingHost, TestUe};
use lteho_common::{CellId, UeId};
use lteho_engine::{
    AlgorithmConfig, EngineConfig, EventKind, HandoverEngine, HandoverOutcome, MeasId,
    TriggerResult,
};

struct Fixture {
    engine: HandoverEngine<RecordingHost>,
    a2: MeasId,
    a4: MeasId,
}

fn fixture(offset: u8) -> Fixture {
    let config = EngineConfig::new(AlgorithmConfig::a2_a4_rsrq(30, offset));
    let engine = HandoverEngine::new(&config, RecordingHost::new()).unwrap();
    let a2 = engine.host().meas_id(EventKind::A2).unwrap();
    let a4 = engine.host().meas_id(EventKind::A4).unwrap();
    Fixture { engine, a2, a4 }
}

/// Test the offset comparison in both directions
#[test]
fn test_offset_gate() {
    init_test_logging();

    for (offset, expected) in [(1, Some(CellId(7))), (2, Some(CellId(7))), (5, None)] {
        let mut f = fixture(offset);
        let ue = TestUe::new(1, 1);
        f.engine
            .on_report(ue.ue_id, f.a4, &discovery_report(ue.at(1), 10, &[(7, 12)]));
        let decision = f.engine.on_report(ue.ue_id, f.a2, &serving_report(ue.at(2), 10));
        assert_eq!(decision.target_cell_id, expected, "offset {}", offset);
    }
}

/// Test two registrations with distinct identities
#[test]
fn test_registration() {
    let f = fixture(1);
    assert_eq!(f.engine.host().registrations(), 2);
    assert_ne!(f.a2, f.a4);

    let a2 = f.engine.configurator().get(f.a2).unwrap();
    assert_eq!(a2.threshold, 30);
    let a4 = f.engine.configurator().get(f.a4).unwrap();
    assert_eq!(a4.threshold, 0);
}

/// Test at most one trigger is outstanding per UE
#[test]
fn test_dispatcher_debounce() {
    init_test_logging();

    let mut f = fixture(1);
    let ue = TestUe::new(1, 1);
    f.engine
        .on_report(ue.ue_id, f.a4, &discovery_report(ue.at(1), 10, &[(7, 12)]));

    let degraded = serving_report(ue.at(2), 10);
    assert_eq!(
        f.engine.on_measurement_report(ue.ue_id, f.a2, &degraded),
        TriggerResult::Dispatched
    );
    for _ in 0..3 {
        assert_eq!(
            f.engine.on_measurement_report(ue.ue_id, f.a2, &degraded),
            TriggerResult::Suppressed
        );
    }
    assert_eq!(f.engine.host().triggers().len(), 1);

    // Failure leaves the UE where it was, so the next decision dispatches again
    f.engine.notify_handover_outcome(ue.ue_id, HandoverOutcome::Failed, ue.at(3));
    assert_eq!(
        f.engine.on_measurement_report(ue.ue_id, f.a2, &degraded),
        TriggerResult::Dispatched
    );

    let stats = f.engine.stats();
    assert_eq!(stats.dispatched, 2);
    assert_eq!(stats.suppressed, 3);
    assert_eq!(stats.failed, 1);
}

/// Test UEs are debounced independently
#[test]
fn test_ues_are_independent() {
    let mut f = fixture(1);
    let (a, b) = (UeId(1), UeId(2));
    let t = TestUe::new(1, 1);

    for ue in [a, b] {
        f.engine
            .on_report(ue, f.a4, &discovery_report(t.at(1), 10, &[(7, 12)]));
    }
    assert_eq!(
        f.engine.on_measurement_report(a, f.a2, &serving_report(t.at(2), 10)),
        TriggerResult::Dispatched
    );
    assert_eq!(
        f.engine.on_measurement_report(b, f.a2, &serving_report(t.at(2), 10)),
        TriggerResult::Dispatched
    );
    assert_eq!(f.engine.host().triggers_for(a), vec![CellId(7)]);
    assert_eq!(f.engine.host().triggers_for(b), vec![CellId(7)]);
}

/// Test the cache keeps one record per cell with the latest values
#[test]
fn test_cache_last_write_wins() {
    let mut f = fixture(1);
    let ue = TestUe::new(1, 1);

    f.engine
        .on_report(ue.ue_id, f.a4, &discovery_report(ue.at(1), 10, &[(7, 20), (8, 15)]));
    f.engine
        .on_report(ue.ue_id, f.a4, &discovery_report(ue.at(2), 10, &[(7, 9)]));

    let snapshot = f.engine.cache().snapshot(ue.ue_id);
    assert_eq!(snapshot.len(), 2);
    let cell7 = snapshot.iter().find(|r| r.cell_id == CellId(7)).unwrap();
    assert_eq!(cell7.rsrq, 9);
    assert_eq!(cell7.last_update, ue.at(2));

    // Cell 8 is now the best cached neighbour
    let decision = f.engine.on_report(ue.ue_id, f.a2, &serving_report(ue.at(3), 10));
    assert_eq!(decision.target_cell_id, Some(CellId(8)));
}

/// Test an A2 report above the threshold is treated as inconsistent
#[test]
fn test_inconsistent_a2_abstains() {
    let mut f = fixture(1);
    let ue = TestUe::new(1, 1);
    f.engine
        .on_report(ue.ue_id, f.a4, &discovery_report(ue.at(1), 10, &[(7, 33)]));
    let decision = f.engine.on_report(ue.ue_id, f.a2, &serving_report(ue.at(2), 31));
    assert!(!decision.is_handover());
}

/// Test degraded serving with an empty cache and unknown identities
#[test]
fn test_nothing_to_compare() {
    let mut f = fixture(1);
    let ue = TestUe::new(1, 1);
    assert_eq!(
        f.engine
            .on_measurement_report(ue.ue_id, f.a2, &serving_report(ue.at(1), 5)),
        TriggerResult::Abstained
    );
    assert_eq!(
        f.engine
            .on_measurement_report(ue.ue_id, MeasId(31), &serving_report(ue.at(1), 5)),
        TriggerResult::Abstained
    );
    assert!(f.engine.host().triggers().is_empty());
}

//! Fuzzy strategy scenarios for both variants
//!
//! The serving cell degrades (RSRQ 12, 10, 8) while neighbour 2 improves
//! (26, 28, 30) and neighbour 3 stays poor (10).

use std::time::Duration;

use integration_tests::{discovery_report, init_test_logging, serving_report, RecordingHost, TestUe};
use lteho_common::{CellId, SimTime, UeId};
use lteho_engine::rule_base::{default_type1, default_type2};
use lteho_engine::{
    AlgorithmConfig, EngineConfig, EventKind, FuzzyHandoverEvaluator, HandoverEngine, NeighborCache,
    TriggerResult,
};

const SERVING: [u8; 3] = [12, 10, 8];
const IMPROVING: [u8; 3] = [26, 28, 30];
const WINDOW: Duration = Duration::from_millis(360);

fn variants() -> Vec<AlgorithmConfig> {
    vec![AlgorithmConfig::type1_fuzzy(), AlgorithmConfig::type2_fuzzy()]
}

fn engine(algorithm: AlgorithmConfig) -> HandoverEngine<RecordingHost> {
    HandoverEngine::new(&EngineConfig::new(algorithm), RecordingHost::new()).unwrap()
}

/// Feeds the degrading scenario, returning the dispatch result of each A2 report
fn run_degrading(engine: &mut HandoverEngine<RecordingHost>, ue: &TestUe) -> Vec<TriggerResult> {
    let a2 = engine.host().meas_id(EventKind::A2).unwrap();
    let a4 = engine.host().meas_id(EventKind::A4).unwrap();

    (0..SERVING.len())
        .map(|k| {
            let t = ue.at(k as u64 + 1);
            let discovery = discovery_report(t, SERVING[k], &[(2, IMPROVING[k]), (3, 10)]);
            engine.on_measurement_report(ue.ue_id, a4, &discovery);
            engine.on_measurement_report(ue.ue_id, a2, &serving_report(t, SERVING[k]))
        })
        .collect()
}

/// Test both variants hand over to the improving neighbour exactly once
#[test]
fn test_degrading_serving_hands_over() {
    init_test_logging();

    for algorithm in variants() {
        let name = algorithm.name();
        let mut engine = engine(algorithm);
        let ue = TestUe::new(1, 1);
        engine.notify_connection_established(ue.ue_id, ue.serving_cell, ue.at(0));

        let results = run_degrading(&mut engine, &ue);
        assert!(results.contains(&TriggerResult::Dispatched), "{}", name);
        assert_eq!(engine.host().triggers_for(ue.ue_id), vec![CellId(2)], "{}", name);
    }
}

/// Test the serving cell is never chosen even when it reports best
#[test]
fn test_serving_cell_excluded() {
    for algorithm in variants() {
        let mut engine = engine(algorithm);
        let ue = TestUe::new(1, 2);
        engine.notify_connection_established(ue.ue_id, ue.serving_cell, ue.at(0));

        let results = run_degrading(&mut engine, &ue);
        assert!(results.iter().all(|r| *r == TriggerResult::Abstained));
        assert!(engine.host().triggers().is_empty());
    }
}

/// Test neighbours not refreshed within the stale window never qualify
#[test]
fn test_stale_neighbour_skipped() {
    for algorithm in variants() {
        let mut engine = engine(algorithm);
        let ue = TestUe::new(1, 1);
        let a2 = engine.host().meas_id(EventKind::A2).unwrap();
        let a4 = engine.host().meas_id(EventKind::A4).unwrap();

        engine.on_measurement_report(ue.ue_id, a4, &discovery_report(ue.at(0), 12, &[(2, 30)]));
        let late = SimTime::from_millis(5_000);
        assert_eq!(
            engine.on_measurement_report(ue.ue_id, a2, &serving_report(late, 8)),
            TriggerResult::Abstained
        );

        let state = engine.cache().state(ue.ue_id).unwrap();
        let record = state.neighbor(CellId(2)).unwrap();
        assert!(record.history().is_empty());
        assert_eq!(record.rsrq, 30);
    }
}

fn score_with(evaluator: &FuzzyHandoverEvaluator) -> Option<(CellId, f64)> {
    let ue = UeId(1);
    let mut cache = NeighborCache::new(6);
    for (k, rsrq) in IMPROVING.into_iter().enumerate() {
        cache.update(ue, CellId(2), 50, rsrq, SimTime::from_millis(120 * k as u64));
    }
    let state = cache.state_mut(ue);
    let mut result = None;
    for (k, rsrq) in SERVING.into_iter().enumerate() {
        result = evaluator.select_target(state, SimTime::from_millis(120 * k as u64 + 240), rsrq);
    }
    result
}

/// Test a score equal to the abstention threshold abstains, per variant
#[test]
fn test_abstention_boundary() {
    type Build = fn(f64) -> FuzzyHandoverEvaluator;
    let builders: [(&str, Build); 2] = [
        ("type1", |th| FuzzyHandoverEvaluator::type1(default_type1(), th, WINDOW).unwrap()),
        ("type2", |th| FuzzyHandoverEvaluator::type2(default_type2(), th, WINDOW).unwrap()),
    ];

    for (name, build) in builders {
        let (target, score) = score_with(&build(0.0)).unwrap();
        assert_eq!(target, CellId(2), "{}", name);
        assert!(score > 0.75, "{}: {}", name, score);

        assert_eq!(score_with(&build(score)), None, "{} at {}", name, score);
        assert_eq!(
            score_with(&build(score - 1e-9)).map(|(cell, _)| cell),
            Some(CellId(2)),
            "{}",
            name
        );
    }
}

//! Hierarchical fuzzy handover evaluator
//!
//! Scores every qualifying neighbour of a UE with the handover-trigger
//! system (`hT`), fed by the radio link quality of the serving cell and of
//! that neighbour. Link quality is inferred from the predicted RSRQ and its
//! expected change, not from the raw last sample.

use std::time::Duration;

use lteho_common::{CellId, SimTime};
use lteho_fuzzy::{FuzzyError, Type1Definition, Type1System, Type2Definition, Type2System};
use tracing::{debug, trace, warn};

use crate::cache::UeDecisionState;
use crate::predictor::predict_next;
use crate::rule_base::RuleBase;

/// One inference system of either fuzzy variant
#[derive(Debug, Clone)]
pub enum FuzzySystem {
    Type1(Type1System),
    Type2(Type2System),
}

impl FuzzySystem {
    pub fn evaluate(&self, inputs: &[f64]) -> Result<f64, FuzzyError> {
        match self {
            FuzzySystem::Type1(system) => system.evaluate(inputs),
            FuzzySystem::Type2(system) => system.evaluate(inputs),
        }
    }

    pub fn input_names(&self) -> Vec<&str> {
        match self {
            FuzzySystem::Type1(system) => system.inputs().iter().map(|v| v.name.as_str()).collect(),
            FuzzySystem::Type2(system) => system.inputs().iter().map(|v| v.name.as_str()).collect(),
        }
    }
}

/// Predicted RSRQ and its change against the last sample.
///
/// A lone serving sample is predicted one step up; a lone neighbour sample
/// is predicted flat.
pub fn trend_inputs(samples: &[f64], serving: bool) -> Option<(f64, f64)> {
    let last = *samples.last()?;
    let predicted = if samples.len() == 1 && serving {
        last + 1.0
    } else {
        predict_next(samples)?
    };
    Some((predicted, predicted - last))
}

#[derive(Debug, Clone)]
pub struct FuzzyHandoverEvaluator {
    serving_rlq: FuzzySystem,
    neighbour_rlq: FuzzySystem,
    trigger: FuzzySystem,
    abstention_threshold: f64,
    stale_window: Duration,
}

impl FuzzyHandoverEvaluator {
    pub fn type1(
        rule_base: RuleBase<Type1Definition>,
        abstention_threshold: f64,
        stale_window: Duration,
    ) -> Result<Self, FuzzyError> {
        Ok(Self {
            serving_rlq: FuzzySystem::Type1(rule_base.serving_rlq.build()?),
            neighbour_rlq: FuzzySystem::Type1(rule_base.neighbour_rlq.build()?),
            trigger: FuzzySystem::Type1(rule_base.trigger.build()?),
            abstention_threshold,
            stale_window,
        })
    }

    pub fn type2(
        rule_base: RuleBase<Type2Definition>,
        abstention_threshold: f64,
        stale_window: Duration,
    ) -> Result<Self, FuzzyError> {
        Ok(Self {
            serving_rlq: FuzzySystem::Type2(rule_base.serving_rlq.build()?),
            neighbour_rlq: FuzzySystem::Type2(rule_base.neighbour_rlq.build()?),
            trigger: FuzzySystem::Type2(rule_base.trigger.build()?),
            abstention_threshold,
            stale_window,
        })
    }

    pub fn abstention_threshold(&self) -> f64 {
        self.abstention_threshold
    }

    pub fn stale_window(&self) -> Duration {
        self.stale_window
    }

    /// Link quality of a cell from its (predicted RSRQ, predicted change)
    fn quality(system: &FuzzySystem, samples: &[f64], serving: bool) -> Result<f64, FuzzyError> {
        let (rsrq, delta) = trend_inputs(samples, serving).ok_or_else(|| {
            FuzzyError::EmptyOutput(format!("{} (no RSRQ samples)", system.input_names().join("/")))
        })?;
        system.evaluate(&[rsrq, delta])
    }

    pub fn serving_quality(&self, samples: &[f64]) -> Result<f64, FuzzyError> {
        Self::quality(&self.serving_rlq, samples, true)
    }

    pub fn neighbour_quality(&self, samples: &[f64]) -> Result<f64, FuzzyError> {
        Self::quality(&self.neighbour_rlq, samples, false)
    }

    /// Handover desirability towards a neighbour
    pub fn trigger_score(&self, serving_rlq: f64, neighbour_rlq: f64) -> Result<f64, FuzzyError> {
        let names = self.trigger.input_names();
        let inputs: Vec<f64> = names
            .iter()
            .map(|name| {
                if *name == crate::rule_base::NEIGHBOUR_RLQ {
                    neighbour_rlq
                } else {
                    serving_rlq
                }
            })
            .collect();
        self.trigger.evaluate(&inputs)
    }

    /// Whether `record`-style data refreshed at `last_update` with `rsrq` may
    /// still take part in an evaluation at `now`
    pub fn is_usable(&self, now: SimTime, last_update: SimTime, rsrq: u8) -> bool {
        rsrq != 0 && now.saturating_since(last_update) <= self.stale_window
    }

    /// Runs one serving-degraded evaluation for a UE.
    ///
    /// Appends `serving_rsrq` to the serving trend, scores every usable
    /// neighbour except the serving cell, and returns the best one whose
    /// score is strictly above the abstention threshold. Neighbours that
    /// are stale or report RSRQ 0 lose their trend history.
    pub fn select_target(
        &self,
        state: &mut UeDecisionState,
        now: SimTime,
        serving_rsrq: u8,
    ) -> Option<(CellId, f64)> {
        state.serving_history.push(serving_rsrq);
        let serving_rlq = match self.serving_quality(state.serving_history.samples()) {
            Ok(rlq) => rlq,
            Err(e) => {
                warn!("{}: serving link quality unavailable: {}", state.ue_id, e);
                return None;
            }
        };
        trace!(
            "{}: serving {:?} since {:?} rsrq={} rlq={:.4}",
            state.ue_id, state.serving_cell, state.serving_since, serving_rsrq, serving_rlq
        );

        let serving_cell = state.serving_cell;
        let candidates: Vec<(CellId, SimTime, u8)> = state
            .snapshot()
            .into_iter()
            .filter(|r| Some(r.cell_id) != serving_cell)
            .map(|r| (r.cell_id, r.last_update, r.rsrq))
            .collect();

        let mut best: Option<(CellId, f64)> = None;
        for (cell_id, last_update, rsrq) in candidates {
            if !self.is_usable(now, last_update, rsrq) {
                debug!("{}: skipping {} (rsrq={}, last update {})", state.ue_id, cell_id, rsrq, last_update);
                state.reset_neighbor_history(cell_id);
                continue;
            }
            let Some(record) = state.neighbor(cell_id) else {
                continue;
            };
            if record.history().is_empty() {
                continue;
            }

            let score = match self
                .neighbour_quality(record.history().samples())
                .and_then(|neighbour_rlq| {
                    let score = self.trigger_score(serving_rlq, neighbour_rlq)?;
                    trace!("{}: {} rlq={:.4} hT={:.4}", state.ue_id, cell_id, neighbour_rlq, score);
                    Ok(score)
                }) {
                Ok(score) => score,
                Err(e) => {
                    warn!("{}: {} not scored: {}", state.ue_id, cell_id, e);
                    continue;
                }
            };

            debug!("{}: hT({})={:.4}", state.ue_id, cell_id, score);
            if score > self.abstention_threshold && best.map_or(true, |(_, s)| score > s) {
                best = Some((cell_id, score));
            }
        }
        best
    }
}

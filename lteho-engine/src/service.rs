//! Inference service
//!
//! The fuzzy evaluator behind the three-call contract a host uses when the
//! inference core lives outside its RRC entity. UEs are addressed by RNTI;
//! the service keeps the RNTI to UE binding established by
//! [`HandoverInference::update_serving_cell_id`] so that an RNTI reused
//! after reassignment starts from a clean history.

use std::collections::HashMap;

use lteho_common::{CellId, Rnti, SimTime, UeId};
use lteho_fuzzy::{Type1Definition, Type2Definition};
use tracing::{debug, info, warn};

use crate::cache::NeighborCache;
use crate::config::FuzzyConfig;
use crate::error::ConfigError;
use crate::evaluator::FuzzyHandoverEvaluator;
use crate::strategy::FuzzyStrategy;

/// Handover inference contract. A returned cell id of 0 means abstain.
pub trait HandoverInference {
    fn update_serving_cell_id(&mut self, time: SimTime, ue_id: UeId, cell_id: CellId, rnti: Rnti);

    fn update_neighbour_measurements(
        &mut self,
        time: SimTime,
        rnti: Rnti,
        cell_id: CellId,
        rsrp: u8,
        rsrq: u8,
    );

    fn evaluate_handover(&mut self, time: SimTime, rnti: Rnti, rsrp: u8, rsrq: u8) -> u16;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct UeContext {
    ue_id: UeId,
    serving_cell: CellId,
    since: SimTime,
}

/// In-process [`HandoverInference`] over a [`FuzzyHandoverEvaluator`]
#[derive(Debug)]
pub struct FuzzyInferenceService {
    evaluator: FuzzyHandoverEvaluator,
    contexts: HashMap<Rnti, UeContext>,
    cache: NeighborCache,
}

impl FuzzyInferenceService {
    pub fn new(evaluator: FuzzyHandoverEvaluator, history_len: usize) -> Self {
        Self {
            evaluator,
            contexts: HashMap::new(),
            cache: NeighborCache::new(history_len),
        }
    }

    pub fn type1(config: &FuzzyConfig<Type1Definition>) -> Result<Self, ConfigError> {
        config.validate()?;
        let evaluator = FuzzyStrategy::type1(config)?.into_evaluator();
        Ok(Self::new(evaluator, config.predictor_window))
    }

    pub fn type2(config: &FuzzyConfig<Type2Definition>) -> Result<Self, ConfigError> {
        config.validate()?;
        let evaluator = FuzzyStrategy::type2(config)?.into_evaluator();
        Ok(Self::new(evaluator, config.predictor_window))
    }

    pub fn evaluator(&self) -> &FuzzyHandoverEvaluator {
        &self.evaluator
    }

    pub fn cache(&self) -> &NeighborCache {
        &self.cache
    }

    /// UE currently bound to `rnti`
    pub fn ue_for(&self, rnti: Rnti) -> Option<UeId> {
        self.contexts.get(&rnti).map(|ctx| ctx.ue_id)
    }

    /// Serving cell recorded for `rnti`
    pub fn serving_cell(&self, rnti: Rnti) -> Option<CellId> {
        self.contexts.get(&rnti).map(|ctx| ctx.serving_cell)
    }

    fn context(&self, rnti: Rnti, op: &str) -> Option<UeContext> {
        let ctx = self.contexts.get(&rnti).copied();
        if ctx.is_none() {
            warn!("{}: unknown RNTI {}, ignoring", op, rnti);
        }
        ctx
    }
}

impl HandoverInference for FuzzyInferenceService {
    fn update_serving_cell_id(&mut self, time: SimTime, ue_id: UeId, cell_id: CellId, rnti: Rnti) {
        // A UE keeps one binding; drop the RNTI it held in its previous cell
        self.contexts.retain(|r, ctx| *r == rnti || ctx.ue_id != ue_id);

        let previous = self.contexts.insert(
            rnti,
            UeContext {
                ue_id,
                serving_cell: cell_id,
                since: time,
            },
        );
        if let Some(prev) = previous {
            if prev.ue_id != ue_id {
                info!("{} reassigned from {} to {}", rnti, prev.ue_id, ue_id);
                self.cache.remove_ue(prev.ue_id);
            }
        }

        debug!("{}: serving cell {} (rnti {}) at {}", ue_id, cell_id, rnti, time);
        self.cache.state_mut(ue_id).set_serving_cell(cell_id, time);
    }

    fn update_neighbour_measurements(
        &mut self,
        time: SimTime,
        rnti: Rnti,
        cell_id: CellId,
        rsrp: u8,
        rsrq: u8,
    ) {
        let Some(ctx) = self.context(rnti, "neighbour update") else {
            return;
        };
        self.cache.update(ctx.ue_id, cell_id, rsrp, rsrq, time);
    }

    fn evaluate_handover(&mut self, time: SimTime, rnti: Rnti, rsrp: u8, rsrq: u8) -> u16 {
        let Some(ctx) = self.context(rnti, "evaluation") else {
            return CellId::NONE.value();
        };
        debug!(
            "{}: evaluating in {} (since {}), rsrp={} rsrq={}",
            ctx.ue_id, ctx.serving_cell, ctx.since, rsrp, rsrq
        );

        let state = self.cache.state_mut(ctx.ue_id);
        match self.evaluator.select_target(state, time, rsrq) {
            Some((target, score)) => {
                info!("{}: target {} (hT={:.4})", ctx.ue_id, target, score);
                target.value()
            }
            None => CellId::NONE.value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u64) -> SimTime {
        SimTime::from_millis(ms)
    }

    fn degrading(service: &mut FuzzyInferenceService, rnti: Rnti) -> u16 {
        let mut target = 0;
        for (k, (serving, neighbour)) in [(12, 26), (10, 28), (8, 30)].into_iter().enumerate() {
            let now = at(120 * k as u64);
            service.update_neighbour_measurements(now, rnti, CellId(2), 50, neighbour);
            service.update_neighbour_measurements(now, rnti, CellId(3), 30, 10);
            target = service.evaluate_handover(now, rnti, 40, serving);
        }
        target
    }

    #[test]
    fn test_type1_service_selects_improving_neighbour() {
        let mut service = FuzzyInferenceService::type1(&FuzzyConfig::default()).unwrap();
        service.update_serving_cell_id(at(0), UeId(7), CellId(1), Rnti(100));
        assert_eq!(degrading(&mut service, Rnti(100)), 2);
    }

    #[test]
    fn test_type2_service_selects_improving_neighbour() {
        let mut service = FuzzyInferenceService::type2(&FuzzyConfig::default()).unwrap();
        service.update_serving_cell_id(at(0), UeId(7), CellId(1), Rnti(100));
        assert_eq!(degrading(&mut service, Rnti(100)), 2);
    }

    #[test]
    fn test_unknown_rnti_abstains() {
        let mut service = FuzzyInferenceService::type1(&FuzzyConfig::default()).unwrap();
        service.update_neighbour_measurements(at(0), Rnti(9), CellId(2), 50, 30);
        assert_eq!(service.evaluate_handover(at(0), Rnti(9), 40, 5), 0);
        assert_eq!(service.cache().ue_count(), 0);
    }

    #[test]
    fn test_rnti_reuse_drops_previous_ue() {
        let mut service = FuzzyInferenceService::type1(&FuzzyConfig::default()).unwrap();
        service.update_serving_cell_id(at(0), UeId(1), CellId(1), Rnti(100));
        service.update_neighbour_measurements(at(0), Rnti(100), CellId(2), 50, 30);
        assert_eq!(service.cache().snapshot(UeId(1)).len(), 1);

        service.update_serving_cell_id(at(500), UeId(2), CellId(3), Rnti(100));
        assert_eq!(service.ue_for(Rnti(100)), Some(UeId(2)));
        assert_eq!(service.serving_cell(Rnti(100)), Some(CellId(3)));
        assert!(service.cache().state(UeId(1)).is_none());
        assert!(service.cache().snapshot(UeId(2)).is_empty());
    }

    #[test]
    fn test_ue_moving_cells_releases_old_rnti() {
        let mut service = FuzzyInferenceService::type1(&FuzzyConfig::default()).unwrap();
        service.update_serving_cell_id(at(0), UeId(1), CellId(1), Rnti(100));
        service.update_serving_cell_id(at(300), UeId(1), CellId(2), Rnti(200));

        assert_eq!(service.ue_for(Rnti(100)), None);
        assert_eq!(service.ue_for(Rnti(200)), Some(UeId(1)));
        let state = service.cache().state(UeId(1)).unwrap();
        assert_eq!(state.serving_cell(), Some(CellId(2)));
    }

    #[test]
    fn test_serving_cell_never_returned() {
        let mut service = FuzzyInferenceService::type1(&FuzzyConfig::default()).unwrap();
        service.update_serving_cell_id(at(0), UeId(7), CellId(2), Rnti(100));
        assert_eq!(degrading(&mut service, Rnti(100)), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = FuzzyConfig {
            abstention_threshold: 1.5,
            ..FuzzyConfig::default()
        };
        assert!(matches!(
            FuzzyInferenceService::type2(&config),
            Err(ConfigError::InvalidAbstentionThreshold(_))
        ));
    }
}

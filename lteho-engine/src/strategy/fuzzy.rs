//! Fuzzy-inference strategies (Type-1 and interval Type-2)
//!
//! Same event split as the A2/A4 strategy: A4 reports feed the neighbour
//! cache, A2 reports run the hierarchical fuzzy evaluation instead of the
//! fixed offset comparison.

use lteho_common::UeId;
use tracing::info;

use super::{cache_neighbours, is_consistent_a2};
use crate::cache::NeighborCache;
use crate::config::{FuzzyConfig, TYPE1_STALE_WINDOW_MS, TYPE2_STALE_WINDOW_MS};
use crate::error::{ConfigError, ReportError};
use crate::evaluator::FuzzyHandoverEvaluator;
use crate::meas_config::{MeasId, MeasurementConfig, MeasurementConfigurator, ReportInterval};
use crate::report::{Decision, MeasurementReport};
use crate::rule_base::{default_type1, default_type2};
use lteho_fuzzy::{Type1Definition, Type2Definition};

#[derive(Debug)]
pub struct FuzzyStrategy {
    evaluator: FuzzyHandoverEvaluator,
    serving_threshold: u8,
    discovery_threshold: u8,
    predictor_window: usize,
    a2_meas_id: Option<MeasId>,
    a4_meas_id: Option<MeasId>,
}

impl FuzzyStrategy {
    pub fn type1(config: &FuzzyConfig<Type1Definition>) -> Result<Self, ConfigError> {
        let rule_base = config.rule_base.clone().unwrap_or_else(default_type1);
        let evaluator = FuzzyHandoverEvaluator::type1(
            rule_base,
            config.abstention_threshold,
            config.stale_window(TYPE1_STALE_WINDOW_MS),
        )?;
        Ok(Self::with_evaluator(evaluator, config))
    }

    pub fn type2(config: &FuzzyConfig<Type2Definition>) -> Result<Self, ConfigError> {
        let rule_base = config.rule_base.clone().unwrap_or_else(default_type2);
        let evaluator = FuzzyHandoverEvaluator::type2(
            rule_base,
            config.abstention_threshold,
            config.stale_window(TYPE2_STALE_WINDOW_MS),
        )?;
        Ok(Self::with_evaluator(evaluator, config))
    }

    fn with_evaluator<D>(evaluator: FuzzyHandoverEvaluator, config: &FuzzyConfig<D>) -> Self {
        Self {
            evaluator,
            serving_threshold: config.serving_threshold,
            discovery_threshold: config.discovery_threshold,
            predictor_window: config.predictor_window,
            a2_meas_id: None,
            a4_meas_id: None,
        }
    }

    pub fn evaluator(&self) -> &FuzzyHandoverEvaluator {
        &self.evaluator
    }

    pub fn predictor_window(&self) -> usize {
        self.predictor_window
    }

    pub fn into_evaluator(self) -> FuzzyHandoverEvaluator {
        self.evaluator
    }

    /// (serving degraded, neighbour discovery) identities
    pub fn meas_ids(&self) -> (Option<MeasId>, Option<MeasId>) {
        (self.a2_meas_id, self.a4_meas_id)
    }

    pub fn register_events(
        &mut self,
        configurator: &mut MeasurementConfigurator,
        report_interval: ReportInterval,
    ) -> Result<(), ConfigError> {
        self.a2_meas_id = Some(configurator.register_event(
            MeasurementConfig::a2_rsrq(self.serving_threshold).with_report_interval(report_interval),
        )?);
        self.a4_meas_id = Some(configurator.register_event(
            MeasurementConfig::a4_rsrq(self.discovery_threshold).with_report_interval(report_interval),
        )?);
        Ok(())
    }

    pub fn on_report(
        &mut self,
        ue_id: UeId,
        meas_id: MeasId,
        report: &MeasurementReport,
        cache: &mut NeighborCache,
    ) -> Result<Decision, ReportError> {
        if Some(meas_id) == self.a4_meas_id {
            cache_neighbours(ue_id, meas_id, report, cache)?;
            return Ok(Decision::abstain(ue_id));
        }
        if Some(meas_id) != self.a2_meas_id {
            return Err(ReportError::UnknownMeasId(meas_id));
        }
        if !is_consistent_a2(ue_id, report.serving_rsrq, self.serving_threshold) {
            return Ok(Decision::abstain(ue_id));
        }

        let state = cache.state_mut(ue_id);
        match self.evaluator.select_target(state, report.time, report.serving_rsrq) {
            Some((target, score)) => {
                info!(
                    "{}: fuzzy target {} (hT={:.4}, serving rsrq={})",
                    ue_id, target, score, report.serving_rsrq
                );
                Ok(Decision::handover(ue_id, target))
            }
            None => Ok(Decision::abstain(ue_id)),
        }
    }
}

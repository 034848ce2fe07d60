//! Handover decision strategies
//!
//! One variant is selected at configuration time; every report goes through
//! [`HandoverStrategy::on_report`].

mod a2a4_rsrq;
mod a3_rsrq;
mod fuzzy;

pub use a2a4_rsrq::A2A4RsrqStrategy;
pub use a3_rsrq::A3RsrqStrategy;
pub use fuzzy::FuzzyStrategy;

use lteho_common::{CellId, UeId};
use tracing::warn;

use crate::cache::{NeighborCache, DEFAULT_HISTORY_LEN};
use crate::config::AlgorithmConfig;
use crate::error::{ConfigError, ReportError};
use crate::meas_config::{MeasId, MeasurementConfigurator, ReportInterval};
use crate::report::{Decision, MeasurementReport};

#[derive(Debug)]
pub enum HandoverStrategy {
    /// Never triggers, registers no events
    NoOp,
    A3Rsrq(A3RsrqStrategy),
    A2A4Rsrq(A2A4RsrqStrategy),
    Type1Fuzzy(FuzzyStrategy),
    Type2Fuzzy(FuzzyStrategy),
}

impl HandoverStrategy {
    pub fn from_config(config: &AlgorithmConfig) -> Result<Self, ConfigError> {
        Ok(match config {
            AlgorithmConfig::NoOp => HandoverStrategy::NoOp,
            AlgorithmConfig::A3Rsrq {
                hysteresis_db,
                time_to_trigger_ms,
            } => HandoverStrategy::A3Rsrq(A3RsrqStrategy::new(*hysteresis_db, *time_to_trigger_ms)?),
            AlgorithmConfig::A2A4Rsrq {
                serving_cell_threshold,
                neighbour_cell_offset,
            } => HandoverStrategy::A2A4Rsrq(A2A4RsrqStrategy::new(
                *serving_cell_threshold,
                *neighbour_cell_offset,
            )),
            AlgorithmConfig::Type1Fuzzy(fuzzy) => {
                HandoverStrategy::Type1Fuzzy(FuzzyStrategy::type1(fuzzy)?)
            }
            AlgorithmConfig::Type2Fuzzy(fuzzy) => {
                HandoverStrategy::Type2Fuzzy(FuzzyStrategy::type2(fuzzy)?)
            }
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            HandoverStrategy::NoOp => "no-op",
            HandoverStrategy::A3Rsrq(_) => "a3-rsrq",
            HandoverStrategy::A2A4Rsrq(_) => "a2-a4-rsrq",
            HandoverStrategy::Type1Fuzzy(_) => "type1-fuzzy",
            HandoverStrategy::Type2Fuzzy(_) => "type2-fuzzy",
        }
    }

    /// RSRQ samples the neighbour cache should keep per trend
    pub fn history_len(&self) -> usize {
        match self {
            HandoverStrategy::Type1Fuzzy(s) | HandoverStrategy::Type2Fuzzy(s) => s.predictor_window(),
            _ => DEFAULT_HISTORY_LEN,
        }
    }

    /// Registers the measurement events this strategy needs
    pub fn register_events(
        &mut self,
        configurator: &mut MeasurementConfigurator,
        report_interval: ReportInterval,
    ) -> Result<(), ConfigError> {
        match self {
            HandoverStrategy::NoOp => Ok(()),
            HandoverStrategy::A3Rsrq(s) => s.register_events(configurator, report_interval),
            HandoverStrategy::A2A4Rsrq(s) => s.register_events(configurator, report_interval),
            HandoverStrategy::Type1Fuzzy(s) | HandoverStrategy::Type2Fuzzy(s) => {
                s.register_events(configurator, report_interval)
            }
        }
    }

    /// Evaluates one report of `ue_id` tagged `meas_id`
    pub fn on_report(
        &mut self,
        ue_id: UeId,
        meas_id: MeasId,
        report: &MeasurementReport,
        cache: &mut NeighborCache,
    ) -> Result<Decision, ReportError> {
        match self {
            HandoverStrategy::NoOp => Ok(Decision::abstain(ue_id)),
            HandoverStrategy::A3Rsrq(s) => s.on_report(ue_id, meas_id, report, cache),
            HandoverStrategy::A2A4Rsrq(s) => s.on_report(ue_id, meas_id, report, cache),
            HandoverStrategy::Type1Fuzzy(s) | HandoverStrategy::Type2Fuzzy(s) => {
                s.on_report(ue_id, meas_id, report, cache)
            }
        }
    }
}

/// Neighbour relation check applied to every candidate; every cell is
/// currently a valid neighbour.
pub fn is_valid_neighbour(_cell_id: CellId) -> bool {
    true
}

/// Copies every complete neighbour entry of a discovery (A4) report into
/// the cache. Incomplete entries are logged and skipped.
pub(crate) fn cache_neighbours(
    ue_id: UeId,
    meas_id: MeasId,
    report: &MeasurementReport,
    cache: &mut NeighborCache,
) -> Result<(), ReportError> {
    if report.neighbors.is_empty() {
        return Err(ReportError::NoNeighbourResults(meas_id));
    }
    for neighbor in &report.neighbors {
        match neighbor.require_both() {
            Ok((rsrp, rsrq)) => cache.update(ue_id, neighbor.cell_id, rsrp, rsrq, report.time),
            Err(e) => warn!("{}: {}", ue_id, e),
        }
    }
    Ok(())
}

/// Serving RSRQ above the A2 threshold contradicts the A2 event
pub(crate) fn is_consistent_a2(ue_id: UeId, serving_rsrq: u8, threshold: u8) -> bool {
    if serving_rsrq > threshold {
        warn!(
            "{}: inconsistent A2 report, serving RSRQ {} above threshold {}",
            ue_id, serving_rsrq, threshold
        );
        return false;
    }
    true
}

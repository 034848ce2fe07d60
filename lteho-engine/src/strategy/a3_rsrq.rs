//! Best-neighbour strategy on the A3 event
//!
//! The radio layer applies hysteresis and time-to-trigger before reporting;
//! by the time an A3 report arrives the condition has held. The strategy only
//! picks the target: the neighbour with the strictly highest RSRQ, first
//! seen winning ties.

use lteho_common::{CellId, UeId};
use tracing::{info, warn};

use super::is_valid_neighbour;
use crate::cache::NeighborCache;
use crate::error::{ConfigError, ReportError};
use crate::meas_config::{
    Hysteresis, MeasId, MeasurementConfig, MeasurementConfigurator, Quantity, ReportInterval,
    TimeToTrigger,
};
use crate::report::{Decision, MeasurementReport};

#[derive(Debug)]
pub struct A3RsrqStrategy {
    hysteresis: Hysteresis,
    time_to_trigger: TimeToTrigger,
    meas_id: Option<MeasId>,
}

impl A3RsrqStrategy {
    pub fn new(hysteresis_db: f64, time_to_trigger_ms: u32) -> Result<Self, ConfigError> {
        Ok(Self {
            hysteresis: Hysteresis::from_db(hysteresis_db)?,
            time_to_trigger: TimeToTrigger::from_ms(time_to_trigger_ms)?,
            meas_id: None,
        })
    }

    pub fn meas_id(&self) -> Option<MeasId> {
        self.meas_id
    }

    pub fn register_events(
        &mut self,
        configurator: &mut MeasurementConfigurator,
        report_interval: ReportInterval,
    ) -> Result<(), ConfigError> {
        let config = MeasurementConfig::a3_rsrq(self.hysteresis, self.time_to_trigger)
            .with_report_interval(report_interval);
        self.meas_id = Some(configurator.register_event(config)?);
        Ok(())
    }

    pub fn on_report(
        &mut self,
        ue_id: UeId,
        meas_id: MeasId,
        report: &MeasurementReport,
        cache: &mut NeighborCache,
    ) -> Result<Decision, ReportError> {
        if self.meas_id != Some(meas_id) {
            return Err(ReportError::UnknownMeasId(meas_id));
        }
        if report.neighbors.is_empty() {
            return Err(ReportError::NoNeighbourResults(meas_id));
        }

        let serving_cell = cache.state(ue_id).and_then(|s| s.serving_cell());
        let mut best: Option<CellId> = None;
        let mut best_rsrq = 0u8;
        for neighbor in &report.neighbors {
            let Some(rsrq) = neighbor.rsrq else {
                warn!(
                    "{}: {}",
                    ue_id,
                    ReportError::MeasurementIncomplete {
                        cell_id: neighbor.cell_id,
                        quantity: Quantity::Rsrq,
                    }
                );
                continue;
            };
            if Some(neighbor.cell_id) == serving_cell {
                continue;
            }
            if rsrq > best_rsrq && is_valid_neighbour(neighbor.cell_id) {
                best = Some(neighbor.cell_id);
                best_rsrq = rsrq;
            }
        }

        match best {
            Some(target) if best_rsrq > 0 => {
                info!(
                    "{}: A3 best neighbour {} (rsrq={}, serving rsrq={})",
                    ue_id, target, best_rsrq, report.serving_rsrq
                );
                Ok(Decision::handover(ue_id, target))
            }
            _ => Ok(Decision::abstain(ue_id)),
        }
    }
}

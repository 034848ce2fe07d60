//! Threshold/offset strategy on the A2 and A4 events
//!
//! A4 reports (neighbour above threshold 0, so every detected neighbour)
//! keep the neighbour cache current. An A2 report (serving RSRQ fell to the
//! serving threshold) compares the best cached neighbour against the serving
//! RSRQ: the handover is triggered when the neighbour is at least
//! `neighbour_cell_offset` quantization steps better. The A2 evaluation
//! never waits for fresher A4 data.

use lteho_common::UeId;
use tracing::{debug, info};

use super::{cache_neighbours, is_consistent_a2, is_valid_neighbour};
use crate::cache::NeighborCache;
use crate::error::{ConfigError, ReportError};
use crate::meas_config::{MeasId, MeasurementConfig, MeasurementConfigurator, ReportInterval};
use crate::report::{Decision, MeasurementReport};

#[derive(Debug)]
pub struct A2A4RsrqStrategy {
    serving_cell_threshold: u8,
    neighbour_cell_offset: u8,
    a2_meas_id: Option<MeasId>,
    a4_meas_id: Option<MeasId>,
}

impl A2A4RsrqStrategy {
    pub fn new(serving_cell_threshold: u8, neighbour_cell_offset: u8) -> Self {
        Self {
            serving_cell_threshold,
            neighbour_cell_offset,
            a2_meas_id: None,
            a4_meas_id: None,
        }
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
            MeasurementConfig::a2_rsrq(self.serving_cell_threshold).with_report_interval(report_interval),
        )?);
        self.a4_meas_id = Some(
            configurator
                .register_event(MeasurementConfig::a4_rsrq(0).with_report_interval(report_interval))?,
        );
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

        let serving_rsrq = report.serving_rsrq;
        if !is_consistent_a2(ue_id, serving_rsrq, self.serving_cell_threshold) {
            return Ok(Decision::abstain(ue_id));
        }
        Ok(self.evaluate(ue_id, serving_rsrq, cache))
    }

    fn evaluate(&self, ue_id: UeId, serving_rsrq: u8, cache: &NeighborCache) -> Decision {
        let serving_cell = cache.state(ue_id).and_then(|s| s.serving_cell());
        let best = cache.best_neighbor(ue_id, |r| {
            r.rsrq > 0 && Some(r.cell_id) != serving_cell && is_valid_neighbour(r.cell_id)
        });
        let Some(best) = best else {
            debug!("{}: skipping handover evaluation, no neighbour information", ue_id);
            return Decision::abstain(ue_id);
        };

        let margin = i16::from(best.rsrq) - i16::from(serving_rsrq);
        if margin >= i16::from(self.neighbour_cell_offset) {
            info!(
                "{}: A2/A4 target {} (rsrq={}, serving rsrq={}, offset={})",
                ue_id, best.cell_id, best.rsrq, serving_rsrq, self.neighbour_cell_offset
            );
            Decision::handover(ue_id, best.cell_id)
        } else {
            debug!(
                "{}: best neighbour {} only {} steps above serving",
                ue_id, best.cell_id, margin
            );
            Decision::abstain(ue_id)
        }
    }
}

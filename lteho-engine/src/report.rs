//! Measurement reports and handover decisions

use lteho_common::{CellId, SimTime, UeId};

use crate::error::ReportError;
use crate::meas_config::Quantity;

/// Neighbour cell result carried in a measurement report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NeighborMeasurement {
    pub cell_id: CellId,
    /// Quantized RSRP (0..=97), if reported
    pub rsrp: Option<u8>,
    /// Quantized RSRQ (0..=34), if reported
    pub rsrq: Option<u8>,
}

impl NeighborMeasurement {
    pub fn new(cell_id: CellId, rsrp: Option<u8>, rsrq: Option<u8>) -> Self {
        Self {
            cell_id,
            rsrp,
            rsrq,
        }
    }

    /// Entry with both quantities present
    pub fn complete(cell_id: CellId, rsrp: u8, rsrq: u8) -> Self {
        Self::new(cell_id, Some(rsrp), Some(rsrq))
    }

    /// Both quantities, or which one is missing
    pub fn require_both(&self) -> Result<(u8, u8), ReportError> {
        let rsrp = self.rsrp.ok_or(ReportError::MeasurementIncomplete {
            cell_id: self.cell_id,
            quantity: Quantity::Rsrp,
        })?;
        let rsrq = self.rsrq.ok_or(ReportError::MeasurementIncomplete {
            cell_id: self.cell_id,
            quantity: Quantity::Rsrq,
        })?;
        Ok((rsrp, rsrq))
    }
}

/// Measurement report as delivered by the host.
///
/// Transient: the engine copies what it needs into its neighbour cache and
/// drops the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasurementReport {
    /// Simulated delivery time
    pub time: SimTime,
    pub serving_rsrp: u8,
    pub serving_rsrq: u8,
    pub neighbors: Vec<NeighborMeasurement>,
}

impl MeasurementReport {
    pub fn new(time: SimTime, serving_rsrp: u8, serving_rsrq: u8) -> Self {
        Self {
            time,
            serving_rsrp,
            serving_rsrq,
            neighbors: Vec::new(),
        }
    }

    pub fn with_neighbor(mut self, neighbor: NeighborMeasurement) -> Self {
        self.neighbors.push(neighbor);
        self
    }
}

/// Outcome of evaluating one report for one UE
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub ue_id: UeId,
    /// `None` means "do not hand over"
    pub target_cell_id: Option<CellId>,
}

impl Decision {
    pub fn abstain(ue_id: UeId) -> Self {
        Self {
            ue_id,
            target_cell_id: None,
        }
    }

    pub fn handover(ue_id: UeId, target: CellId) -> Self {
        Self {
            ue_id,
            target_cell_id: Some(target),
        }
    }

    pub fn is_handover(&self) -> bool {
        self.target_cell_id.is_some()
    }
}

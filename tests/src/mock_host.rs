//! Recording host
//!
//! Implements the engine's SAP user side and records every call so tests
//! can assert on registrations and triggers in order.

use lteho_common::{CellId, UeId};
use lteho_engine::{EventKind, HandoverManagementSapUser, MeasId, MeasurementConfig};

/// One call received from the engine
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    MeasConfig { meas_id: MeasId, config: MeasurementConfig },
    Trigger { ue_id: UeId, target: CellId },
}

#[derive(Debug, Default)]
pub struct RecordingHost {
    events: Vec<HostEvent>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[HostEvent] {
        &self.events
    }

    /// Measurement identity registered for `kind`, if any
    pub fn meas_id(&self, kind: EventKind) -> Option<MeasId> {
        self.events.iter().find_map(|e| match e {
            HostEvent::MeasConfig { meas_id, config } if config.event_kind == kind => Some(*meas_id),
            _ => None,
        })
    }

    pub fn registrations(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, HostEvent::MeasConfig { .. }))
            .count()
    }

    /// Triggers in the order they were issued
    pub fn triggers(&self) -> Vec<(UeId, CellId)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                HostEvent::Trigger { ue_id, target } => Some((*ue_id, *target)),
                _ => None,
            })
            .collect()
    }

    pub fn triggers_for(&self, ue_id: UeId) -> Vec<CellId> {
        self.triggers()
            .into_iter()
            .filter(|(ue, _)| *ue == ue_id)
            .map(|(_, cell)| cell)
            .collect()
    }
}

impl HandoverManagementSapUser for RecordingHost {
    fn add_ue_meas_report_config(&mut self, meas_id: MeasId, config: &MeasurementConfig) {
        self.events.push(HostEvent::MeasConfig {
            meas_id,
            config: config.clone(),
        });
    }

    fn trigger_handover(&mut self, ue_id: UeId, target: CellId) {
        self.events.push(HostEvent::Trigger { ue_id, target });
    }
}

//! Service access point towards the host RRC entity

use lteho_common::{CellId, UeId};

use crate::meas_config::{MeasId, MeasurementConfig};

/// Calls the engine makes into its host.
///
/// The host owns the measurement subscription towards the radio layer and
/// the actual handover execution. It reports back through
/// `HandoverEngine::acknowledge` once a triggered handover completes or
/// fails.
pub trait HandoverManagementSapUser {
    /// A measurement event the engine wants reported, tagged `meas_id`
    fn add_ue_meas_report_config(&mut self, meas_id: MeasId, config: &MeasurementConfig);

    /// Start a handover of `ue_id` towards `target`
    fn trigger_handover(&mut self, ue_id: UeId, target: CellId);
}

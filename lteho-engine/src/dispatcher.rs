//! Handover Trigger Dispatcher
//!
//! Enforces at most one outstanding handover trigger per UE. A decision with
//! a target is forwarded to the host only when the UE has no trigger in
//! flight; the flag is cleared when the host acknowledges the outcome or
//! when the UE re-establishes its connection without one.

use tracing::{debug, info, warn};

use crate::cache::UeDecisionState;
use crate::report::Decision;
use crate::sap::HandoverManagementSapUser;

/// Result of offering a decision to the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerResult {
    /// Forwarded to the host
    Dispatched,
    /// A trigger is already outstanding for this UE
    Suppressed,
    /// The decision carried no target
    Abstained,
}

/// How a triggered handover ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandoverOutcome {
    /// Handover end OK
    Completed,
    /// Handover failure or radio link failure
    Failed,
}

/// Dispatcher counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub dispatched: u64,
    pub suppressed: u64,
    pub completed: u64,
    pub failed: u64,
    /// Triggers dropped by a connection re-establishment
    pub released: u64,
}

#[derive(Debug, Default)]
pub struct HandoverDispatcher {
    stats: DispatchStats,
}

impl HandoverDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// Forwards `decision` to `host` unless a trigger is already outstanding.
    pub fn dispatch<H: HandoverManagementSapUser>(
        &mut self,
        state: &mut UeDecisionState,
        decision: &Decision,
        host: &mut H,
    ) -> TriggerResult {
        let Some(target) = decision.target_cell_id else {
            return TriggerResult::Abstained;
        };

        if state.outstanding_trigger {
            debug!(
                "Suppressing handover of {} to {}: trigger to {:?} still outstanding",
                decision.ue_id, target, state.pending_target
            );
            self.stats.suppressed += 1;
            return TriggerResult::Suppressed;
        }

        state.outstanding_trigger = true;
        state.pending_target = Some(target);
        self.stats.dispatched += 1;
        info!("Triggering handover of {} to {}", decision.ue_id, target);
        host.trigger_handover(decision.ue_id, target);
        TriggerResult::Dispatched
    }

    /// Clears the outstanding trigger of a UE. Returns whether one was set.
    pub fn acknowledge(&mut self, state: &mut UeDecisionState, outcome: HandoverOutcome) -> bool {
        let was_outstanding = state.outstanding_trigger;
        state.outstanding_trigger = false;
        state.pending_target = None;

        if !was_outstanding {
            debug!("{}: {:?} acknowledged with no trigger outstanding", state.ue_id, outcome);
            return false;
        }
        match outcome {
            HandoverOutcome::Completed => self.stats.completed += 1,
            HandoverOutcome::Failed => {
                warn!("{}: handover failed", state.ue_id);
                self.stats.failed += 1;
            }
        }
        true
    }

    /// Drops the outstanding trigger of a UE whose connection was
    /// re-established before the outcome arrived. Returns whether one was set.
    pub fn release(&mut self, state: &mut UeDecisionState) -> bool {
        if !state.outstanding_trigger {
            return false;
        }
        debug!(
            "{}: releasing trigger to {:?} on re-establishment",
            state.ue_id, state.pending_target
        );
        state.outstanding_trigger = false;
        state.pending_target = None;
        self.stats.released += 1;
        true
    }
}

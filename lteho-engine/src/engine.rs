//! Handover engine
//!
//! Facade the host RRC entity talks to. One engine serves every UE of the
//! host; per-UE state is created lazily on the first report and lives until
//! [`HandoverEngine::remove_ue`].
//!
//! # Report Flow
//!
//! 1. Host calls [`HandoverEngine::on_measurement_report`]
//! 2. The strategy updates the neighbour cache and produces a [`Decision`]
//! 3. The dispatcher forwards a target to the host unless a trigger is
//!    already outstanding for the UE
//! 4. Host executes the handover and reports the outcome with
//!    [`HandoverEngine::notify_handover_outcome`]

use lteho_common::{CellId, SimTime, UeId};
use tracing::{debug, info, warn};

use crate::cache::NeighborCache;
use crate::config::{validate_engine_config, EngineConfig};
use crate::dispatcher::{DispatchStats, HandoverDispatcher, HandoverOutcome, TriggerResult};
use crate::error::ConfigError;
use crate::meas_config::{MeasId, MeasurementConfigurator};
use crate::report::{Decision, MeasurementReport};
use crate::sap::HandoverManagementSapUser;
use crate::strategy::HandoverStrategy;

pub struct HandoverEngine<H: HandoverManagementSapUser> {
    host: H,
    configurator: MeasurementConfigurator,
    cache: NeighborCache,
    strategy: HandoverStrategy,
    dispatcher: HandoverDispatcher,
}

impl<H: HandoverManagementSapUser> HandoverEngine<H> {
    /// Validates `config`, builds the strategy and registers its
    /// measurement events with `host`.
    ///
    /// Any configuration problem is fatal: no engine is returned and the
    /// host has received no event registrations.
    pub fn new(config: &EngineConfig, mut host: H) -> Result<Self, ConfigError> {
        validate_engine_config(config)?;
        let report_interval = config.report_interval()?;

        let mut strategy = HandoverStrategy::from_config(&config.algorithm)?;
        let mut configurator = MeasurementConfigurator::new();
        strategy.register_events(&mut configurator, report_interval)?;

        for (meas_id, event) in configurator.events() {
            host.add_ue_meas_report_config(meas_id, event);
        }
        info!(
            "Handover engine started: algorithm={}, {} measurement event(s)",
            strategy.name(),
            configurator.len()
        );

        Ok(Self {
            host,
            cache: NeighborCache::new(strategy.history_len()),
            configurator,
            strategy,
            dispatcher: HandoverDispatcher::new(),
        })
    }

    pub fn algorithm(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn configurator(&self) -> &MeasurementConfigurator {
        &self.configurator
    }

    pub fn cache(&self) -> &NeighborCache {
        &self.cache
    }

    pub fn stats(&self) -> DispatchStats {
        self.dispatcher.stats()
    }

    /// Evaluates one report without dispatching.
    ///
    /// Report problems (unknown measId, missing neighbour results) are
    /// logged and yield an abstaining decision.
    pub fn on_report(&mut self, ue_id: UeId, meas_id: MeasId, report: &MeasurementReport) -> Decision {
        debug!(
            "{}: report measId={} serving rsrp={} rsrq={} neighbours={}",
            ue_id,
            meas_id,
            report.serving_rsrp,
            report.serving_rsrq,
            report.neighbors.len()
        );
        match self.strategy.on_report(ue_id, meas_id, report, &mut self.cache) {
            Ok(decision) => decision,
            Err(e) => {
                warn!("{}: {}", ue_id, e);
                Decision::abstain(ue_id)
            }
        }
    }

    /// Offers a decision to the dispatcher
    pub fn dispatch(&mut self, decision: &Decision) -> TriggerResult {
        if !decision.is_handover() {
            return TriggerResult::Abstained;
        }
        let state = self.cache.state_mut(decision.ue_id);
        self.dispatcher.dispatch(state, decision, &mut self.host)
    }

    /// Host entry point: evaluate the report and trigger if warranted
    pub fn on_measurement_report(
        &mut self,
        ue_id: UeId,
        meas_id: MeasId,
        report: &MeasurementReport,
    ) -> TriggerResult {
        let decision = self.on_report(ue_id, meas_id, report);
        self.dispatch(&decision)
    }

    /// Clears the outstanding trigger of `ue_id`. Unknown UEs are ignored.
    pub fn acknowledge(&mut self, ue_id: UeId, outcome: HandoverOutcome) -> bool {
        let Some(state) = self.cache.get_mut(ue_id) else {
            debug!("{}: {:?} for unknown UE ignored", ue_id, outcome);
            return false;
        };
        self.dispatcher.acknowledge(state, outcome)
    }

    /// The UE is connected to `cell_id` (initial attach or re-establishment).
    ///
    /// A trigger still outstanding from before the re-establishment is
    /// released so the next report can dispatch again.
    pub fn notify_connection_established(&mut self, ue_id: UeId, cell_id: CellId, time: SimTime) {
        debug!("{}: connection established on {} at {}", ue_id, cell_id, time);
        let state = self.cache.state_mut(ue_id);
        self.dispatcher.release(state);
        state.set_serving_cell(cell_id, time);
    }

    /// Outcome of the handover triggered for `ue_id`, observed at `time`.
    ///
    /// On completion the pending target becomes the serving cell.
    pub fn notify_handover_outcome(&mut self, ue_id: UeId, outcome: HandoverOutcome, time: SimTime) {
        let Some(state) = self.cache.get_mut(ue_id) else {
            debug!("{}: {:?} for unknown UE ignored", ue_id, outcome);
            return;
        };
        let target = state.pending_target();
        if !self.dispatcher.acknowledge(state, outcome) {
            return;
        }
        if let (HandoverOutcome::Completed, Some(target)) = (outcome, target) {
            info!("{}: handover to {} completed", ue_id, target);
            state.set_serving_cell(target, time);
        }
    }

    /// Drops all state of a UE that left the host
    pub fn remove_ue(&mut self, ue_id: UeId) {
        if self.cache.remove_ue(ue_id).is_some() {
            debug!("{}: removed", ue_id);
        }
    }
}

//! LTE handover decision engine
//!
//! Decides, per UE, whether and to which neighbouring cell a handover should
//! be triggered, driven by the measurement reports the host's RRC layer
//! forwards to it.
//!
//! # Architecture
//!
//! ```text
//!                  ┌──────────────────────────────────────────────┐
//!  report ───────> │ HandoverEngine                               │
//!                  │   MeasurementConfigurator  (meas id -> event) │
//!                  │   NeighborCache            (per-UE state)    │
//!                  │   HandoverStrategy         (decision)        │
//!                  │   HandoverDispatcher       (at most one      │
//!                  │                             outstanding)     │
//!                  └────────────────────┬─────────────────────────┘
//!                                       │ trigger_handover(ue, cell)
//!                                       v
//!                              HandoverManagementSapUser (host)
//! ```
//!
//! # Strategies
//!
//! - `no-op` - never triggers
//! - `a3-rsrq` - best neighbour of an A3 report
//! - `a2-a4-rsrq` - A4 reports fill the cache, A2 reports compare the best
//!   cached neighbour against serving RSRQ plus an offset
//! - `type1-fuzzy` / `type2-fuzzy` - A2/A4 split with hierarchical fuzzy
//!   inference over predicted RSRQ
//!
//! # Reference
//! - 3GPP TS 36.331: E-UTRA RRC (measurement events A2, A3, A4)
//! - 3GPP TS 36.133: RSRP/RSRQ report mapping

pub mod cache;
pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod meas_config;
pub mod predictor;
pub mod report;
pub mod rule_base;
pub mod sap;
pub mod service;
pub mod strategy;
pub mod task;

pub use cache::{NeighborCache, NeighborRecord, UeDecisionState};
pub use config::{
    load_engine_config, load_engine_config_from_str, validate_engine_config, AlgorithmConfig,
    EngineConfig, FuzzyConfig, RuleBase,
};
pub use dispatcher::{DispatchStats, HandoverDispatcher, HandoverOutcome, TriggerResult};
pub use engine::HandoverEngine;
pub use error::{ConfigError, ReportError};
pub use evaluator::{FuzzyHandoverEvaluator, FuzzySystem};
pub use meas_config::{
    EventKind, Hysteresis, MeasId, MeasurementConfig, MeasurementConfigurator, Quantity,
    ReportInterval, TimeToTrigger,
};
pub use report::{Decision, MeasurementReport, NeighborMeasurement};
pub use sap::HandoverManagementSapUser;
pub use service::{FuzzyInferenceService, HandoverInference};
pub use strategy::HandoverStrategy;
pub use task::{
    spawn_inference_task, InferenceHandle, InferenceRequest, InferenceTask, Task, TaskError,
    TaskMessage,
};

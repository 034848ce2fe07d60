//! Common types and utilities for the lteho handover engine
//!
//! This crate provides the identifiers, simulated time, error type and
//! logging bootstrap shared by the fuzzy inference core and the engine.

pub mod error;
pub mod logging;
pub mod sim_time;
pub mod types;

pub use error::Error;
pub use logging::{init_logging, init_logging_with_filter, init_test_logging, LogLevel};
pub use sim_time::SimTime;
pub use types::{CellId, Rnti, UeId};

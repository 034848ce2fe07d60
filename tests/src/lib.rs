//! Integration test framework for the lteho handover engine
//!
//! # Components
//!
//! - [`mock_host`] - Recording host standing in for the RRC entity
//! - [`test_fixtures`] - Report builders and configuration snippets
//! - [`test_utils`] - Logging setup and shared result type
//!
//! # Test Categories
//!
//! 1. **A3 Tests** - Best-neighbour selection from a single report
//! 2. **A2/A4 Tests** - Cached discovery plus offset comparison, dispatcher debounce
//! 3. **Fuzzy Tests** - Type-1 and Type-2 hierarchical inference, abstention boundary
//! 4. **Configuration Tests** - YAML loading and fatal validation
//! 5. **Inference Task Tests** - Async request/reply over the task channel

pub mod mock_host;
pub mod test_fixtures;
pub mod test_utils;

pub use mock_host::{HostEvent, RecordingHost};
pub use test_fixtures::{discovery_report, serving_report, TestUe};
pub use test_utils::{init_test_logging, TestResult};

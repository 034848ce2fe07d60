//! Test utility functions for integration tests

use lteho_common::LogLevel;

/// Result type for integration tests
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Initialize logging for tests
///
/// Uses RUST_LOG environment variable if set, otherwise the engine crates
/// log at info. Only the first call in a test binary installs anything.
pub fn init_test_logging() {
    let _ = lteho_common::init_test_logging(LogLevel::Info);
}

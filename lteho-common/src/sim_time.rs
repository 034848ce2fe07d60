//! Simulated time
//!
//! Measurement reports are stamped by the host with the simulated time at
//! which they were delivered. The engine never reads a wall clock; all age
//! computations (neighbour staleness) are differences of `SimTime` values.

use serde::{Deserialize, Serialize};
use std::ops::Add;
use std::time::Duration;

/// Point in simulated time, microsecond resolution, counted from simulation start
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct SimTime(u64);

impl SimTime {
    /// Simulation start
    pub const ZERO: SimTime = SimTime(0);

    /// Creates a time from microseconds since simulation start
    pub fn from_micros(us: u64) -> Self {
        Self(us)
    }

    /// Creates a time from milliseconds since simulation start
    pub fn from_millis(ms: u64) -> Self {
        Self(ms.saturating_mul(1_000))
    }

    /// Creates a time from (possibly fractional) seconds. Negative and
    /// non-finite inputs map to simulation start.
    pub fn from_secs_f64(secs: f64) -> Self {
        if !secs.is_finite() || secs <= 0.0 {
            return Self::ZERO;
        }
        Self((secs * 1_000_000.0).round() as u64)
    }

    /// Microseconds since simulation start
    pub fn as_micros(&self) -> u64 {
        self.0
    }

    /// Milliseconds since simulation start (truncated)
    pub fn as_millis(&self) -> u64 {
        self.0 / 1_000
    }

    /// Seconds since simulation start
    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    /// Time elapsed since `earlier`, zero if `earlier` is in the future
    pub fn saturating_since(&self, earlier: SimTime) -> Duration {
        Duration::from_micros(self.0.saturating_sub(earlier.0))
    }
}

impl Add<Duration> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: Duration) -> SimTime {
        let us = u64::try_from(rhs.as_micros()).unwrap_or(u64::MAX);
        SimTime(self.0.saturating_add(us))
    }
}

impl std::fmt::Display for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "+{:.6}s", self.as_secs_f64())
    }
}

impl From<Duration> for SimTime {
    fn from(d: Duration) -> Self {
        SimTime::ZERO + d
    }
}

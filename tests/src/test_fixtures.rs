//! Common test fixtures

use lteho_common::{CellId, SimTime, UeId};
use lteho_engine::{MeasurementReport, NeighborMeasurement};

/// Serving RSRP used when a test only cares about RSRQ
pub const SERVING_RSRP: u8 = 40;

/// Neighbour RSRP used when a test only cares about RSRQ
pub const NEIGHBOUR_RSRP: u8 = 50;

/// A UE with its reporting clock
#[derive(Debug, Clone, Copy)]
pub struct TestUe {
    pub ue_id: UeId,
    pub serving_cell: CellId,
    pub period_ms: u64,
}

impl TestUe {
    pub fn new(ue_id: u64, serving_cell: u16) -> Self {
        Self {
            ue_id: UeId(ue_id),
            serving_cell: CellId(serving_cell),
            period_ms: 120,
        }
    }

    /// Time of the `n`-th report period
    pub fn at(&self, n: u64) -> SimTime {
        SimTime::from_millis(n * self.period_ms)
    }
}

/// Report with serving quality only
pub fn serving_report(time: SimTime, serving_rsrq: u8) -> MeasurementReport {
    MeasurementReport::new(time, SERVING_RSRP, serving_rsrq)
}

/// Report carrying complete `(cell, rsrq)` neighbour results
pub fn discovery_report(time: SimTime, serving_rsrq: u8, neighbours: &[(u16, u8)]) -> MeasurementReport {
    neighbours
        .iter()
        .fold(serving_report(time, serving_rsrq), |report, &(cell, rsrq)| {
            report.with_neighbor(NeighborMeasurement::complete(CellId(cell), NEIGHBOUR_RSRP, rsrq))
        })
}

pub const A3_YAML: &str = r#"
algorithm: a3-rsrq
hysteresis_db: 2.5
time_to_trigger_ms: 320
report_interval_ms: 240
"#;

pub const A2A4_YAML: &str = r#"
algorithm: a2-a4-rsrq
serving_cell_threshold: 25
neighbour_cell_offset: 2
"#;

pub const TYPE1_YAML: &str = r#"
algorithm: type1-fuzzy
abstention_threshold: 0.8
log_level: debug
"#;

pub const TYPE2_YAML: &str = r#"
algorithm: type2-fuzzy
abstention_threshold: 0.7
stale_window_ms: 500
"#;

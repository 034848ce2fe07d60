//! Neighbor Measurement Cache
//!
//! Per-UE table of the last known radio quality of every neighbour cell,
//! together with the rest of the per-UE decision state (outstanding trigger
//! flag, serving cell, RSRQ trend histories).
//!
//! Records are created on the first report mentioning a neighbour and
//! overwritten by every later one; there is at most one record per
//! (UE, cell). Nothing is evicted while the UE exists: per-UE state only
//! goes away through [`NeighborCache::remove_ue`].

use std::collections::{HashMap, VecDeque};

use lteho_common::{CellId, SimTime, UeId};
use tracing::trace;

/// Samples kept per trend history
pub const DEFAULT_HISTORY_LEN: usize = 6;

/// Bounded window of RSRQ samples, oldest first.
///
/// The ring is kept contiguous after every push so [`RsrqHistory::samples`]
/// can hand out a single slice.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RsrqHistory {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl RsrqHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, rsrq: u8) {
        if self.capacity == 0 {
            return;
        }
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(f64::from(rsrq));
        self.samples.make_contiguous();
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn samples(&self) -> &[f64] {
        self.samples.as_slices().0
    }

    pub fn last(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Last known quality of one neighbour as seen by one UE
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborRecord {
    pub cell_id: CellId,
    pub rsrp: u8,
    pub rsrq: u8,
    pub last_update: SimTime,
    pub(crate) history: RsrqHistory,
}

impl NeighborRecord {
    /// RSRQ trend window used by the fuzzy strategies
    pub fn history(&self) -> &RsrqHistory {
        &self.history
    }
}

/// Everything the engine keeps for one UE
#[derive(Debug, Clone)]
pub struct UeDecisionState {
    pub ue_id: UeId,
    pub(crate) neighbors: HashMap<CellId, NeighborRecord>,
    /// Written only by the dispatcher
    pub(crate) outstanding_trigger: bool,
    /// Target of the outstanding trigger
    pub(crate) pending_target: Option<CellId>,
    pub(crate) serving_cell: Option<CellId>,
    /// When the UE connected to `serving_cell`
    pub(crate) serving_since: Option<SimTime>,
    pub(crate) serving_history: RsrqHistory,
    history_len: usize,
}

impl UeDecisionState {
    fn new(ue_id: UeId, history_len: usize) -> Self {
        Self {
            ue_id,
            neighbors: HashMap::new(),
            outstanding_trigger: false,
            pending_target: None,
            serving_cell: None,
            serving_since: None,
            serving_history: RsrqHistory::new(history_len),
            history_len,
        }
    }

    pub fn outstanding_trigger(&self) -> bool {
        self.outstanding_trigger
    }

    pub fn pending_target(&self) -> Option<CellId> {
        self.pending_target
    }

    pub fn serving_cell(&self) -> Option<CellId> {
        self.serving_cell
    }

    pub fn serving_since(&self) -> Option<SimTime> {
        self.serving_since
    }

    pub fn serving_history(&self) -> &RsrqHistory {
        &self.serving_history
    }

    pub fn neighbor(&self, cell_id: CellId) -> Option<&NeighborRecord> {
        self.neighbors.get(&cell_id)
    }

    pub fn neighbor_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Upserts the record for `cell_id` and appends `rsrq` to its history
    pub fn update_neighbor(&mut self, cell_id: CellId, rsrp: u8, rsrq: u8, time: SimTime) {
        let history_len = self.history_len;
        let record = self.neighbors.entry(cell_id).or_insert_with(|| NeighborRecord {
            cell_id,
            rsrp,
            rsrq,
            last_update: time,
            history: RsrqHistory::new(history_len),
        });
        record.rsrp = rsrp;
        record.rsrq = rsrq;
        record.last_update = time;
        record.history.push(rsrq);
    }

    /// Highest-RSRQ record satisfying `predicate`, lowest cell id on ties
    pub fn best_neighbor<P>(&self, mut predicate: P) -> Option<&NeighborRecord>
    where
        P: FnMut(&NeighborRecord) -> bool,
    {
        self.neighbors
            .values()
            .filter(|r| predicate(r))
            .max_by(|a, b| a.rsrq.cmp(&b.rsrq).then(b.cell_id.cmp(&a.cell_id)))
    }

    /// All records, ordered by cell id
    pub fn snapshot(&self) -> Vec<&NeighborRecord> {
        let mut records: Vec<_> = self.neighbors.values().collect();
        records.sort_by_key(|r| r.cell_id);
        records
    }

    /// Forget the trend of one neighbour; the record itself stays
    pub fn reset_neighbor_history(&mut self, cell_id: CellId) {
        if let Some(record) = self.neighbors.get_mut(&cell_id) {
            record.history.clear();
        }
    }

    /// New serving cell: restart the serving trend and the trend the new
    /// serving cell had as a neighbour.
    pub fn set_serving_cell(&mut self, cell_id: CellId, since: SimTime) {
        self.serving_cell = Some(cell_id);
        self.serving_since = Some(since);
        self.serving_history.clear();
        self.reset_neighbor_history(cell_id);
    }
}

/// Per-UE state store owned by the engine
#[derive(Debug)]
pub struct NeighborCache {
    ues: HashMap<UeId, UeDecisionState>,
    history_len: usize,
}

impl Default for NeighborCache {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LEN)
    }
}

impl NeighborCache {
    pub fn new(history_len: usize) -> Self {
        Self {
            ues: HashMap::new(),
            history_len,
        }
    }

    pub fn update(&mut self, ue_id: UeId, cell_id: CellId, rsrp: u8, rsrq: u8, time: SimTime) {
        trace!("Neighbour update {} {}: rsrp={} rsrq={} at {}", ue_id, cell_id, rsrp, rsrq, time);
        self.state_mut(ue_id).update_neighbor(cell_id, rsrp, rsrq, time);
    }

    pub fn best_neighbor<P>(&self, ue_id: UeId, predicate: P) -> Option<&NeighborRecord>
    where
        P: FnMut(&NeighborRecord) -> bool,
    {
        self.ues.get(&ue_id)?.best_neighbor(predicate)
    }

    pub fn snapshot(&self, ue_id: UeId) -> Vec<&NeighborRecord> {
        self.ues
            .get(&ue_id)
            .map(UeDecisionState::snapshot)
            .unwrap_or_default()
    }

    pub fn state(&self, ue_id: UeId) -> Option<&UeDecisionState> {
        self.ues.get(&ue_id)
    }

    /// State of `ue_id`, created on first access
    pub fn state_mut(&mut self, ue_id: UeId) -> &mut UeDecisionState {
        let history_len = self.history_len;
        self.ues
            .entry(ue_id)
            .or_insert_with(|| UeDecisionState::new(ue_id, history_len))
    }

    /// State of `ue_id` if it exists; never creates one
    pub fn get_mut(&mut self, ue_id: UeId) -> Option<&mut UeDecisionState> {
        self.ues.get_mut(&ue_id)
    }

    pub fn remove_ue(&mut self, ue_id: UeId) -> Option<UeDecisionState> {
        self.ues.remove(&ue_id)
    }

    pub fn ue_count(&self) -> usize {
        self.ues.len()
    }
}

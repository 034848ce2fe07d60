//! Identifier types
//!
//! Thin newtypes so UE, cell and RNTI numbers cannot be swapped by accident.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable UE identity (IMSI-like), the key of all per-UE engine state
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UeId(pub u64);

/// Physical cell identity of a serving or neighbouring cell
///
/// Cell id 0 is reserved: the inference RPC contract uses it to mean
/// "no handover".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellId(pub u16);

/// Radio network temporary identifier, unique only within one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Rnti(pub u16);

impl CellId {
    /// Wire value meaning "abstain" in the inference RPC contract
    pub const NONE: CellId = CellId(0);

    /// Returns the raw cell id value
    pub fn value(&self) -> u16 {
        self.0
    }

    /// Returns true for the reserved "no cell" value
    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for UeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UE[{}]", self.0)
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cell {}", self.0)
    }
}

impl fmt::Display for Rnti {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rnti {}", self.0)
    }
}

impl From<u16> for CellId {
    fn from(v: u16) -> Self {
        CellId(v)
    }
}

impl From<u64> for UeId {
    fn from(v: u64) -> Self {
        UeId(v)
    }
}

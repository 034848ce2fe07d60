//! Fuzzy inference core
//!
//! Generic Mamdani-style inference used by the fuzzy handover strategies.
//!
//! # Pipeline
//!
//! ```text
//!  crisp inputs ──> fuzzify ──> evaluate_rules ──> defuzzify ──> crisp score
//!                  (per term)   (min AND,          (centroid)
//!                               max aggregate)
//! ```
//!
//! The interval Type-2 system replaces every membership function by a
//! (lower, upper) pair bounding a footprint of uncertainty. Rule evaluation
//! then yields an interval activation per consequent term, and an extra
//! type-reduction step (Karnik–Mendel) collapses the interval-valued output
//! into `[y_l, y_r]` before the final average.
//!
//! # Modules
//!
//! - `membership` - Membership function shapes and interval (Type-2) pairs
//! - `variable` - Domains and linguistic variables
//! - `rule` - Rule definitions and compilation against a set of variables
//! - `type1` - Type-1 Mamdani system
//! - `type2` - Interval Type-2 Mamdani system and Karnik–Mendel reduction

pub mod error;
pub mod membership;
pub mod rule;
pub mod type1;
pub mod type2;
pub mod variable;

pub use error::FuzzyError;
pub use membership::{IntervalMembership, MembershipFunction};
pub use rule::{Clause, FuzzyRule};
pub use type1::{Type1Definition, Type1System};
pub use type2::{karnik_mendel, IntervalActivation, Type2Definition, Type2System};
pub use variable::{Domain, Interval, IntervalTerm, IntervalVariable, LinguisticVariable, Term};

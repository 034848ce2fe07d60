//! Errors raised while building or evaluating fuzzy systems

use thiserror::Error;

/// Errors that can occur in the fuzzy inference core.
///
/// Everything except [`FuzzyError::InputCount`] and [`FuzzyError::EmptyOutput`]
/// is a construction-time error and means the rule base is malformed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FuzzyError {
    /// Domain bounds or resolution unusable
    #[error("Invalid domain for variable '{variable}': {reason}")]
    InvalidDomain { variable: String, reason: String },

    /// Membership function parameters out of range
    #[error("Invalid membership function for term '{term}': {reason}")]
    InvalidMembership { term: String, reason: String },

    /// Two terms of one variable, or two variables of one system, share a name
    #[error("Duplicate name '{0}'")]
    Duplicate(String),

    /// Variable without terms
    #[error("Variable '{0}' has no terms")]
    NoTerms(String),

    /// A rule references a variable that is not an input of the system
    #[error("Rule {rule}: unknown variable '{variable}'")]
    UnknownVariable { rule: usize, variable: String },

    /// A rule references a term its variable does not define
    #[error("Rule {rule}: variable '{variable}' has no term '{term}'")]
    UnknownTerm {
        rule: usize,
        variable: String,
        term: String,
    },

    /// A rule with no antecedent clauses
    #[error("Rule {0} has no antecedents")]
    EmptyAntecedent(usize),

    /// System without rules
    #[error("Rule base is empty")]
    EmptyRuleBase,

    /// Type-2 lower membership exceeds the upper membership somewhere in the domain
    #[error("Footprint of uncertainty inverted for term '{term}' at x={x}")]
    InvertedFootprint { term: String, x: f64 },

    /// Wrong number of crisp inputs supplied at evaluation time
    #[error("Expected {expected} inputs, got {actual}")]
    InputCount { expected: usize, actual: usize },

    /// No rule fired: the aggregated output has zero area
    #[error("Aggregated output of '{0}' has zero area")]
    EmptyOutput(String),
}

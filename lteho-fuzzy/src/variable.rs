//! Domains and linguistic variables

use serde::{Deserialize, Serialize};

use crate::error::FuzzyError;
use crate::membership::{IntervalMembership, MembershipFunction};

/// Universe of discourse of a variable, sampled at `points` evenly spaced
/// values (inclusive of both bounds) for defuzzification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
    pub points: usize,
}

impl Domain {
    pub fn new(min: f64, max: f64, points: usize) -> Self {
        Self { min, max, points }
    }

    /// Distance between two adjacent sample points
    pub fn step(&self) -> f64 {
        (self.max - self.min) / (self.points.saturating_sub(1).max(1)) as f64
    }

    /// Evenly spaced sample points from `min` to `max`
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        let step = self.step();
        (0..self.points).map(move |i| {
            if i + 1 == self.points {
                self.max
            } else {
                self.min + i as f64 * step
            }
        })
    }

    /// Clamps a crisp value into the domain
    pub fn clamp(&self, x: f64) -> f64 {
        if x.is_nan() {
            return self.min;
        }
        x.clamp(self.min, self.max)
    }

    fn validate(&self, variable: &str) -> Result<(), FuzzyError> {
        let invalid = |reason: &str| FuzzyError::InvalidDomain {
            variable: variable.to_string(),
            reason: reason.to_string(),
        };
        if !(self.min.is_finite() && self.max.is_finite()) {
            return Err(invalid("bounds must be finite"));
        }
        if self.min >= self.max {
            return Err(invalid("min must be below max"));
        }
        if self.points < 2 {
            return Err(invalid("at least two sample points required"));
        }
        Ok(())
    }
}

/// Named Type-1 term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub name: String,
    pub membership: MembershipFunction,
}

/// Type-1 linguistic variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinguisticVariable {
    pub name: String,
    pub domain: Domain,
    pub terms: Vec<Term>,
}

impl LinguisticVariable {
    pub fn new(name: impl Into<String>, domain: Domain) -> Self {
        Self {
            name: name.into(),
            domain,
            terms: Vec::new(),
        }
    }

    /// Builder-style term addition
    pub fn with_term(mut self, name: impl Into<String>, membership: MembershipFunction) -> Self {
        self.terms.push(Term {
            name: name.into(),
            membership,
        });
        self
    }

    pub fn term_index(&self, name: &str) -> Option<usize> {
        self.terms.iter().position(|t| t.name == name)
    }

    /// Membership degree of `value` in every term, in term order.
    /// `value` is clamped into the domain first.
    pub fn fuzzify(&self, value: f64) -> Vec<f64> {
        let x = self.domain.clamp(value);
        self.terms.iter().map(|t| t.membership.degree(x)).collect()
    }

    pub fn validate(&self) -> Result<(), FuzzyError> {
        self.domain.validate(&self.name)?;
        if self.terms.is_empty() {
            return Err(FuzzyError::NoTerms(self.name.clone()));
        }
        check_unique(self.terms.iter().map(|t| t.name.as_str()))?;
        for term in &self.terms {
            term.membership.validate(&term.name)?;
        }
        Ok(())
    }
}

/// Membership interval of a crisp value in a Type-2 term
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

/// Named Type-2 term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalTerm {
    pub name: String,
    pub membership: IntervalMembership,
}

/// Interval Type-2 linguistic variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalVariable {
    pub name: String,
    pub domain: Domain,
    pub terms: Vec<IntervalTerm>,
}

impl IntervalVariable {
    pub fn new(name: impl Into<String>, domain: Domain) -> Self {
        Self {
            name: name.into(),
            domain,
            terms: Vec::new(),
        }
    }

    pub fn with_term(mut self, name: impl Into<String>, membership: IntervalMembership) -> Self {
        self.terms.push(IntervalTerm {
            name: name.into(),
            membership,
        });
        self
    }

    pub fn term_index(&self, name: &str) -> Option<usize> {
        self.terms.iter().position(|t| t.name == name)
    }

    /// Lower/upper membership of `value` in every term, in term order
    pub fn fuzzify(&self, value: f64) -> Vec<Interval> {
        let x = self.domain.clamp(value);
        self.terms
            .iter()
            .map(|t| {
                let (lower, upper) = t.membership.degree(x);
                Interval { lower, upper }
            })
            .collect()
    }

    pub fn validate(&self) -> Result<(), FuzzyError> {
        self.domain.validate(&self.name)?;
        if self.terms.is_empty() {
            return Err(FuzzyError::NoTerms(self.name.clone()));
        }
        check_unique(self.terms.iter().map(|t| t.name.as_str()))?;
        for term in &self.terms {
            term.membership.validate(&term.name, self.domain.samples())?;
        }
        Ok(())
    }
}

/// Name/term lookup shared by both variable kinds, used by rule compilation.
pub trait TermLookup {
    fn variable_name(&self) -> &str;
    fn lookup_term(&self, term: &str) -> Option<usize>;
}

impl TermLookup for LinguisticVariable {
    fn variable_name(&self) -> &str {
        &self.name
    }

    fn lookup_term(&self, term: &str) -> Option<usize> {
        self.term_index(term)
    }
}

impl TermLookup for IntervalVariable {
    fn variable_name(&self) -> &str {
        &self.name
    }

    fn lookup_term(&self, term: &str) -> Option<usize> {
        self.term_index(term)
    }
}

pub(crate) fn check_unique<'a>(names: impl Iterator<Item = &'a str>) -> Result<(), FuzzyError> {
    let mut seen = std::collections::HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(FuzzyError::Duplicate(name.to_string()));
        }
    }
    Ok(())
}

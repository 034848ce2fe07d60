//! Interval Type-2 Mamdani inference system
//!
//! Every term carries a lower and an upper membership function. A rule fires
//! with an interval `[min of lower degrees, min of upper degrees]`; clipping
//! and max-aggregation are applied to both bounds independently, producing a
//! lower and an upper aggregated output set. Karnik–Mendel type reduction
//! turns that pair into the centroid interval `[y_l, y_r]`, and the crisp
//! score is its midpoint.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::FuzzyError;
use crate::rule::{compile_rules, CompiledRule, FuzzyRule};
use crate::variable::{check_unique, Interval, IntervalVariable};

/// Upper bound on Karnik–Mendel iterations; the procedure converges in at
/// most N steps for N sample points, this only guards against float ties.
const KM_MAX_ITERATIONS: usize = 1_000;

/// Serializable description of an interval Type-2 system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Type2Definition {
    pub inputs: Vec<IntervalVariable>,
    pub output: IntervalVariable,
    pub rules: Vec<FuzzyRule>,
}

impl Type2Definition {
    pub fn build(self) -> Result<Type2System, FuzzyError> {
        Type2System::new(self.inputs, self.output, self.rules)
    }
}

/// Lower and upper activation strength of every output term
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IntervalActivation {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Type2System {
    inputs: Vec<IntervalVariable>,
    output: IntervalVariable,
    rules: Vec<FuzzyRule>,
    compiled: Vec<CompiledRule>,
}

impl Type2System {
    pub fn new(
        inputs: Vec<IntervalVariable>,
        output: IntervalVariable,
        rules: Vec<FuzzyRule>,
    ) -> Result<Self, FuzzyError> {
        for var in &inputs {
            var.validate()?;
        }
        output.validate()?;
        check_unique(inputs.iter().map(|v| v.name.as_str()))?;
        let compiled = compile_rules(&inputs, &output, &rules)?;

        Ok(Self {
            inputs,
            output,
            rules,
            compiled,
        })
    }

    pub fn inputs(&self) -> &[IntervalVariable] {
        &self.inputs
    }

    pub fn output(&self) -> &IntervalVariable {
        &self.output
    }

    pub fn rules(&self) -> &[FuzzyRule] {
        &self.rules
    }

    pub fn fuzzify(&self, crisp: &[f64]) -> Result<Vec<Vec<Interval>>, FuzzyError> {
        if crisp.len() != self.inputs.len() {
            return Err(FuzzyError::InputCount {
                expected: self.inputs.len(),
                actual: crisp.len(),
            });
        }
        Ok(self
            .inputs
            .iter()
            .zip(crisp)
            .map(|(var, &x)| var.fuzzify(x))
            .collect())
    }

    pub fn evaluate_rules(&self, fuzzified: &[Vec<Interval>]) -> IntervalActivation {
        let terms = self.output.terms.len();
        let mut activation = IntervalActivation {
            lower: vec![0.0; terms],
            upper: vec![0.0; terms],
        };

        for rule in &self.compiled {
            let (lower, upper) = rule
                .antecedents
                .iter()
                .map(|&(var, term)| {
                    fuzzified
                        .get(var)
                        .and_then(|degrees| degrees.get(term))
                        .copied()
                        .unwrap_or_default()
                })
                .fold((1.0_f64, 1.0_f64), |(lo, hi), mu| {
                    (lo.min(mu.lower), hi.min(mu.upper))
                });

            let c = rule.consequent;
            activation.lower[c] = activation.lower[c].max(lower);
            activation.upper[c] = activation.upper[c].max(upper);
        }
        activation
    }

    /// Collapses the interval-valued output into the centroid interval `(y_l, y_r)`.
    pub fn type_reduce(
        &self,
        lower_activation: &[f64],
        upper_activation: &[f64],
    ) -> Result<(f64, f64), FuzzyError> {
        let mut xs = Vec::with_capacity(self.output.domain.points);
        let mut lower = Vec::with_capacity(self.output.domain.points);
        let mut upper = Vec::with_capacity(self.output.domain.points);

        for x in self.output.domain.samples() {
            let (mut lo, mut hi) = (0.0_f64, 0.0_f64);
            for (i, term) in self.output.terms.iter().enumerate() {
                let (l, u) = term.membership.degree(x);
                let la = lower_activation.get(i).copied().unwrap_or(0.0);
                let ua = upper_activation.get(i).copied().unwrap_or(0.0);
                lo = lo.max(la.min(l));
                hi = hi.max(ua.min(u));
            }
            xs.push(x);
            lower.push(lo);
            upper.push(hi.max(lo));
        }

        karnik_mendel(&xs, &lower, &upper)
            .ok_or_else(|| FuzzyError::EmptyOutput(self.output.name.clone()))
    }

    /// Midpoint of the type-reduced interval
    pub fn defuzzify(&self, activation: &IntervalActivation) -> Result<f64, FuzzyError> {
        let (yl, yr) = self.type_reduce(&activation.lower, &activation.upper)?;
        trace!(output = %self.output.name, yl, yr, "type-reduced interval");
        Ok((yl + yr) / 2.0)
    }

    pub fn evaluate(&self, crisp: &[f64]) -> Result<f64, FuzzyError> {
        let fuzzified = self.fuzzify(crisp)?;
        let activation = self.evaluate_rules(&fuzzified);
        self.defuzzify(&activation)
    }
}

/// Karnik–Mendel centroid of an interval Type-2 set sampled at ascending
/// points `xs` with lower/upper memberships.
///
/// Returns `None` when the set has no area.
pub fn karnik_mendel(xs: &[f64], lower: &[f64], upper: &[f64]) -> Option<(f64, f64)> {
    if xs.is_empty() || xs.len() != lower.len() || xs.len() != upper.len() {
        return None;
    }
    let yl = km_endpoint(xs, lower, upper, true)?;
    let yr = km_endpoint(xs, lower, upper, false)?;
    Some((yl.min(yr), yl.max(yr)))
}

fn weighted_mean(xs: &[f64], weights: impl Iterator<Item = f64>) -> Option<f64> {
    let (num, den) = xs
        .iter()
        .zip(weights)
        .fold((0.0, 0.0), |(num, den), (&x, w)| (num + x * w, den + w));
    (den > f64::EPSILON).then(|| num / den)
}

fn km_endpoint(xs: &[f64], lower: &[f64], upper: &[f64], left: bool) -> Option<f64> {
    let mut y = weighted_mean(xs, lower.iter().zip(upper).map(|(l, u)| (l + u) / 2.0))?;

    for _ in 0..KM_MAX_ITERATIONS {
        // Switch point: last sample not beyond the current estimate
        let k = xs.iter().rposition(|&x| x <= y).unwrap_or(0);

        // Left endpoint weights the low side by the upper MF, right endpoint the high side.
        let weights = (0..xs.len()).map(|i| match (left, i <= k) {
            (true, true) | (false, false) => upper[i],
            (true, false) | (false, true) => lower[i],
        });
        let next = weighted_mean(xs, weights)?;

        if (next - y).abs() <= 1e-12 {
            return Some(next);
        }
        y = next;
    }
    Some(y)
}

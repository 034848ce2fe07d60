//! Type-1 Mamdani inference system

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::FuzzyError;
use crate::rule::{compile_rules, CompiledRule, FuzzyRule};
use crate::variable::{check_unique, LinguisticVariable};

/// Serializable description of a Type-1 system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Type1Definition {
    pub inputs: Vec<LinguisticVariable>,
    pub output: LinguisticVariable,
    pub rules: Vec<FuzzyRule>,
}

impl Type1Definition {
    pub fn build(self) -> Result<Type1System, FuzzyError> {
        Type1System::new(self.inputs, self.output, self.rules)
    }
}

/// Validated Type-1 Mamdani system: min for AND, max for aggregation,
/// min implication and centroid defuzzification over the sampled output domain.
#[derive(Debug, Clone)]
pub struct Type1System {
    inputs: Vec<LinguisticVariable>,
    output: LinguisticVariable,
    rules: Vec<FuzzyRule>,
    compiled: Vec<CompiledRule>,
}

impl Type1System {
    /// Validates every variable and compiles the rule base.
    pub fn new(
        inputs: Vec<LinguisticVariable>,
        output: LinguisticVariable,
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

    pub fn inputs(&self) -> &[LinguisticVariable] {
        &self.inputs
    }

    pub fn output(&self) -> &LinguisticVariable {
        &self.output
    }

    pub fn rules(&self) -> &[FuzzyRule] {
        &self.rules
    }

    /// Fuzzifies one crisp value per input variable, in input order.
    pub fn fuzzify(&self, crisp: &[f64]) -> Result<Vec<Vec<f64>>, FuzzyError> {
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

    /// Activation strength of every output term.
    ///
    /// A rule fires with the minimum of its antecedent degrees; rules sharing
    /// a consequent are combined with maximum.
    pub fn evaluate_rules(&self, fuzzified: &[Vec<f64>]) -> Vec<f64> {
        let mut activation = vec![0.0_f64; self.output.terms.len()];
        for rule in &self.compiled {
            let firing = rule
                .antecedents
                .iter()
                .map(|&(var, term)| {
                    fuzzified
                        .get(var)
                        .and_then(|degrees| degrees.get(term))
                        .copied()
                        .unwrap_or(0.0)
                })
                .fold(1.0_f64, f64::min);
            let slot = &mut activation[rule.consequent];
            *slot = f64::max(*slot, firing);
        }
        activation
    }

    /// Aggregated output membership at every domain sample
    pub fn aggregate(&self, activation: &[f64]) -> Vec<(f64, f64)> {
        self.output
            .domain
            .samples()
            .map(|x| {
                let mu = self
                    .output
                    .terms
                    .iter()
                    .zip(activation)
                    .map(|(term, &a)| a.min(term.membership.degree(x)))
                    .fold(0.0_f64, f64::max);
                (x, mu)
            })
            .collect()
    }

    /// Centroid of the clipped, max-aggregated output sets.
    pub fn defuzzify(&self, activation: &[f64]) -> Result<f64, FuzzyError> {
        let (num, den) = self
            .aggregate(activation)
            .into_iter()
            .fold((0.0, 0.0), |(num, den), (x, mu)| (num + x * mu, den + mu));

        if den <= f64::EPSILON {
            return Err(FuzzyError::EmptyOutput(self.output.name.clone()));
        }
        let crisp = num / den;
        trace!(output = %self.output.name, crisp, "centroid");
        Ok(crisp)
    }

    /// fuzzify → evaluate_rules → defuzzify
    pub fn evaluate(&self, crisp: &[f64]) -> Result<f64, FuzzyError> {
        let fuzzified = self.fuzzify(crisp)?;
        let activation = self.evaluate_rules(&fuzzified);
        self.defuzzify(&activation)
    }
}

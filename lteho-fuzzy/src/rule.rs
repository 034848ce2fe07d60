//! Fuzzy rules
//!
//! Rules are written against variable and term *names* (so they can live in
//! configuration files) and compiled to index form when a system is built.

use serde::{Deserialize, Serialize};

use crate::error::FuzzyError;
use crate::variable::TermLookup;

/// One antecedent clause: `variable IS term`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    pub variable: String,
    pub term: String,
}

/// `IF clause AND clause ... THEN output IS consequent`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuzzyRule {
    pub antecedents: Vec<Clause>,
    pub consequent: String,
}

impl FuzzyRule {
    /// Builds a rule from `(variable, term)` pairs and a consequent term
    ///
    /// ```
    /// use lteho_fuzzy::FuzzyRule;
    ///
    /// let rule = FuzzyRule::new(&[("RSRQ", "GOOD"), ("deltaRSRQ", "INC")], "HIGH");
    /// assert_eq!(rule.antecedents.len(), 2);
    /// ```
    pub fn new(antecedents: &[(&str, &str)], consequent: &str) -> Self {
        Self {
            antecedents: antecedents
                .iter()
                .map(|(variable, term)| Clause {
                    variable: variable.to_string(),
                    term: term.to_string(),
                })
                .collect(),
            consequent: consequent.to_string(),
        }
    }
}

/// Rule in index form: `(input index, term index)` pairs and the output term index
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompiledRule {
    pub antecedents: Vec<(usize, usize)>,
    pub consequent: usize,
}

/// Resolves every name in `rules` against `inputs` and `output`.
pub(crate) fn compile_rules<I, O>(
    inputs: &[I],
    output: &O,
    rules: &[FuzzyRule],
) -> Result<Vec<CompiledRule>, FuzzyError>
where
    I: TermLookup,
    O: TermLookup,
{
    if rules.is_empty() {
        return Err(FuzzyError::EmptyRuleBase);
    }

    rules
        .iter()
        .enumerate()
        .map(|(index, rule)| {
            if rule.antecedents.is_empty() {
                return Err(FuzzyError::EmptyAntecedent(index));
            }

            let antecedents = rule
                .antecedents
                .iter()
                .map(|clause| {
                    let var = inputs
                        .iter()
                        .position(|v| v.variable_name() == clause.variable)
                        .ok_or_else(|| FuzzyError::UnknownVariable {
                            rule: index,
                            variable: clause.variable.clone(),
                        })?;
                    let term = inputs[var].lookup_term(&clause.term).ok_or_else(|| {
                        FuzzyError::UnknownTerm {
                            rule: index,
                            variable: clause.variable.clone(),
                            term: clause.term.clone(),
                        }
                    })?;
                    Ok((var, term))
                })
                .collect::<Result<Vec<_>, FuzzyError>>()?;

            let consequent =
                output
                    .lookup_term(&rule.consequent)
                    .ok_or_else(|| FuzzyError::UnknownTerm {
                        rule: index,
                        variable: output.variable_name().to_string(),
                        term: rule.consequent.clone(),
                    })?;

            Ok(CompiledRule {
                antecedents,
                consequent,
            })
        })
        .collect()
}

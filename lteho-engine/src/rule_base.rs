//! Built-in rule bases of the hierarchical fuzzy handover evaluator
//!
//! Three systems are chained per neighbour:
//!
//! ```text
//!  serving (RSRQ, dRSRQ) ──> serving RLQ ──┐
//!                                          ├──> hT (handover trigger)
//!  neighbour (RSRQ, dRSRQ) ──> neighbour RLQ ┘
//! ```
//!
//! RLQ is the radio link quality in [0, 1]; hT is the desirability of
//! handing over to that neighbour, also in [0, 1]. The Type-2 sets use the
//! same centres and widths as the Type-1 sets with an uncertain sigma.

use lteho_fuzzy::{
    Domain, FuzzyRule, IntervalMembership, IntervalVariable, LinguisticVariable,
    MembershipFunction, Type1Definition, Type2Definition,
};
use serde::{Deserialize, Serialize};

pub const RSRQ: &str = "RSRQ";
pub const DELTA_RSRQ: &str = "deltaRSRQ";
pub const RLQ: &str = "RLQ";
pub const SERVING_RLQ: &str = "sRLQ";
pub const NEIGHBOUR_RLQ: &str = "nRLQ";
pub const HANDOVER_TRIGGER: &str = "hT";

/// The three systems of the hierarchy, with one definition type per fuzzy
/// variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleBase<D> {
    pub serving_rlq: D,
    pub neighbour_rlq: D,
    pub trigger: D,
}

/// Shape parameters of one linguistic term
#[derive(Debug, Clone, Copy)]
enum Shape {
    Low,
    Bell,
    High,
}

/// (name, shape, mean, sigma, type-2 sigma spread)
type TermSpec = (&'static str, Shape, f64, f64, f64);

struct VariableSpec {
    name: &'static str,
    domain: Domain,
    terms: &'static [TermSpec],
}

fn rsrq_domain() -> Domain {
    Domain::new(0.0, 34.0, 35)
}

fn delta_domain() -> Domain {
    Domain::new(-4.0, 4.0, 9)
}

fn unit_domain() -> Domain {
    Domain::new(0.0, 1.0, 101)
}

const SERVING_RSRQ_TERMS: &[TermSpec] = &[
    ("POOR", Shape::Low, 20.0, 1.5, 0.5),
    ("FAIR", Shape::Bell, 23.0, 1.5, 0.5),
    ("GOOD", Shape::Bell, 27.0, 1.5, 0.5),
    ("EXCELLENT", Shape::High, 31.0, 1.5, 0.5),
];

const NEIGHBOUR_RSRQ_TERMS: &[TermSpec] = &[
    ("POOR", Shape::Low, 17.0, 1.0, 0.5),
    ("FAIR", Shape::Bell, 20.0, 1.0, 0.5),
    ("GOOD", Shape::Bell, 23.0, 1.0, 0.5),
    ("EXCELLENT", Shape::High, 26.0, 1.0, 0.5),
];

const SERVING_DELTA_TERMS: &[TermSpec] = &[
    ("DEC", Shape::Low, -4.0, 2.0, 0.25),
    ("INC", Shape::High, 4.0, 1.5, 0.25),
];

const NEIGHBOUR_DELTA_TERMS: &[TermSpec] = &[
    ("DEC", Shape::Low, -4.0, 2.0, 0.25),
    ("INC", Shape::High, 4.0, 2.0, 0.25),
];

const RLQ_TERMS: &[TermSpec] = &[
    ("LOW", Shape::Low, 0.0, 0.2, 0.1),
    ("AVERAGE", Shape::Bell, 0.5, 0.1, 0.04),
    ("HIGH", Shape::High, 1.0, 0.2, 0.1),
];

const TRIGGER_TERMS: &[TermSpec] = &[
    ("NO", Shape::Low, 0.0, 0.2, 0.1),
    ("MIDDLE", Shape::Bell, 0.5, 0.1, 0.04),
    ("YES", Shape::High, 1.0, 0.2, 0.1),
];

/// (RSRQ term, trend term) -> RLQ term
const RLQ_RULES: &[(&str, &str, &str)] = &[
    ("POOR", "DEC", "LOW"),
    ("POOR", "INC", "LOW"),
    ("FAIR", "DEC", "LOW"),
    ("FAIR", "INC", "AVERAGE"),
    ("GOOD", "DEC", "AVERAGE"),
    ("GOOD", "INC", "HIGH"),
    ("EXCELLENT", "DEC", "HIGH"),
    ("EXCELLENT", "INC", "HIGH"),
];

/// (neighbour RLQ, serving RLQ) -> hT
const TRIGGER_RULES: &[(&str, &str, &str)] = &[
    ("LOW", "LOW", "MIDDLE"),
    ("LOW", "AVERAGE", "NO"),
    ("LOW", "HIGH", "NO"),
    ("AVERAGE", "LOW", "YES"),
    ("AVERAGE", "AVERAGE", "MIDDLE"),
    ("AVERAGE", "HIGH", "NO"),
    ("HIGH", "LOW", "YES"),
    ("HIGH", "AVERAGE", "MIDDLE"),
    ("HIGH", "HIGH", "NO"),
];

fn type1_membership(shape: Shape, mean: f64, sigma: f64) -> MembershipFunction {
    match shape {
        Shape::Low => MembershipFunction::low_shoulder(mean, sigma),
        Shape::Bell => MembershipFunction::gaussian(mean, sigma),
        Shape::High => MembershipFunction::high_shoulder(mean, sigma),
    }
}

fn type2_membership(shape: Shape, mean: f64, sigma: f64, spread: f64) -> IntervalMembership {
    match shape {
        Shape::Low => IntervalMembership::low_shoulder_uncertain_sigma(mean, sigma, spread, 1.0),
        Shape::Bell => IntervalMembership::gaussian_uncertain_sigma(mean, sigma, spread, 1.0),
        Shape::High => IntervalMembership::high_shoulder_uncertain_sigma(mean, sigma, spread, 1.0),
    }
}

fn type1_variable(spec: VariableSpec) -> LinguisticVariable {
    spec.terms.iter().fold(
        LinguisticVariable::new(spec.name, spec.domain),
        |var, &(term, shape, mean, sigma, _)| var.with_term(term, type1_membership(shape, mean, sigma)),
    )
}

fn type2_variable(spec: VariableSpec) -> IntervalVariable {
    spec.terms.iter().fold(
        IntervalVariable::new(spec.name, spec.domain),
        |var, &(term, shape, mean, sigma, spread)| {
            var.with_term(term, type2_membership(shape, mean, sigma, spread))
        },
    )
}

fn rlq_inputs(serving: bool) -> [VariableSpec; 2] {
    let (rsrq_terms, delta_terms) = if serving {
        (SERVING_RSRQ_TERMS, SERVING_DELTA_TERMS)
    } else {
        (NEIGHBOUR_RSRQ_TERMS, NEIGHBOUR_DELTA_TERMS)
    };
    [
        VariableSpec {
            name: RSRQ,
            domain: rsrq_domain(),
            terms: rsrq_terms,
        },
        VariableSpec {
            name: DELTA_RSRQ,
            domain: delta_domain(),
            terms: delta_terms,
        },
    ]
}

fn rlq_output() -> VariableSpec {
    VariableSpec {
        name: RLQ,
        domain: unit_domain(),
        terms: RLQ_TERMS,
    }
}

fn trigger_inputs() -> [VariableSpec; 2] {
    [
        VariableSpec {
            name: SERVING_RLQ,
            domain: unit_domain(),
            terms: RLQ_TERMS,
        },
        VariableSpec {
            name: NEIGHBOUR_RLQ,
            domain: unit_domain(),
            terms: RLQ_TERMS,
        },
    ]
}

fn trigger_output() -> VariableSpec {
    VariableSpec {
        name: HANDOVER_TRIGGER,
        domain: unit_domain(),
        terms: TRIGGER_TERMS,
    }
}

fn rlq_rules() -> Vec<FuzzyRule> {
    RLQ_RULES
        .iter()
        .map(|&(rsrq, delta, rlq)| FuzzyRule::new(&[(RSRQ, rsrq), (DELTA_RSRQ, delta)], rlq))
        .collect()
}

fn trigger_rules() -> Vec<FuzzyRule> {
    TRIGGER_RULES
        .iter()
        .map(|&(n, s, ht)| FuzzyRule::new(&[(NEIGHBOUR_RLQ, n), (SERVING_RLQ, s)], ht))
        .collect()
}

fn type1_system(inputs: [VariableSpec; 2], output: VariableSpec, rules: Vec<FuzzyRule>) -> Type1Definition {
    Type1Definition {
        inputs: inputs.into_iter().map(type1_variable).collect(),
        output: type1_variable(output),
        rules,
    }
}

fn type2_system(inputs: [VariableSpec; 2], output: VariableSpec, rules: Vec<FuzzyRule>) -> Type2Definition {
    Type2Definition {
        inputs: inputs.into_iter().map(type2_variable).collect(),
        output: type2_variable(output),
        rules,
    }
}

/// Default Type-1 hierarchy
pub fn default_type1() -> RuleBase<Type1Definition> {
    RuleBase {
        serving_rlq: type1_system(rlq_inputs(true), rlq_output(), rlq_rules()),
        neighbour_rlq: type1_system(rlq_inputs(false), rlq_output(), rlq_rules()),
        trigger: type1_system(trigger_inputs(), trigger_output(), trigger_rules()),
    }
}

/// Default interval Type-2 hierarchy
pub fn default_type2() -> RuleBase<Type2Definition> {
    RuleBase {
        serving_rlq: type2_system(rlq_inputs(true), rlq_output(), rlq_rules()),
        neighbour_rlq: type2_system(rlq_inputs(false), rlq_output(), rlq_rules()),
        trigger: type2_system(trigger_inputs(), trigger_output(), trigger_rules()),
    }
}

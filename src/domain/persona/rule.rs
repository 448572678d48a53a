//! Persona rule trees.
//!
//! Criteria are tagged-variant data evaluated by a generic interpreter,
//! never executable strings. Evaluation records every signal consulted,
//! so unmatched branches leave evidence too.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::signals::{signal_type, BehavioralSummary, SignalType, SignalValue};

/// Comparison operator for rule leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Gt,
    Gte,
    Lt,
    Lte,
    Eq,
}

impl CompareOp {
    fn compare(&self, value: f64, threshold: f64) -> bool {
        match self {
            CompareOp::Gt => value > threshold,
            CompareOp::Gte => value >= threshold,
            CompareOp::Lt => value < threshold,
            CompareOp::Lte => value <= threshold,
            CompareOp::Eq => (value - threshold).abs() < f64::EPSILON,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Eq => "==",
        };
        write!(f, "{}", s)
    }
}

/// Leaf comparison threshold: boolean for flag signals, numeric
/// otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Threshold {
    Flag(bool),
    Number(f64),
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::Flag(v) => write!(f, "{}", v),
            Threshold::Number(v) => write!(f, "{}", v),
        }
    }
}

/// Structural problems in a rule tree, fatal at registry load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("references unknown signal '{0}'")]
    UnknownSignal(String),

    #[error("signal '{0}' is numeric but the threshold is a flag")]
    NumberThresholdExpected(String),

    #[error("signal '{0}' is a flag but the threshold is numeric")]
    FlagThresholdExpected(String),

    #[error("flag signal '{0}' only supports the eq operator")]
    FlagOperator(String),

    #[error("empty '{0}' combinator")]
    EmptyCombinator(&'static str),
}

/// A boolean rule tree over behavioral signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rule {
    And {
        all: Vec<Rule>,
    },
    Or {
        any: Vec<Rule>,
    },
    Compare {
        signal: String,
        op: CompareOp,
        threshold: Threshold,
    },
}

/// Evidence accumulated while evaluating one persona's tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvaluationTrace {
    /// Every signal consulted, present or missing.
    pub evidence: BTreeMap<String, SignalValue>,
    /// Human-readable descriptions of satisfied leaves.
    pub matched_conditions: Vec<String>,
}

impl Rule {
    /// Evaluates the tree against a summary, recording evidence for
    /// every leaf touched.
    ///
    /// Evaluation never short-circuits: every branch runs to completion
    /// so the audit trail covers unmatched conditions too. A leaf that
    /// references a missing signal evaluates to `false`, which means an
    /// `And`-rooted tree over a missing signal can never match while an
    /// `Or`-rooted tree can still match through an unaffected branch.
    pub fn evaluate(&self, summary: &BehavioralSummary, trace: &mut EvaluationTrace) -> bool {
        match self {
            Rule::And { all } => {
                let results: Vec<bool> =
                    all.iter().map(|r| r.evaluate(summary, trace)).collect();
                results.iter().all(|satisfied| *satisfied)
            }
            Rule::Or { any } => {
                let results: Vec<bool> =
                    any.iter().map(|r| r.evaluate(summary, trace)).collect();
                results.iter().any(|satisfied| *satisfied)
            }
            Rule::Compare {
                signal,
                op,
                threshold,
            } => {
                let value = summary
                    .signal(signal)
                    .map(|s| s.value)
                    .unwrap_or(SignalValue::Missing);
                trace.evidence.insert(signal.clone(), value);

                let satisfied = match (value, threshold) {
                    (SignalValue::Number(v), Threshold::Number(t)) => op.compare(v, *t),
                    (SignalValue::Flag(v), Threshold::Flag(t)) => {
                        *op == CompareOp::Eq && v == *t
                    }
                    _ => false,
                };
                if satisfied {
                    trace.matched_conditions.push(format!(
                        "{} {} {} (actual {})",
                        signal, op, threshold, value
                    ));
                }
                satisfied
            }
        }
    }

    /// Validates leaf signal names, operator/threshold compatibility,
    /// and combinator shape.
    pub fn validate(&self) -> Result<(), RuleError> {
        match self {
            Rule::And { all } => {
                if all.is_empty() {
                    return Err(RuleError::EmptyCombinator("and"));
                }
                all.iter().try_for_each(Rule::validate)
            }
            Rule::Or { any } => {
                if any.is_empty() {
                    return Err(RuleError::EmptyCombinator("or"));
                }
                any.iter().try_for_each(Rule::validate)
            }
            Rule::Compare {
                signal,
                op,
                threshold,
            } => {
                let declared = signal_type(signal)
                    .ok_or_else(|| RuleError::UnknownSignal(signal.clone()))?;
                match (declared, threshold) {
                    (SignalType::Number, Threshold::Number(_)) => Ok(()),
                    (SignalType::Number, Threshold::Flag(_)) => {
                        Err(RuleError::NumberThresholdExpected(signal.clone()))
                    }
                    (SignalType::Flag, Threshold::Number(_)) => {
                        Err(RuleError::FlagThresholdExpected(signal.clone()))
                    }
                    (SignalType::Flag, Threshold::Flag(_)) => {
                        if *op == CompareOp::Eq {
                            Ok(())
                        } else {
                            Err(RuleError::FlagOperator(signal.clone()))
                        }
                    }
                }
            }
        }
    }
}

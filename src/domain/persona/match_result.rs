//! Per-persona match outcomes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::rule::EvaluationTrace;
use crate::domain::signals::SignalValue;

/// The outcome of evaluating one persona's rule tree, retained for
/// every persona whether or not it matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaMatch {
    pub persona_id: String,
    pub matched: bool,
    /// Every signal the rule tree consulted, including missing ones.
    pub evidence: BTreeMap<String, SignalValue>,
    /// Human-readable descriptions of the satisfied conditions.
    pub matched_conditions: Vec<String>,
}

impl PersonaMatch {
    pub fn from_trace(persona_id: &str, matched: bool, trace: EvaluationTrace) -> Self {
        Self {
            persona_id: persona_id.to_string(),
            matched,
            evidence: trace.evidence,
            matched_conditions: trace.matched_conditions,
        }
    }
}

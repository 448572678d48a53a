//! Persona prioritizer - deterministic selection among qualifiers.

use std::collections::BTreeMap;

use super::assignment::AssignedPersona;
use super::match_result::PersonaMatch;
use super::registry::PersonaRegistry;

/// The prioritizer's decision: what was assigned, who else qualified,
/// and a human-readable reason for the audit row.
#[derive(Debug, Clone, PartialEq)]
pub struct Prioritization {
    pub assigned: AssignedPersona,
    /// Qualifying persona ids ordered by priority rank then id.
    pub qualifying: Vec<String>,
    pub reason: String,
}

/// Selects one persona from the qualifying set by lowest priority rank.
///
/// Pure function of the match results and the registry ordering: the
/// same inputs always produce the same decision. Rank ties break by
/// persona id so catalogs with intentional ties stay deterministic.
pub struct PersonaPrioritizer;

impl PersonaPrioritizer {
    /// Picks the winner, or the explicit unclassified outcome.
    pub fn select(
        registry: &PersonaRegistry,
        matches: &BTreeMap<String, PersonaMatch>,
    ) -> Prioritization {
        // Registry order is already (rank, id), so the first qualifying
        // definition is the winner.
        let qualifying: Vec<&str> = registry
            .personas()
            .iter()
            .filter(|p| matches.get(&p.persona_id).is_some_and(|m| m.matched))
            .map(|p| p.persona_id.as_str())
            .collect();

        let total = registry.len();
        match qualifying.first() {
            None => Prioritization {
                assigned: AssignedPersona::Unclassified,
                qualifying: vec![],
                reason: format!("no qualifying persona among {} evaluated", total),
            },
            Some(winner) => {
                let winner_rank = registry
                    .get(winner)
                    .map(|p| p.priority_rank)
                    .unwrap_or_default();
                let tied = registry
                    .personas()
                    .iter()
                    .filter(|p| {
                        p.priority_rank == winner_rank
                            && qualifying.contains(&p.persona_id.as_str())
                    })
                    .count();
                let mut reason = format!(
                    "{} of {} personas qualified; '{}' selected with priority rank {}",
                    qualifying.len(),
                    total,
                    winner,
                    winner_rank
                );
                if tied > 1 {
                    reason.push_str("; rank tie broken by persona id order");
                }
                Prioritization {
                    assigned: AssignedPersona::Persona(winner.to_string()),
                    qualifying: qualifying.iter().map(|id| id.to_string()).collect(),
                    reason,
                }
            }
        }
    }
}

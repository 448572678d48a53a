//! Persona definitions.

use serde::{Deserialize, Serialize};

use super::rule::Rule;

/// One persona from the catalog: identity, priority, and the rule tree
/// that decides qualification.
///
/// Lower `priority_rank` wins when multiple personas qualify. Ties are
/// allowed in the catalog and broken deterministically by persona id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaDefinition {
    pub persona_id: String,
    pub name: String,
    pub priority_rank: u8,
    pub criteria: Rule,
    /// Educational topics surfaced to the user when this persona is
    /// assigned.
    #[serde(default)]
    pub educational_focus: Vec<String>,
}

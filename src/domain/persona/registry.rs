//! Persona registry - validated catalog of persona definitions.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::definition::PersonaDefinition;
use super::rule::RuleError;

/// Fatal problems with a persona catalog. The service refuses to start
/// on any of these rather than misclassify quietly.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("persona catalog is empty")]
    Empty,

    #[error("duplicate persona id '{0}'")]
    DuplicateId(String),

    #[error("persona '{persona_id}' has invalid priority rank {rank}; ranks start at 1")]
    InvalidRank { persona_id: String, rank: u8 },

    #[error("persona '{persona_id}' has an invalid rule tree: {source}")]
    InvalidRule {
        persona_id: String,
        #[source]
        source: RuleError,
    },

    #[error("failed to read persona catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse persona catalog: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Deserialize)]
struct PersonaCatalog {
    personas: Vec<PersonaDefinition>,
}

/// The validated set of persona definitions, ordered by priority rank
/// then persona id.
///
/// Loaded once at startup and shared immutably across requests.
#[derive(Debug, Clone)]
pub struct PersonaRegistry {
    personas: Vec<PersonaDefinition>,
}

impl PersonaRegistry {
    /// Validates and orders a set of definitions.
    ///
    /// Duplicate ranks are permitted (intentional ties, broken later by
    /// persona id); duplicate ids, rank zero, unknown signals, threshold
    /// type mismatches, and empty combinators are fatal.
    pub fn from_definitions(
        mut personas: Vec<PersonaDefinition>,
    ) -> Result<Self, RegistryError> {
        if personas.is_empty() {
            return Err(RegistryError::Empty);
        }

        let mut seen_ids: Vec<&str> = Vec::with_capacity(personas.len());
        for persona in &personas {
            if seen_ids.contains(&persona.persona_id.as_str()) {
                return Err(RegistryError::DuplicateId(persona.persona_id.clone()));
            }
            seen_ids.push(&persona.persona_id);

            if persona.priority_rank == 0 {
                return Err(RegistryError::InvalidRank {
                    persona_id: persona.persona_id.clone(),
                    rank: persona.priority_rank,
                });
            }

            persona
                .criteria
                .validate()
                .map_err(|source| RegistryError::InvalidRule {
                    persona_id: persona.persona_id.clone(),
                    source,
                })?;
        }

        personas.sort_by(|a, b| {
            a.priority_rank
                .cmp(&b.priority_rank)
                .then_with(|| a.persona_id.cmp(&b.persona_id))
        });

        Ok(Self { personas })
    }

    /// Parses and validates a YAML catalog document.
    pub fn from_yaml(yaml: &str) -> Result<Self, RegistryError> {
        let catalog: PersonaCatalog = serde_yaml::from_str(yaml)?;
        Self::from_definitions(catalog.personas)
    }

    /// Loads and validates a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Definitions in evaluation order: priority rank, then persona id.
    pub fn personas(&self) -> &[PersonaDefinition] {
        &self.personas
    }

    pub fn get(&self, persona_id: &str) -> Option<&PersonaDefinition> {
        self.personas.iter().find(|p| p.persona_id == persona_id)
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::persona::rule::{CompareOp, Rule, Threshold};

    fn definition(persona_id: &str, rank: u8) -> PersonaDefinition {
        PersonaDefinition {
            persona_id: persona_id.to_string(),
            name: persona_id.to_string(),
            priority_rank: rank,
            criteria: Rule::Compare {
                signal: "credit.max_utilization".to_string(),
                op: CompareOp::Gte,
                threshold: Threshold::Number(0.5),
            },
            educational_focus: vec![],
        }
    }

    #[test]
    fn orders_by_rank_then_id() {
        let registry = PersonaRegistry::from_definitions(vec![
            definition("zeta", 2),
            definition("alpha", 2),
            definition("omega", 1),
        ])
        .unwrap();
        let ids: Vec<_> = registry
            .personas()
            .iter()
            .map(|p| p.persona_id.as_str())
            .collect();
        assert_eq!(ids, vec!["omega", "alpha", "zeta"]);
    }

    #[test]
    fn rejects_empty_catalog() {
        assert!(matches!(
            PersonaRegistry::from_definitions(vec![]),
            Err(RegistryError::Empty)
        ));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = PersonaRegistry::from_definitions(vec![
            definition("high_utilization", 1),
            definition("high_utilization", 2),
        ]);
        assert!(matches!(result, Err(RegistryError::DuplicateId(id)) if id == "high_utilization"));
    }

    #[test]
    fn rejects_rank_zero() {
        let result = PersonaRegistry::from_definitions(vec![definition("alpha", 0)]);
        assert!(matches!(result, Err(RegistryError::InvalidRank { .. })));
    }

    #[test]
    fn permits_tied_ranks() {
        let registry = PersonaRegistry::from_definitions(vec![
            definition("alpha", 3),
            definition("beta", 3),
        ])
        .unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn rejects_unknown_signal_in_rules() {
        let mut bad = definition("alpha", 1);
        bad.criteria = Rule::Compare {
            signal: "credit.invented".to_string(),
            op: CompareOp::Gte,
            threshold: Threshold::Number(0.5),
        };
        let result = PersonaRegistry::from_definitions(vec![bad]);
        assert!(matches!(
            result,
            Err(RegistryError::InvalidRule { persona_id, .. }) if persona_id == "alpha"
        ));
    }

    #[test]
    fn loads_full_catalog_from_yaml() {
        let yaml = r#"
personas:
  - persona_id: high_utilization
    name: High Utilization
    priority_rank: 1
    criteria:
      kind: or
      any:
        - kind: compare
          signal: credit.max_utilization
          op: gte
          threshold: 0.5
        - kind: compare
          signal: credit.overdue
          op: eq
          threshold: true
  - persona_id: savings_builder
    name: Savings Builder
    priority_rank: 4
    criteria:
      kind: compare
      signal: savings.growth_rate
      op: gte
      threshold: 0.02
"#;
        let registry = PersonaRegistry::from_yaml(yaml).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.personas()[0].persona_id,
            "high_utilization"
        );
        assert!(registry.get("savings_builder").is_some());
        assert!(registry.get("missing_persona").is_none());
    }

    #[test]
    fn malformed_yaml_fails_to_parse() {
        let result = PersonaRegistry::from_yaml("personas: [not a definition]");
        assert!(matches!(result, Err(RegistryError::Parse(_))));
    }

    #[test]
    fn loads_catalog_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.yaml");
        std::fs::write(
            &path,
            r#"
personas:
  - persona_id: high_utilization
    name: High Utilization
    priority_rank: 1
    criteria:
      kind: compare
      signal: credit.max_utilization
      op: gte
      threshold: 0.5
"#,
        )
        .unwrap();

        let registry = PersonaRegistry::load(&path).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get("high_utilization").is_some());
    }

    #[test]
    fn missing_catalog_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = PersonaRegistry::load(dir.path().join("absent.yaml"));
        assert!(matches!(result, Err(RegistryError::Io(_))));
    }
}

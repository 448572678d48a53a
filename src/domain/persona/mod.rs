//! Persona module - Declarative definitions, matching, prioritization.

mod assignment;
mod definition;
mod match_result;
mod matcher;
mod prioritizer;
mod registry;
mod rule;

pub use assignment::{AssignedPersona, PersonaAssignment, UNCLASSIFIED};
pub use definition::PersonaDefinition;
pub use match_result::PersonaMatch;
pub use matcher::PersonaMatcher;
pub use prioritizer::{PersonaPrioritizer, Prioritization};
pub use registry::{PersonaRegistry, RegistryError};
pub use rule::{CompareOp, EvaluationTrace, Rule, RuleError, Threshold};

//! Persona assignments - the persisted, audited outcome.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::match_result::PersonaMatch;
use super::prioritizer::Prioritization;
use crate::domain::foundation::{AssignmentId, TimeWindow, Timestamp, UserId};

/// Sentinel id recorded when no persona qualifies.
pub const UNCLASSIFIED: &str = "unclassified";

/// The persona a run assigned, or the explicit unclassified outcome.
///
/// Unclassified is a first-class, persisted result, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssignedPersona {
    Persona(String),
    Unclassified,
}

impl AssignedPersona {
    pub fn persona_id(&self) -> Option<&str> {
        match self {
            AssignedPersona::Persona(id) => Some(id),
            AssignedPersona::Unclassified => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            AssignedPersona::Persona(id) => id,
            AssignedPersona::Unclassified => UNCLASSIFIED,
        }
    }
}

impl From<String> for AssignedPersona {
    fn from(value: String) -> Self {
        if value == UNCLASSIFIED {
            AssignedPersona::Unclassified
        } else {
            AssignedPersona::Persona(value)
        }
    }
}

impl From<AssignedPersona> for String {
    fn from(value: AssignedPersona) -> Self {
        value.as_str().to_string()
    }
}

/// One append-only assignment row: the selected persona plus the full
/// evidence for every evaluated persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaAssignment {
    pub assignment_id: AssignmentId,
    pub user_id: UserId,
    pub window: TimeWindow,
    pub assigned_persona: AssignedPersona,
    /// Qualifying persona ids in priority order.
    pub qualifying_personas: Vec<String>,
    /// Match outcome for every evaluated persona, matched or not.
    pub match_evidence: BTreeMap<String, PersonaMatch>,
    pub prioritization_reason: String,
    /// True when an operator forced the persona instead of the
    /// prioritizer selecting it.
    pub is_override: bool,
    pub assigned_at: Timestamp,
}

impl PersonaAssignment {
    /// Builds a new assignment row from a prioritization decision.
    pub fn from_decision(
        user_id: UserId,
        window: TimeWindow,
        decision: Prioritization,
        match_evidence: BTreeMap<String, PersonaMatch>,
    ) -> Self {
        Self {
            assignment_id: AssignmentId::new(),
            user_id,
            window,
            assigned_persona: decision.assigned,
            qualifying_personas: decision.qualifying,
            match_evidence,
            prioritization_reason: decision.reason,
            is_override: false,
            assigned_at: Timestamp::now(),
        }
    }

    /// A non-override assignment must only ever assign a persona that
    /// qualified; overrides are exempt by construction.
    pub fn is_sound(&self) -> bool {
        if self.is_override {
            return true;
        }
        match self.assigned_persona.persona_id() {
            Some(id) => self.qualifying_personas.iter().any(|q| q == id),
            None => self.qualifying_personas.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigned_persona_round_trips_through_strings() {
        let assigned = AssignedPersona::Persona("savings_builder".to_string());
        let json = serde_json::to_string(&assigned).unwrap();
        assert_eq!(json, r#""savings_builder""#);
        assert_eq!(serde_json::from_str::<AssignedPersona>(&json).unwrap(), assigned);

        let unclassified: AssignedPersona =
            serde_json::from_str(r#""unclassified""#).unwrap();
        assert_eq!(unclassified, AssignedPersona::Unclassified);
        assert_eq!(unclassified.persona_id(), None);
    }

    fn assignment(
        assigned: AssignedPersona,
        qualifying: Vec<String>,
        is_override: bool,
    ) -> PersonaAssignment {
        use crate::domain::foundation::{TimeWindow, WindowDays};
        use chrono::NaiveDate;

        PersonaAssignment {
            assignment_id: AssignmentId::new(),
            user_id: UserId::new("u1").unwrap(),
            window: TimeWindow::resolve(
                NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
                WindowDays::Thirty,
            ),
            assigned_persona: assigned,
            qualifying_personas: qualifying,
            match_evidence: BTreeMap::new(),
            prioritization_reason: String::new(),
            is_override,
            assigned_at: Timestamp::now(),
        }
    }

    #[test]
    fn sound_when_assigned_persona_qualified() {
        let row = assignment(
            AssignedPersona::Persona("savings_builder".to_string()),
            vec!["savings_builder".to_string()],
            false,
        );
        assert!(row.is_sound());
    }

    #[test]
    fn unsound_when_assigned_persona_did_not_qualify() {
        let row = assignment(
            AssignedPersona::Persona("savings_builder".to_string()),
            vec![],
            false,
        );
        assert!(!row.is_sound());
    }

    #[test]
    fn override_rows_are_exempt_from_soundness() {
        let row = assignment(
            AssignedPersona::Persona("savings_builder".to_string()),
            vec![],
            true,
        );
        assert!(row.is_sound());
    }

    #[test]
    fn unclassified_sound_only_with_empty_qualifying_set() {
        let row = assignment(AssignedPersona::Unclassified, vec![], false);
        assert!(row.is_sound());
        let row = assignment(
            AssignedPersona::Unclassified,
            vec!["savings_builder".to_string()],
            false,
        );
        assert!(!row.is_sound());
    }
}

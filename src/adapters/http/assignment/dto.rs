//! HTTP DTOs for assignment endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::persona::{PersonaAssignment, PersonaMatch};
use crate::domain::signals::{BehavioralSummary, SignalValue, KNOWN_SIGNALS};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to run one assignment.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignRequest {
    pub user_id: String,
    pub window_days: u32,
    pub reference_date: Option<NaiveDate>,
}

/// Request to run assignment for a set of users.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignBatchRequest {
    pub user_ids: Vec<String>,
    pub window_days: u32,
    pub reference_date: Option<NaiveDate>,
}

/// Request to force a persona for a user.
#[derive(Debug, Clone, Deserialize)]
pub struct OverrideRequest {
    pub user_id: String,
    pub window_days: u32,
    pub reference_date: Option<NaiveDate>,
    pub persona_id: String,
    pub reason: String,
}

/// Query parameters for assignment history reads.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignmentHistoryParams {
    pub user_id: String,
    pub window_days: Option<u32>,
}

/// Query parameters for summary reads.
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryParams {
    pub user_id: String,
    pub window_days: u32,
    pub reference_date: Option<NaiveDate>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// One assignment row for API consumers.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentResponse {
    pub assignment_id: String,
    pub user_id: String,
    pub window_days: u32,
    pub reference_date: NaiveDate,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub assigned_persona: String,
    pub qualifying_personas: Vec<String>,
    pub match_evidence: BTreeMap<String, PersonaMatch>,
    pub prioritization_reason: String,
    pub is_override: bool,
    pub assigned_at: String,
}

impl From<PersonaAssignment> for AssignmentResponse {
    fn from(assignment: PersonaAssignment) -> Self {
        Self {
            assignment_id: assignment.assignment_id.to_string(),
            user_id: assignment.user_id.to_string(),
            window_days: assignment.window.window_days.into(),
            reference_date: assignment.window.reference_date,
            window_start: assignment.window.start_date,
            window_end: assignment.window.end_date,
            assigned_persona: assignment.assigned_persona.as_str().to_string(),
            qualifying_personas: assignment.qualifying_personas,
            match_evidence: assignment.match_evidence,
            prioritization_reason: assignment.prioritization_reason,
            is_override: assignment.is_override,
            assigned_at: assignment.assigned_at.to_string(),
        }
    }
}

/// Batch outcome: successes and per-user failures side by side.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    pub assignments: Vec<AssignmentResponse>,
    pub failures: Vec<BatchFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub user_id: String,
    pub code: String,
    pub message: String,
}

/// A behavioral summary flattened to its named signals.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResponse {
    pub user_id: String,
    pub window_days: u32,
    pub reference_date: NaiveDate,
    pub complete: bool,
    pub signals: BTreeMap<String, SignalValue>,
}

impl From<BehavioralSummary> for SummaryResponse {
    fn from(summary: BehavioralSummary) -> Self {
        let signals = KNOWN_SIGNALS
            .iter()
            .filter_map(|(name, _)| {
                summary.signal(name).map(|s| (name.to_string(), s.value))
            })
            .collect();
        Self {
            user_id: summary.user_id.to_string(),
            window_days: summary.window.window_days.into(),
            reference_date: summary.window.reference_date,
            complete: summary.is_complete(),
            signals,
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
            details: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_request_deserializes() {
        let json = r#"{"user_id": "u1", "window_days": 30}"#;
        let req: AssignRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.user_id, "u1");
        assert_eq!(req.window_days, 30);
        assert!(req.reference_date.is_none());
    }

    #[test]
    fn override_request_deserializes() {
        let json = r#"{
            "user_id": "u1",
            "window_days": 180,
            "persona_id": "savings_builder",
            "reason": "support ticket 4821"
        }"#;
        let req: OverrideRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.persona_id, "savings_builder");
        assert_eq!(req.window_days, 180);
    }

    #[test]
    fn error_response_bad_request_creates_correctly() {
        let error = ErrorResponse::bad_request("Invalid input");
        assert_eq!(error.code, "BAD_REQUEST");
        assert_eq!(error.message, "Invalid input");
    }
}

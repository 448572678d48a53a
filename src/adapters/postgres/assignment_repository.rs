//! PostgreSQL adapter for AssignmentRepository

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{
    AssignmentId, DomainError, TimeWindow, Timestamp, UserId, WindowDays,
};
use crate::domain::persona::{AssignedPersona, PersonaAssignment};
use crate::ports::AssignmentRepository;

/// PostgreSQL implementation of AssignmentRepository.
///
/// Rows are inserted and read, never updated or deleted; the table is
/// the audit trail.
pub struct PgAssignmentRepository {
    pool: PgPool,
}

impl PgAssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Build an assignment from a database row.
    fn from_db_row(row: &sqlx::postgres::PgRow) -> Result<PersonaAssignment, DomainError> {
        let id: Uuid = row.get("id");
        let user_id: String = row.get("user_id");
        let window_days: i32 = row.get("window_days");
        let reference_date: chrono::NaiveDate = row.get("reference_date");
        let assigned_persona: String = row.get("assigned_persona");
        let prioritization_reason: String = row.get("prioritization_reason");
        let is_override: bool = row.get("is_override");
        let assigned_at: chrono::DateTime<chrono::Utc> = row.get("assigned_at");

        let qualifying_personas = serde_json::from_value(row.get("qualifying_personas"))
            .map_err(|e| {
                DomainError::database(format!("Failed to deserialize qualifying set: {}", e))
            })?;
        let match_evidence =
            serde_json::from_value(row.get("match_evidence")).map_err(|e| {
                DomainError::database(format!("Failed to deserialize match evidence: {}", e))
            })?;

        let user_id = UserId::new(user_id)
            .map_err(|e| DomainError::database(format!("Invalid user id in row: {}", e)))?;
        let window_days = WindowDays::try_from(window_days as u32)
            .map_err(|e| DomainError::database(format!("Invalid window in row: {}", e)))?;

        Ok(PersonaAssignment {
            assignment_id: AssignmentId::from_uuid(id),
            user_id,
            window: TimeWindow::resolve(reference_date, window_days),
            assigned_persona: AssignedPersona::from(assigned_persona),
            qualifying_personas,
            match_evidence,
            prioritization_reason,
            is_override,
            assigned_at: Timestamp::from_datetime(assigned_at),
        })
    }
}

#[async_trait]
impl AssignmentRepository for PgAssignmentRepository {
    async fn insert(&self, assignment: &PersonaAssignment) -> Result<(), DomainError> {
        let qualifying = serde_json::to_value(&assignment.qualifying_personas)
            .map_err(|e| DomainError::database(format!("Failed to serialize: {}", e)))?;
        let evidence = serde_json::to_value(&assignment.match_evidence)
            .map_err(|e| DomainError::database(format!("Failed to serialize: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO persona_assignments (
                id, user_id, window_days, reference_date,
                assigned_persona, qualifying_personas, match_evidence,
                prioritization_reason, is_override, assigned_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(assignment.assignment_id.as_uuid())
        .bind(assignment.user_id.as_str())
        .bind(assignment.window.window_days.as_i64() as i32)
        .bind(assignment.window.reference_date)
        .bind(assignment.assigned_persona.as_str())
        .bind(qualifying)
        .bind(evidence)
        .bind(&assignment.prioritization_reason)
        .bind(assignment.is_override)
        .bind(assignment.assigned_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Database error: {}", e)))?;

        Ok(())
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
        window_days: Option<WindowDays>,
    ) -> Result<Vec<PersonaAssignment>, DomainError> {
        let rows = match window_days {
            Some(window) => {
                sqlx::query(
                    r#"
                    SELECT * FROM persona_assignments
                    WHERE user_id = $1 AND window_days = $2
                    ORDER BY assigned_at DESC
                    "#,
                )
                .bind(user_id.as_str())
                .bind(window.as_i64() as i32)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT * FROM persona_assignments
                    WHERE user_id = $1
                    ORDER BY assigned_at DESC
                    "#,
                )
                .bind(user_id.as_str())
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| DomainError::database(format!("Database error: {}", e)))?;

        rows.iter().map(Self::from_db_row).collect()
    }
}

//! Persistence port for persona assignments.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId, WindowDays};
use crate::domain::persona::PersonaAssignment;

/// Append-only store of assignment rows.
///
/// Rows are never updated or deleted; history is the audit trail.
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Appends one assignment row.
    async fn insert(&self, assignment: &PersonaAssignment) -> Result<(), DomainError>;

    /// Returns a user's assignment history, newest first, optionally
    /// filtered to one window length.
    async fn find_by_user(
        &self,
        user_id: &UserId,
        window_days: Option<WindowDays>,
    ) -> Result<Vec<PersonaAssignment>, DomainError>;
}

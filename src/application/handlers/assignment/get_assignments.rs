//! GetAssignmentsHandler - assignment history reads.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId, WindowDays};
use crate::domain::persona::PersonaAssignment;
use crate::ports::AssignmentRepository;

/// Query for one user's assignment history.
#[derive(Debug, Clone)]
pub struct GetAssignmentsQuery {
    pub user_id: UserId,
    pub window_days: Option<WindowDays>,
}

/// Handler for assignment history reads.
pub struct GetAssignmentsHandler {
    repository: Arc<dyn AssignmentRepository>,
}

impl GetAssignmentsHandler {
    pub fn new(repository: Arc<dyn AssignmentRepository>) -> Self {
        Self { repository }
    }

    /// Returns history newest first; an empty history is an empty list,
    /// not an error.
    pub async fn handle(
        &self,
        query: GetAssignmentsQuery,
    ) -> Result<Vec<PersonaAssignment>, DomainError> {
        self.repository
            .find_by_user(&query.user_id, query.window_days)
            .await
    }
}

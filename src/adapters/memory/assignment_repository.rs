//! In-Memory Assignment Repository Adapter

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, UserId, WindowDays};
use crate::domain::persona::PersonaAssignment;
use crate::ports::AssignmentRepository;

/// In-memory append-only assignment store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAssignmentRepository {
    rows: Arc<RwLock<Vec<PersonaAssignment>>>,
}

impl InMemoryAssignmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored rows
    pub async fn row_count(&self) -> usize {
        self.rows.read().await.len()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.rows.write().await.clear();
    }
}

#[async_trait]
impl AssignmentRepository for InMemoryAssignmentRepository {
    async fn insert(&self, assignment: &PersonaAssignment) -> Result<(), DomainError> {
        let mut rows = self.rows.write().await;
        rows.push(assignment.clone());
        Ok(())
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
        window_days: Option<WindowDays>,
    ) -> Result<Vec<PersonaAssignment>, DomainError> {
        let rows = self.rows.read().await;
        let mut matching: Vec<PersonaAssignment> = rows
            .iter()
            .filter(|row| {
                row.user_id == *user_id
                    && window_days.map_or(true, |w| row.window.window_days == w)
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.assigned_at.cmp(&a.assigned_at));
        Ok(matching)
    }
}

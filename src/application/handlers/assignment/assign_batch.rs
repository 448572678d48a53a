//! AssignBatchHandler - bounded-concurrency batch runs.

use std::sync::Arc;

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};

use crate::domain::foundation::{DomainError, UserId, WindowDays};
use crate::domain::persona::PersonaAssignment;

use super::assign_persona::{AssignPersonaCommand, AssignPersonaHandler};

/// How many users are processed concurrently within one batch.
const BATCH_CONCURRENCY: usize = 8;

/// Command to run assignment for a set of users.
#[derive(Debug, Clone)]
pub struct AssignBatchCommand {
    pub user_ids: Vec<UserId>,
    pub window_days: WindowDays,
    pub reference_date: Option<NaiveDate>,
}

/// Per-batch outcome: successes and per-user failures side by side.
///
/// One user's failure never aborts the rest of the batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub assignments: Vec<PersonaAssignment>,
    pub failures: Vec<(UserId, DomainError)>,
}

/// Handler fanning one assignment run out over many users.
pub struct AssignBatchHandler {
    assign: Arc<AssignPersonaHandler>,
}

impl AssignBatchHandler {
    pub fn new(assign: Arc<AssignPersonaHandler>) -> Self {
        Self { assign }
    }

    pub async fn handle(&self, cmd: AssignBatchCommand) -> BatchOutcome {
        let results: Vec<(UserId, Result<PersonaAssignment, DomainError>)> =
            stream::iter(cmd.user_ids)
                .map(|user_id| {
                    let assign = Arc::clone(&self.assign);
                    let command = AssignPersonaCommand {
                        user_id: user_id.clone(),
                        window_days: cmd.window_days,
                        reference_date: cmd.reference_date,
                    };
                    async move { (user_id, assign.handle(command).await) }
                })
                .buffer_unordered(BATCH_CONCURRENCY)
                .collect()
                .await;

        let mut outcome = BatchOutcome {
            assignments: Vec::new(),
            failures: Vec::new(),
        };
        for (user_id, result) in results {
            match result {
                Ok(assignment) => outcome.assignments.push(assignment),
                Err(error) => {
                    tracing::warn!(
                        user_id = %user_id,
                        code = %error.code,
                        "assignment failed within batch"
                    );
                    outcome.failures.push((user_id, error));
                }
            }
        }
        outcome
    }
}

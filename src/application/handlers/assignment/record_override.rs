//! RecordOverrideHandler - operator-forced persona assignments.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::domain::foundation::{DomainError, ErrorCode, TimeWindow, UserId, WindowDays};
use crate::domain::persona::{
    AssignedPersona, PersonaAssignment, PersonaMatcher, PersonaRegistry,
};
use crate::domain::signals::SummaryAggregator;
use crate::ports::{AssignmentRepository, BankingRecordReader};

/// Command to force a persona regardless of the computed outcome.
#[derive(Debug, Clone)]
pub struct RecordOverrideCommand {
    pub user_id: UserId,
    pub window_days: WindowDays,
    pub reference_date: Option<NaiveDate>,
    pub persona_id: String,
    pub reason: String,
}

/// Handler appending an override row.
///
/// The rule trees still run so the audit row shows what the engine
/// would have decided; only the assigned persona is forced.
pub struct RecordOverrideHandler {
    records: Arc<dyn BankingRecordReader>,
    repository: Arc<dyn AssignmentRepository>,
    registry: Arc<PersonaRegistry>,
}

impl RecordOverrideHandler {
    pub fn new(
        records: Arc<dyn BankingRecordReader>,
        repository: Arc<dyn AssignmentRepository>,
        registry: Arc<PersonaRegistry>,
    ) -> Self {
        Self {
            records,
            repository,
            registry,
        }
    }

    pub async fn handle(
        &self,
        cmd: RecordOverrideCommand,
    ) -> Result<PersonaAssignment, DomainError> {
        if self.registry.get(&cmd.persona_id).is_none() {
            return Err(DomainError::new(
                ErrorCode::PersonaNotFound,
                format!("persona '{}' is not in the catalog", cmd.persona_id),
            ));
        }
        if cmd.reason.trim().is_empty() {
            return Err(DomainError::validation(
                "reason",
                "an override requires a reason",
            ));
        }

        let transactions = self.records.transactions_for_user(&cmd.user_id).await?;
        let accounts = self.records.accounts_for_user(&cmd.user_id).await?;
        let liabilities = self.records.liabilities_for_user(&cmd.user_id).await?;

        let reference_date = cmd
            .reference_date
            .unwrap_or_else(|| Utc::now().date_naive());
        let window = TimeWindow::resolve(reference_date, cmd.window_days);
        let summary = SummaryAggregator::assemble(
            cmd.user_id.clone(),
            window,
            &transactions,
            &accounts,
            &liabilities,
        );
        let matches = PersonaMatcher::match_all(&self.registry, &summary);
        let qualifying: Vec<String> = self
            .registry
            .personas()
            .iter()
            .filter(|p| matches.get(&p.persona_id).is_some_and(|m| m.matched))
            .map(|p| p.persona_id.clone())
            .collect();

        let mut assignment = PersonaAssignment::from_decision(
            cmd.user_id,
            window,
            crate::domain::persona::Prioritization {
                assigned: AssignedPersona::Persona(cmd.persona_id.clone()),
                qualifying,
                reason: format!("operator override: {}", cmd.reason),
            },
            matches,
        );
        assignment.is_override = true;

        self.repository.insert(&assignment).await?;

        tracing::info!(
            user_id = %assignment.user_id,
            persona = cmd.persona_id.as_str(),
            "override assignment recorded"
        );

        Ok(assignment)
    }
}

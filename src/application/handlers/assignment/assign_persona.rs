//! AssignPersonaHandler - Command handler for one assignment run.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::domain::foundation::{DomainError, TimeWindow, UserId, WindowDays};
use crate::domain::persona::{
    PersonaAssignment, PersonaMatcher, PersonaPrioritizer, PersonaRegistry,
};
use crate::domain::signals::SummaryAggregator;
use crate::ports::{AssignmentRepository, BankingRecordReader};

/// Command to compute and persist one persona assignment.
#[derive(Debug, Clone)]
pub struct AssignPersonaCommand {
    pub user_id: UserId,
    pub window_days: WindowDays,
    /// Defaults to today (UTC) when absent.
    pub reference_date: Option<NaiveDate>,
}

/// Handler for the full detection-to-persistence pipeline.
pub struct AssignPersonaHandler {
    records: Arc<dyn BankingRecordReader>,
    repository: Arc<dyn AssignmentRepository>,
    registry: Arc<PersonaRegistry>,
}

impl AssignPersonaHandler {
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
        cmd: AssignPersonaCommand,
    ) -> Result<PersonaAssignment, DomainError> {
        // 1. Fetch raw records
        let transactions = self.records.transactions_for_user(&cmd.user_id).await?;
        let accounts = self.records.accounts_for_user(&cmd.user_id).await?;
        let liabilities = self.records.liabilities_for_user(&cmd.user_id).await?;

        // A user with no records at all cannot be summarized; this is
        // distinct from "unclassified", which is a valid outcome.
        if transactions.is_empty() && accounts.is_empty() && liabilities.is_empty() {
            return Err(DomainError::insufficient_data(cmd.user_id.as_str()));
        }

        // 2. Resolve the window and derive signals
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

        // 3. Evaluate every persona and select one
        let matches = PersonaMatcher::match_all(&self.registry, &summary);
        let decision = PersonaPrioritizer::select(&self.registry, &matches);

        // 4. Persist the audit row; a failed write fails the run
        let assignment =
            PersonaAssignment::from_decision(cmd.user_id, window, decision, matches);
        self.repository.insert(&assignment).await?;

        tracing::info!(
            user_id = %assignment.user_id,
            window = %assignment.window,
            assigned = assignment.assigned_persona.as_str(),
            qualifying = assignment.qualifying_personas.len(),
            "persona assigned"
        );

        Ok(assignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryAssignmentRepository, InMemoryBankingRecords};
    use crate::domain::banking::{Account, AccountType, Liability, Transaction, TransactionDirection};
    use crate::domain::foundation::ErrorCode;
    use crate::domain::persona::AssignedPersona;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn user() -> UserId {
        UserId::new("u1").unwrap()
    }

    fn registry() -> Arc<PersonaRegistry> {
        let yaml = r#"
personas:
  - persona_id: high_utilization
    name: High Utilization
    priority_rank: 1
    criteria:
      kind: compare
      signal: credit.max_utilization
      op: gte
      threshold: 0.5
  - persona_id: savings_builder
    name: Savings Builder
    priority_rank: 4
    criteria:
      kind: compare
      signal: savings.growth_rate
      op: gte
      threshold: 0.02
"#;
        Arc::new(PersonaRegistry::from_yaml(yaml).unwrap())
    }

    fn maxed_card() -> Liability {
        Liability {
            account_id: Uuid::new_v4(),
            user_id: user(),
            credit_limit: 1000.0,
            balance: 680.0,
            minimum_payment_due: 0.0,
            last_payment_amount: 0.0,
            interest_charged: 0.0,
            is_overdue: false,
        }
    }

    fn command() -> AssignPersonaCommand {
        AssignPersonaCommand {
            user_id: user(),
            window_days: WindowDays::Thirty,
            reference_date: Some(NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()),
        }
    }

    #[tokio::test]
    async fn assigns_and_persists_for_qualifying_user() {
        let records = Arc::new(InMemoryBankingRecords::new());
        records
            .seed_user(user(), vec![], vec![], vec![maxed_card()])
            .await;
        let repository = Arc::new(InMemoryAssignmentRepository::new());
        let handler = AssignPersonaHandler::new(records, repository.clone(), registry());

        let assignment = handler.handle(command()).await.unwrap();
        assert_eq!(
            assignment.assigned_persona,
            AssignedPersona::Persona("high_utilization".to_string())
        );
        assert!(assignment.is_sound());
        assert_eq!(repository.row_count().await, 1);
    }

    #[tokio::test]
    async fn unclassified_is_persisted_not_an_error() {
        let records = Arc::new(InMemoryBankingRecords::new());
        // one account, nothing qualifying
        records
            .seed_user(
                user(),
                vec![],
                vec![Account {
                    id: Uuid::new_v4(),
                    user_id: user(),
                    account_type: AccountType::Checking,
                    balance: 500.0,
                }],
                vec![],
            )
            .await;
        let repository = Arc::new(InMemoryAssignmentRepository::new());
        let handler = AssignPersonaHandler::new(records, repository.clone(), registry());

        let assignment = handler.handle(command()).await.unwrap();
        assert_eq!(assignment.assigned_persona, AssignedPersona::Unclassified);
        assert_eq!(repository.row_count().await, 1);
    }

    #[tokio::test]
    async fn fails_when_user_has_no_records_at_all() {
        let records = Arc::new(InMemoryBankingRecords::new());
        let repository = Arc::new(InMemoryAssignmentRepository::new());
        let handler = AssignPersonaHandler::new(records, repository.clone(), registry());

        let result = handler.handle(command()).await;
        assert!(matches!(result, Err(e) if e.code == ErrorCode::InsufficientData));
        assert_eq!(repository.row_count().await, 0);
    }

    #[tokio::test]
    async fn evidence_retained_for_every_persona() {
        let records = Arc::new(InMemoryBankingRecords::new());
        records
            .seed_user(user(), vec![], vec![], vec![maxed_card()])
            .await;
        let repository = Arc::new(InMemoryAssignmentRepository::new());
        let handler = AssignPersonaHandler::new(records, repository, registry());

        let assignment = handler.handle(command()).await.unwrap();
        assert_eq!(assignment.match_evidence.len(), 2);
        assert!(!assignment.match_evidence["savings_builder"].matched);
        assert!(assignment.match_evidence["savings_builder"]
            .evidence
            .contains_key("savings.growth_rate"));
    }

    struct FailingRepository;

    #[async_trait]
    impl AssignmentRepository for FailingRepository {
        async fn insert(&self, _assignment: &PersonaAssignment) -> Result<(), DomainError> {
            Err(DomainError::database("Simulated insert failure"))
        }

        async fn find_by_user(
            &self,
            _user_id: &UserId,
            _window_days: Option<WindowDays>,
        ) -> Result<Vec<PersonaAssignment>, DomainError> {
            Ok(vec![])
        }
    }

    #[tokio::test]
    async fn persistence_failure_fails_the_run() {
        let records = Arc::new(InMemoryBankingRecords::new());
        records
            .seed_user(user(), vec![], vec![], vec![maxed_card()])
            .await;
        let handler =
            AssignPersonaHandler::new(records, Arc::new(FailingRepository), registry());

        let result = handler.handle(command()).await;
        assert!(matches!(result, Err(e) if e.code == ErrorCode::DatabaseError));
    }

    #[tokio::test]
    async fn transactions_outside_window_still_count_as_records() {
        // Old history only: summarizable, likely unclassified, never
        // insufficient data.
        let records = Arc::new(InMemoryBankingRecords::new());
        records
            .seed_user(
                user(),
                vec![Transaction {
                    id: Uuid::new_v4(),
                    user_id: user(),
                    account_id: Uuid::new_v4(),
                    merchant_name: "Grocer".to_string(),
                    category: "groceries".to_string(),
                    amount: 20.0,
                    direction: TransactionDirection::Outflow,
                    posted_at: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                }],
                vec![],
                vec![],
            )
            .await;
        let repository = Arc::new(InMemoryAssignmentRepository::new());
        let handler = AssignPersonaHandler::new(records, repository, registry());

        let assignment = handler.handle(command()).await.unwrap();
        assert_eq!(assignment.assigned_persona, AssignedPersona::Unclassified);
    }
}

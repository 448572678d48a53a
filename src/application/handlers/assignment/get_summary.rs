//! GetSummaryHandler - on-demand behavioral summary reads.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::domain::foundation::{DomainError, TimeWindow, UserId, WindowDays};
use crate::domain::signals::{BehavioralSummary, SummaryAggregator};
use crate::ports::BankingRecordReader;

/// Query for a freshly computed behavioral summary.
#[derive(Debug, Clone)]
pub struct GetSummaryQuery {
    pub user_id: UserId,
    pub window_days: WindowDays,
    pub reference_date: Option<NaiveDate>,
}

/// Handler computing a summary without persisting anything.
pub struct GetSummaryHandler {
    records: Arc<dyn BankingRecordReader>,
}

impl GetSummaryHandler {
    pub fn new(records: Arc<dyn BankingRecordReader>) -> Self {
        Self { records }
    }

    pub async fn handle(&self, query: GetSummaryQuery) -> Result<BehavioralSummary, DomainError> {
        let transactions = self.records.transactions_for_user(&query.user_id).await?;
        let accounts = self.records.accounts_for_user(&query.user_id).await?;
        let liabilities = self.records.liabilities_for_user(&query.user_id).await?;

        if transactions.is_empty() && accounts.is_empty() && liabilities.is_empty() {
            return Err(DomainError::insufficient_data(query.user_id.as_str()));
        }

        let reference_date = query
            .reference_date
            .unwrap_or_else(|| Utc::now().date_naive());
        let window = TimeWindow::resolve(reference_date, query.window_days);
        Ok(SummaryAggregator::assemble(
            query.user_id,
            window,
            &transactions,
            &accounts,
            &liabilities,
        ))
    }
}

//! Persona matcher - evaluates every persona against a summary.

use std::collections::BTreeMap;

use super::match_result::PersonaMatch;
use super::registry::PersonaRegistry;
use super::rule::EvaluationTrace;
use crate::domain::signals::BehavioralSummary;

/// Evaluates all registered personas against a behavioral summary.
///
/// Every persona is evaluated on every run, matched or not, so the
/// audit trail always explains why each persona did or did not apply.
pub struct PersonaMatcher;

impl PersonaMatcher {
    /// Returns one match result per registered persona, keyed by id.
    pub fn match_all(
        registry: &PersonaRegistry,
        summary: &BehavioralSummary,
    ) -> BTreeMap<String, PersonaMatch> {
        registry
            .personas()
            .iter()
            .map(|persona| {
                let mut trace = EvaluationTrace::default();
                let matched = persona.criteria.evaluate(summary, &mut trace);
                (
                    persona.persona_id.clone(),
                    PersonaMatch::from_trace(&persona.persona_id, matched, trace),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::banking::Liability;
    use crate::domain::foundation::{TimeWindow, UserId, WindowDays};
    use crate::domain::persona::definition::PersonaDefinition;
    use crate::domain::persona::rule::{CompareOp, Rule, Threshold};
    use crate::domain::signals::SummaryAggregator;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn registry() -> PersonaRegistry {
        PersonaRegistry::from_definitions(vec![
            PersonaDefinition {
                persona_id: "high_utilization".to_string(),
                name: "High Utilization".to_string(),
                priority_rank: 1,
                criteria: Rule::Compare {
                    signal: "credit.max_utilization".to_string(),
                    op: CompareOp::Gte,
                    threshold: Threshold::Number(0.5),
                },
                educational_focus: vec![],
            },
            PersonaDefinition {
                persona_id: "savings_builder".to_string(),
                name: "Savings Builder".to_string(),
                priority_rank: 4,
                criteria: Rule::Compare {
                    signal: "savings.growth_rate".to_string(),
                    op: CompareOp::Gte,
                    threshold: Threshold::Number(0.02),
                },
                educational_focus: vec![],
            },
        ])
        .unwrap()
    }

    fn summary(liabilities: &[Liability]) -> crate::domain::signals::BehavioralSummary {
        let window = TimeWindow::resolve(
            NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
            WindowDays::Thirty,
        );
        SummaryAggregator::assemble(UserId::new("u1").unwrap(), window, &[], &[], liabilities)
    }

    fn maxed_card() -> Liability {
        Liability {
            account_id: Uuid::new_v4(),
            user_id: UserId::new("u1").unwrap(),
            credit_limit: 1000.0,
            balance: 680.0,
            minimum_payment_due: 0.0,
            last_payment_amount: 0.0,
            interest_charged: 0.0,
            is_overdue: false,
        }
    }

    #[test]
    fn every_persona_gets_a_result() {
        let matches = PersonaMatcher::match_all(&registry(), &summary(&[maxed_card()]));
        assert_eq!(matches.len(), 2);
        assert!(matches["high_utilization"].matched);
        assert!(!matches["savings_builder"].matched);
    }

    #[test]
    fn unmatched_personas_retain_evidence() {
        let matches = PersonaMatcher::match_all(&registry(), &summary(&[]));
        let unmatched = &matches["savings_builder"];
        assert!(!unmatched.matched);
        assert!(unmatched.evidence.contains_key("savings.growth_rate"));
        assert!(unmatched.matched_conditions.is_empty());
    }
}

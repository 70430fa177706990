//! Deal-to-lender eligibility matching.

mod batch;
mod criteria;
pub mod router;
mod service;

pub use batch::{
    candidates_from, match_deals, DealMatchResult, LenderCandidate, LenderMatch, MatchRun,
    DEAL_NOT_FOUND,
};
pub use criteria::{Criterion, CriterionOutcome};
pub use router::matching_router;
pub use service::{today, MatchRequest, MatchingService, MatchingServiceError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::deals::domain::DealProfile;
use super::lenders::domain::LenderConfiguration;

/// Feedback reported when every criterion passes.
pub const ALL_CRITERIA_PASSED: &str = "All criteria passed - Deal matches!";

/// Stateless evaluator; the reference date drives time-in-business.
#[derive(Debug, Clone, Copy)]
pub struct MatchEngine {
    as_of: NaiveDate,
}

impl MatchEngine {
    pub fn new(as_of: NaiveDate) -> Self {
        Self { as_of }
    }

    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    pub fn evaluate(&self, deal: &DealProfile, configuration: &LenderConfiguration) -> Evaluation {
        self.evaluate_in_order(deal, configuration, &Criterion::ALL)
    }

    /// Evaluate with an explicit criterion order. Only feedback ordering depends on it.
    pub fn evaluate_in_order(
        &self,
        deal: &DealProfile,
        configuration: &LenderConfiguration,
        order: &[Criterion],
    ) -> Evaluation {
        let mut feedback = Vec::new();
        let mut failed_criteria = Vec::new();

        for criterion in order {
            let outcome = criteria::check(*criterion, deal, configuration, self.as_of);
            if let Some(message) = outcome.feedback(*criterion) {
                feedback.push(message);
                failed_criteria.push(*criterion);
            }
        }

        let matched = failed_criteria.is_empty();
        if matched {
            feedback.push(ALL_CRITERIA_PASSED.to_string());
        }

        Evaluation {
            matched,
            feedback,
            failed_criteria,
        }
    }
}

/// Outcome of evaluating one deal against one lender configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub matched: bool,
    pub feedback: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_criteria: Vec<Criterion>,
}

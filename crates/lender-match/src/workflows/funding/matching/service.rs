use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::batch::{candidates_from, match_deals, MatchRun};
use super::MatchEngine;
use crate::workflows::funding::deals::domain::{Deal, DealId};
use crate::workflows::funding::repository::{DealRepository, LenderRepository, RepositoryError};

/// Matching run request. An empty `deal_ids` list matches every stored deal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRequest {
    #[serde(default)]
    pub deal_ids: Vec<DealId>,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl MatchRequest {
    /// Reference date for the run, defaulting to today's UTC date.
    pub fn effective_as_of(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(today)
    }
}

/// Current UTC date. Every caller that defaults a matching date goes through here.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Runs deals against a snapshot of the active lender configurations.
pub struct MatchingService<L, D> {
    lenders: Arc<L>,
    deals: Arc<D>,
}

impl<L, D> MatchingService<L, D>
where
    L: LenderRepository + 'static,
    D: DealRepository + 'static,
{
    pub fn new(lenders: Arc<L>, deals: Arc<D>) -> Self {
        Self { lenders, deals }
    }

    pub fn run(&self, request: MatchRequest) -> Result<MatchRun, MatchingServiceError> {
        let as_of = request.effective_as_of();

        // Both reads are owned copies; edits landing mid-run never reach this evaluation.
        let lenders = self.lenders.snapshot()?;
        let candidates = candidates_from(&lenders);

        let (deal_ids, deals) = if request.deal_ids.is_empty() {
            let stored = self.deals.list()?;
            let ids = stored.iter().map(|deal| deal.id.clone()).collect::<Vec<_>>();
            (ids, stored)
        } else {
            let mut found = Vec::new();
            for deal_id in &request.deal_ids {
                if let Some(deal) = self.deals.fetch(deal_id)? {
                    found.push(deal);
                }
            }
            (request.deal_ids, found)
        };

        let index: HashMap<&DealId, &Deal> = deals.iter().map(|deal| (&deal.id, deal)).collect();
        let engine = MatchEngine::new(as_of);
        let run = match_deals(
            &engine,
            &deal_ids,
            |deal_id| index.get(deal_id).map(|deal| &deal.profile),
            &candidates,
        );

        info!(
            deals = run.total_deals_processed,
            configurations = run.total_lenders_checked,
            %as_of,
            "matching run completed"
        );
        Ok(run)
    }
}

/// Error raised by the matching service.
#[derive(Debug, thiserror::Error)]
pub enum MatchingServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

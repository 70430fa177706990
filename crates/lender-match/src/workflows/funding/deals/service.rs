use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::domain::{Deal, DealFilter, DealId, DealProfile, DealStatus};
use super::validation::validate_deal;
use crate::workflows::funding::repository::{DealRepository, RepositoryError};

/// Broker-facing deal intake. Incomplete deals are kept as drafts with their outstanding issues.
pub struct DealService<R> {
    repository: Arc<R>,
    sequence: AtomicU64,
}

impl<R> DealService<R>
where
    R: DealRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            sequence: AtomicU64::new(1),
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    fn next_deal_id(&self) -> DealId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed);
        DealId(format!("deal-{id:06}"))
    }

    pub fn create(&self, profile: DealProfile) -> Result<Deal, DealServiceError> {
        let now = Utc::now();
        let issues = validate_deal(&profile, now.date_naive()).issues;
        let status = if issues.is_empty() {
            DealStatus::Ready
        } else {
            DealStatus::Draft
        };

        let deal = Deal {
            id: self.next_deal_id(),
            profile,
            status,
            issues,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.insert(deal)?;
        info!(
            deal_id = %stored.id.0,
            status = stored.status.label(),
            issues = stored.issues.len(),
            "deal stored"
        );
        Ok(stored)
    }

    pub fn get(&self, deal_id: &DealId) -> Result<Deal, DealServiceError> {
        let deal = self
            .repository
            .fetch(deal_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(deal)
    }

    /// Replace a deal's attributes and re-run validation.
    pub fn update(&self, deal_id: &DealId, profile: DealProfile) -> Result<Deal, DealServiceError> {
        let mut deal = self.get(deal_id)?;
        let now = Utc::now();
        deal.issues = validate_deal(&profile, now.date_naive()).issues;
        deal.status = if deal.issues.is_empty() {
            DealStatus::Ready
        } else {
            DealStatus::Draft
        };
        deal.profile = profile;
        deal.updated_at = now;

        self.repository.update(deal.clone())?;
        debug!(deal_id = %deal.id.0, status = deal.status.label(), "deal updated");
        Ok(deal)
    }

    pub fn delete(&self, deal_id: &DealId) -> Result<(), DealServiceError> {
        self.repository.delete(deal_id)?;
        info!(deal_id = %deal_id.0, "deal deleted");
        Ok(())
    }

    pub fn list(&self, filter: &DealFilter) -> Result<Vec<Deal>, DealServiceError> {
        let deals = self.repository.list()?;
        Ok(deals.into_iter().filter(|deal| filter.matches(deal)).collect())
    }
}

/// Error raised by the deal service.
#[derive(Debug, thiserror::Error)]
pub enum DealServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

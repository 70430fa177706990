use std::sync::{Arc, Mutex};

use super::deals::domain::{Deal, DealId};
use super::lenders::domain::{Lender, LenderId};
use super::repository::{DealRepository, LenderRepository, RepositoryError};

/// Process-local lender store. Reads hand out owned copies.
#[derive(Default, Clone)]
pub struct InMemoryLenderRepository {
    lenders: Arc<Mutex<Vec<Lender>>>,
}

impl LenderRepository for InMemoryLenderRepository {
    fn insert(&self, lender: Lender) -> Result<Lender, RepositoryError> {
        let mut guard = self.lenders.lock().expect("lender mutex poisoned");
        let name = lender.name.trim().to_lowercase();
        let clash = guard
            .iter()
            .any(|existing| existing.id == lender.id || existing.name.trim().to_lowercase() == name);
        if clash {
            return Err(RepositoryError::Conflict);
        }
        guard.push(lender.clone());
        Ok(lender)
    }

    fn update(&self, lender: Lender) -> Result<(), RepositoryError> {
        let mut guard = self.lenders.lock().expect("lender mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id == lender.id) {
            Some(slot) => {
                *slot = lender;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &LenderId) -> Result<Option<Lender>, RepositoryError> {
        let guard = self.lenders.lock().expect("lender mutex poisoned");
        Ok(guard.iter().find(|lender| &lender.id == id).cloned())
    }

    fn snapshot(&self) -> Result<Vec<Lender>, RepositoryError> {
        let guard = self.lenders.lock().expect("lender mutex poisoned");
        Ok(guard.clone())
    }
}

/// Process-local deal store. Reads hand out owned copies.
#[derive(Default, Clone)]
pub struct InMemoryDealRepository {
    deals: Arc<Mutex<Vec<Deal>>>,
}

impl DealRepository for InMemoryDealRepository {
    fn insert(&self, deal: Deal) -> Result<Deal, RepositoryError> {
        let mut guard = self.deals.lock().expect("deal mutex poisoned");
        if guard.iter().any(|existing| existing.id == deal.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(deal.clone());
        Ok(deal)
    }

    fn update(&self, deal: Deal) -> Result<(), RepositoryError> {
        let mut guard = self.deals.lock().expect("deal mutex poisoned");
        match guard.iter_mut().find(|existing| existing.id == deal.id) {
            Some(slot) => {
                *slot = deal;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: &DealId) -> Result<Option<Deal>, RepositoryError> {
        let guard = self.deals.lock().expect("deal mutex poisoned");
        Ok(guard.iter().find(|deal| &deal.id == id).cloned())
    }

    fn delete(&self, id: &DealId) -> Result<(), RepositoryError> {
        let mut guard = self.deals.lock().expect("deal mutex poisoned");
        let before = guard.len();
        guard.retain(|deal| &deal.id != id);
        if guard.len() == before {
            Err(RepositoryError::NotFound)
        } else {
            Ok(())
        }
    }

    fn list(&self) -> Result<Vec<Deal>, RepositoryError> {
        let guard = self.deals.lock().expect("deal mutex poisoned");
        Ok(guard.clone())
    }
}

use super::deals::domain::{Deal, DealId};
use super::lenders::domain::{Lender, LenderId};

/// Storage abstraction for lenders so services can be exercised in isolation.
pub trait LenderRepository: Send + Sync {
    /// Insert a new lender. Names are unique, compared case-insensitively.
    fn insert(&self, lender: Lender) -> Result<Lender, RepositoryError>;
    fn update(&self, lender: Lender) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &LenderId) -> Result<Option<Lender>, RepositoryError>;
    /// Owned copy of every lender, in creation order.
    fn snapshot(&self) -> Result<Vec<Lender>, RepositoryError>;
}

/// Storage abstraction for deals.
pub trait DealRepository: Send + Sync {
    fn insert(&self, deal: Deal) -> Result<Deal, RepositoryError>;
    fn update(&self, deal: Deal) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &DealId) -> Result<Option<Deal>, RepositoryError>;
    fn delete(&self, id: &DealId) -> Result<(), RepositoryError>;
    /// Owned copy of every deal, in creation order.
    fn list(&self) -> Result<Vec<Deal>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

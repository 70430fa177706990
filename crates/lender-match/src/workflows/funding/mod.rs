//! Lender eligibility model and the deal-to-lender matcher.

pub mod catalog;
pub mod deals;
pub mod industry;
pub mod lenders;
pub mod matching;
pub mod memory;
pub mod repository;
pub mod taxonomy;
pub mod validation;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogImportError, LenderCatalogImporter};
pub use memory::{InMemoryDealRepository, InMemoryLenderRepository};
pub use repository::{DealRepository, LenderRepository, RepositoryError};
pub use taxonomy::{taxonomy_router, TaxonomyView};
pub use validation::{FieldIssue, ValidationErrors, FICO_MAX, FICO_MIN};

//! Funding deals submitted by brokers for lender matching.

pub mod domain;
pub mod router;
pub mod service;
pub mod validation;

pub use domain::{
    months_between, Deal, DealFilter, DealId, DealProfile, DealStatus, DealView, RevenueInput,
    DEPOSIT_MONTHS,
};
pub use router::deal_router;
pub use service::{DealService, DealServiceError};
pub use validation::validate_deal;

//! Lender records and the eligibility criteria they publish per lender type.

pub mod conditional;
pub mod domain;
pub mod router;
pub mod service;
pub mod validation;

pub use conditional::{
    toggle_conditional_industry, ConditionalRevenueError, ConditionalRevenueTable, ToggleOutcome,
};
pub use domain::{
    BkPolicy, ConfigurationDraft, ConfigurationId, Lender, LenderConfiguration, LenderDraft,
    LenderId, LenderStatus, LenderSummaryView, LenderType,
};
pub use router::lender_router;
pub use service::{LenderService, LenderServiceError};
pub use validation::{validate_configuration, validate_lender};

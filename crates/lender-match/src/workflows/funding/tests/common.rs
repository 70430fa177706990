use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::funding::deals::domain::{Deal, DealId, DealProfile, RevenueInput};
use crate::workflows::funding::deals::DealService;
use crate::workflows::funding::lenders::domain::{
    BkPolicy, ConfigurationDraft, ConfigurationId, Lender, LenderConfiguration, LenderDraft,
    LenderId, LenderStatus, LenderType,
};
use crate::workflows::funding::lenders::LenderService;
use crate::workflows::funding::matching::{MatchEngine, MatchingService};
use crate::workflows::funding::memory::{InMemoryDealRepository, InMemoryLenderRepository};
use crate::workflows::funding::repository::{DealRepository, LenderRepository, RepositoryError};

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn as_of() -> NaiveDate {
    date(2025, 6, 1)
}

pub(super) fn engine() -> MatchEngine {
    MatchEngine::new(as_of())
}

/// Complete deal that satisfies every baseline criterion of [`baseline_configuration`].
pub(super) fn restaurant_deal() -> DealProfile {
    DealProfile {
        business_name: "Blue Plate Diner".to_string(),
        state: Some("CA".to_string()),
        business_start_date: Some(date(2021, 3, 15)),
        revenue: Some(RevenueInput::MonthlyAverage { amount: 50_000 }),
        positions: Some(5),
        nsfs: Some(0),
        fico: Some(700),
        entity_type: Some("LLC".to_string()),
        raw_industry: Some("Restaurant".to_string()),
        has_defaults: Some(false),
        defaults_settled: None,
    }
}

pub(super) fn baseline_draft(lender_type: LenderType) -> ConfigurationDraft {
    ConfigurationDraft {
        lender_type,
        min_positions: 2,
        max_positions: 10,
        min_time_in_business_months: 0,
        min_revenue: 0,
        min_fico: 650,
        max_nsfs: 3,
        restricted_states: BTreeSet::new(),
        restricted_entity_types: BTreeSet::new(),
        restricted_industries: BTreeSet::new(),
        conditional_industries: BTreeSet::new(),
        conditional_revenues: BTreeMap::new(),
        bk_policy: BkPolicy::Flexible,
    }
}

pub(super) fn baseline_configuration() -> LenderConfiguration {
    LenderConfiguration::from_draft(
        ConfigurationId("cfg-test".to_string()),
        baseline_draft(LenderType::Straight),
    )
}

pub(super) fn lender_draft(name: &str, types: &[LenderType]) -> LenderDraft {
    LenderDraft {
        name: name.to_string(),
        status: LenderStatus::Active,
        configurations: types.iter().map(|kind| baseline_draft(*kind)).collect(),
    }
}

pub(super) fn set<const N: usize>(values: [&str; N]) -> BTreeSet<String> {
    values.into_iter().map(str::to_string).collect()
}

pub(super) fn lender_service() -> (
    LenderService<InMemoryLenderRepository>,
    Arc<InMemoryLenderRepository>,
) {
    let repository = Arc::new(InMemoryLenderRepository::default());
    (LenderService::new(repository.clone()), repository)
}

pub(super) fn deal_service() -> (DealService<InMemoryDealRepository>, Arc<InMemoryDealRepository>) {
    let repository = Arc::new(InMemoryDealRepository::default());
    (DealService::new(repository.clone()), repository)
}

/// Lender and deal services sharing stores with a matching service.
pub(super) struct Workspace {
    pub(super) lenders: LenderService<InMemoryLenderRepository>,
    pub(super) deals: DealService<InMemoryDealRepository>,
    pub(super) matching: MatchingService<InMemoryLenderRepository, InMemoryDealRepository>,
}

pub(super) fn workspace() -> Workspace {
    let (lenders, lender_repository) = lender_service();
    let (deals, deal_repository) = deal_service();
    let matching = MatchingService::new(lender_repository, deal_repository);
    Workspace {
        lenders,
        deals,
        matching,
    }
}

pub(super) struct ConflictLenderRepository;

impl LenderRepository for ConflictLenderRepository {
    fn insert(&self, _lender: Lender) -> Result<Lender, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _lender: Lender) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &LenderId) -> Result<Option<Lender>, RepositoryError> {
        Ok(None)
    }

    fn snapshot(&self) -> Result<Vec<Lender>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl LenderRepository for UnavailableRepository {
    fn insert(&self, _lender: Lender) -> Result<Lender, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _lender: Lender) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &LenderId) -> Result<Option<Lender>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn snapshot(&self) -> Result<Vec<Lender>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl DealRepository for UnavailableRepository {
    fn insert(&self, _deal: Deal) -> Result<Deal, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _deal: Deal) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &DealId) -> Result<Option<Deal>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &DealId) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Deal>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn json_request(
    method: axum::http::Method,
    uri: &str,
    payload: &Value,
) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(payload).expect("serialize payload"),
        ))
        .expect("request builds")
}

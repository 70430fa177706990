use axum::{routing::get, Json, Router};
use serde::Serialize;

use super::industry::{ENTITY_TYPES, INDUSTRIES, PARENT_INDUSTRIES, STATES};
use super::lenders::domain::{BkPolicy, LenderType};

/// Reference lists used to populate admin and intake forms.
#[derive(Debug, Clone, Serialize)]
pub struct TaxonomyView {
    pub industries: Vec<&'static str>,
    pub parent_industries: Vec<&'static str>,
    pub states: Vec<&'static str>,
    pub entity_types: Vec<&'static str>,
    pub lender_types: Vec<&'static str>,
    pub bk_policies: Vec<&'static str>,
}

impl TaxonomyView {
    pub fn current() -> Self {
        Self {
            industries: INDUSTRIES.to_vec(),
            parent_industries: PARENT_INDUSTRIES.to_vec(),
            states: STATES.to_vec(),
            entity_types: ENTITY_TYPES.to_vec(),
            lender_types: LenderType::ALL.iter().map(|kind| kind.label()).collect(),
            bk_policies: BkPolicy::ALL.iter().map(|policy| policy.label()).collect(),
        }
    }
}

pub fn taxonomy_router() -> Router {
    Router::new().route("/api/v1/taxonomy", get(taxonomy_handler))
}

async fn taxonomy_handler() -> Json<TaxonomyView> {
    Json(TaxonomyView::current())
}

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;

use super::service::{MatchRequest, MatchingService};
use crate::workflows::funding::repository::{DealRepository, LenderRepository};

/// Router exposing the "match with lenders" action.
pub fn matching_router<L, D>(service: Arc<MatchingService<L, D>>) -> Router
where
    L: LenderRepository + 'static,
    D: DealRepository + 'static,
{
    Router::new()
        .route("/api/v1/matching/runs", post(run_handler::<L, D>))
        .with_state(service)
}

pub(crate) async fn run_handler<L, D>(
    State(service): State<Arc<MatchingService<L, D>>>,
    Json(request): Json<MatchRequest>,
) -> Response
where
    L: LenderRepository + 'static,
    D: DealRepository + 'static,
{
    match service.run(request) {
        Ok(run) => (StatusCode::OK, Json(run)).into_response(),
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

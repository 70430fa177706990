use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{DealFilter, DealId, DealProfile, DealView};
use super::service::{DealService, DealServiceError};
use crate::workflows::funding::repository::{DealRepository, RepositoryError};

/// Router exposing deal intake, search, edit and delete endpoints.
pub fn deal_router<R>(service: Arc<DealService<R>>) -> Router
where
    R: DealRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/deals",
            post(create_handler::<R>).get(list_handler::<R>),
        )
        .route(
            "/api/v1/deals/:deal_id",
            get(get_handler::<R>)
                .put(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<DealService<R>>>,
    Json(profile): Json<DealProfile>,
) -> Response
where
    R: DealRepository + 'static,
{
    match service.create(profile) {
        Ok(deal) => (StatusCode::CREATED, Json(deal)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<DealService<R>>>,
    Query(filter): Query<DealFilter>,
) -> Response
where
    R: DealRepository + 'static,
{
    match service.list(&filter) {
        Ok(deals) => {
            let views: Vec<DealView> = deals.iter().map(|deal| deal.view()).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<DealService<R>>>,
    Path(deal_id): Path<String>,
) -> Response
where
    R: DealRepository + 'static,
{
    match service.get(&DealId(deal_id)) {
        Ok(deal) => (StatusCode::OK, Json(deal)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<DealService<R>>>,
    Path(deal_id): Path<String>,
    Json(profile): Json<DealProfile>,
) -> Response
where
    R: DealRepository + 'static,
{
    match service.update(&DealId(deal_id), profile) {
        Ok(deal) => (StatusCode::OK, Json(deal)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<DealService<R>>>,
    Path(deal_id): Path<String>,
) -> Response
where
    R: DealRepository + 'static,
{
    match service.delete(&DealId(deal_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(error: DealServiceError) -> Response {
    match error {
        DealServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({ "error": "deal not found" });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        DealServiceError::Repository(RepositoryError::Conflict) => {
            let payload = json!({ "error": "deal already exists" });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

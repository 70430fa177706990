use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::conditional::ToggleOutcome;
use super::domain::{
    ConfigurationDraft, ConfigurationId, LenderConfiguration, LenderDraft, LenderId, LenderStatus,
    LenderSummaryView,
};
use super::service::{LenderService, LenderServiceError};
use crate::workflows::funding::repository::{LenderRepository, RepositoryError};

#[derive(Debug, Deserialize)]
pub(crate) struct StatusRequest {
    pub(crate) status: LenderStatus,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConditionalIndustryRequest {
    pub(crate) industry: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConditionalRevenueRequest {
    pub(crate) industry: String,
    pub(crate) minimum_revenue: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct ToggleResponse {
    pub(crate) outcome: ToggleOutcome,
    pub(crate) configuration: LenderConfiguration,
}

/// Router exposing lender administration endpoints.
pub fn lender_router<R>(service: Arc<LenderService<R>>) -> Router
where
    R: LenderRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/lenders",
            post(create_handler::<R>).get(list_handler::<R>),
        )
        .route("/api/v1/lenders/:lender_id", get(get_handler::<R>))
        .route("/api/v1/lenders/:lender_id/status", put(status_handler::<R>))
        .route(
            "/api/v1/lenders/:lender_id/configurations",
            post(add_configuration_handler::<R>),
        )
        .route(
            "/api/v1/lenders/:lender_id/configurations/:configuration_id",
            put(update_configuration_handler::<R>).delete(remove_configuration_handler::<R>),
        )
        .route(
            "/api/v1/lenders/:lender_id/configurations/:configuration_id/conditional-industries",
            post(toggle_industry_handler::<R>),
        )
        .route(
            "/api/v1/lenders/:lender_id/configurations/:configuration_id/conditional-revenues",
            put(conditional_revenue_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<LenderService<R>>>,
    Json(draft): Json<LenderDraft>,
) -> Response
where
    R: LenderRepository + 'static,
{
    match service.create(draft) {
        Ok(lender) => (StatusCode::CREATED, Json(lender)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_handler<R>(State(service): State<Arc<LenderService<R>>>) -> Response
where
    R: LenderRepository + 'static,
{
    match service.list() {
        Ok(lenders) => {
            let views: Vec<LenderSummaryView> =
                lenders.iter().map(|lender| lender.summary_view()).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<LenderService<R>>>,
    Path(lender_id): Path<String>,
) -> Response
where
    R: LenderRepository + 'static,
{
    match service.get(&LenderId(lender_id)) {
        Ok(lender) => (StatusCode::OK, Json(lender)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn status_handler<R>(
    State(service): State<Arc<LenderService<R>>>,
    Path(lender_id): Path<String>,
    Json(request): Json<StatusRequest>,
) -> Response
where
    R: LenderRepository + 'static,
{
    match service.set_status(&LenderId(lender_id), request.status) {
        Ok(lender) => (StatusCode::OK, Json(lender.summary_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn add_configuration_handler<R>(
    State(service): State<Arc<LenderService<R>>>,
    Path(lender_id): Path<String>,
    Json(draft): Json<ConfigurationDraft>,
) -> Response
where
    R: LenderRepository + 'static,
{
    match service.add_configuration(&LenderId(lender_id), draft) {
        Ok(configuration) => (StatusCode::CREATED, Json(configuration)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_configuration_handler<R>(
    State(service): State<Arc<LenderService<R>>>,
    Path((lender_id, configuration_id)): Path<(String, String)>,
    Json(draft): Json<ConfigurationDraft>,
) -> Response
where
    R: LenderRepository + 'static,
{
    match service.update_configuration(
        &LenderId(lender_id),
        &ConfigurationId(configuration_id),
        draft,
    ) {
        Ok(configuration) => (StatusCode::OK, Json(configuration)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn remove_configuration_handler<R>(
    State(service): State<Arc<LenderService<R>>>,
    Path((lender_id, configuration_id)): Path<(String, String)>,
) -> Response
where
    R: LenderRepository + 'static,
{
    match service.remove_configuration(&LenderId(lender_id), &ConfigurationId(configuration_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn toggle_industry_handler<R>(
    State(service): State<Arc<LenderService<R>>>,
    Path((lender_id, configuration_id)): Path<(String, String)>,
    Json(request): Json<ConditionalIndustryRequest>,
) -> Response
where
    R: LenderRepository + 'static,
{
    match service.toggle_conditional_industry(
        &LenderId(lender_id),
        &ConfigurationId(configuration_id),
        &request.industry,
    ) {
        Ok((outcome, configuration)) => (
            StatusCode::OK,
            Json(ToggleResponse {
                outcome,
                configuration,
            }),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn conditional_revenue_handler<R>(
    State(service): State<Arc<LenderService<R>>>,
    Path((lender_id, configuration_id)): Path<(String, String)>,
    Json(request): Json<ConditionalRevenueRequest>,
) -> Response
where
    R: LenderRepository + 'static,
{
    match service.set_conditional_revenue(
        &LenderId(lender_id),
        &ConfigurationId(configuration_id),
        &request.industry,
        request.minimum_revenue,
    ) {
        Ok(configuration) => (StatusCode::OK, Json(configuration)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(error: LenderServiceError) -> Response {
    match error {
        LenderServiceError::Validation(errors) => {
            let payload = json!({
                "error": "validation failed",
                "issues": errors.issues,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        LenderServiceError::Conditional(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        LenderServiceError::Repository(RepositoryError::Conflict) => {
            let payload = json!({ "error": "lender name already exists" });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        error @ LenderServiceError::DuplicateLenderType { .. } => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::CONFLICT, Json(payload)).into_response()
        }
        LenderServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({ "error": "lender not found" });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        error @ LenderServiceError::ConfigurationNotFound(_) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

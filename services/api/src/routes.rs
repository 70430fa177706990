use crate::infra::{AppState, FundingServices};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use lender_match::workflows::funding::deals::deal_router;
use lender_match::workflows::funding::lenders::lender_router;
use lender_match::workflows::funding::matching::matching_router;
use lender_match::workflows::funding::taxonomy_router;
use serde_json::json;

pub(crate) fn with_funding_routes(services: &FundingServices) -> axum::Router {
    lender_router(services.lenders.clone())
        .merge(deal_router(services.deals.clone()))
        .merge(matching_router(services.matching.clone()))
        .merge(taxonomy_router())
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(ready: bool) -> (axum::Router, Arc<AtomicBool>) {
        let readiness = Arc::new(AtomicBool::new(ready));
        let state = AppState {
            readiness: readiness.clone(),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        let router = with_funding_routes(&FundingServices::in_memory()).layer(Extension(state));
        (router, readiness)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).expect("request builds")
    }

    #[tokio::test]
    async fn readiness_tracks_the_flag() {
        let (router, readiness) = app(false);

        let response = router
            .clone()
            .oneshot(get("/ready"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        readiness.store(true, Ordering::Release);
        let response = router.oneshot(get("/ready")).await.expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_and_metrics_respond() {
        let (router, _) = app(true);

        let response = router
            .clone()
            .oneshot(get("/health"))
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let response = router.oneshot(get("/metrics")).await.expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn funding_routes_are_mounted() {
        let (router, _) = app(true);

        for uri in ["/api/v1/lenders", "/api/v1/deals", "/api/v1/taxonomy"] {
            let response = router
                .clone()
                .oneshot(get(uri))
                .await
                .expect("route executes");
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }
}

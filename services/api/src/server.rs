use crate::cli::ServeArgs;
use crate::infra::{AppState, FundingServices};
use crate::routes::with_funding_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use lender_match::config::AppConfig;
use lender_match::error::AppError;
use lender_match::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.lender_catalog.take() {
        config.catalog.lender_catalog = Some(path);
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let services = FundingServices::in_memory();
    if let Some(path) = config.catalog.lender_catalog.as_deref() {
        services.import_catalog(path)?;
    }

    let app = with_funding_routes(&services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(environment = config.environment.label(), %addr, "lender matching service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

use chrono::NaiveDate;
use lender_match::error::AppError;
use lender_match::workflows::funding::deals::{DealProfile, DealService};
use lender_match::workflows::funding::lenders::LenderService;
use lender_match::workflows::funding::matching::MatchingService;
use lender_match::workflows::funding::{
    InMemoryDealRepository, InMemoryLenderRepository, LenderCatalogImporter,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Services wired over shared in-memory stores.
#[derive(Clone)]
pub(crate) struct FundingServices {
    pub(crate) lenders: Arc<LenderService<InMemoryLenderRepository>>,
    pub(crate) deals: Arc<DealService<InMemoryDealRepository>>,
    pub(crate) matching: Arc<MatchingService<InMemoryLenderRepository, InMemoryDealRepository>>,
}

impl FundingServices {
    pub(crate) fn in_memory() -> Self {
        let lender_repository = Arc::new(InMemoryLenderRepository::default());
        let deal_repository = Arc::new(InMemoryDealRepository::default());

        Self {
            lenders: Arc::new(LenderService::new(lender_repository.clone())),
            deals: Arc::new(DealService::new(deal_repository.clone())),
            matching: Arc::new(MatchingService::new(lender_repository, deal_repository)),
        }
    }

    pub(crate) fn import_catalog(&self, path: &Path) -> Result<usize, AppError> {
        let drafts = LenderCatalogImporter::from_path(path)?;
        let imported = LenderCatalogImporter::import_into(&self.lenders, drafts)?;
        info!(path = %path.display(), lenders = imported.len(), "lender catalog loaded");
        Ok(imported.len())
    }
}

/// Read a JSON array of deal profiles.
pub(crate) fn read_deals(path: &Path) -> Result<Vec<DealProfile>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let deals: Vec<DealProfile> = serde_json::from_str(&raw)?;
    if deals.is_empty() {
        return Err(AppError::Input(format!(
            "{} does not contain any deals",
            path.display()
        )));
    }
    Ok(deals)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::funding::industry::{filtered_industry, taxonomy_industry};
use crate::workflows::funding::validation::FieldIssue;

/// Identifier wrapper for funding deals.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DealId(pub String);

/// Number of deposit months a statement-based revenue entry carries.
pub const DEPOSIT_MONTHS: usize = 4;

/// Revenue is captured either as a single monthly average or as individual bank deposits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RevenueInput {
    MonthlyAverage { amount: u64 },
    DepositMonths { months: Vec<u64> },
}

impl RevenueInput {
    /// Monthly revenue used for lender minimums. Incomplete deposit months resolve to `None`.
    pub fn effective_monthly(&self) -> Option<f64> {
        match self {
            RevenueInput::MonthlyAverage { amount } => Some(*amount as f64),
            RevenueInput::DepositMonths { months } if months.len() == DEPOSIT_MONTHS => {
                let total: u64 = months.iter().sum();
                Some(total as f64 / DEPOSIT_MONTHS as f64)
            }
            RevenueInput::DepositMonths { .. } => None,
        }
    }
}

/// Broker-entered attributes of a funding application.
///
/// Every attribute except the business name is optional so drafts and partial imports can be
/// stored. The matcher treats missing values as failing the criterion that needs them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealProfile {
    #[serde(default)]
    pub business_name: String,
    pub state: Option<String>,
    pub business_start_date: Option<NaiveDate>,
    pub revenue: Option<RevenueInput>,
    pub positions: Option<u32>,
    pub nsfs: Option<u32>,
    pub fico: Option<u16>,
    pub entity_type: Option<String>,
    pub raw_industry: Option<String>,
    pub has_defaults: Option<bool>,
    pub defaults_settled: Option<bool>,
}

impl DealProfile {
    /// Taxonomy entry for the raw industry after alias resolution.
    pub fn industry(&self) -> Option<&str> {
        self.raw_industry
            .as_deref()
            .map(taxonomy_industry)
            .filter(|value| !value.is_empty())
    }

    /// Parent category of [`DealProfile::industry`].
    pub fn filtered_industry(&self) -> Option<&str> {
        self.raw_industry
            .as_deref()
            .map(filtered_industry)
            .filter(|value| !value.is_empty())
    }

    pub fn monthly_revenue(&self) -> Option<f64> {
        self.revenue.as_ref().and_then(RevenueInput::effective_monthly)
    }

    /// Whole calendar months in business as of the given date.
    pub fn months_in_business(&self, as_of: NaiveDate) -> Option<u32> {
        self.business_start_date
            .map(|start| months_between(start, as_of))
    }
}

/// Count whole months from `start` to `end`; a month counts once its day-of-month is reached.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    if end <= start {
        return 0;
    }

    let mut months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    if end.day() < start.day() {
        months -= 1;
    }
    months.max(0) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStatus {
    Draft,
    Ready,
}

impl DealStatus {
    pub const fn label(self) -> &'static str {
        match self {
            DealStatus::Draft => "draft",
            DealStatus::Ready => "ready",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "ready" => Some(Self::Ready),
            _ => None,
        }
    }
}

/// Stored deal with its completeness status and outstanding validation issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub id: DealId,
    #[serde(flatten)]
    pub profile: DealProfile,
    pub status: DealStatus,
    #[serde(default)]
    pub issues: Vec<FieldIssue>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Deal {
    pub fn view(&self) -> DealView {
        DealView {
            deal_id: self.id.clone(),
            business_name: self.profile.business_name.clone(),
            state: self.profile.state.clone(),
            raw_industry: self.profile.raw_industry.clone(),
            filtered_industry: self.profile.filtered_industry().map(str::to_string),
            monthly_revenue: self.profile.monthly_revenue(),
            status: self.status.label(),
            issues: self.issues.clone(),
        }
    }
}

/// Listing row returned by deal search.
#[derive(Debug, Clone, Serialize)]
pub struct DealView {
    pub deal_id: DealId,
    pub business_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filtered_industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_revenue: Option<f64>,
    pub status: &'static str,
    pub issues: Vec<FieldIssue>,
}

/// Search filter for listing deals. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealFilter {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub status: Option<DealStatus>,
    #[serde(default)]
    pub q: Option<String>,
}

impl DealFilter {
    pub fn matches(&self, deal: &Deal) -> bool {
        if let Some(state) = self.state.as_deref() {
            if !deal
                .profile
                .state
                .as_deref()
                .is_some_and(|value| value.eq_ignore_ascii_case(state))
            {
                return false;
            }
        }

        if let Some(industry) = self.industry.as_deref() {
            let raw = deal.profile.industry();
            let filtered = deal.profile.filtered_industry();
            let hit = [raw, filtered]
                .into_iter()
                .flatten()
                .any(|value| value.eq_ignore_ascii_case(industry));
            if !hit {
                return false;
            }
        }

        if let Some(status) = self.status {
            if deal.status != status {
                return false;
            }
        }

        if let Some(query) = self.q.as_deref() {
            let needle = query.trim().to_lowercase();
            if !needle.is_empty() && !deal.profile.business_name.to_lowercase().contains(&needle) {
                return false;
            }
        }

        true
    }
}

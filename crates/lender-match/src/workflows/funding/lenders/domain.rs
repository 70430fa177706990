use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::conditional::ConditionalRevenueTable;

/// Identifier wrapper for lenders.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LenderId(pub String);

/// Identifier wrapper for a single lender configuration.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConfigurationId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LenderStatus {
    #[default]
    Active,
    Inactive,
}

impl LenderStatus {
    pub const fn label(self) -> &'static str {
        match self {
            LenderStatus::Active => "active",
            LenderStatus::Inactive => "inactive",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// Product line a configuration applies to. A lender publishes at most one configuration per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LenderType {
    Straight,
    Consolidators,
    #[serde(rename = "Line Of Credits")]
    LineOfCredits,
}

impl LenderType {
    pub const ALL: [LenderType; 3] = [
        LenderType::Straight,
        LenderType::Consolidators,
        LenderType::LineOfCredits,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            LenderType::Straight => "Straight",
            LenderType::Consolidators => "Consolidators",
            LenderType::LineOfCredits => "Line Of Credits",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(trimmed))
    }
}

/// Tolerance for bankruptcy or default history on the applicant's credit file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BkPolicy {
    #[default]
    Flexible,
    CaseByCase,
    Strict,
}

impl BkPolicy {
    pub const ALL: [BkPolicy; 3] = [BkPolicy::Flexible, BkPolicy::CaseByCase, BkPolicy::Strict];

    pub const fn label(self) -> &'static str {
        match self {
            BkPolicy::Flexible => "flexible",
            BkPolicy::CaseByCase => "case-by-case",
            BkPolicy::Strict => "strict",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace(' ', "-");
        Self::ALL
            .into_iter()
            .find(|policy| policy.label() == normalized)
    }
}

/// Eligibility criteria a lender applies to deals of one lender type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LenderConfiguration {
    pub id: ConfigurationId,
    pub lender_type: LenderType,
    pub min_positions: u32,
    pub max_positions: u32,
    pub min_time_in_business_months: u32,
    pub min_revenue: u64,
    pub min_fico: u16,
    pub max_nsfs: u32,
    pub restricted_states: BTreeSet<String>,
    pub restricted_entity_types: BTreeSet<String>,
    pub restricted_industries: BTreeSet<String>,
    #[serde(flatten)]
    pub conditional: ConditionalRevenueTable,
    pub bk_policy: BkPolicy,
}

impl LenderConfiguration {
    pub fn from_draft(id: ConfigurationId, draft: ConfigurationDraft) -> Self {
        let conditional = ConditionalRevenueTable::assemble(
            &draft.conditional_industries,
            &draft.conditional_revenues,
        );

        Self {
            id,
            lender_type: draft.lender_type,
            min_positions: draft.min_positions,
            max_positions: draft.max_positions,
            min_time_in_business_months: draft.min_time_in_business_months,
            min_revenue: draft.min_revenue,
            min_fico: draft.min_fico,
            max_nsfs: draft.max_nsfs,
            restricted_states: draft.restricted_states,
            restricted_entity_types: draft.restricted_entity_types,
            restricted_industries: draft.restricted_industries,
            conditional,
            bk_policy: draft.bk_policy,
        }
    }

    /// Minimum revenue for a deal. A selected taxonomy industry wins over a selected parent;
    /// anything else falls back to the baseline `min_revenue`.
    pub fn minimum_revenue_for(&self, industry: Option<&str>, parent: Option<&str>) -> u64 {
        industry
            .and_then(|value| self.conditional.selected_revenue(value))
            .or_else(|| parent.and_then(|value| self.conditional.selected_revenue(value)))
            .unwrap_or(self.min_revenue)
    }
}

/// Inbound payload describing a configuration before it receives an identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationDraft {
    pub lender_type: LenderType,
    #[serde(default)]
    pub min_positions: u32,
    #[serde(default)]
    pub max_positions: u32,
    #[serde(default)]
    pub min_time_in_business_months: u32,
    #[serde(default)]
    pub min_revenue: u64,
    pub min_fico: u16,
    #[serde(default)]
    pub max_nsfs: u32,
    #[serde(default)]
    pub restricted_states: BTreeSet<String>,
    #[serde(default)]
    pub restricted_entity_types: BTreeSet<String>,
    #[serde(default)]
    pub restricted_industries: BTreeSet<String>,
    #[serde(default)]
    pub conditional_industries: BTreeSet<String>,
    #[serde(default)]
    pub conditional_revenues: BTreeMap<String, u64>,
    #[serde(default)]
    pub bk_policy: BkPolicy,
}

impl From<&LenderConfiguration> for ConfigurationDraft {
    fn from(configuration: &LenderConfiguration) -> Self {
        Self {
            lender_type: configuration.lender_type,
            min_positions: configuration.min_positions,
            max_positions: configuration.max_positions,
            min_time_in_business_months: configuration.min_time_in_business_months,
            min_revenue: configuration.min_revenue,
            min_fico: configuration.min_fico,
            max_nsfs: configuration.max_nsfs,
            restricted_states: configuration.restricted_states.clone(),
            restricted_entity_types: configuration.restricted_entity_types.clone(),
            restricted_industries: configuration.restricted_industries.clone(),
            conditional_industries: configuration.conditional.industries().clone(),
            conditional_revenues: configuration.conditional.revenues().clone(),
            bk_policy: configuration.bk_policy,
        }
    }
}

/// Lender with its per-type eligibility configurations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lender {
    pub id: LenderId,
    pub name: String,
    pub status: LenderStatus,
    pub created_at: DateTime<Utc>,
    pub configurations: Vec<LenderConfiguration>,
}

impl Lender {
    pub fn is_active(&self) -> bool {
        self.status == LenderStatus::Active
    }

    pub fn configuration(&self, id: &ConfigurationId) -> Option<&LenderConfiguration> {
        self.configurations
            .iter()
            .find(|configuration| &configuration.id == id)
    }

    pub fn configuration_mut(&mut self, id: &ConfigurationId) -> Option<&mut LenderConfiguration> {
        self.configurations
            .iter_mut()
            .find(|configuration| &configuration.id == id)
    }

    pub fn offers(&self, lender_type: LenderType) -> bool {
        self.configurations
            .iter()
            .any(|configuration| configuration.lender_type == lender_type)
    }

    pub fn summary_view(&self) -> LenderSummaryView {
        LenderSummaryView {
            lender_id: self.id.clone(),
            name: self.name.clone(),
            status: self.status.label(),
            lender_types: self
                .configurations
                .iter()
                .map(|configuration| configuration.lender_type.label())
                .collect(),
            created_at: self.created_at,
        }
    }
}

/// Inbound payload for creating a lender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LenderDraft {
    pub name: String,
    #[serde(default)]
    pub status: LenderStatus,
    #[serde(default)]
    pub configurations: Vec<ConfigurationDraft>,
}

/// Compact listing row used by admin screens.
#[derive(Debug, Clone, Serialize)]
pub struct LenderSummaryView {
    pub lender_id: LenderId,
    pub name: String,
    pub status: &'static str,
    pub lender_types: Vec<&'static str>,
    pub created_at: DateTime<Utc>,
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::workflows::funding::deals::domain::DealProfile;
use crate::workflows::funding::industry::{taxonomy_entity_type, taxonomy_state};
use crate::workflows::funding::lenders::domain::{BkPolicy, LenderConfiguration};

/// The nine conjunctive eligibility checks a deal must pass for a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Positions,
    Fico,
    TimeInBusiness,
    Revenue,
    Nsfs,
    State,
    EntityType,
    Industry,
    DefaultPolicy,
}

impl Criterion {
    pub const ALL: [Criterion; 9] = [
        Criterion::Positions,
        Criterion::Fico,
        Criterion::TimeInBusiness,
        Criterion::Revenue,
        Criterion::Nsfs,
        Criterion::State,
        Criterion::EntityType,
        Criterion::Industry,
        Criterion::DefaultPolicy,
    ];

    /// Feedback reported when the deal fails this criterion.
    pub const fn failure_message(self) -> &'static str {
        match self {
            Criterion::Positions => "Position outside acceptable range",
            Criterion::Fico => "FICO score too low",
            Criterion::TimeInBusiness => "Time in business insufficient",
            Criterion::Revenue => "Revenue requirements not met",
            Criterion::Nsfs => "NSF count too high",
            Criterion::State => "State restrictions apply",
            Criterion::EntityType => "Entity type restricted",
            Criterion::Industry => "Industry restricted",
            Criterion::DefaultPolicy => "Default/bankruptcy policy not satisfied",
        }
    }
}

/// Result of a single criterion. Missing deal data never passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriterionOutcome {
    Passed,
    Failed,
    Missing(&'static str),
}

impl CriterionOutcome {
    pub fn passed(self) -> bool {
        matches!(self, CriterionOutcome::Passed)
    }

    fn from_check(passed: bool) -> Self {
        if passed {
            CriterionOutcome::Passed
        } else {
            CriterionOutcome::Failed
        }
    }

    /// Feedback line for a non-passing outcome.
    pub fn feedback(self, criterion: Criterion) -> Option<String> {
        match self {
            CriterionOutcome::Passed => None,
            CriterionOutcome::Failed => Some(criterion.failure_message().to_string()),
            CriterionOutcome::Missing(field) => Some(format!(
                "Missing {field} - {}",
                criterion.failure_message()
            )),
        }
    }
}

pub(crate) fn check(
    criterion: Criterion,
    deal: &DealProfile,
    configuration: &LenderConfiguration,
    as_of: NaiveDate,
) -> CriterionOutcome {
    match criterion {
        Criterion::Positions => check_positions(deal, configuration),
        Criterion::Fico => check_fico(deal, configuration),
        Criterion::TimeInBusiness => check_time_in_business(deal, configuration, as_of),
        Criterion::Revenue => check_revenue(deal, configuration),
        Criterion::Nsfs => check_nsfs(deal, configuration),
        Criterion::State => check_state(deal, configuration),
        Criterion::EntityType => check_entity_type(deal, configuration),
        Criterion::Industry => check_industry(deal, configuration),
        Criterion::DefaultPolicy => check_default_policy(deal, configuration),
    }
}

fn check_positions(deal: &DealProfile, configuration: &LenderConfiguration) -> CriterionOutcome {
    match deal.positions {
        Some(positions) => CriterionOutcome::from_check(
            (configuration.min_positions..=configuration.max_positions).contains(&positions),
        ),
        None => CriterionOutcome::Missing("position count"),
    }
}

fn check_fico(deal: &DealProfile, configuration: &LenderConfiguration) -> CriterionOutcome {
    match deal.fico {
        Some(score) => CriterionOutcome::from_check(score >= configuration.min_fico),
        None => CriterionOutcome::Missing("FICO score"),
    }
}

fn check_time_in_business(
    deal: &DealProfile,
    configuration: &LenderConfiguration,
    as_of: NaiveDate,
) -> CriterionOutcome {
    match deal.months_in_business(as_of) {
        Some(months) => {
            CriterionOutcome::from_check(months >= configuration.min_time_in_business_months)
        }
        None => CriterionOutcome::Missing("business start date"),
    }
}

fn check_revenue(deal: &DealProfile, configuration: &LenderConfiguration) -> CriterionOutcome {
    let Some(revenue) = deal.monthly_revenue() else {
        return CriterionOutcome::Missing("revenue");
    };

    let minimum = configuration.minimum_revenue_for(deal.industry(), deal.filtered_industry());
    CriterionOutcome::from_check(revenue >= minimum as f64)
}

fn check_nsfs(deal: &DealProfile, configuration: &LenderConfiguration) -> CriterionOutcome {
    match deal.nsfs {
        Some(nsfs) => CriterionOutcome::from_check(nsfs <= configuration.max_nsfs),
        None => CriterionOutcome::Missing("NSF count"),
    }
}

// Values outside the taxonomy count as missing, so an unrecognised spelling cannot slip past a
// restriction.
fn check_state(deal: &DealProfile, configuration: &LenderConfiguration) -> CriterionOutcome {
    match deal.state.as_deref().and_then(taxonomy_state) {
        Some(state) => {
            CriterionOutcome::from_check(!configuration.restricted_states.contains(state))
        }
        None => CriterionOutcome::Missing("state"),
    }
}

fn check_entity_type(deal: &DealProfile, configuration: &LenderConfiguration) -> CriterionOutcome {
    match deal.entity_type.as_deref().and_then(taxonomy_entity_type) {
        Some(entity) => {
            CriterionOutcome::from_check(!configuration.restricted_entity_types.contains(entity))
        }
        None => CriterionOutcome::Missing("entity type"),
    }
}

fn check_industry(deal: &DealProfile, configuration: &LenderConfiguration) -> CriterionOutcome {
    let (Some(industry), Some(parent)) = (deal.industry(), deal.filtered_industry()) else {
        return CriterionOutcome::Missing("industry");
    };

    let restricted = &configuration.restricted_industries;
    CriterionOutcome::from_check(!restricted.contains(industry) && !restricted.contains(parent))
}

fn check_default_policy(
    deal: &DealProfile,
    configuration: &LenderConfiguration,
) -> CriterionOutcome {
    match configuration.bk_policy {
        BkPolicy::Flexible => CriterionOutcome::Passed,
        BkPolicy::Strict => match deal.has_defaults {
            Some(has_defaults) => CriterionOutcome::from_check(!has_defaults),
            None => CriterionOutcome::Missing("default history"),
        },
        BkPolicy::CaseByCase => match (deal.has_defaults, deal.defaults_settled) {
            (None, _) => CriterionOutcome::Missing("default history"),
            (Some(false), _) => CriterionOutcome::Passed,
            (Some(true), Some(settled)) => CriterionOutcome::from_check(settled),
            (Some(true), None) => CriterionOutcome::Missing("default settlement status"),
        },
    }
}

use chrono::NaiveDate;

use super::domain::{DealProfile, RevenueInput, DEPOSIT_MONTHS};
use crate::workflows::funding::industry::{is_known_entity_type, is_known_state};
use crate::workflows::funding::validation::{check_fico, ValidationErrors};

/// Report everything that keeps a deal from being ready for matching.
pub fn validate_deal(profile: &DealProfile, today: NaiveDate) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if profile.business_name.trim().is_empty() {
        errors.push("business_name", "business name is required");
    }

    match profile.state.as_deref() {
        None => errors.push("state", "state is required"),
        Some(state) if !is_known_state(state) => {
            errors.push("state", format!("'{state}' is not a US state or DC"))
        }
        Some(_) => {}
    }

    match profile.business_start_date {
        None => errors.push("business_start_date", "business start date is required"),
        Some(start) if start > today => errors.push(
            "business_start_date",
            format!("{start} is in the future"),
        ),
        Some(_) => {}
    }

    match &profile.revenue {
        None => errors.push("revenue", "monthly average or deposit months are required"),
        Some(RevenueInput::DepositMonths { months }) if months.len() != DEPOSIT_MONTHS => {
            errors.push(
                "revenue.months",
                format!(
                    "exactly {DEPOSIT_MONTHS} deposit months are required (found {})",
                    months.len()
                ),
            )
        }
        Some(_) => {}
    }

    if profile.positions.is_none() {
        errors.push("positions", "open position count is required");
    }
    if profile.nsfs.is_none() {
        errors.push("nsfs", "NSF count is required");
    }

    match profile.fico {
        None => errors.push("fico", "FICO score is required"),
        Some(score) => check_fico(&mut errors, "fico", score),
    }

    match profile.entity_type.as_deref() {
        None => errors.push("entity_type", "entity type is required"),
        Some(entity) if !is_known_entity_type(entity) => {
            errors.push("entity_type", format!("'{entity}' is not a recognized entity type"))
        }
        Some(_) => {}
    }

    if profile
        .raw_industry
        .as_deref()
        .map_or(true, |industry| industry.trim().is_empty())
    {
        errors.push("raw_industry", "industry is required");
    }

    match (profile.has_defaults, profile.defaults_settled) {
        (None, _) => errors.push("has_defaults", "default history must be answered"),
        (Some(true), None) => errors.push(
            "defaults_settled",
            "settlement status is required when defaults are reported",
        ),
        (Some(false), Some(_)) => errors.push(
            "defaults_settled",
            "only applies when defaults are reported",
        ),
        _ => {}
    }

    errors
}

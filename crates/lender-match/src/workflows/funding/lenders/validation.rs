use std::collections::BTreeSet;

use super::domain::{ConfigurationDraft, LenderDraft, LenderType};
use crate::workflows::funding::industry::{
    is_known_entity_type, is_known_industry, is_known_state, normalize,
};
use crate::workflows::funding::validation::{check_fico, check_members, ValidationErrors};

/// Check a configuration's thresholds and categorical selections.
pub fn validate_configuration(draft: &ConfigurationDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    check_fico(&mut errors, "min_fico", draft.min_fico);

    if draft.max_positions < draft.min_positions {
        errors.push(
            "max_positions",
            format!(
                "must be at least min_positions ({} < {})",
                draft.max_positions, draft.min_positions
            ),
        );
    }

    check_members(
        &mut errors,
        "restricted_states",
        &draft.restricted_states,
        is_known_state,
    );
    check_members(
        &mut errors,
        "restricted_entity_types",
        &draft.restricted_entity_types,
        is_known_entity_type,
    );
    check_members(
        &mut errors,
        "restricted_industries",
        &draft.restricted_industries,
        is_known_industry,
    );
    check_members(
        &mut errors,
        "conditional_industries",
        &draft.conditional_industries,
        is_known_industry,
    );

    for industry in draft.conditional_revenues.keys() {
        let required = draft
            .conditional_industries
            .iter()
            .any(|selected| selected == industry || normalize(selected) == industry);
        if !required {
            errors.push(
                "conditional_revenues",
                format!("'{industry}' has a revenue but is not a selected conditional industry"),
            );
        }
    }

    errors
}

/// Check a new lender, including every nested configuration.
pub fn validate_lender(draft: &LenderDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if draft.name.trim().is_empty() {
        errors.push("name", "lender name is required");
    }

    let mut seen: BTreeSet<LenderType> = BTreeSet::new();
    for (index, configuration) in draft.configurations.iter().enumerate() {
        if !seen.insert(configuration.lender_type) {
            errors.push(
                format!("configurations[{index}].lender_type"),
                format!(
                    "{} is already configured for this lender",
                    configuration.lender_type.label()
                ),
            );
        }
        let nested = validate_configuration(configuration).nest(&format!("configurations[{index}]"));
        errors.extend(nested);
    }

    errors
}

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::MatchEngine;
use crate::workflows::funding::deals::domain::{DealId, DealProfile};
use crate::workflows::funding::lenders::domain::{
    ConfigurationId, Lender, LenderConfiguration, LenderId, LenderType,
};

/// Feedback reported for every lender when a requested deal does not exist.
pub const DEAL_NOT_FOUND: &str = "Deal record not found";

/// A lender configuration paired with the lender identity it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct LenderCandidate {
    pub lender_id: LenderId,
    pub lender_name: String,
    pub configuration: LenderConfiguration,
}

/// Flatten active lenders into matchable configurations, preserving lender and configuration order.
pub fn candidates_from(lenders: &[Lender]) -> Vec<LenderCandidate> {
    lenders
        .iter()
        .filter(|lender| lender.is_active())
        .flat_map(|lender| {
            lender
                .configurations
                .iter()
                .map(move |configuration| LenderCandidate {
                    lender_id: lender.id.clone(),
                    lender_name: lender.name.clone(),
                    configuration: configuration.clone(),
                })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LenderMatch {
    pub lender_id: LenderId,
    pub lender_name: String,
    pub configuration_id: ConfigurationId,
    pub lender_type: LenderType,
    pub matched: bool,
    pub feedback: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealMatchResult {
    pub deal_id: DealId,
    pub deal_name: Option<String>,
    pub lender_matches: Vec<LenderMatch>,
}

impl DealMatchResult {
    pub fn matched_lenders(&self) -> impl Iterator<Item = &LenderMatch> {
        self.lender_matches.iter().filter(|entry| entry.matched)
    }
}

/// Batch result for one matching run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRun {
    pub total_deals_processed: usize,
    pub total_lenders_checked: usize,
    pub results: Vec<DealMatchResult>,
}

/// Evaluate each requested deal against every candidate configuration.
///
/// Results follow the order of `deal_ids`. Unknown deals still produce an entry whose lender
/// matches all fail with [`DEAL_NOT_FOUND`].
pub fn match_deals<'a, F>(
    engine: &MatchEngine,
    deal_ids: &[DealId],
    lookup: F,
    candidates: &[LenderCandidate],
) -> MatchRun
where
    F: Fn(&DealId) -> Option<&'a DealProfile>,
{
    let mut results = Vec::with_capacity(deal_ids.len());

    for deal_id in deal_ids {
        let deal = lookup(deal_id);
        let lender_matches = candidates
            .iter()
            .map(|candidate| {
                let (matched, feedback) = match deal {
                    Some(profile) => {
                        let evaluation = engine.evaluate(profile, &candidate.configuration);
                        (evaluation.matched, evaluation.feedback)
                    }
                    None => (false, vec![DEAL_NOT_FOUND.to_string()]),
                };

                LenderMatch {
                    lender_id: candidate.lender_id.clone(),
                    lender_name: candidate.lender_name.clone(),
                    configuration_id: candidate.configuration.id.clone(),
                    lender_type: candidate.configuration.lender_type,
                    matched,
                    feedback,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            deal_id = %deal_id.0,
            matched = lender_matches.iter().filter(|entry| entry.matched).count(),
            checked = lender_matches.len(),
            "deal evaluated"
        );

        results.push(DealMatchResult {
            deal_id: deal_id.clone(),
            deal_name: deal.map(|profile| profile.business_name.clone()),
            lender_matches,
        });
    }

    let total_lenders_checked = if deal_ids.is_empty() {
        0
    } else {
        candidates
            .iter()
            .map(|candidate| &candidate.configuration.id)
            .collect::<BTreeSet<_>>()
            .len()
    };

    MatchRun {
        total_deals_processed: results.len(),
        total_lenders_checked,
        results,
    }
}

use crate::infra::{read_deals, FundingServices};
use chrono::NaiveDate;
use clap::Args;
use lender_match::error::AppError;
use lender_match::workflows::funding::deals::{DealId, DealProfile, RevenueInput};
use lender_match::workflows::funding::lenders::{
    BkPolicy, ConfigurationDraft, LenderDraft, LenderStatus, LenderType,
};
use lender_match::workflows::funding::matching::{MatchRequest, MatchRun};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    /// Lender catalog CSV (one configuration per row)
    #[arg(long)]
    pub(crate) lenders: PathBuf,
    /// JSON array of deal profiles. Deals receive ids deal-000001, deal-000002, ... in file order.
    #[arg(long)]
    pub(crate) deals: PathBuf,
    /// Reference date for time-in-business (defaults to the current UTC date)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
    /// Restrict the run to specific deal ids (repeatable)
    #[arg(long = "deal-id")]
    pub(crate) deal_ids: Vec<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference date for time-in-business (defaults to the current UTC date)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

pub(crate) fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let MatchArgs {
        lenders,
        deals,
        as_of,
        deal_ids,
    } = args;

    let services = FundingServices::in_memory();
    services.import_catalog(&lenders)?;
    for profile in read_deals(&deals)? {
        services.deals.create(profile).map_err(|err| AppError::Input(err.to_string()))?;
    }

    let run = services
        .matching
        .run(MatchRequest {
            deal_ids: deal_ids.into_iter().map(DealId).collect(),
            as_of,
        })
        .map_err(|err| AppError::Input(err.to_string()))?;

    println!("{}", serde_json::to_string_pretty(&run)?);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let as_of = MatchRequest {
        as_of: args.as_of,
        ..MatchRequest::default()
    }
    .effective_as_of();
    let run = seeded_run(as_of)?;

    println!("Lender match demo (as of {as_of})");
    print!("{}", render_report(&run));
    Ok(())
}

fn seeded_run(as_of: NaiveDate) -> Result<MatchRun, AppError> {
    let services = FundingServices::in_memory();
    for draft in sample_lenders() {
        services
            .lenders
            .create(draft)
            .map_err(|err| AppError::Input(err.to_string()))?;
    }
    for profile in sample_deals() {
        services
            .deals
            .create(profile)
            .map_err(|err| AppError::Input(err.to_string()))?;
    }

    services
        .matching
        .run(MatchRequest {
            deal_ids: Vec::new(),
            as_of: Some(as_of),
        })
        .map_err(|err| AppError::Input(err.to_string()))
}

pub(crate) fn render_report(run: &MatchRun) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} deals checked against {} lender configurations",
        run.total_deals_processed, run.total_lenders_checked
    );

    for result in &run.results {
        let name = result.deal_name.as_deref().unwrap_or("(unknown deal)");
        let _ = writeln!(
            out,
            "\n{} {}: {} of {} configurations match",
            result.deal_id.0,
            name,
            result.matched_lenders().count(),
            result.lender_matches.len()
        );
        for entry in &result.lender_matches {
            let marker = if entry.matched { "[match]   " } else { "[no match]" };
            let _ = write!(
                out,
                "  {marker} {} ({})",
                entry.lender_name,
                entry.lender_type.label()
            );
            if entry.matched {
                let _ = writeln!(out);
            } else {
                let _ = writeln!(out, ": {}", entry.feedback.join("; "));
            }
        }
    }

    out
}

fn date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn names<const N: usize>(values: [&str; N]) -> BTreeSet<String> {
    values.into_iter().map(str::to_string).collect()
}

fn configuration(lender_type: LenderType) -> ConfigurationDraft {
    ConfigurationDraft {
        lender_type,
        min_positions: 0,
        max_positions: 4,
        min_time_in_business_months: 6,
        min_revenue: 10_000,
        min_fico: 550,
        max_nsfs: 5,
        restricted_states: BTreeSet::new(),
        restricted_entity_types: BTreeSet::new(),
        restricted_industries: BTreeSet::new(),
        conditional_industries: BTreeSet::new(),
        conditional_revenues: BTreeMap::new(),
        bk_policy: BkPolicy::Flexible,
    }
}

fn sample_lenders() -> Vec<LenderDraft> {
    let northwind_straight = ConfigurationDraft {
        max_positions: 3,
        min_time_in_business_months: 12,
        min_revenue: 20_000,
        min_fico: 600,
        max_nsfs: 3,
        restricted_states: names(["NY"]),
        restricted_industries: names(["Cannabis", "Gambling"]),
        bk_policy: BkPolicy::CaseByCase,
        ..configuration(LenderType::Straight)
    };
    let northwind_consolidators = ConfigurationDraft {
        min_positions: 2,
        max_positions: 6,
        min_time_in_business_months: 24,
        min_revenue: 40_000,
        min_fico: 620,
        max_nsfs: 2,
        bk_policy: BkPolicy::Strict,
        ..configuration(LenderType::Consolidators)
    };
    let prairie_straight = ConfigurationDraft {
        conditional_industries: names(["Agriculture", "Auto - Towing"]),
        conditional_revenues: [
            ("Agriculture".to_string(), 60_000),
            ("Auto - Towing".to_string(), 35_000),
        ]
        .into_iter()
        .collect(),
        min_fico: 560,
        ..configuration(LenderType::Straight)
    };
    let summit_line = ConfigurationDraft {
        max_positions: 1,
        min_time_in_business_months: 36,
        min_revenue: 50_000,
        min_fico: 680,
        max_nsfs: 0,
        restricted_entity_types: names(["Sole Proprietorship"]),
        bk_policy: BkPolicy::Strict,
        ..configuration(LenderType::LineOfCredits)
    };

    vec![
        LenderDraft {
            name: "Northwind Capital".to_string(),
            status: LenderStatus::Active,
            configurations: vec![northwind_straight, northwind_consolidators],
        },
        LenderDraft {
            name: "Prairie Growth Partners".to_string(),
            status: LenderStatus::Active,
            configurations: vec![prairie_straight],
        },
        LenderDraft {
            name: "Summit Line Funding".to_string(),
            status: LenderStatus::Active,
            configurations: vec![summit_line],
        },
        LenderDraft {
            name: "Legacy Merchant Fund".to_string(),
            status: LenderStatus::Inactive,
            configurations: vec![configuration(LenderType::Straight)],
        },
    ]
}

fn sample_deals() -> Vec<DealProfile> {
    vec![
        DealProfile {
            business_name: "Blue Plate Diner".to_string(),
            state: Some("CA".to_string()),
            business_start_date: date(2019, 4, 1),
            revenue: Some(RevenueInput::MonthlyAverage { amount: 55_000 }),
            positions: Some(1),
            nsfs: Some(0),
            fico: Some(710),
            entity_type: Some("LLC".to_string()),
            raw_industry: Some("Restaurant".to_string()),
            has_defaults: Some(false),
            defaults_settled: None,
        },
        DealProfile {
            business_name: "Harbor Tow & Recovery".to_string(),
            state: Some("TX".to_string()),
            business_start_date: date(2022, 2, 15),
            revenue: Some(RevenueInput::DepositMonths {
                months: vec![30_000, 28_000, 34_000, 32_000],
            }),
            positions: Some(2),
            nsfs: Some(1),
            fico: Some(640),
            entity_type: Some("Sole Proprietorship".to_string()),
            raw_industry: Some("Towing".to_string()),
            has_defaults: Some(true),
            defaults_settled: Some(true),
        },
        DealProfile {
            business_name: "Green Acres Cattle Co".to_string(),
            state: Some("NE".to_string()),
            business_start_date: date(2020, 8, 1),
            revenue: Some(RevenueInput::MonthlyAverage { amount: 48_000 }),
            positions: Some(0),
            nsfs: Some(0),
            fico: Some(690),
            entity_type: Some("Corporation".to_string()),
            raw_industry: Some("Agriculture - Cattle Ranch".to_string()),
            has_defaults: Some(false),
            defaults_settled: None,
        },
        DealProfile {
            business_name: "Corner Bakery".to_string(),
            state: Some("NY".to_string()),
            ..DealProfile::default()
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use lender_match::workflows::funding::matching::today;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).expect("valid date")
    }

    #[test]
    fn seeded_run_skips_inactive_lenders() {
        let run = seeded_run(as_of()).expect("demo runs");

        assert_eq!(run.total_deals_processed, 4);
        assert_eq!(run.total_lenders_checked, 4);
        assert!(run
            .results
            .iter()
            .flat_map(|result| &result.lender_matches)
            .all(|entry| entry.lender_name != "Legacy Merchant Fund"));
    }

    #[test]
    fn seeded_deals_exercise_conditional_revenue_and_missing_data() {
        let run = seeded_run(as_of()).expect("demo runs");

        let diner = &run.results[0];
        assert!(diner.lender_matches[0].matched);

        let towing = &run.results[1];
        let prairie = towing
            .lender_matches
            .iter()
            .find(|entry| entry.lender_name == "Prairie Growth Partners")
            .expect("prairie evaluated");
        assert_eq!(
            prairie.feedback,
            vec!["Revenue requirements not met".to_string()]
        );

        let ranch = &run.results[2];
        let prairie = ranch
            .lender_matches
            .iter()
            .find(|entry| entry.lender_name == "Prairie Growth Partners")
            .expect("prairie evaluated");
        assert!(!prairie.matched);

        let bakery = &run.results[3];
        assert_eq!(bakery.matched_lenders().count(), 0);
    }

    #[test]
    fn omitted_as_of_uses_the_matching_service_default() {
        let before = today();
        let resolved = MatchRequest::default().effective_as_of();
        assert!(resolved == before || resolved == today());

        let pinned = MatchRequest {
            as_of: Some(as_of()),
            ..MatchRequest::default()
        };
        assert_eq!(pinned.effective_as_of(), as_of());
    }

    #[test]
    fn report_lists_every_configuration_with_feedback() {
        let run = seeded_run(as_of()).expect("demo runs");
        let report = render_report(&run);

        assert!(report.starts_with("4 deals checked against 4 lender configurations"));
        assert!(report.contains("deal-000001 Blue Plate Diner"));
        assert!(report.contains("[match]    Northwind Capital (Straight)"));
        assert!(report.contains("Missing FICO score - FICO score too low"));
    }
}

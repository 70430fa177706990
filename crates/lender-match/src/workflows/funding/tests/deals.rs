use super::common::*;

use crate::workflows::funding::deals::domain::{DealFilter, DealId, DealStatus, RevenueInput};
use crate::workflows::funding::deals::DealServiceError;
use crate::workflows::funding::repository::RepositoryError;

#[test]
fn complete_deals_are_ready_and_partial_deals_are_drafts() {
    let (service, _) = deal_service();

    let ready = service.create(restaurant_deal()).expect("stored");
    assert_eq!(ready.id, DealId("deal-000001".to_string()));
    assert_eq!(ready.status, DealStatus::Ready);
    assert!(ready.issues.is_empty());

    let mut partial = restaurant_deal();
    partial.fico = Some(880);
    partial.revenue = Some(RevenueInput::DepositMonths {
        months: vec![10_000, 12_000],
    });
    let draft = service.create(partial).expect("drafts are stored too");
    assert_eq!(draft.status, DealStatus::Draft);
    let fields = draft
        .issues
        .iter()
        .map(|issue| issue.field.as_str())
        .collect::<Vec<_>>();
    assert_eq!(fields, vec!["revenue.months", "fico"]);
}

#[test]
fn update_revalidates_and_promotes_drafts() {
    let (service, _) = deal_service();
    let mut partial = restaurant_deal();
    partial.state = None;
    let deal = service.create(partial).expect("stored");
    assert_eq!(deal.status, DealStatus::Draft);

    let updated = service
        .update(&deal.id, restaurant_deal())
        .expect("update succeeds");
    assert_eq!(updated.status, DealStatus::Ready);
    assert_eq!(updated.created_at, deal.created_at);
    assert!(updated.updated_at >= deal.updated_at);
}

#[test]
fn delete_removes_deal_and_second_delete_is_not_found() {
    let (service, _) = deal_service();
    let deal = service.create(restaurant_deal()).expect("stored");

    service.delete(&deal.id).expect("deleted");
    let err = service.delete(&deal.id).expect_err("already gone");
    assert!(matches!(
        err,
        DealServiceError::Repository(RepositoryError::NotFound)
    ));
    assert!(service.get(&deal.id).is_err());
}

#[test]
fn list_filters_by_state_industry_status_and_name() {
    let (service, _) = deal_service();
    service.create(restaurant_deal()).expect("diner");

    let mut towing = restaurant_deal();
    towing.business_name = "Harbor Tow & Recovery".to_string();
    towing.state = Some("TX".to_string());
    towing.raw_industry = Some("Towing".to_string());
    service.create(towing).expect("tow");

    let mut draft = restaurant_deal();
    draft.business_name = "Harbor Bakery".to_string();
    draft.fico = None;
    service.create(draft).expect("bakery");

    let by_state = service
        .list(&DealFilter {
            state: Some("tx".to_string()),
            ..DealFilter::default()
        })
        .expect("list");
    assert_eq!(by_state.len(), 1);

    let by_parent_industry = service
        .list(&DealFilter {
            industry: Some("Auto".to_string()),
            ..DealFilter::default()
        })
        .expect("list");
    assert_eq!(by_parent_industry[0].profile.business_name, "Harbor Tow & Recovery");

    let drafts = service
        .list(&DealFilter {
            status: Some(DealStatus::Draft),
            ..DealFilter::default()
        })
        .expect("list");
    assert_eq!(drafts.len(), 1);

    let by_name = service
        .list(&DealFilter {
            q: Some("harbor".to_string()),
            ..DealFilter::default()
        })
        .expect("list");
    assert_eq!(by_name.len(), 2);
}

#[test]
fn view_exposes_filtered_industry_and_effective_revenue() {
    let (service, _) = deal_service();
    let mut profile = restaurant_deal();
    profile.raw_industry = Some("cattle".to_string());
    profile.revenue = Some(RevenueInput::DepositMonths {
        months: vec![20_000, 30_000, 40_000, 50_000],
    });

    let deal = service.create(profile).expect("stored");
    let view = deal.view();
    assert_eq!(view.filtered_industry.as_deref(), Some("Agriculture"));
    assert_eq!(view.monthly_revenue, Some(35_000.0));
    assert_eq!(view.status, "ready");
}

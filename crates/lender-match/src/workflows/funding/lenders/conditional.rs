use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::workflows::funding::industry::normalize;

/// Conditional industries and the minimum revenue each one requires.
///
/// Invariant: every selected industry has a revenue entry, and so does its normalized parent.
/// Revenue keys outside that set never exist. All mutation goes through [`add`], [`remove`],
/// [`toggle`] and [`set_revenue`] so the invariant holds after every call.
///
/// [`add`]: ConditionalRevenueTable::add
/// [`remove`]: ConditionalRevenueTable::remove
/// [`toggle`]: ConditionalRevenueTable::toggle
/// [`set_revenue`]: ConditionalRevenueTable::set_revenue
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalRevenueTable {
    #[serde(rename = "conditional_industries", default)]
    industries: BTreeSet<String>,
    #[serde(rename = "conditional_revenues", default)]
    revenues: BTreeMap<String, u64>,
}

/// Whether a toggle selected or cleared the industry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConditionalRevenueError {
    #[error("'{0}' is not a selected conditional industry or the parent of one")]
    UnknownKey(String),
}

impl ConditionalRevenueTable {
    /// Build a table from selected industries, then apply any provided amounts that the
    /// invariant allows. Amounts for keys that are not required are dropped.
    pub fn assemble(industries: &BTreeSet<String>, revenues: &BTreeMap<String, u64>) -> Self {
        let mut table = Self::default();
        for industry in industries {
            table.add(industry);
        }
        for (industry, amount) in revenues {
            let _ = table.set_revenue(industry, *amount);
        }
        table
    }

    pub fn industries(&self) -> &BTreeSet<String> {
        &self.industries
    }

    pub fn revenues(&self) -> &BTreeMap<String, u64> {
        &self.revenues
    }

    pub fn is_empty(&self) -> bool {
        self.industries.is_empty()
    }

    pub fn contains(&self, industry: &str) -> bool {
        self.industries.contains(industry)
    }

    pub fn revenue_for(&self, industry: &str) -> Option<u64> {
        self.revenues.get(industry).copied()
    }

    /// Revenue minimum that applies to deals in `industry`. Only selected industries carry one;
    /// a parent entry kept for a selected child stays inert until the parent is selected too.
    pub fn selected_revenue(&self, industry: &str) -> Option<u64> {
        if self.industries.contains(industry) {
            self.revenue_for(industry)
        } else {
            None
        }
    }

    /// Select an industry. Re-adding an existing selection changes nothing.
    pub fn add(&mut self, industry: &str) {
        if !self.industries.insert(industry.to_string()) {
            return;
        }

        self.revenues.entry(industry.to_string()).or_insert(0);
        let parent = normalize(industry);
        if parent != industry {
            self.revenues.entry(parent.to_string()).or_insert(0);
        }
    }

    /// Clear an industry. Removing an absent industry changes nothing.
    pub fn remove(&mut self, industry: &str) {
        if !self.industries.remove(industry) {
            return;
        }

        if !self.is_required_key(industry) {
            self.revenues.remove(industry);
        }

        let parent = normalize(industry);
        if parent != industry && !self.is_required_key(parent) {
            self.revenues.remove(parent);
        }
    }

    pub fn toggle(&mut self, industry: &str) -> ToggleOutcome {
        if self.industries.contains(industry) {
            self.remove(industry);
            ToggleOutcome::Removed
        } else {
            self.add(industry);
            ToggleOutcome::Added
        }
    }

    /// Edit the minimum revenue for a selected industry or a selected industry's parent.
    pub fn set_revenue(&mut self, industry: &str, amount: u64) -> Result<(), ConditionalRevenueError> {
        match self.revenues.get_mut(industry) {
            Some(slot) => {
                *slot = amount;
                Ok(())
            }
            None => Err(ConditionalRevenueError::UnknownKey(industry.to_string())),
        }
    }

    /// Keys the invariant requires given the current selection.
    pub fn required_keys(&self) -> BTreeSet<&str> {
        self.industries
            .iter()
            .flat_map(|industry| [industry.as_str(), normalize(industry)])
            .collect()
    }

    pub fn satisfies_invariant(&self) -> bool {
        let required = self.required_keys();
        required.len() == self.revenues.len()
            && self
                .revenues
                .keys()
                .all(|key| required.contains(key.as_str()))
    }

    /// A key stays required while it is selected or some selection normalizes to it.
    fn is_required_key(&self, key: &str) -> bool {
        self.industries
            .iter()
            .any(|industry| industry == key || normalize(industry) == key)
    }
}

/// Apply a toggle to loose set/map state, e.g. when editing a configuration draft.
pub fn toggle_conditional_industry(
    industries: &mut BTreeSet<String>,
    revenues: &mut BTreeMap<String, u64>,
    industry: &str,
) -> ToggleOutcome {
    let mut table = ConditionalRevenueTable {
        industries: std::mem::take(industries),
        revenues: std::mem::take(revenues),
    };
    let outcome = table.toggle(industry);
    *industries = table.industries;
    *revenues = table.revenues;
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adding_a_child_seeds_parent_entry() {
        let mut table = ConditionalRevenueTable::default();
        table.add("Auto - Towing");

        assert_eq!(table.revenue_for("Auto - Towing"), Some(0));
        assert_eq!(table.revenue_for("Auto"), Some(0));
        assert!(table.satisfies_invariant());
    }

    #[test]
    fn adding_a_plain_industry_creates_single_entry() {
        let mut table = ConditionalRevenueTable::default();
        table.add("Restaurant");

        assert_eq!(table.revenues().len(), 1);
        assert!(table.satisfies_invariant());
    }

    #[test]
    fn parent_entry_survives_while_a_sibling_remains() {
        let mut table = ConditionalRevenueTable::default();
        table.add("Auto - Towing");
        table.add("Auto - Dealer");
        table.set_revenue("Auto", 75_000).expect("parent is required");

        table.remove("Auto - Towing");

        assert_eq!(table.revenue_for("Auto - Towing"), None);
        assert_eq!(table.revenue_for("Auto"), Some(75_000));

        table.remove("Auto - Dealer");
        assert!(table.revenues().is_empty());
        assert!(table.satisfies_invariant());
    }

    #[test]
    fn removing_child_keeps_explicitly_selected_parent() {
        let mut table = ConditionalRevenueTable::default();
        table.add("Agriculture");
        table.add("Agriculture - Dairy");
        table.set_revenue("Agriculture", 100_000).expect("selected");

        table.remove("Agriculture - Dairy");

        assert_eq!(table.revenue_for("Agriculture"), Some(100_000));
        assert!(table.satisfies_invariant());
    }

    #[test]
    fn add_and_remove_are_idempotent_and_preserve_values() {
        let mut table = ConditionalRevenueTable::default();
        table.add("Arts / Creative - Design");
        table
            .set_revenue("Arts / Creative - Design", 40_000)
            .expect("selected");

        table.add("Arts / Creative - Design");
        assert_eq!(table.revenue_for("Arts / Creative - Design"), Some(40_000));

        table.remove("Restaurant");
        assert_eq!(table.industries().len(), 1);
        assert!(table.satisfies_invariant());
    }

    #[test]
    fn invariant_holds_after_every_toggle_in_a_sequence() {
        let sequence = [
            "Auto - Towing",
            "Auto",
            "Restaurant",
            "Auto - Dealer",
            "Auto - Towing",
            "Auto",
            "Agriculture - Dairy",
            "Restaurant",
            "Auto - Dealer",
            "Agriculture - Dairy",
        ];

        let mut table = ConditionalRevenueTable::default();
        for industry in sequence {
            table.toggle(industry);
            assert!(
                table.satisfies_invariant(),
                "invariant broken after toggling {industry}: {table:?}"
            );
        }
        assert!(table.is_empty());
        assert!(table.revenues().is_empty());
    }

    #[test]
    fn selected_revenue_ignores_unselected_parent_entry() {
        let mut table = ConditionalRevenueTable::default();
        table.add("Auto - Towing");
        table.set_revenue("Auto - Towing", 100_000).expect("towing is selected");

        assert_eq!(table.selected_revenue("Auto - Towing"), Some(100_000));
        assert_eq!(table.revenue_for("Auto"), Some(0));
        assert_eq!(table.selected_revenue("Auto"), None);

        table.add("Auto");
        table.set_revenue("Auto", 30_000).expect("auto is selected");
        assert_eq!(table.selected_revenue("Auto"), Some(30_000));
    }

    #[test]
    fn set_revenue_rejects_unrelated_keys() {
        let mut table = ConditionalRevenueTable::default();
        table.add("Auto - Towing");

        assert_eq!(
            table.set_revenue("Restaurant", 10),
            Err(ConditionalRevenueError::UnknownKey("Restaurant".to_string()))
        );
    }

    #[test]
    fn loose_toggle_updates_both_collections() {
        let mut industries = BTreeSet::new();
        let mut revenues = BTreeMap::new();

        let outcome = toggle_conditional_industry(&mut industries, &mut revenues, "Auto - Repair");
        assert_eq!(outcome, ToggleOutcome::Added);
        assert_eq!(revenues.len(), 2);

        let outcome = toggle_conditional_industry(&mut industries, &mut revenues, "Auto - Repair");
        assert_eq!(outcome, ToggleOutcome::Removed);
        assert!(industries.is_empty());
        assert!(revenues.is_empty());
    }
}

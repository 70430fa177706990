//! Reference taxonomy shared by lender criteria and deal intake.
//!
//! Industries come in two shapes: plain entries such as `"Restaurant"` and child entries of the
//! form `"<Parent> - <Detail>"` for the parents listed in [`PARENT_INDUSTRIES`]. Lender criteria
//! may restrict or price either shape, so matching always looks at a deal's raw industry and its
//! normalized parent.

/// Parent categories in prefix-match priority order.
pub const PARENT_INDUSTRIES: [&str; 3] = ["Agriculture", "Arts / Creative", "Auto"];

pub const INDUSTRIES: &[&str] = &[
    "Accounting",
    "Adult Entertainment",
    "Agriculture",
    "Agriculture - Cattle Ranch",
    "Agriculture - Crop Farming",
    "Agriculture - Dairy",
    "Agriculture - Farming",
    "Agriculture - Nursery",
    "Arts / Creative",
    "Arts / Creative - Design",
    "Arts / Creative - Film Production",
    "Arts / Creative - Photography",
    "Auto",
    "Auto - Body Shop",
    "Auto - Dealer",
    "Auto - Repair",
    "Auto - Towing",
    "Auto - Used Car Sales",
    "Beauty Salon",
    "Cannabis",
    "Construction",
    "Daycare",
    "E-Commerce",
    "Education",
    "Financial Services",
    "Firearms",
    "Fitness",
    "Gambling",
    "Gas Station",
    "Healthcare",
    "Hospitality",
    "IT Services",
    "Landscaping",
    "Legal Services",
    "Liquor Store",
    "Logistics",
    "Manufacturing",
    "Medical Practice",
    "Non-Profit",
    "Pharmacy",
    "Real Estate",
    "Restaurant",
    "Retail",
    "Staffing",
    "Travel Agency",
    "Trucking",
    "Wholesale",
];

pub const STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM",
    "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA",
    "WV", "WI", "WY",
];

pub const ENTITY_TYPES: &[&str] = &[
    "LLC",
    "Corporation",
    "S-Corp",
    "Sole Proprietorship",
    "Partnership",
    "Non-Profit",
];

/// Free-form industry labels brokers type into deals, mapped onto the lender taxonomy.
const DEAL_INDUSTRY_ALIASES: &[(&str, &str)] = &[
    ("cattle", "Agriculture - Cattle Ranch"),
    ("dairy farm", "Agriculture - Dairy"),
    ("farm", "Agriculture - Farming"),
    ("car dealership", "Auto - Dealer"),
    ("auto repair", "Auto - Repair"),
    ("mechanic", "Auto - Repair"),
    ("towing", "Auto - Towing"),
    ("used cars", "Auto - Used Car Sales"),
    ("photographer", "Arts / Creative - Photography"),
    ("graphic design", "Arts / Creative - Design"),
    ("bar", "Restaurant"),
    ("cafe", "Restaurant"),
    ("food service", "Restaurant"),
    ("freight", "Trucking"),
    ("doctor", "Medical Practice"),
    ("dental", "Medical Practice"),
    ("salon", "Beauty Salon"),
    ("gym", "Fitness"),
    ("hotel", "Hospitality"),
    ("online store", "E-Commerce"),
];

/// Map an industry onto its parent category, or return it unchanged.
pub fn normalize(industry: &str) -> &str {
    PARENT_INDUSTRIES
        .iter()
        .find(|parent| industry.starts_with(**parent))
        .copied()
        .unwrap_or(industry)
}

/// Resolve a deal's raw industry into the taxonomy entry lenders reason about.
///
/// The alias table is consulted case-insensitively; unknown labels pass through untouched.
pub fn taxonomy_industry(raw: &str) -> &str {
    let trimmed = raw.trim();
    if let Some(known) = INDUSTRIES
        .iter()
        .find(|industry| industry.eq_ignore_ascii_case(trimmed))
    {
        return *known;
    }

    DEAL_INDUSTRY_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(trimmed))
        .map(|(_, industry)| *industry)
        .unwrap_or(trimmed)
}

/// The "filtered" industry shown next to a deal: taxonomy entry, then its parent.
pub fn filtered_industry(raw: &str) -> &str {
    normalize(taxonomy_industry(raw))
}

/// Canonical state code for a deal's state, matched case-insensitively.
pub fn taxonomy_state(raw: &str) -> Option<&'static str> {
    let trimmed = raw.trim();
    STATES
        .iter()
        .find(|state| state.eq_ignore_ascii_case(trimmed))
        .copied()
}

/// Canonical entity type for a deal's entity type, matched case-insensitively.
pub fn taxonomy_entity_type(raw: &str) -> Option<&'static str> {
    let trimmed = raw.trim();
    ENTITY_TYPES
        .iter()
        .find(|entity| entity.eq_ignore_ascii_case(trimmed))
        .copied()
}

pub fn is_known_industry(value: &str) -> bool {
    INDUSTRIES.contains(&value)
}

pub fn is_known_state(value: &str) -> bool {
    STATES.contains(&value)
}

pub fn is_known_entity_type(value: &str) -> bool {
    ENTITY_TYPES.contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_maps_children_to_parents() {
        assert_eq!(normalize("Agriculture - Cattle Ranch"), "Agriculture");
        assert_eq!(normalize("Arts / Creative - Photography"), "Arts / Creative");
        assert_eq!(normalize("Auto - Towing"), "Auto");
        assert_eq!(normalize("Restaurant"), "Restaurant");
        assert_eq!(normalize("Something Unlisted"), "Something Unlisted");
    }

    #[test]
    fn normalize_is_idempotent_across_taxonomy() {
        for industry in INDUSTRIES {
            let once = normalize(industry);
            assert_eq!(normalize(once), once, "{industry} should normalize stably");
        }
    }

    #[test]
    fn every_child_has_a_listed_parent() {
        for industry in INDUSTRIES.iter().filter(|value| value.contains(" - ")) {
            let parent = normalize(industry);
            assert_ne!(parent, *industry, "{industry} should have a parent");
            assert!(is_known_industry(parent));
        }
    }

    #[test]
    fn taxonomy_industry_resolves_aliases_and_casing() {
        assert_eq!(taxonomy_industry("towing"), "Auto - Towing");
        assert_eq!(taxonomy_industry("  restaurant "), "Restaurant");
        assert_eq!(taxonomy_industry("Cafe"), "Restaurant");
        assert_eq!(taxonomy_industry("Underwater Welding"), "Underwater Welding");
        assert_eq!(filtered_industry("Cattle"), "Agriculture");
    }

    #[test]
    fn states_and_entity_types_resolve_case_insensitively() {
        assert_eq!(taxonomy_state(" ca "), Some("CA"));
        assert_eq!(taxonomy_state("Calif."), None);
        assert_eq!(taxonomy_entity_type("llc"), Some("LLC"));
        assert_eq!(taxonomy_entity_type("sole proprietorship"), Some("Sole Proprietorship"));
        assert_eq!(taxonomy_entity_type("Trust"), None);
    }

    #[test]
    fn reference_lists_cover_states_and_dc() {
        assert_eq!(STATES.len(), 51);
        assert!(is_known_state("DC"));
        assert!(!is_known_state("PR"));
        assert!(is_known_entity_type("LLC"));
    }
}

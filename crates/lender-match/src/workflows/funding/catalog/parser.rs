use serde::{Deserialize, Deserializer};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

use crate::workflows::funding::lenders::domain::{
    BkPolicy, ConfigurationDraft, LenderStatus, LenderType,
};

/// One catalog row: a single lender configuration plus the lender it belongs to.
#[derive(Debug)]
pub(crate) struct CatalogRecord {
    pub(crate) row: usize,
    pub(crate) lender_name: String,
    pub(crate) status: LenderStatus,
    pub(crate) configuration: ConfigurationDraft,
}

#[derive(Debug)]
pub(crate) enum RowError {
    Csv(csv::Error),
    Field { row: usize, message: String },
}

impl From<csv::Error> for RowError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<CatalogRecord>, RowError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for (index, record) in csv_reader.deserialize::<CatalogRow>().enumerate() {
        // Header occupies line 1.
        let row = index + 2;
        let parsed = record?;
        records.push(parsed.into_record(row)?);
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Lender Name")]
    lender_name: String,
    #[serde(rename = "Lender Type")]
    lender_type: String,
    #[serde(rename = "Min Positions", default, deserialize_with = "empty_string_as_none")]
    min_positions: Option<String>,
    #[serde(rename = "Max Positions", default, deserialize_with = "empty_string_as_none")]
    max_positions: Option<String>,
    #[serde(
        rename = "Min Time In Business",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    min_time_in_business: Option<String>,
    #[serde(rename = "Min Revenue", default, deserialize_with = "empty_string_as_none")]
    min_revenue: Option<String>,
    #[serde(rename = "Min FICO")]
    min_fico: String,
    #[serde(rename = "Max NSFs", default, deserialize_with = "empty_string_as_none")]
    max_nsfs: Option<String>,
    #[serde(rename = "BK Policy", default, deserialize_with = "empty_string_as_none")]
    bk_policy: Option<String>,
    #[serde(rename = "Restricted States", default)]
    restricted_states: String,
    #[serde(rename = "Restricted Entity Types", default)]
    restricted_entity_types: String,
    #[serde(rename = "Restricted Industries", default)]
    restricted_industries: String,
    #[serde(rename = "Conditional Industries", default)]
    conditional_industries: String,
    #[serde(rename = "Conditional Revenues", default)]
    conditional_revenues: String,
    #[serde(rename = "Status", default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
}

impl CatalogRow {
    fn into_record(self, row: usize) -> Result<CatalogRecord, RowError> {
        let field_error = |message: String| RowError::Field { row, message };

        let lender_type = LenderType::parse(&self.lender_type)
            .ok_or_else(|| field_error(format!("unknown lender type '{}'", self.lender_type)))?;
        let bk_policy = match self.bk_policy.as_deref() {
            Some(raw) => BkPolicy::parse(raw)
                .ok_or_else(|| field_error(format!("unknown BK policy '{raw}'")))?,
            None => BkPolicy::default(),
        };
        let status = match self.status.as_deref() {
            Some(raw) => LenderStatus::parse(raw)
                .ok_or_else(|| field_error(format!("unknown status '{raw}'")))?,
            None => LenderStatus::Active,
        };

        let configuration = ConfigurationDraft {
            lender_type,
            min_positions: parse_number(self.min_positions.as_deref(), "Min Positions", row)?,
            max_positions: parse_number(self.max_positions.as_deref(), "Max Positions", row)?,
            min_time_in_business_months: parse_number(
                self.min_time_in_business.as_deref(),
                "Min Time In Business",
                row,
            )?,
            min_revenue: parse_number(self.min_revenue.as_deref(), "Min Revenue", row)?,
            min_fico: parse_number(Some(self.min_fico.as_str()), "Min FICO", row)?,
            max_nsfs: parse_number(self.max_nsfs.as_deref(), "Max NSFs", row)?,
            restricted_states: split_list(&self.restricted_states),
            restricted_entity_types: split_list(&self.restricted_entity_types),
            restricted_industries: split_list(&self.restricted_industries),
            conditional_industries: split_list(&self.conditional_industries),
            conditional_revenues: parse_revenue_pairs(&self.conditional_revenues, row)?,
            bk_policy,
        };

        Ok(CatalogRecord {
            row,
            lender_name: self.lender_name,
            status,
            configuration,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_number<T>(raw: Option<&str>, column: &str, row: usize) -> Result<T, RowError>
where
    T: std::str::FromStr + Default,
{
    match raw {
        None => Ok(T::default()),
        Some(value) => value
            .replace([',', '$'], "")
            .trim()
            .parse::<T>()
            .map_err(|_| RowError::Field {
                row,
                message: format!("{column} must be a non-negative whole number (found '{value}')"),
            }),
    }
}

fn split_list(raw: &str) -> BTreeSet<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `Industry=amount` pairs separated by `;`.
fn parse_revenue_pairs(raw: &str, row: usize) -> Result<BTreeMap<String, u64>, RowError> {
    let mut revenues = BTreeMap::new();
    for pair in raw.split(';').map(str::trim).filter(|pair| !pair.is_empty()) {
        let Some((industry, amount)) = pair.split_once('=') else {
            return Err(RowError::Field {
                row,
                message: format!("conditional revenue '{pair}' must look like Industry=amount"),
            });
        };
        let amount = parse_number(Some(amount), "Conditional Revenues", row)?;
        revenues.insert(industry.trim().to_string(), amount);
    }
    Ok(revenues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "Lender Name,Lender Type,Min Positions,Max Positions,Min Time In Business,Min Revenue,Min FICO,Max NSFs,BK Policy,Restricted States,Restricted Entity Types,Restricted Industries,Conditional Industries,Conditional Revenues,Status";

    #[test]
    fn parses_lists_and_revenue_pairs() {
        let csv = format!(
            "{HEADER}\nNorthwind Capital,Straight,0,4,6,\"$15,000\",550,5,case by case,NY; NJ,Non-Profit,Cannabis;Firearms,Auto - Towing,Auto - Towing=40000;Auto=30000,\n"
        );

        let records = parse_records(Cursor::new(csv)).expect("catalog parses");
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.row, 2);
        assert_eq!(record.status, LenderStatus::Active);
        let configuration = &record.configuration;
        assert_eq!(configuration.lender_type, LenderType::Straight);
        assert_eq!(configuration.min_revenue, 15_000);
        assert_eq!(configuration.bk_policy, BkPolicy::CaseByCase);
        assert!(configuration.restricted_states.contains("NJ"));
        assert_eq!(configuration.restricted_industries.len(), 2);
        assert_eq!(configuration.conditional_revenues.get("Auto"), Some(&30_000));
    }

    #[test]
    fn reports_row_for_bad_values() {
        let csv = format!("{HEADER}\nAcme,Straight,0,4,6,1000,600,2,,,,,,,\nAcme,Mezzanine,0,4,6,1000,600,2,,,,,,,\n");

        match parse_records(Cursor::new(csv)) {
            Err(RowError::Field { row, message }) => {
                assert_eq!(row, 3);
                assert!(message.contains("Mezzanine"));
            }
            other => panic!("expected field error, got {other:?}"),
        }
    }
}

//! Bulk lender import from a CSV catalog, one configuration per row.
//!
//! Rows sharing a lender name (case-insensitive) are folded into a single lender.
//! List cells use `;` as separator and conditional revenues are written as
//! `Industry=amount` pairs.

mod parser;

use std::io::Read;
use std::path::Path;

use tracing::info;

use super::lenders::domain::{Lender, LenderDraft};
use super::lenders::service::{LenderService, LenderServiceError};
use super::lenders::validation::{validate_configuration, validate_lender};
use super::repository::{LenderRepository, RepositoryError};
use parser::{CatalogRecord, RowError};

#[derive(Debug)]
pub enum CatalogImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { row: usize, message: String },
    Lender { name: String, source: LenderServiceError },
    Store(LenderServiceError),
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io(err) => write!(f, "failed to read lender catalog: {}", err),
            CatalogImportError::Csv(err) => write!(f, "invalid lender catalog CSV: {}", err),
            CatalogImportError::InvalidRow { row, message } => {
                write!(f, "lender catalog row {}: {}", row, message)
            }
            CatalogImportError::Lender { name, source } => {
                write!(f, "could not import lender '{}': {}", name, source)
            }
            CatalogImportError::Store(err) => write!(f, "lender store unavailable: {}", err),
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io(err) => Some(err),
            CatalogImportError::Csv(err) => Some(err),
            CatalogImportError::InvalidRow { .. } => None,
            CatalogImportError::Lender { source, .. } => Some(source),
            CatalogImportError::Store(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CatalogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<RowError> for CatalogImportError {
    fn from(err: RowError) -> Self {
        match err {
            RowError::Csv(err) => Self::Csv(err),
            RowError::Field { row, message } => Self::InvalidRow { row, message },
        }
    }
}

pub struct LenderCatalogImporter;

impl LenderCatalogImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<LenderDraft>, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse the catalog into lender drafts, in order of first appearance.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<LenderDraft>, CatalogImportError> {
        let mut drafts: Vec<LenderDraft> = Vec::new();

        for record in parser::parse_records(reader)? {
            fold_record(&mut drafts, record)?;
        }

        Ok(drafts)
    }

    /// Create every catalog lender through the service.
    ///
    /// All drafts are checked before the first insert, so a rejected catalog leaves the store
    /// untouched.
    pub fn import_into<R>(
        service: &LenderService<R>,
        drafts: Vec<LenderDraft>,
    ) -> Result<Vec<Lender>, CatalogImportError>
    where
        R: LenderRepository + 'static,
    {
        let existing = service.list().map_err(CatalogImportError::Store)?;
        let mut names: Vec<String> = existing.into_iter().map(|lender| lender.name).collect();

        for draft in &drafts {
            let reject = |source: LenderServiceError| CatalogImportError::Lender {
                name: draft.name.clone(),
                source,
            };
            validate_lender(draft)
                .into_result()
                .map_err(|errors| reject(errors.into()))?;

            let name = draft.name.trim();
            if names.iter().any(|known| known.eq_ignore_ascii_case(name)) {
                return Err(reject(RepositoryError::Conflict.into()));
            }
            names.push(name.to_string());
        }

        let mut imported = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let name = draft.name.clone();
            let lender = service
                .create(draft)
                .map_err(|source| CatalogImportError::Lender { name, source })?;
            imported.push(lender);
        }

        info!(lenders = imported.len(), "lender catalog imported");
        Ok(imported)
    }
}

fn fold_record(drafts: &mut Vec<LenderDraft>, record: CatalogRecord) -> Result<(), CatalogImportError> {
    let name = record.lender_name.trim();
    if name.is_empty() {
        return Err(CatalogImportError::InvalidRow {
            row: record.row,
            message: "Lender Name is required".to_string(),
        });
    }

    let errors = validate_configuration(&record.configuration);
    if !errors.is_empty() {
        return Err(CatalogImportError::InvalidRow {
            row: record.row,
            message: errors.to_string(),
        });
    }

    let existing = drafts
        .iter_mut()
        .find(|draft| draft.name.eq_ignore_ascii_case(name));

    match existing {
        Some(draft) => {
            if draft.status != record.status {
                return Err(CatalogImportError::InvalidRow {
                    row: record.row,
                    message: format!("status for '{}' conflicts with an earlier row", draft.name),
                });
            }
            let lender_type = record.configuration.lender_type;
            if draft
                .configurations
                .iter()
                .any(|configuration| configuration.lender_type == lender_type)
            {
                return Err(CatalogImportError::InvalidRow {
                    row: record.row,
                    message: format!(
                        "{} is already configured for '{}'",
                        lender_type.label(),
                        draft.name
                    ),
                });
            }
            draft.configurations.push(record.configuration);
        }
        None => drafts.push(LenderDraft {
            name: name.to_string(),
            status: record.status,
            configurations: vec![record.configuration],
        }),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::funding::lenders::domain::{LenderStatus, LenderType};
    use std::io::Cursor;

    const HEADER: &str = "Lender Name,Lender Type,Min Positions,Max Positions,Min Time In Business,Min Revenue,Min FICO,Max NSFs,BK Policy,Restricted States,Restricted Entity Types,Restricted Industries,Conditional Industries,Conditional Revenues,Status";

    #[test]
    fn rows_with_same_lender_name_fold_together() {
        let csv = format!(
            "{HEADER}\n\
             Harbor Funding,Straight,0,3,12,10000,600,3,strict,,,,,,active\n\
             harbor funding,Consolidators,1,5,12,20000,620,3,strict,,,,,,active\n\
             Summit Advance,Line Of Credits,0,2,24,25000,680,1,,,,,,,inactive\n"
        );

        let drafts = LenderCatalogImporter::from_reader(Cursor::new(csv)).expect("catalog parses");
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].name, "Harbor Funding");
        assert_eq!(
            drafts[0]
                .configurations
                .iter()
                .map(|configuration| configuration.lender_type)
                .collect::<Vec<_>>(),
            vec![LenderType::Straight, LenderType::Consolidators]
        );
        assert_eq!(drafts[1].status, LenderStatus::Inactive);
    }

    #[test]
    fn conflicting_status_is_rejected_with_row_number() {
        let csv = format!(
            "{HEADER}\n\
             Harbor Funding,Straight,0,3,12,10000,600,3,,,,,,,active\n\
             Harbor Funding,Consolidators,0,3,12,10000,600,3,,,,,,,inactive\n"
        );

        let err = LenderCatalogImporter::from_reader(Cursor::new(csv)).expect_err("status clash");
        assert!(matches!(err, CatalogImportError::InvalidRow { row: 3, .. }));
    }

    #[test]
    fn invalid_criteria_are_reported_with_row_number() {
        let csv = format!(
            "{HEADER}\n\
             Harbor Funding,Straight,0,3,12,10000,600,3,,,,,,,active\n\
             Summit Advance,Straight,5,2,12,10000,600,3,,,,,,,active\n"
        );

        let err = LenderCatalogImporter::from_reader(Cursor::new(csv)).expect_err("inverted");
        assert!(matches!(err, CatalogImportError::InvalidRow { row: 3, .. }));
        assert!(err.to_string().contains("max_positions"));
    }

    #[test]
    fn repeated_lender_type_is_rejected_with_row_number() {
        let csv = format!(
            "{HEADER}\n\
             Harbor Funding,Straight,0,3,12,10000,600,3,,,,,,,active\n\
             Harbor Funding,Consolidators,0,3,12,10000,600,3,,,,,,,active\n\
             HARBOR FUNDING,Straight,1,4,12,15000,620,3,,,,,,,active\n"
        );

        let err = LenderCatalogImporter::from_reader(Cursor::new(csv)).expect_err("repeat");
        assert!(matches!(err, CatalogImportError::InvalidRow { row: 4, .. }));
        assert!(err.to_string().contains("Straight is already configured"));
    }

    #[test]
    fn missing_file_surfaces_io_error() {
        let err = LenderCatalogImporter::from_path("does/not/exist.csv").expect_err("no file");
        assert!(matches!(err, CatalogImportError::Io(_)));
        assert!(err.to_string().starts_with("failed to read lender catalog"));
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest FICO score accepted anywhere in the system.
pub const FICO_MIN: u16 = 300;
/// Highest FICO score accepted anywhere in the system. Lender minimums and deal scores share it.
pub const FICO_MAX: u16 = 850;

/// A single data-entry problem tied to the field that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Per-field validation report. An empty report means the record is complete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    pub issues: Vec<FieldIssue>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.issues.push(FieldIssue::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }

    /// Prefix every field so nested records report `configurations[1].min_fico` style paths.
    pub fn nest(self, prefix: &str) -> Self {
        Self {
            issues: self
                .issues
                .into_iter()
                .map(|issue| FieldIssue::new(format!("{prefix}.{}", issue.field), issue.message))
                .collect(),
        }
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        self.issues.extend(other.issues);
    }

    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let details = self
            .issues
            .iter()
            .map(|issue| format!("{}: {}", issue.field, issue.message))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "validation failed ({details})")
    }
}

impl std::error::Error for ValidationErrors {}

pub(crate) fn check_fico(errors: &mut ValidationErrors, field: &str, value: u16) {
    if !(FICO_MIN..=FICO_MAX).contains(&value) {
        errors.push(
            field,
            format!("must be between {FICO_MIN} and {FICO_MAX} (found {value})"),
        );
    }
}

pub(crate) fn check_members<'a, I>(
    errors: &mut ValidationErrors,
    field: &str,
    values: I,
    known: fn(&str) -> bool,
) where
    I: IntoIterator<Item = &'a String>,
{
    for value in values {
        if !known(value) {
            errors.push(field, format!("'{value}' is not a recognized value"));
        }
    }
}

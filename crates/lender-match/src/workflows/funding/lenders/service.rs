use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::conditional::{ConditionalRevenueError, ToggleOutcome};
use super::domain::{
    ConfigurationDraft, ConfigurationId, Lender, LenderConfiguration, LenderDraft, LenderId,
    LenderStatus,
};
use super::validation::{validate_configuration, validate_lender};
use crate::workflows::funding::industry::is_known_industry;
use crate::workflows::funding::repository::{LenderRepository, RepositoryError};
use crate::workflows::funding::validation::ValidationErrors;

/// Admin operations over lenders and their per-type configurations.
pub struct LenderService<R> {
    repository: Arc<R>,
    lender_sequence: AtomicU64,
    configuration_sequence: AtomicU64,
}

impl<R> LenderService<R>
where
    R: LenderRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            lender_sequence: AtomicU64::new(1),
            configuration_sequence: AtomicU64::new(1),
        }
    }

    pub fn repository(&self) -> &Arc<R> {
        &self.repository
    }

    fn next_lender_id(&self) -> LenderId {
        let id = self.lender_sequence.fetch_add(1, Ordering::Relaxed);
        LenderId(format!("lender-{id:06}"))
    }

    fn next_configuration_id(&self) -> ConfigurationId {
        let id = self.configuration_sequence.fetch_add(1, Ordering::Relaxed);
        ConfigurationId(format!("cfg-{id:06}"))
    }

    /// Create a lender together with any initial configurations.
    pub fn create(&self, draft: LenderDraft) -> Result<Lender, LenderServiceError> {
        let errors = validate_lender(&draft);
        if !errors.is_empty() {
            warn!(name = %draft.name, issues = errors.issues.len(), "rejected lender draft");
            return Err(errors.into());
        }

        let configurations = draft
            .configurations
            .into_iter()
            .map(|configuration| {
                LenderConfiguration::from_draft(self.next_configuration_id(), configuration)
            })
            .collect();

        let lender = Lender {
            id: self.next_lender_id(),
            name: draft.name.trim().to_string(),
            status: draft.status,
            created_at: Utc::now(),
            configurations,
        };

        let stored = self.repository.insert(lender)?;
        info!(
            lender_id = %stored.id.0,
            name = %stored.name,
            configurations = stored.configurations.len(),
            "lender created"
        );
        Ok(stored)
    }

    pub fn list(&self) -> Result<Vec<Lender>, LenderServiceError> {
        Ok(self.repository.snapshot()?)
    }

    pub fn get(&self, lender_id: &LenderId) -> Result<Lender, LenderServiceError> {
        let lender = self
            .repository
            .fetch(lender_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(lender)
    }

    /// Soft activation toggle; lenders are never deleted.
    pub fn set_status(
        &self,
        lender_id: &LenderId,
        status: LenderStatus,
    ) -> Result<Lender, LenderServiceError> {
        let mut lender = self.get(lender_id)?;
        if lender.status != status {
            lender.status = status;
            self.repository.update(lender.clone())?;
            info!(lender_id = %lender.id.0, status = status.label(), "lender status changed");
        }
        Ok(lender)
    }

    pub fn add_configuration(
        &self,
        lender_id: &LenderId,
        draft: ConfigurationDraft,
    ) -> Result<LenderConfiguration, LenderServiceError> {
        validate_configuration(&draft).into_result()?;

        let mut lender = self.get(lender_id)?;
        if lender.offers(draft.lender_type) {
            return Err(LenderServiceError::DuplicateLenderType {
                lender_id: lender.id.0,
                lender_type: draft.lender_type.label(),
            });
        }

        let configuration = LenderConfiguration::from_draft(self.next_configuration_id(), draft);
        lender.configurations.push(configuration.clone());
        self.repository.update(lender)?;
        Ok(configuration)
    }

    /// Replace a configuration's criteria, keeping its identifier.
    pub fn update_configuration(
        &self,
        lender_id: &LenderId,
        configuration_id: &ConfigurationId,
        draft: ConfigurationDraft,
    ) -> Result<LenderConfiguration, LenderServiceError> {
        validate_configuration(&draft).into_result()?;

        let mut lender = self.get(lender_id)?;
        let clash = lender.configurations.iter().any(|configuration| {
            &configuration.id != configuration_id && configuration.lender_type == draft.lender_type
        });
        if clash {
            return Err(LenderServiceError::DuplicateLenderType {
                lender_id: lender.id.0,
                lender_type: draft.lender_type.label(),
            });
        }

        let slot = lender
            .configuration_mut(configuration_id)
            .ok_or_else(|| LenderServiceError::ConfigurationNotFound(configuration_id.0.clone()))?;
        *slot = LenderConfiguration::from_draft(configuration_id.clone(), draft);
        let updated = slot.clone();

        self.repository.update(lender)?;
        Ok(updated)
    }

    pub fn remove_configuration(
        &self,
        lender_id: &LenderId,
        configuration_id: &ConfigurationId,
    ) -> Result<(), LenderServiceError> {
        let mut lender = self.get(lender_id)?;
        let before = lender.configurations.len();
        lender
            .configurations
            .retain(|configuration| &configuration.id != configuration_id);
        if lender.configurations.len() == before {
            return Err(LenderServiceError::ConfigurationNotFound(
                configuration_id.0.clone(),
            ));
        }

        self.repository.update(lender)?;
        Ok(())
    }

    /// Select or clear a conditional industry, maintaining the revenue table.
    pub fn toggle_conditional_industry(
        &self,
        lender_id: &LenderId,
        configuration_id: &ConfigurationId,
        industry: &str,
    ) -> Result<(ToggleOutcome, LenderConfiguration), LenderServiceError> {
        if !is_known_industry(industry) {
            let mut errors = ValidationErrors::default();
            errors.push(
                "industry",
                format!("'{industry}' is not a recognized industry"),
            );
            return Err(errors.into());
        }

        self.edit_configuration(lender_id, configuration_id, |configuration| {
            Ok(configuration.conditional.toggle(industry))
        })
    }

    pub fn set_conditional_revenue(
        &self,
        lender_id: &LenderId,
        configuration_id: &ConfigurationId,
        industry: &str,
        amount: u64,
    ) -> Result<LenderConfiguration, LenderServiceError> {
        let ((), configuration) =
            self.edit_configuration(lender_id, configuration_id, |configuration| {
                configuration
                    .conditional
                    .set_revenue(industry, amount)
                    .map_err(LenderServiceError::from)
            })?;
        Ok(configuration)
    }

    fn edit_configuration<T, F>(
        &self,
        lender_id: &LenderId,
        configuration_id: &ConfigurationId,
        edit: F,
    ) -> Result<(T, LenderConfiguration), LenderServiceError>
    where
        F: FnOnce(&mut LenderConfiguration) -> Result<T, LenderServiceError>,
    {
        let mut lender = self.get(lender_id)?;
        let configuration = lender
            .configuration_mut(configuration_id)
            .ok_or_else(|| LenderServiceError::ConfigurationNotFound(configuration_id.0.clone()))?;

        let outcome = edit(configuration)?;
        let updated = configuration.clone();

        self.repository.update(lender)?;
        Ok((outcome, updated))
    }
}

/// Error raised by the lender service.
#[derive(Debug, thiserror::Error)]
pub enum LenderServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationErrors),
    #[error("{lender_type} is already configured for lender {lender_id}")]
    DuplicateLenderType {
        lender_id: String,
        lender_type: &'static str,
    },
    #[error("configuration {0} not found")]
    ConfigurationNotFound(String),
    #[error(transparent)]
    Conditional(#[from] ConditionalRevenueError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

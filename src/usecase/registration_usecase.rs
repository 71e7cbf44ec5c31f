use tracing::{error, info, warn};

use crate::domain::{
    error::{DomainError, RepositoryError},
    models::registration::{
        NewRegistration, Registration, RegistrationSummary, fee_flag_to_cell,
    },
    repositories::registration_repository::RegistrationRepository,
    validation::{CAPACITY_REACHED_MESSAGE, validate_submission},
};

pub const EXPORT_HEADERS: [&str; 4] = [
    "Nom complet",
    "Numéro de membre",
    "Frais compris",
    "Date d'inscription",
];

/// Raw values submitted through the registration form
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub full_name: Option<String>,
    pub member_number: Option<String>,
    pub fee_acknowledged: bool,
}

pub struct RegistrationUsecase<R: RegistrationRepository> {
    repository: R,
    capacity: u64,
}

impl<R: RegistrationRepository> RegistrationUsecase<R> {
    pub fn new(repository: R, capacity: u64) -> Self {
        Self {
            repository,
            capacity,
        }
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub async fn count(&self) -> Result<u64, DomainError>
    where
        R: Send + Sync,
    {
        Ok(self.repository.count().await?)
    }

    pub async fn summary(&self) -> Result<RegistrationSummary, DomainError>
    where
        R: Send + Sync,
    {
        let total = self.count().await?;
        Ok(RegistrationSummary::new(total, self.capacity()))
    }

    pub async fn list(&self) -> Result<Vec<Registration>, DomainError>
    where
        R: Send + Sync,
    {
        Ok(self.repository.list().await?)
    }

    /// Validate and store a submission. Capacity is re-read here, whatever the
    /// form showed when it was loaded.
    pub async fn register(&self, form: RegistrationForm) -> Result<NewRegistration, DomainError>
    where
        R: Send + Sync,
    {
        let mut errors = validate_submission(
            form.full_name.as_deref(),
            form.member_number.as_deref(),
            form.fee_acknowledged,
        );

        let total = self.repository.count().await.map_err(|e| {
            error!("Failed to count registrations before insert: {}", e);
            DomainError::RegistrationFailed(e)
        })?;
        if total >= self.capacity {
            warn!("Registration refused, capacity of {} reached", self.capacity);
            errors.push(CAPACITY_REACHED_MESSAGE.to_string());
        }

        if !errors.is_empty() {
            return Err(DomainError::Validation(errors));
        }

        let registration = NewRegistration::new(
            form.full_name.as_deref().unwrap_or_default(),
            form.member_number.as_deref().unwrap_or_default(),
            form.fee_acknowledged,
        );

        match self.repository.insert(&registration).await {
            Ok(()) => {
                info!("Registered member {}", registration.member_number());
                Ok(registration)
            }
            Err(RepositoryError::DuplicateMember) => {
                info!(
                    "Member {} is already registered",
                    registration.member_number()
                );
                Err(DomainError::DuplicateMember)
            }
            Err(e) => {
                error!("Failed to store registration: {}", e);
                Err(DomainError::RegistrationFailed(e))
            }
        }
    }

    pub async fn delete(&self, member_number: &str) -> Result<u64, DomainError>
    where
        R: Send + Sync,
    {
        if member_number.trim().is_empty() {
            return Ok(0);
        }
        let removed = self.repository.delete(member_number).await?;
        info!("Deleted {} registration(s) for member {}", removed, member_number.trim());
        Ok(removed)
    }

    /// Current list as CSV, fee column included
    pub async fn export_csv(&self) -> Result<String, DomainError>
    where
        R: Send + Sync,
    {
        let registrations = self.list().await?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(EXPORT_HEADERS)
            .map_err(|e| DomainError::Export(e.to_string()))?;
        for registration in &registrations {
            writer
                .write_record([
                    registration.full_name(),
                    registration.member_number(),
                    fee_flag_to_cell(registration.fee_acknowledged()),
                    registration.registered_at(),
                ])
                .map_err(|e| DomainError::Export(e.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| DomainError::Export(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| DomainError::Export(e.to_string()))
    }
}

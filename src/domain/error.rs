use thiserror::Error;

pub const DUPLICATE_MEMBER_MESSAGE: &str = "Ce numéro de membre est déjà inscrit.";
pub const REGISTRATION_FAILED_MESSAGE: &str = "Erreur lors de l'inscription.";
pub const STORAGE_UNAVAILABLE_MESSAGE: &str = "Le registre des inscriptions est indisponible.";
pub const EXPORT_FAILED_MESSAGE: &str = "Erreur lors de l'exportation des inscriptions.";
pub const INVALID_ADMIN_PASSWORD_MESSAGE: &str = "Mot de passe invalide.";

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {}", .0.join(" "))]
    Validation(Vec<String>),

    #[error("{DUPLICATE_MEMBER_MESSAGE}")]
    DuplicateMember,

    #[error("Registration could not be stored: {0}")]
    RegistrationFailed(RepositoryError),

    #[error("Storage error: {0}")]
    Storage(RepositoryError),

    #[error("Export failed: {0}")]
    Export(String),

    #[error("{INVALID_ADMIN_PASSWORD_MESSAGE}")]
    InvalidAdminPassword,
}

impl From<RepositoryError> for DomainError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DuplicateMember => DomainError::DuplicateMember,
            other => DomainError::Storage(other),
        }
    }
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Member number already registered")]
    DuplicateMember,

    #[error("Backend error: {0}")]
    Backend(String),
}

use async_trait::async_trait;

use crate::domain::{
    error::RepositoryError,
    models::registration::{NewRegistration, Registration},
};

/// Persistence capability shared by every storage backend
#[async_trait]
pub trait RegistrationRepository {
    /// Ensure the store exists with the expected header or schema. Idempotent.
    async fn init(&self) -> Result<(), RepositoryError>;

    async fn count(&self) -> Result<u64, RepositoryError>;

    /// Store a new entry, rejecting an already registered member number
    async fn insert(&self, registration: &NewRegistration) -> Result<(), RepositoryError>;

    /// All entries, newest first
    async fn list(&self) -> Result<Vec<Registration>, RepositoryError>;

    /// Remove every entry whose member number equals the trimmed input.
    /// Returns the number removed.
    async fn delete(&self, member_number: &str) -> Result<u64, RepositoryError>;
}

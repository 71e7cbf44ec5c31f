use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::{
    config::AppConfig,
    domain::{
        error::RepositoryError,
        models::registration::{NewRegistration, Registration},
        repositories::registration_repository::RegistrationRepository,
    },
    infrastructure::{
        sheets::{
            google_worksheet::GoogleWorksheet,
            service_account::{ServiceAccountKey, ServiceAccountTokenProvider},
        },
        sheets_registration_repository::SheetsRegistrationRepository,
        sqlite_registration_repository::SqliteRegistrationRepository,
    },
};

/// The storage chosen at startup. Spreadsheet mode when a spreadsheet and its
/// credentials are configured, SQLite otherwise.
#[derive(Clone)]
pub enum StorageBackend {
    Sheets(SheetsRegistrationRepository<GoogleWorksheet>),
    Sqlite(SqliteRegistrationRepository),
}

impl StorageBackend {
    pub async fn from_config(config: &AppConfig) -> Result<Self, RepositoryError> {
        match &config.sheets {
            Some(sheets) => {
                let key = ServiceAccountKey::from_json(&sheets.service_account_json)?;
                let http = reqwest::Client::builder()
                    .timeout(config.http_timeout)
                    .build()
                    .map_err(|e| RepositoryError::Backend(e.to_string()))?;
                let tokens = ServiceAccountTokenProvider::new(key, http.clone())?;
                let worksheet = GoogleWorksheet::new(
                    http,
                    Arc::new(tokens),
                    sheets.spreadsheet_id.clone(),
                    sheets.tab_name.clone(),
                )?;
                info!(
                    "Using Google Sheets storage (spreadsheet {}, tab '{}')",
                    sheets.spreadsheet_id, sheets.tab_name
                );
                Ok(Self::Sheets(SheetsRegistrationRepository::new(Arc::new(
                    worksheet,
                ))))
            }
            None => {
                info!("No spreadsheet configured, using local SQLite storage");
                let repository =
                    SqliteRegistrationRepository::connect(&config.database_url, config.sqlx_logging)
                        .await?;
                Ok(Self::Sqlite(repository))
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Sheets(_) => "google-sheets",
            Self::Sqlite(_) => "sqlite",
        }
    }
}

#[async_trait]
impl RegistrationRepository for StorageBackend {
    async fn init(&self) -> Result<(), RepositoryError> {
        match self {
            Self::Sheets(repository) => repository.init().await,
            Self::Sqlite(repository) => repository.init().await,
        }
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        match self {
            Self::Sheets(repository) => repository.count().await,
            Self::Sqlite(repository) => repository.count().await,
        }
    }

    async fn insert(&self, registration: &NewRegistration) -> Result<(), RepositoryError> {
        match self {
            Self::Sheets(repository) => repository.insert(registration).await,
            Self::Sqlite(repository) => repository.insert(registration).await,
        }
    }

    async fn list(&self) -> Result<Vec<Registration>, RepositoryError> {
        match self {
            Self::Sheets(repository) => repository.list().await,
            Self::Sqlite(repository) => repository.list().await,
        }
    }

    async fn delete(&self, member_number: &str) -> Result<u64, RepositoryError> {
        match self {
            Self::Sheets(repository) => repository.delete(member_number).await,
            Self::Sqlite(repository) => repository.delete(member_number).await,
        }
    }
}

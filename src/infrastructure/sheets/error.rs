use thiserror::Error;

use crate::domain::error::RepositoryError;

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Sheets API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid service account: {0}")]
    Credentials(String),

    #[error("Failed to sign token assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl From<SheetsError> for RepositoryError {
    fn from(err: SheetsError) -> Self {
        RepositoryError::Backend(err.to_string())
    }
}

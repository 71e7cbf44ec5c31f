use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::domain::error::{
    DUPLICATE_MEMBER_MESSAGE, DomainError, EXPORT_FAILED_MESSAGE, INVALID_ADMIN_PASSWORD_MESSAGE,
    REGISTRATION_FAILED_MESSAGE, STORAGE_UNAVAILABLE_MESSAGE,
};

/// json body of every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub errors: Vec<String>,
}

pub fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            errors: vec![message.to_string()],
        }),
    )
        .into_response()
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let (status, errors) = match self {
            DomainError::Validation(errors) => (StatusCode::UNPROCESSABLE_ENTITY, errors),
            DomainError::DuplicateMember => (
                StatusCode::CONFLICT,
                vec![DUPLICATE_MEMBER_MESSAGE.to_string()],
            ),
            DomainError::RegistrationFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                vec![REGISTRATION_FAILED_MESSAGE.to_string()],
            ),
            DomainError::Storage(err) => {
                error!("Storage error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    vec![STORAGE_UNAVAILABLE_MESSAGE.to_string()],
                )
            }
            DomainError::Export(message) => {
                error!("Export error: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    vec![EXPORT_FAILED_MESSAGE.to_string()],
                )
            }
            DomainError::InvalidAdminPassword => (
                StatusCode::UNAUTHORIZED,
                vec![INVALID_ADMIN_PASSWORD_MESSAGE.to_string()],
            ),
        };

        (status, Json(ErrorResponse { errors })).into_response()
    }
}

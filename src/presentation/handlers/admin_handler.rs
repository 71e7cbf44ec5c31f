use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{error, info};

use crate::{
    domain::{
        repositories::registration_repository::RegistrationRepository,
        services::admin_gate::AdminGate,
    },
    presentation::{
        error::error_response,
        handlers::registration_handler::AppState,
        session::{ADMIN_SESSION_KEY, is_admin},
    },
};

const SESSION_UNAVAILABLE_MESSAGE: &str = "Session indisponible, réessaie plus tard.";

/// json for admin login request
#[derive(Serialize, Deserialize)]
pub struct AdminLoginRequest {
    pub password: String,
}

/// json for admin mode state
#[derive(Serialize, Deserialize)]
pub struct AdminStatusResponse {
    pub is_admin: bool,
}

/// handler function for admin login
pub async fn login<R: RegistrationRepository + Send + Sync, A: AdminGate + Send + Sync>(
    State(state): State<AppState<R, A>>,
    session: Session,
    Json(payload): Json<AdminLoginRequest>,
) -> Response {
    if let Err(e) = state.admin_service.login(&payload.password) {
        return e.into_response();
    }

    let granted = async {
        session.cycle_id().await?;
        session.insert(ADMIN_SESSION_KEY, true).await
    };
    match granted.await {
        Ok(()) => {
            info!("Admin mode granted");
            (StatusCode::OK, Json(AdminStatusResponse { is_admin: true })).into_response()
        }
        Err(e) => {
            error!("Failed to store admin flag in session: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, SESSION_UNAVAILABLE_MESSAGE)
        }
    }
}

/// handler function for admin logout
pub async fn logout(session: Session) -> Response {
    match session.flush().await {
        Ok(()) => (StatusCode::OK, Json(AdminStatusResponse { is_admin: false })).into_response(),
        Err(e) => {
            error!("Failed to clear session: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, SESSION_UNAVAILABLE_MESSAGE)
        }
    }
}

/// handler function reporting whether this session is in admin mode
pub async fn status(session: Session) -> Json<AdminStatusResponse> {
    Json(AdminStatusResponse {
        is_admin: is_admin(&session).await,
    })
}

use std::sync::Arc;

use crate::{
    domain::{
        error::DomainError,
        models::registration::{Registration, RegistrationSummary},
        repositories::registration_repository::RegistrationRepository,
        services::admin_gate::AdminGate,
    },
    presentation::{
        error::error_response,
        handlers::admin_handler,
        session::{is_admin, session_layer},
    },
    usecase::{
        admin_login_usecase::AdminLoginUsecase,
        registration_usecase::{RegistrationForm, RegistrationUsecase},
    },
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

const ADMIN_REQUIRED_MESSAGE: &str = "Action réservée à l'administrateur.";
const NOTHING_DELETED_MESSAGE: &str = "Aucune suppression effectuée (participant introuvable).";
const REGISTRATION_CONFIRMED_MESSAGE: &str = "Inscription confirmée! Merci";
const EXPORT_FILENAME: &str = "inscriptions.csv";

// Request

/// json for registration form submission
#[derive(Serialize, Deserialize)]
pub struct RegisterRequest {
    pub full_name: Option<String>,
    pub member_number: Option<String>,
    #[serde(default)]
    pub fee_acknowledged: bool,
}

// Response

/// json for accepted registration
#[derive(Serialize, Deserialize)]
pub struct RegisterResponse {
    pub full_name: String,
    pub member_number: String,
    pub message: String,
}

/// one row of the public participant table; the fee column is not shown
#[derive(Serialize, Deserialize)]
pub struct ParticipantRow {
    pub full_name: String,
    pub member_number: String,
    pub registered_at: String,
}

impl From<Registration> for ParticipantRow {
    fn from(registration: Registration) -> Self {
        Self {
            full_name: registration.full_name().to_string(),
            member_number: registration.member_number().to_string(),
            registered_at: registration.registered_at().to_string(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct DeleteResponse {
    pub removed: u64,
}

/* Router Function and Handler Function */

/// function return Router object with registration and admin routes
/// Suppose to be nested by main router
pub fn create_api_router<
    R: RegistrationRepository + Send + Sync + 'static,
    A: AdminGate + Send + Sync + 'static,
>(
    registration_service: RegistrationUsecase<R>,
    admin_service: AdminLoginUsecase<A>,
) -> Router {
    let state = AppState {
        registration_service: Arc::new(registration_service),
        admin_service: Arc::new(admin_service),
    };

    Router::new()
        .route(
            "/registrations",
            get(list_registrations::<R, A>).post(register::<R, A>),
        )
        .route("/registrations/summary", get(summary::<R, A>))
        .route("/registrations/export", get(export_registrations::<R, A>))
        .route(
            "/registrations/{member_number}",
            delete(delete_registration::<R, A>),
        )
        .route("/admin/login", post(admin_handler::login::<R, A>))
        .route("/admin/logout", post(admin_handler::logout))
        .route("/admin/status", get(admin_handler::status))
        .layer(session_layer())
        .with_state(state)
}

pub struct AppState<R: RegistrationRepository, A: AdminGate> {
    pub registration_service: Arc<RegistrationUsecase<R>>,
    pub admin_service: Arc<AdminLoginUsecase<A>>,
}

impl<R: RegistrationRepository, A: AdminGate> Clone for AppState<R, A> {
    fn clone(&self) -> Self {
        Self {
            registration_service: Arc::clone(&self.registration_service),
            admin_service: Arc::clone(&self.admin_service),
        }
    }
}

// handler function

/// handler function for the counter shown above the form
async fn summary<R: RegistrationRepository + Send + Sync, A: AdminGate + Send + Sync>(
    State(state): State<AppState<R, A>>,
) -> Result<Json<RegistrationSummary>, DomainError> {
    Ok(Json(state.registration_service.summary().await?))
}

/// handler function for the participant table
async fn list_registrations<R: RegistrationRepository + Send + Sync, A: AdminGate + Send + Sync>(
    State(state): State<AppState<R, A>>,
) -> Result<Json<Vec<ParticipantRow>>, DomainError> {
    let registrations = state.registration_service.list().await?;
    Ok(Json(
        registrations.into_iter().map(ParticipantRow::from).collect(),
    ))
}

/// handler function for form submission
async fn register<R: RegistrationRepository + Send + Sync, A: AdminGate + Send + Sync>(
    State(state): State<AppState<R, A>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, DomainError> {
    let registration = state
        .registration_service
        .register(RegistrationForm {
            full_name: payload.full_name,
            member_number: payload.member_number,
            fee_acknowledged: payload.fee_acknowledged,
        })
        .await?;

    let response = RegisterResponse {
        full_name: registration.full_name().to_string(),
        member_number: registration.member_number().to_string(),
        message: REGISTRATION_CONFIRMED_MESSAGE.to_string(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// handler function for CSV download, fee column included
async fn export_registrations<R: RegistrationRepository + Send + Sync, A: AdminGate + Send + Sync>(
    State(state): State<AppState<R, A>>,
) -> Result<impl IntoResponse, DomainError> {
    let csv = state.registration_service.export_csv().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILENAME}\""),
            ),
        ],
        csv,
    ))
}

/// handler function for admin deletion by member number
async fn delete_registration<R: RegistrationRepository + Send + Sync, A: AdminGate + Send + Sync>(
    State(state): State<AppState<R, A>>,
    session: Session,
    Path(member_number): Path<String>,
) -> Response {
    if !is_admin(&session).await {
        return error_response(StatusCode::UNAUTHORIZED, ADMIN_REQUIRED_MESSAGE);
    }

    match state.registration_service.delete(&member_number).await {
        Ok(0) => error_response(StatusCode::NOT_FOUND, NOTHING_DELETED_MESSAGE),
        Ok(removed) => (StatusCode::OK, Json(DeleteResponse { removed })).into_response(),
        Err(e) => e.into_response(),
    }
}

mod config;
mod domain;
mod infrastructure;
mod presentation;
mod usecase;

use axum::{Router, routing::get};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    config::AppConfig,
    domain::repositories::registration_repository::RegistrationRepository,
    infrastructure::{
        shared_secret_admin_gate::SharedSecretAdminGate, storage_backend::StorageBackend,
    },
    presentation::handlers::registration_handler::create_api_router,
    usecase::{admin_login_usecase::AdminLoginUsecase, registration_usecase::RegistrationUsecase},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let storage = StorageBackend::from_config(&config).await?;
    storage.init().await?;
    info!(
        "Storage '{}' ready, capacity {} participants",
        storage.name(),
        config.max_participants
    );
    if config.admin_password.is_empty() {
        info!("ADMIN_PASSWORD is not set, admin mode is disabled");
    }

    let registration_usecase = RegistrationUsecase::new(storage, config.max_participants);
    let admin_login_usecase =
        AdminLoginUsecase::new(SharedSecretAdminGate::new(config.admin_password.clone()));

    let app = Router::new()
        .route("/", get(|| async { "Inscriptions ouvertes" }))
        .nest(
            "/api",
            create_api_router(registration_usecase, admin_login_usecase),
        )
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Failed to listen for shutdown signal: {}", e),
    }
}

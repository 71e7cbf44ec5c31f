use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer, cookie::SameSite};

pub const ADMIN_SESSION_KEY: &str = "is_admin";

/// Cookie sessions kept in memory, dropped after an hour of inactivity
pub fn session_layer() -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::hours(1)))
}

pub async fn is_admin(session: &Session) -> bool {
    matches!(session.get::<bool>(ADMIN_SESSION_KEY).await, Ok(Some(true)))
}

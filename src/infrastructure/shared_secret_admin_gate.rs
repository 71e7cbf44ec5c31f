use crate::domain::services::admin_gate::AdminGate;

/// Plain comparison against the configured admin password.
/// An empty configured password disables admin mode.
#[derive(Clone)]
pub struct SharedSecretAdminGate {
    secret: String,
}

impl SharedSecretAdminGate {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }
}

impl AdminGate for SharedSecretAdminGate {
    fn verify(&self, candidate: &str) -> bool {
        !self.secret.is_empty() && candidate == self.secret
    }
}

use tracing::warn;

use crate::domain::{error::DomainError, services::admin_gate::AdminGate};

pub struct AdminLoginUsecase<A: AdminGate> {
    admin_gate: A,
}

impl<A: AdminGate> AdminLoginUsecase<A> {
    pub fn new(admin_gate: A) -> Self {
        Self { admin_gate }
    }

    /// Succeeds when `password` unlocks admin mode. No lockout on failure.
    pub fn login(&self, password: &str) -> Result<(), DomainError> {
        if self.admin_gate.verify(password) {
            Ok(())
        } else {
            warn!("Rejected admin login attempt");
            Err(DomainError::InvalidAdminPassword)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::shared_secret_admin_gate::SharedSecretAdminGate;

    #[test]
    fn test_login_positive() {
        let usecase = AdminLoginUsecase::new(SharedSecretAdminGate::new("s3cret".to_string()));
        assert!(usecase.login("s3cret").is_ok());
    }

    #[test]
    fn test_login_negative() {
        let usecase = AdminLoginUsecase::new(SharedSecretAdminGate::new("s3cret".to_string()));
        assert!(matches!(
            usecase.login("guess"),
            Err(DomainError::InvalidAdminPassword)
        ));
    }
}

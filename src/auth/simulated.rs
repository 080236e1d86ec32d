use crate::auth::error::AuthError;
use crate::auth::RegistrationBackend;
use crate::models::RegistrationDraft;
use async_trait::async_trait;
use log::info;
use std::time::Duration;

/// Stand-in registration backend: waits, logs the draft and reports success
///
/// Used until the account-creation endpoint is settled; nothing is persisted and
/// no session is created.
#[derive(Debug, Clone)]
pub struct SimulatedRegistration {
    delay: Duration,
}

impl SimulatedRegistration {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1500);

    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedRegistration {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

#[async_trait]
impl RegistrationBackend for SimulatedRegistration {
    async fn register(&self, draft: &RegistrationDraft) -> Result<(), AuthError> {
        tokio::time::sleep(self.delay).await;
        info!("Signup submitted: {draft:?}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RoleDetails;

    #[tokio::test]
    async fn test_simulated_registration_always_succeeds() {
        let backend = SimulatedRegistration::new(Duration::from_millis(5));
        let draft = RegistrationDraft {
            name: "Pat".to_string(),
            email: "pat@example.com".to_string(),
            password: "pw".to_string(),
            phone: "555".to_string(),
            details: RoleDetails::Patient {
                date_of_birth: "1990-01-01".to_string(),
                condition: "ASTHMA".to_string(),
            },
        };

        let started = std::time::Instant::now();
        backend.register(&draft).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(5));
    }

    #[test]
    fn test_default_delay() {
        assert_eq!(
            SimulatedRegistration::default().delay(),
            Duration::from_millis(1500)
        );
    }
}

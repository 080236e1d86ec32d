//! Test fixtures providing pre-built test objects
//!
//! This module provides commonly used test data and configurations,
//! eliminating the need to recreate the same test objects in multiple test files.

use crate::models::{Credentials, LoginResponse, RegistrationDraft, Role, RoleDetails};
use crate::settings::HealthTrackSettings;

use super::constants::{
    TEST_DISPLAY_NAME, TEST_EMAIL, TEST_PASSWORD, TEST_TOKEN, TEST_USER_ID,
};

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// Patient credentials as typed into the login form
    #[must_use]
    pub fn patient_credentials() -> Credentials {
        Credentials::new(TEST_EMAIL, TEST_PASSWORD, Role::Patient)
    }

    /// Successful login body for a doctor account
    #[must_use]
    pub fn doctor_login_response() -> LoginResponse {
        LoginResponse {
            token: TEST_TOKEN.to_string(),
            role: Role::Doctor,
            user_id: TEST_USER_ID.to_string(),
            display_name: TEST_DISPLAY_NAME.to_string(),
        }
    }

    /// Complete patient signup draft
    #[must_use]
    pub fn patient_draft() -> RegistrationDraft {
        RegistrationDraft {
            name: "Pat Doe".to_string(),
            email: "pat@example.com".to_string(),
            password: "correct horse".to_string(),
            phone: "+1 555 0100".to_string(),
            details: RoleDetails::Patient {
                date_of_birth: "1985-04-12".to_string(),
                condition: "HYPERTENSION".to_string(),
            },
        }
    }

    /// Settings pointing at `base_url` with the simulated delay removed
    #[must_use]
    pub fn settings_for(base_url: &str) -> HealthTrackSettings {
        let mut settings = HealthTrackSettings::default();
        settings.api.base_url = base_url.to_string();
        settings.api.request_timeout_secs = 5;
        settings.registration.simulated_delay_ms = 0;
        settings
    }
}

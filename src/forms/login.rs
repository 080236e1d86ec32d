//! Credential form controller
//!
//! Holds the login form's field values, runs at most one login request at a time
//! and records the session on success.

use crate::auth::{AuthApi, LOGIN_FAILED_MESSAGE};
use crate::forms::submission::{SingleFlight, SubmissionState, SubmitResult};
use crate::forms::validation::{validate_credentials, FieldIssue};
use crate::models::{CredentialField, Credentials, FormError, Role, SubmissionOutcome};
use crate::session::{SessionRecord, SessionStore};
use log::{debug, error, info};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Confirmation shown after a successful login
pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful!";

/// Login form state plus its submission workflow
pub struct LoginForm<A, S> {
    api: A,
    store: S,
    fields: Mutex<Credentials>,
    flight: SingleFlight<SubmissionOutcome>,
}

impl<A: AuthApi, S: SessionStore> LoginForm<A, S> {
    /// Create an empty form (role defaults to `PATIENT`)
    pub fn new(api: A, store: S) -> Self {
        Self {
            api,
            store,
            fields: Mutex::new(Credentials::default()),
            flight: SingleFlight::new(),
        }
    }

    fn lock_fields(&self) -> MutexGuard<'_, Credentials> {
        self.fields.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace one field; no validation beyond keeping the role in its fixed set
    ///
    /// # Errors
    ///
    /// Returns `FormError::InvalidRole` when `field` is the role and `value` is not
    /// a known role. The form is left unchanged.
    pub fn update_field(&self, field: CredentialField, value: &str) -> Result<(), FormError> {
        let mut fields = self.lock_fields();
        *fields = fields.with_field(field, value)?;
        Ok(())
    }

    /// Replace one field addressed by its input name
    ///
    /// # Errors
    ///
    /// Returns `FormError::UnknownField` for names outside `email`, `password`,
    /// `role`, or `FormError::InvalidRole` for an unknown role value.
    pub fn update_field_named(&self, name: &str, value: &str) -> Result<(), FormError> {
        self.update_field(name.parse()?, value)
    }

    /// Switch the selected role
    pub fn set_role(&self, role: Role) {
        let mut fields = self.lock_fields();
        *fields = fields.with_role(role);
    }

    /// Current field values
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        self.lock_fields().clone()
    }

    #[must_use]
    pub fn state(&self) -> SubmissionState<SubmissionOutcome> {
        self.flight.state()
    }

    /// Status currently shown to the user, if any
    #[must_use]
    pub fn status(&self) -> Option<SubmissionOutcome> {
        self.flight.state().outcome().cloned()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.flight.is_submitting()
    }

    /// Client-side issues with the current values
    #[must_use]
    pub fn validate(&self) -> Vec<FieldIssue> {
        validate_credentials(&self.lock_fields())
    }

    /// The injected session store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Send the current credentials to the authentication service
    ///
    /// Ignored while another submission from this form is in flight. On success
    /// the four session keys are written before the outcome is published.
    pub async fn submit(&self) -> SubmitResult<SubmissionOutcome> {
        let Some(flight) = self.flight.try_begin() else {
            debug!("Login already in flight, ignoring submit");
            return SubmitResult::Ignored;
        };

        let credentials = self.credentials();
        debug!(
            "Submitting login for {} as {}",
            credentials.email, credentials.role
        );

        let outcome = match self.api.login(&credentials).await {
            Ok(response) => match SessionRecord::from(&response).persist(&self.store) {
                Ok(()) => {
                    info!(
                        "Login successful for user {} ({})",
                        response.user_id, response.role
                    );
                    SubmissionOutcome::succeeded(LOGIN_SUCCESS_MESSAGE, &response)
                }
                Err(e) => {
                    error!("Login succeeded but the session could not be saved: {e}");
                    SubmissionOutcome::failed(e.to_string())
                }
            },
            Err(e) => {
                error!("Login error: {e}");
                SubmissionOutcome::failed(e.user_message(LOGIN_FAILED_MESSAGE))
            }
        };

        SubmitResult::Completed(flight.complete(outcome))
    }
}

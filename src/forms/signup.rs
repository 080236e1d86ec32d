//! Registration form controller
//!
//! Keeps both role-conditional field groups alive so toggling the role never loses
//! input; only the group matching the role at submission time goes into the draft.

use crate::auth::{RegistrationBackend, REGISTRATION_FAILED_MESSAGE};
use crate::forms::submission::{SingleFlight, SubmissionState, SubmitResult};
use crate::forms::validation::{required_registration_fields, validate_registration, FieldIssue};
use crate::models::{
    FormError, RegistrationDraft, RegistrationField, RegistrationOutcome, Role, RoleDetails,
};
use log::{debug, error, info};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Confirmation shown after a registration is accepted
pub const REGISTRATION_SUCCESS_MESSAGE: &str = "Registration submitted";

/// Raw values of every signup input, including the hidden role group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupFields {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub role: Role,
    pub date_of_birth: String,
    pub condition: String,
    pub license_number: String,
    pub specialization: String,
}

impl SignupFields {
    /// Return a copy with one field replaced
    #[must_use]
    pub fn with_field(&self, field: RegistrationField, value: &str) -> Self {
        let mut next = self.clone();
        let slot = match field {
            RegistrationField::Name => &mut next.name,
            RegistrationField::Email => &mut next.email,
            RegistrationField::Password => &mut next.password,
            RegistrationField::Phone => &mut next.phone,
            RegistrationField::DateOfBirth => &mut next.date_of_birth,
            RegistrationField::Condition => &mut next.condition,
            RegistrationField::LicenseNumber => &mut next.license_number,
            RegistrationField::Specialization => &mut next.specialization,
        };
        *slot = value.to_string();
        next
    }

    /// Current value of one field
    #[must_use]
    pub fn get(&self, field: RegistrationField) -> &str {
        match field {
            RegistrationField::Name => &self.name,
            RegistrationField::Email => &self.email,
            RegistrationField::Password => &self.password,
            RegistrationField::Phone => &self.phone,
            RegistrationField::DateOfBirth => &self.date_of_birth,
            RegistrationField::Condition => &self.condition,
            RegistrationField::LicenseNumber => &self.license_number,
            RegistrationField::Specialization => &self.specialization,
        }
    }

    /// Snapshot the fields for the current role
    #[must_use]
    pub fn to_draft(&self) -> RegistrationDraft {
        let details = match self.role {
            Role::Patient => RoleDetails::Patient {
                date_of_birth: self.date_of_birth.clone(),
                condition: self.condition.clone(),
            },
            Role::Doctor => RoleDetails::Doctor {
                license_number: self.license_number.clone(),
                specialization: self.specialization.clone(),
            },
        };
        RegistrationDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            phone: self.phone.clone(),
            details,
        }
    }
}

/// Signup form state plus its submission workflow
pub struct SignupForm<B> {
    backend: B,
    fields: Mutex<SignupFields>,
    flight: SingleFlight<RegistrationOutcome>,
}

impl<B: RegistrationBackend> SignupForm<B> {
    /// Create an empty form (role defaults to `PATIENT`)
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            fields: Mutex::new(SignupFields::default()),
            flight: SingleFlight::new(),
        }
    }

    fn lock_fields(&self) -> MutexGuard<'_, SignupFields> {
        self.fields.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace one field
    pub fn update_field(&self, field: RegistrationField, value: &str) {
        let mut fields = self.lock_fields();
        *fields = fields.with_field(field, value);
    }

    /// Replace one field addressed by its input name; `role` switches the role
    ///
    /// # Errors
    ///
    /// Returns `FormError::UnknownField` for names the form does not have, or
    /// `FormError::InvalidRole` for an unknown role value.
    pub fn update_field_named(&self, name: &str, value: &str) -> Result<(), FormError> {
        if name == "role" {
            self.set_role(value.parse()?);
        } else {
            self.update_field(name.parse()?, value);
        }
        Ok(())
    }

    /// Switch the active conditional group; values of both groups are kept
    pub fn set_role(&self, role: Role) {
        let mut fields = self.lock_fields();
        *fields = SignupFields {
            role,
            ..fields.clone()
        };
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.lock_fields().role
    }

    /// Current values of every input
    #[must_use]
    pub fn fields(&self) -> SignupFields {
        self.lock_fields().clone()
    }

    /// Fields that must be filled for the current role
    #[must_use]
    pub fn required_fields(&self) -> Vec<RegistrationField> {
        required_registration_fields(self.role())
    }

    /// Whether `field` is required for the current role
    #[must_use]
    pub fn is_required(&self, field: RegistrationField) -> bool {
        self.required_fields().contains(&field)
    }

    /// Client-side issues with the draft that would be submitted now
    #[must_use]
    pub fn validate(&self) -> Vec<FieldIssue> {
        validate_registration(&self.lock_fields().to_draft())
    }

    #[must_use]
    pub fn state(&self) -> SubmissionState<RegistrationOutcome> {
        self.flight.state()
    }

    #[must_use]
    pub fn status(&self) -> Option<RegistrationOutcome> {
        self.flight.state().outcome().cloned()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.flight.is_submitting()
    }

    /// Hand the current draft to the registration backend
    ///
    /// Ignored while another submission from this form is in flight. No session
    /// keys are written whatever the result.
    pub async fn submit(&self) -> SubmitResult<RegistrationOutcome> {
        let Some(flight) = self.flight.try_begin() else {
            debug!("Signup already in flight, ignoring submit");
            return SubmitResult::Ignored;
        };

        let draft = self.lock_fields().to_draft();
        debug!("Submitting signup for {} as {}", draft.email, draft.role());

        let outcome = match self.backend.register(&draft).await {
            Ok(()) => {
                info!("Signup accepted for {}", draft.email);
                RegistrationOutcome {
                    success: true,
                    message: REGISTRATION_SUCCESS_MESSAGE.to_string(),
                    draft,
                }
            }
            Err(e) => {
                error!("Signup error: {e}");
                RegistrationOutcome {
                    success: false,
                    message: e.user_message(REGISTRATION_FAILED_MESSAGE),
                    draft,
                }
            }
        };

        SubmitResult::Completed(flight.complete(outcome))
    }
}

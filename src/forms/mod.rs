//! Form controllers
//!
//! # Modules
//!
//! - [`login`] - Credential form: field state, login submission, session write
//! - [`signup`] - Registration form: role-conditional fields, draft submission
//! - [`submission`] - Single-flight state machine shared by both forms
//! - [`validation`] - Pure required-field and format checks

pub mod login;
pub mod signup;
pub mod submission;
pub mod validation;

// Re-export commonly used items for convenience
pub use login::{LoginForm, LOGIN_SUCCESS_MESSAGE};
pub use signup::{SignupFields, SignupForm, REGISTRATION_SUCCESS_MESSAGE};
pub use submission::{FlightGuard, SingleFlight, SubmissionState, SubmitResult};
pub use validation::{
    is_email_shaped, required_registration_fields, validate_credentials, validate_registration,
    FieldIssue, IssueKind,
};

#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the healthtrack-auth library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod auth;
pub mod forms;
pub mod models;
pub mod session;
pub mod settings;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use auth::{AuthApi, AuthError, HttpAuthApi, RegistrationBackend, SimulatedRegistration};
pub use forms::{LoginForm, SignupForm, SubmissionState, SubmitResult};
pub use models::{
    ChronicCondition, CredentialField, Credentials, FormError, LoginResponse, RegistrationDraft,
    RegistrationField, RegistrationOutcome, Role, RoleDetails, SubmissionOutcome,
};
pub use session::{FileSessionStore, MemorySessionStore, SessionRecord, SessionStore};
pub use settings::HealthTrackSettings;

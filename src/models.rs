//! Form and session data types shared by the login and signup controllers
//!
//! Everything here is transient, UI-local state: field values held while a form is
//! mounted, the bodies exchanged with the authentication service, and the outcomes
//! surfaced back to the rendering layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Error raised when a field update names something the form does not own
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// The field name is not part of this form
    UnknownField(String),
    /// The role value is neither `PATIENT` nor `DOCTOR`
    InvalidRole(String),
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::UnknownField(name) => write!(f, "Unknown form field: {name}"),
            FormError::InvalidRole(value) => write!(f, "Invalid role: {value}"),
        }
    }
}

impl std::error::Error for FormError {}

/// Account role selected on both forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    Patient,
    Doctor,
}

impl Role {
    /// Wire and storage representation
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Patient => "PATIENT",
            Role::Doctor => "DOCTOR",
        }
    }

    /// Label shown next to the role selector
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Role::Patient => "Patient",
            Role::Doctor => "Doctor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PATIENT" => Ok(Role::Patient),
            "DOCTOR" => Ok(Role::Doctor),
            other => Err(FormError::InvalidRole(other.to_string())),
        }
    }
}

/// Fields of the login form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialField {
    Email,
    Password,
    Role,
}

impl CredentialField {
    /// Input name used by the rendering layer
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            CredentialField::Email => "email",
            CredentialField::Password => "password",
            CredentialField::Role => "role",
        }
    }
}

impl FromStr for CredentialField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(CredentialField::Email),
            "password" => Ok(CredentialField::Password),
            "role" => Ok(CredentialField::Role),
            other => Err(FormError::UnknownField(other.to_string())),
        }
    }
}

/// Login form values, also the body of the login request
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl Credentials {
    #[must_use]
    pub fn new(email: &str, password: &str, role: Role) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            role,
        }
    }

    /// Return a copy with one text field replaced
    ///
    /// Setting `CredentialField::Role` through this path parses the value; an
    /// unknown role leaves the credentials unchanged and returns the error.
    ///
    /// # Errors
    ///
    /// Returns `FormError::InvalidRole` if the role value is not recognised.
    pub fn with_field(&self, field: CredentialField, value: &str) -> Result<Self, FormError> {
        let mut next = self.clone();
        match field {
            CredentialField::Email => next.email = value.to_string(),
            CredentialField::Password => next.password = value.to_string(),
            CredentialField::Role => next.role = value.parse()?,
        }
        Ok(next)
    }

    /// Return a copy with the role replaced
    #[must_use]
    pub fn with_role(&self, role: Role) -> Self {
        Self {
            role,
            ..self.clone()
        }
    }
}

// The password never reaches logs through `{:?}`
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Body returned by the authentication service on a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "jwt")]
    pub token: String,
    pub role: Role,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "displayName", alias = "name")]
    pub display_name: String,
}

/// Result of a login submission, shown as a transient status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub success: bool,
    pub message: String,
    pub session_token: Option<String>,
    pub role: Option<Role>,
    pub user_id: Option<String>,
    pub display_name: Option<String>,
}

impl SubmissionOutcome {
    #[must_use]
    pub fn succeeded(message: &str, response: &LoginResponse) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            session_token: Some(response.token.clone()),
            role: Some(response.role),
            user_id: Some(response.user_id.clone()),
            display_name: Some(response.display_name.clone()),
        }
    }

    #[must_use]
    pub fn failed(message: String) -> Self {
        Self {
            success: false,
            message,
            session_token: None,
            role: None,
            user_id: None,
            display_name: None,
        }
    }
}

/// Chronic conditions a patient can pick when signing up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChronicCondition {
    Diabetes,
    Hypertension,
    Asthma,
    Copd,
    Other,
}

impl ChronicCondition {
    /// Options in the order they are offered
    pub const ALL: [ChronicCondition; 5] = [
        ChronicCondition::Diabetes,
        ChronicCondition::Hypertension,
        ChronicCondition::Asthma,
        ChronicCondition::Copd,
        ChronicCondition::Other,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ChronicCondition::Diabetes => "DIABETES",
            ChronicCondition::Hypertension => "HYPERTENSION",
            ChronicCondition::Asthma => "ASTHMA",
            ChronicCondition::Copd => "COPD",
            ChronicCondition::Other => "OTHER",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ChronicCondition::Diabetes => "Diabetes",
            ChronicCondition::Hypertension => "Hypertension",
            ChronicCondition::Asthma => "Asthma",
            ChronicCondition::Copd => "COPD",
            ChronicCondition::Other => "Other",
        }
    }
}

impl FromStr for ChronicCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|condition| condition.as_str() == s)
            .ok_or_else(|| format!("Unknown condition: {s}"))
    }
}

/// Fields of the signup form (the role is switched with `set_role`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationField {
    Name,
    Email,
    Password,
    Phone,
    DateOfBirth,
    Condition,
    LicenseNumber,
    Specialization,
}

impl RegistrationField {
    /// Input name used by the rendering layer and on the wire
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            RegistrationField::Name => "name",
            RegistrationField::Email => "email",
            RegistrationField::Password => "password",
            RegistrationField::Phone => "phone",
            RegistrationField::DateOfBirth => "dob",
            RegistrationField::Condition => "condition",
            RegistrationField::LicenseNumber => "license",
            RegistrationField::Specialization => "specialization",
        }
    }
}

impl FromStr for RegistrationField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(RegistrationField::Name),
            "email" => Ok(RegistrationField::Email),
            "password" => Ok(RegistrationField::Password),
            "phone" => Ok(RegistrationField::Phone),
            "dob" => Ok(RegistrationField::DateOfBirth),
            "condition" => Ok(RegistrationField::Condition),
            "license" => Ok(RegistrationField::LicenseNumber),
            "specialization" => Ok(RegistrationField::Specialization),
            other => Err(FormError::UnknownField(other.to_string())),
        }
    }
}

/// Role-conditional part of a registration draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "UPPERCASE")]
pub enum RoleDetails {
    Patient {
        #[serde(rename = "dob")]
        date_of_birth: String,
        condition: String,
    },
    Doctor {
        #[serde(rename = "license")]
        license_number: String,
        specialization: String,
    },
}

impl RoleDetails {
    #[must_use]
    pub fn role(&self) -> Role {
        match self {
            RoleDetails::Patient { .. } => Role::Patient,
            RoleDetails::Doctor { .. } => Role::Doctor,
        }
    }
}

/// Snapshot of the signup form taken at submission time
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationDraft {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    #[serde(flatten)]
    pub details: RoleDetails,
}

impl RegistrationDraft {
    #[must_use]
    pub fn role(&self) -> Role {
        self.details.role()
    }
}

impl fmt::Debug for RegistrationDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationDraft")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("phone", &self.phone)
            .field("details", &self.details)
            .finish()
    }
}

/// Result of a signup submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    pub success: bool,
    pub message: String,
    pub draft: RegistrationDraft,
}

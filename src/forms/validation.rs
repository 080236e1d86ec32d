//! Pure client-side validation helpers
//!
//! Nothing here is enforced by `submit`; the rendering layer uses these to mark
//! fields as required or invalid.

use crate::models::{ChronicCondition, Credentials, RegistrationDraft, RegistrationField, Role, RoleDetails};
use chrono::{NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

// Deliberately loose: something@something.tld, no whitespace
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

const COMMON_REQUIRED: [RegistrationField; 4] = [
    RegistrationField::Name,
    RegistrationField::Email,
    RegistrationField::Password,
    RegistrationField::Phone,
];

/// Why a field failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Missing,
    Malformed,
}

/// One invalid field, identified by its input name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub kind: IssueKind,
}

impl FieldIssue {
    fn missing(field: &'static str) -> Self {
        Self {
            field,
            kind: IssueKind::Missing,
        }
    }

    fn malformed(field: &'static str) -> Self {
        Self {
            field,
            kind: IssueKind::Malformed,
        }
    }
}

/// Whether `value` looks like an email address
#[must_use]
pub fn is_email_shaped(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Fields of the conditional group that belongs to `role`
#[must_use]
pub fn role_fields(role: Role) -> [RegistrationField; 2] {
    match role {
        Role::Patient => [RegistrationField::DateOfBirth, RegistrationField::Condition],
        Role::Doctor => [RegistrationField::LicenseNumber, RegistrationField::Specialization],
    }
}

/// Fields that must be filled on the signup form for `role`
///
/// The other role's group is never required, whatever it holds.
#[must_use]
pub fn required_registration_fields(role: Role) -> Vec<RegistrationField> {
    COMMON_REQUIRED
        .into_iter()
        .chain(role_fields(role))
        .collect()
}

/// Check the login form
#[must_use]
pub fn validate_credentials(credentials: &Credentials) -> Vec<FieldIssue> {
    let mut issues = Vec::new();
    check_email(&credentials.email, &mut issues);
    if credentials.password.is_empty() {
        issues.push(FieldIssue::missing("password"));
    }
    issues
}

/// Check a signup draft against the required set for its role
#[must_use]
pub fn validate_registration(draft: &RegistrationDraft) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    if draft.name.trim().is_empty() {
        issues.push(FieldIssue::missing("name"));
    }
    check_email(&draft.email, &mut issues);
    if draft.password.is_empty() {
        issues.push(FieldIssue::missing("password"));
    }
    if draft.phone.trim().is_empty() {
        issues.push(FieldIssue::missing("phone"));
    }

    match &draft.details {
        RoleDetails::Patient {
            date_of_birth,
            condition,
        } => {
            check_date_of_birth(date_of_birth, &mut issues);
            if condition.is_empty() {
                issues.push(FieldIssue::missing("condition"));
            } else if condition.parse::<ChronicCondition>().is_err() {
                issues.push(FieldIssue::malformed("condition"));
            }
        }
        RoleDetails::Doctor {
            license_number,
            specialization,
        } => {
            if license_number.trim().is_empty() {
                issues.push(FieldIssue::missing("license"));
            }
            if specialization.trim().is_empty() {
                issues.push(FieldIssue::missing("specialization"));
            }
        }
    }

    issues
}

fn check_email(email: &str, issues: &mut Vec<FieldIssue>) {
    if email.trim().is_empty() {
        issues.push(FieldIssue::missing("email"));
    } else if !is_email_shaped(email) {
        issues.push(FieldIssue::malformed("email"));
    }
}

fn check_date_of_birth(value: &str, issues: &mut Vec<FieldIssue>) {
    if value.is_empty() {
        issues.push(FieldIssue::missing("dob"));
        return;
    }
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) if date <= Utc::now().date_naive() => {}
        _ => issues.push(FieldIssue::malformed("dob")),
    }
}

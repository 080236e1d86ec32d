// Signup flow with the HTTP and simulated registration backends
mod common;

use common::{CannedResponse, MockAuthServer};
use healthtrack_auth::testing::TestFixtures;
use healthtrack_auth::{
    HttpAuthApi, RegistrationField, Role, RoleDetails, SignupForm, SimulatedRegistration,
};
use serde_json::json;
use std::time::Duration;

const REGISTER_PATH: &str = "/api/auth/register";

fn fill_doctor<B: healthtrack_auth::RegistrationBackend>(form: &SignupForm<B>) {
    form.update_field_named("name", "Dr. Ann Lee").unwrap();
    form.update_field_named("email", "ann@clinic.example").unwrap();
    form.update_field_named("password", "pw").unwrap();
    form.update_field_named("phone", "555-0100").unwrap();
    // Patient values typed before switching role stay in the form but are not sent
    form.update_field_named("dob", "1980-01-01").unwrap();
    form.update_field_named("role", "DOCTOR").unwrap();
    form.update_field_named("license", "MD-42").unwrap();
    form.update_field_named("specialization", "Cardiology").unwrap();
}

#[actix_web::test]
async fn test_http_registration_sends_active_group_only() {
    let server = MockAuthServer::start(vec![CannedResponse::json(
        REGISTER_PATH,
        201,
        &json!({"id": "new-user"}),
    )]);
    let api = HttpAuthApi::from_settings(&TestFixtures::settings_for(&server.base_url)).unwrap();
    let form = SignupForm::new(api);
    fill_doctor(&form);

    let outcome = form.submit().await.outcome().unwrap();

    assert!(outcome.success, "message: {}", outcome.message);
    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, REGISTER_PATH);
    assert_eq!(
        requests[0].1,
        json!({
            "name": "Dr. Ann Lee",
            "email": "ann@clinic.example",
            "password": "pw",
            "phone": "555-0100",
            "role": "DOCTOR",
            "license": "MD-42",
            "specialization": "Cardiology"
        })
    );
    assert_eq!(form.fields().get(RegistrationField::DateOfBirth), "1980-01-01");
}

#[actix_web::test]
async fn test_http_registration_failure_messages() {
    let server = MockAuthServer::start(vec![CannedResponse::json(
        REGISTER_PATH,
        409,
        &json!({"message": "Email already registered"}),
    )]);
    let api = HttpAuthApi::from_settings(&TestFixtures::settings_for(&server.base_url)).unwrap();
    let form = SignupForm::new(api);
    fill_doctor(&form);

    let outcome = form.submit().await.outcome().unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.message, "Email already registered");
    assert_eq!(outcome.draft.role(), Role::Doctor);
    assert_eq!(form.status(), Some(outcome));
}

#[tokio::test]
async fn test_simulated_registration_round_trip() {
    let form = SignupForm::new(SimulatedRegistration::new(Duration::from_millis(10)));
    fill_doctor(&form);
    form.set_role(Role::Patient);
    form.update_field(RegistrationField::Condition, "COPD");

    assert!(form.is_required(RegistrationField::DateOfBirth));
    assert!(!form.is_required(RegistrationField::LicenseNumber));
    assert!(form.validate().is_empty());

    let outcome = form.submit().await.outcome().unwrap();

    assert!(outcome.success);
    assert_eq!(
        outcome.draft.details,
        RoleDetails::Patient {
            date_of_birth: "1980-01-01".to_string(),
            condition: "COPD".to_string(),
        }
    );
    // Doctor values survive for a later toggle back
    assert_eq!(form.fields().license_number, "MD-42");
}

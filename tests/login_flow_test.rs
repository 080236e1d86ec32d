// End-to-end login flow against an in-process authentication server
mod common;

use common::{CannedResponse, MockAuthServer};
use healthtrack_auth::session::{AUTH_TOKEN_KEY, USER_ID_KEY, USER_NAME_KEY, USER_ROLE_KEY};
use healthtrack_auth::testing::TestFixtures;
use healthtrack_auth::{
    CredentialField, FileSessionStore, HttpAuthApi, LoginForm, Role, SessionRecord, SessionStore,
    SubmissionOutcome,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const LOGIN_PATH: &str = "/api/auth/login";

struct Harness {
    server: MockAuthServer,
    form: LoginForm<HttpAuthApi, Arc<FileSessionStore>>,
    store: Arc<FileSessionStore>,
    dir: TempDir,
}

fn harness(responses: Vec<CannedResponse>) -> Harness {
    harness_with_timeout(responses, 5)
}

fn harness_with_timeout(responses: Vec<CannedResponse>, timeout_secs: u64) -> Harness {
    let server = MockAuthServer::start(responses);
    let mut settings = TestFixtures::settings_for(&server.base_url);
    settings.api.request_timeout_secs = timeout_secs;

    let dir = TempDir::new().expect("temp dir");
    let store = Arc::new(
        FileSessionStore::open(dir.path().join("session.json")).expect("open session cache"),
    );
    let api = HttpAuthApi::from_settings(&settings).expect("build client");
    let form = LoginForm::new(api, Arc::clone(&store));

    Harness {
        server,
        form,
        store,
        dir,
    }
}

fn fill_patient(form: &LoginForm<HttpAuthApi, Arc<FileSessionStore>>) {
    form.update_field(CredentialField::Email, "a@b.com").unwrap();
    form.update_field(CredentialField::Password, "x").unwrap();
    form.update_field(CredentialField::Role, "PATIENT").unwrap();
}

async fn submit(h: &Harness) -> SubmissionOutcome {
    h.form
        .submit()
        .await
        .outcome()
        .expect("submission should not be ignored")
}

fn assert_no_session(h: &Harness) {
    for key in [AUTH_TOKEN_KEY, USER_ROLE_KEY, USER_ID_KEY, USER_NAME_KEY] {
        assert_eq!(h.store.get(key), None, "{key} should not be written");
    }
    assert!(SessionRecord::load(h.store.as_ref()).is_none());
}

/// 401 from the server: fixed message, nothing cached
#[actix_web::test]
async fn test_rejected_credentials_write_no_session() {
    let h = harness(vec![CannedResponse::json(
        LOGIN_PATH,
        401,
        &json!({"message": "Bad credentials"}),
    )]);
    fill_patient(&h.form);

    let outcome = submit(&h).await;

    assert!(!outcome.success);
    assert_eq!(outcome.message, "Invalid email or password");
    assert_no_session(&h);
    assert!(!h.form.is_submitting());
}

/// 200 from the server: the four keys hold the response values and survive a reopen
#[actix_web::test]
async fn test_successful_login_persists_session() {
    let h = harness(vec![CannedResponse::json(
        LOGIN_PATH,
        200,
        &json!({"token": "t1", "role": "DOCTOR", "userId": "u1", "displayName": "Dr. A"}),
    )]);
    fill_patient(&h.form);

    let outcome = submit(&h).await;

    assert!(outcome.success);
    assert_eq!(outcome.session_token.as_deref(), Some("t1"));
    assert_eq!(outcome.role, Some(Role::Doctor));
    assert_eq!(h.store.get(AUTH_TOKEN_KEY).as_deref(), Some("t1"));
    assert_eq!(h.store.get(USER_ROLE_KEY).as_deref(), Some("DOCTOR"));
    assert_eq!(h.store.get(USER_ID_KEY).as_deref(), Some("u1"));
    assert_eq!(h.store.get(USER_NAME_KEY).as_deref(), Some("Dr. A"));

    let reopened = FileSessionStore::open(h.dir.path().join("session.json")).unwrap();
    let record = SessionRecord::load(&reopened).expect("session should persist");
    assert_eq!(record.token, "t1");
    assert_eq!(record.role, Role::Doctor);
    assert_eq!(record.user_id, "u1");
    assert_eq!(record.display_name, "Dr. A");

    let cached: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(h.dir.path().join("session.json")).unwrap())
            .unwrap();
    assert_eq!(cached.as_object().unwrap().len(), 4);
}

#[actix_web::test]
async fn test_request_carries_form_values() {
    let h = harness(vec![CannedResponse::json(LOGIN_PATH, 404, &json!({}))]);
    fill_patient(&h.form);
    h.form.set_role(Role::Doctor);

    let outcome = submit(&h).await;
    assert_eq!(outcome.message, "User not found");

    let requests = h.server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, LOGIN_PATH);
    assert_eq!(
        requests[0].1,
        json!({"email": "a@b.com", "password": "x", "role": "DOCTOR"})
    );
}

#[actix_web::test]
async fn test_forbidden_role() {
    let h = harness(vec![CannedResponse::json(LOGIN_PATH, 403, &json!({}))]);
    fill_patient(&h.form);

    let outcome = submit(&h).await;
    assert_eq!(outcome.message, "Role permission denied");
    assert_no_session(&h);
}

#[actix_web::test]
async fn test_server_error_message_passthrough() {
    let h = harness(vec![CannedResponse::json(
        LOGIN_PATH,
        500,
        &json!({"message": "Authentication service is down for maintenance"}),
    )]);
    fill_patient(&h.form);

    let outcome = submit(&h).await;
    assert!(!outcome.success);
    assert_eq!(
        outcome.message,
        "Authentication service is down for maintenance"
    );
}

#[actix_web::test]
async fn test_server_error_without_message_falls_back() {
    let h = harness(vec![CannedResponse::raw(LOGIN_PATH, 503, "Service Unavailable")]);
    fill_patient(&h.form);

    let outcome = submit(&h).await;
    assert_eq!(outcome.message, "Login failed");
}

#[actix_web::test]
async fn test_legacy_response_fields_are_accepted() {
    let h = harness(vec![CannedResponse::json(
        LOGIN_PATH,
        200,
        &json!({"jwt": "legacy-token", "role": "PATIENT", "userId": "42", "name": "Pat"}),
    )]);
    fill_patient(&h.form);

    let outcome = submit(&h).await;
    assert!(outcome.success);
    assert_eq!(h.store.get(AUTH_TOKEN_KEY).as_deref(), Some("legacy-token"));
    assert_eq!(h.store.get(USER_NAME_KEY).as_deref(), Some("Pat"));
}

#[actix_web::test]
async fn test_undecodable_success_body_is_not_a_login() {
    let h = harness(vec![CannedResponse::raw(LOGIN_PATH, 200, "<html>ok</html>")]);
    fill_patient(&h.form);

    let outcome = submit(&h).await;
    assert!(!outcome.success);
    assert!(
        outcome.message.starts_with("Unexpected login response"),
        "got {}",
        outcome.message
    );
    assert_no_session(&h);
}

#[actix_web::test]
async fn test_slow_server_times_out() {
    let h = harness_with_timeout(
        vec![CannedResponse::json(LOGIN_PATH, 200, &json!({})).delayed(Duration::from_secs(3))],
        1,
    );
    fill_patient(&h.form);

    let outcome = submit(&h).await;
    assert!(!outcome.success);
    assert_eq!(outcome.message, "No server response");
    assert!(!h.form.is_submitting());
}

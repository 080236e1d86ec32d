#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::{bail, Context, Result};
use healthtrack_auth::{
    auth::RegistrationBackend,
    forms::{validate_registration, LoginForm, SignupForm, SubmitResult},
    settings::{HealthTrackSettings, RegistrationBackendKind},
    FileSessionStore, HttpAuthApi, SessionRecord, SimulatedRegistration,
};
use std::sync::Arc;

/// Signup inputs read from `SIGNUP_<NAME>` environment variables, role first so
/// the conditional group is selected before its fields are filled
const SIGNUP_INPUTS: [&str; 9] = [
    "role",
    "name",
    "email",
    "password",
    "phone",
    "dob",
    "condition",
    "license",
    "specialization",
];

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from Settings.toml and environment variables
    // This also loads .env file and initializes the logger
    let settings = HealthTrackSettings::load()
        .map_err(|e| anyhow::anyhow!("Failed to load settings: {e}"))?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        print_usage(&settings);
        return Ok(());
    };

    let store = Arc::new(
        FileSessionStore::open(&settings.session.store_path).with_context(|| {
            format!(
                "Failed to open session cache at {}",
                settings.session.store_path
            )
        })?,
    );

    match command.as_str() {
        "login" => login(&settings, store, &args[1..]).await,
        "signup" => signup(&settings).await,
        "whoami" => {
            match SessionRecord::load(store.as_ref()) {
                Some(record) => println!(
                    "Signed in as {} ({}, id {})",
                    record.display_name, record.role, record.user_id
                ),
                None => println!("Not signed in"),
            }
            Ok(())
        }
        "logout" => {
            SessionRecord::clear(store.as_ref()).context("Failed to clear session cache")?;
            println!("Signed out");
            Ok(())
        }
        other => {
            print_usage(&settings);
            bail!("Unknown command: {other}")
        }
    }
}

async fn login(
    settings: &HealthTrackSettings,
    store: Arc<FileSessionStore>,
    args: &[String],
) -> Result<()> {
    let [email, password, rest @ ..] = args else {
        bail!("Usage: healthtrack-auth login <email> <password> [PATIENT|DOCTOR]");
    };

    let api = HttpAuthApi::from_settings(settings)?;
    let form = LoginForm::new(api, store);
    form.update_field_named("email", email)?;
    form.update_field_named("password", password)?;
    if let Some(role) = rest.first() {
        form.update_field_named("role", role)?;
    }

    for issue in form.validate() {
        log::warn!("Field {} is {:?}", issue.field, issue.kind);
    }

    report(form.submit().await.outcome().map(|o| (o.success, o.message)))
}

async fn signup(settings: &HealthTrackSettings) -> Result<()> {
    let backend: Arc<dyn RegistrationBackend> = match settings.registration.backend {
        RegistrationBackendKind::Simulated => Arc::new(SimulatedRegistration::new(
            settings.simulated_registration_delay(),
        )),
        RegistrationBackendKind::Http => Arc::new(HttpAuthApi::from_settings(settings)?),
    };

    let form = SignupForm::new(backend);
    for name in SIGNUP_INPUTS {
        let var = format!("SIGNUP_{}", name.to_uppercase());
        if let Ok(value) = std::env::var(&var) {
            form.update_field_named(name, &value)
                .with_context(|| format!("Invalid {var}"))?;
        }
    }

    let result = form.submit().await;
    if let SubmitResult::Completed(outcome) = &result {
        for issue in validate_registration(&outcome.draft) {
            log::warn!("Field {} is {:?}", issue.field, issue.kind);
        }
    }

    report(result.outcome().map(|o| (o.success, o.message)))
}

fn report(outcome: Option<(bool, String)>) -> Result<()> {
    match outcome {
        Some((true, message)) => {
            println!("✓ {message}");
            Ok(())
        }
        Some((false, message)) => bail!("{message}"),
        None => bail!("A submission is already in progress"),
    }
}

fn print_usage(settings: &HealthTrackSettings) {
    println!("HealthTrack auth client {}", healthtrack_auth::VERSION);
    println!();
    println!("Commands:");
    println!("  login <email> <password> [PATIENT|DOCTOR]  - Sign in and cache the session");
    println!("  signup                                     - Register using SIGNUP_* variables");
    println!("  whoami                                     - Show the cached session");
    println!("  logout                                     - Clear the cached session");
    println!();
    println!("Login endpoint: {}", display_url(settings.login_url()));
    println!("Register endpoint: {}", display_url(settings.register_url()));
    println!("Session cache: {}", settings.session.store_path);
}

fn display_url(url: Result<url::Url, url::ParseError>) -> String {
    url.map_or_else(|e| format!("<invalid: {e}>"), String::from)
}

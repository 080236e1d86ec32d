//! `reqwest`-backed authentication client

use crate::auth::error::AuthError;
use crate::auth::{AuthApi, RegistrationBackend};
use crate::models::{Credentials, LoginResponse, RegistrationDraft};
use crate::settings::HealthTrackSettings;
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde::Serialize;

/// Client for the HealthTrack authentication endpoints
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    client: Client,
    login_url: String,
    register_url: String,
}

impl HttpAuthApi {
    /// Build a client from settings
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configured base URL or endpoint paths do not form valid URLs
    /// - The HTTP client cannot be constructed
    pub fn from_settings(settings: &HealthTrackSettings) -> Result<Self, AuthError> {
        let login_url = settings
            .login_url()
            .map_err(|e| AuthError::ClientFault(format!("Invalid login URL: {e}")))?;
        let register_url = settings
            .register_url()
            .map_err(|e| AuthError::ClientFault(format!("Invalid registration URL: {e}")))?;

        let mut builder = Client::builder().user_agent(concat!(
            "HealthTrack-Auth/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AuthError::ClientFault(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self::with_client(client, login_url.as_str(), register_url.as_str()))
    }

    /// Use an existing client and explicit endpoint URLs
    #[must_use]
    pub fn with_client(client: Client, login_url: &str, register_url: &str) -> Self {
        Self {
            client,
            login_url: login_url.to_string(),
            register_url: register_url.to_string(),
        }
    }

    #[must_use]
    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    #[must_use]
    pub fn register_url(&self) -> &str {
        &self.register_url
    }

    /// POST a JSON body and return the raw success body
    async fn post_json<B: Serialize + Sync>(&self, url: &str, body: &B) -> Result<String, AuthError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!("Request to {url} failed: {e}");
                AuthError::from_transport(&e)
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            warn!("Failed to read response body from {url}: {e}");
            AuthError::from_transport(&e)
        })?;

        if status.is_success() {
            Ok(text)
        } else {
            debug!("{url} answered {status}");
            Err(AuthError::from_status(status, &text))
        }
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError> {
        debug!(
            "Sending login request for {} as {}",
            credentials.email, credentials.role
        );

        let body = self.post_json(&self.login_url, credentials).await?;
        let response: LoginResponse = serde_json::from_str(&body)
            .map_err(|e| AuthError::ClientFault(format!("Unexpected login response: {e}")))?;

        info!(
            "Login accepted for user {} ({})",
            response.user_id, response.role
        );
        Ok(response)
    }
}

#[async_trait]
impl RegistrationBackend for HttpAuthApi {
    async fn register(&self, draft: &RegistrationDraft) -> Result<(), AuthError> {
        debug!(
            "Sending registration request for {} as {}",
            draft.email,
            draft.role()
        );
        self.post_json(&self.register_url, draft).await?;
        info!("Registration accepted for {}", draft.email);
        Ok(())
    }
}

//! Authentication service seam
//!
//! The controllers only see the traits in this module; the HTTP client and the
//! simulated registration backend are the production implementations, and
//! `testing::mock` provides a scripted one.

use crate::models::{Credentials, LoginResponse, RegistrationDraft};
use async_trait::async_trait;
use std::sync::Arc;

pub mod error;
pub mod http;
pub mod simulated;

pub use error::{AuthError, LOGIN_FAILED_MESSAGE, REGISTRATION_FAILED_MESSAGE};
pub use http::HttpAuthApi;
pub use simulated::SimulatedRegistration;

/// Remote login call
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a session
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The server rejects the credentials or the role (401, 403, 404)
    /// - The server fails with any other status
    /// - No response arrives
    /// - The request cannot be built or the response body cannot be decoded
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError>;
}

/// Remote account creation call
#[async_trait]
pub trait RegistrationBackend: Send + Sync {
    /// Submit a registration draft
    ///
    /// # Errors
    ///
    /// Returns an error classified the same way as `AuthApi::login`.
    async fn register(&self, draft: &RegistrationDraft) -> Result<(), AuthError>;
}

#[async_trait]
impl<T: AuthApi + ?Sized> AuthApi for Arc<T> {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError> {
        (**self).login(credentials).await
    }
}

#[async_trait]
impl<T: RegistrationBackend + ?Sized> RegistrationBackend for Arc<T> {
    async fn register(&self, draft: &RegistrationDraft) -> Result<(), AuthError> {
        (**self).register(draft).await
    }
}

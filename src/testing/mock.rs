//! Mock objects and fake implementations for testing
//!
//! This module provides a scripted stand-in for the authentication service so the
//! form controllers can be tested without a network.

use crate::auth::{AuthApi, AuthError, RegistrationBackend};
use crate::models::{Credentials, LoginResponse, RegistrationDraft};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use tokio::sync::Notify;

/// Scripted authentication service
///
/// Responses are queued with `push_login` / `push_register` and handed out in
/// order. A gated mock holds every call open until `release` is called, which
/// lets tests observe a form while its request is in flight.
#[derive(Debug, Default)]
pub struct MockAuthApi {
    login_responses: Mutex<VecDeque<Result<LoginResponse, AuthError>>>,
    register_responses: Mutex<VecDeque<Result<(), AuthError>>>,
    login_calls: AtomicUsize,
    register_calls: AtomicUsize,
    last_credentials: Mutex<Option<Credentials>>,
    last_draft: Mutex<Option<RegistrationDraft>>,
    gate: Option<Notify>,
}

impl MockAuthApi {
    /// Mock that answers immediately
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock whose calls wait for `release`
    #[must_use]
    pub fn gated() -> Self {
        Self {
            gate: Some(Notify::new()),
            ..Self::default()
        }
    }

    /// Queue the result of the next login call
    pub fn push_login(&self, response: Result<LoginResponse, AuthError>) {
        self.login_responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response);
    }

    /// Queue the result of the next registration call (unscripted calls succeed)
    pub fn push_register(&self, response: Result<(), AuthError>) {
        self.register_responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response);
    }

    /// Let one waiting (or the next) gated call proceed
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    #[must_use]
    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn register_calls(&self) -> usize {
        self.register_calls.load(Ordering::SeqCst)
    }

    /// Credentials received by the most recent login call
    #[must_use]
    pub fn last_credentials(&self) -> Option<Credentials> {
        self.last_credentials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Draft received by the most recent registration call
    #[must_use]
    pub fn last_draft(&self) -> Option<RegistrationDraft> {
        self.last_draft
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn wait_for_release(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl AuthApi for MockAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, AuthError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_credentials
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(credentials.clone());

        self.wait_for_release().await;

        self.login_responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Err(AuthError::ClientFault("no scripted login response".to_string())))
    }
}

#[async_trait]
impl RegistrationBackend for MockAuthApi {
    async fn register(&self, draft: &RegistrationDraft) -> Result<(), AuthError> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_draft
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(draft.clone());

        self.wait_for_release().await;

        self.register_responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or(Ok(()))
    }
}

//! Network side of the session: login, logout, current user, registration and
//! password reset.
//!
//! ARCHITECTURE
//! ============
//! Sessions are cookie based. Every state-changing call first GETs the
//! anti-forgery endpoint so the server can set a fresh `XSRF-TOKEN` cookie,
//! then submits the request; the transport echoes the cookie back as a
//! header. `logout` and `current_user` skip the pre-step.
//!
//! The gateway is stateless and never retries. Failures are classified into
//! [`AuthError`] here and nowhere else.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::rc::Rc;

use serde_json::Value;

use super::api::{ApiRequest, HttpError, ResourceClient};
use super::types::{AuthError, Identity, Payload};
use crate::config::AuthEndpoints;

pub(crate) const LOGIN_FAILED: &str = "Login failed";
pub(crate) const LOGOUT_FAILED: &str = "Logout failed";
pub(crate) const FETCH_USER_FAILED: &str = "Failed to fetch user";
pub(crate) const REGISTRATION_FAILED: &str = "Registration failed";
pub(crate) const RESET_REQUEST_FAILED: &str = "Could not send password reset link";
pub(crate) const RESET_FAILED: &str = "Password reset failed";
const ANTI_FORGERY_FAILED: &str = "Could not start a secure session";

/// Stateless client for the session endpoints.
#[derive(Clone)]
pub struct AuthGateway {
    client: Rc<dyn ResourceClient>,
    endpoints: AuthEndpoints,
}

impl AuthGateway {
    #[must_use]
    pub fn new(client: Rc<dyn ResourceClient>, endpoints: AuthEndpoints) -> Self {
        Self { client, endpoints }
    }

    /// Submit credentials. A success only means the server accepted them; the
    /// identity has to be fetched separately.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the anti-forgery step or the login.
    pub async fn login(&self, credentials: &Payload) -> Result<Value, AuthError> {
        self.submit(&self.endpoints.login, credentials, LOGIN_FAILED).await
    }

    /// End the server-side session.
    ///
    /// # Errors
    ///
    /// Returns the classified failure of the logout request.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.client
            .send(ApiRequest::post(&self.endpoints.logout))
            .await
            .map(|_| ())
            .map_err(|e| classify(e, LOGOUT_FAILED))
    }

    /// Fetch the user bound to the current session cookie.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AuthorizationDenied`] when there is no session,
    /// [`AuthError::Decode`] when the response is not a user.
    pub async fn current_user(&self) -> Result<Identity, AuthError> {
        let body = self
            .client
            .send(ApiRequest::get(&self.endpoints.current_user))
            .await
            .map_err(|e| classify(e, FETCH_USER_FAILED))?;
        Identity::from_response(body)
    }

    /// Create an account. The server signs the new user in on success.
    ///
    /// # Errors
    ///
    /// Returns the classified failure, typically
    /// [`AuthError::ValidationFailed`] for rejected fields.
    pub async fn register(&self, user_data: &Payload) -> Result<Value, AuthError> {
        self.submit(&self.endpoints.register, user_data, REGISTRATION_FAILED).await
    }

    /// Ask the server to email a password reset link.
    ///
    /// # Errors
    ///
    /// Returns the classified failure.
    pub async fn request_password_reset(&self, data: &Payload) -> Result<Value, AuthError> {
        self.submit(&self.endpoints.forgot_password, data, RESET_REQUEST_FAILED).await
    }

    /// Set a new password using a reset token.
    ///
    /// # Errors
    ///
    /// Returns the classified failure.
    pub async fn reset_password(&self, data: &Payload) -> Result<Value, AuthError> {
        self.submit(&self.endpoints.reset_password, data, RESET_FAILED).await
    }

    async fn acquire_anti_forgery(&self) -> Result<(), AuthError> {
        self.client
            .send(ApiRequest::get(&self.endpoints.csrf_cookie))
            .await
            .map(|_| ())
            .map_err(|e| classify(e, ANTI_FORGERY_FAILED))
    }

    async fn submit(&self, path: &str, payload: &Payload, fallback: &str) -> Result<Value, AuthError> {
        self.acquire_anti_forgery().await?;
        self.client
            .send(ApiRequest::post(path).json(Value::Object(payload.clone())))
            .await
            .map_err(|e| classify(e, fallback))
    }
}

fn classify(err: HttpError, fallback: &str) -> AuthError {
    let err = AuthError::from_http(err, fallback);
    match &err {
        AuthError::AuthorizationDenied { .. } => leptos::logging::warn!("auth: unauthorized"),
        AuthError::AntiForgeryMismatch { .. } => leptos::logging::warn!("auth: anti-forgery token mismatch"),
        AuthError::ValidationFailed { fields, .. } => {
            leptos::logging::warn!("auth: validation failed on {:?}", fields.keys().collect::<Vec<_>>());
        }
        other => leptos::logging::warn!("auth: request failed: {other}"),
    }
    err
}

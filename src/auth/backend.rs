//! Auth backend boundary.
//!
//! `AuthBackend` is the seam between the session manager and whatever issues
//! tokens. The shipped implementation talks to the application's own REST
//! auth endpoints (`/api/auth/*`); tests substitute stubs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Timeout for auth calls. Auth endpoints are cheap; fail fast.
const AUTH_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials: {message}")]
    InvalidCredentials { status: u16, message: String },

    #[error("Auth backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("No active session")]
    NoSession,
}

/// A live session as returned by the auth backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
}

/// Registered user identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Option<i64>,
    pub email: Option<String>,
}

/// Result of a sign-up: some backends return a session immediately, others
/// require email confirmation first and return only the user.
#[derive(Debug, Clone, Deserialize)]
pub struct SignupOutcome {
    pub user: Option<AuthUser>,
    pub session: Option<AuthSession>,
}

/// Structured error body the backend attaches to auth failures.
#[derive(Debug, Deserialize)]
struct AuthErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// Exchange credentials for a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;

    /// Invalidate the backend session for this token.
    async fn sign_out(&self, token: &str) -> Result<(), AuthError>;

    /// Look up the live session for a token, if the backend still honors it.
    async fn get_session(&self, token: &str) -> Result<Option<AuthSession>, AuthError>;

    /// Obtain a fresh token from an existing session.
    async fn refresh_session(&self, token: &str) -> Result<AuthSession, AuthError>;

    /// Register a new user.
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignupOutcome, AuthError>;
}

#[derive(Debug, Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    session: Option<AuthSession>,
}

/// REST auth backend against the application's own endpoints.
/// Clone is cheap - reqwest::Client uses Arc internally.
#[derive(Clone)]
pub struct HttpAuthBackend {
    client: Client,
    base_url: String,
}

impl HttpAuthBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AuthError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(AUTH_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Reuse an existing client (shares the connection pool).
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decide the error once, from status + body.
    async fn error_from_response(
        response: reqwest::Response,
        credential_call: bool,
    ) -> AuthError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<AuthErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| {
                if body.is_empty() {
                    format!("auth request failed with status {}", status)
                } else {
                    body.clone()
                }
            });

        if credential_call && (status == 400 || status == 401) {
            AuthError::InvalidCredentials { status, message }
        } else {
            AuthError::Backend { status, message }
        }
    }

    fn session_from(response: SessionResponse) -> Result<AuthSession, AuthError> {
        response.session.ok_or(AuthError::NoSession)
    }
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let response = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&CredentialsBody { email, password })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response, true).await);
        }

        let parsed: SessionResponse = response.json().await?;
        Self::session_from(parsed)
    }

    async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        let response = self
            .client
            .post(self.url("/api/auth/logout"))
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response, false).await);
        }
        Ok(())
    }

    async fn get_session(&self, token: &str) -> Result<Option<AuthSession>, AuthError> {
        let response = self
            .client
            .get(self.url("/api/auth/session"))
            .bearer_auth(token)
            .send()
            .await?;

        // A dead token is an answer, not a failure
        if response.status().as_u16() == 401 {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Self::error_from_response(response, false).await);
        }

        let parsed: SessionResponse = response.json().await?;
        Ok(parsed.session)
    }

    async fn refresh_session(&self, token: &str) -> Result<AuthSession, AuthError> {
        let response = self
            .client
            .post(self.url("/api/auth/refresh"))
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response, false).await);
        }

        let parsed: SessionResponse = response.json().await?;
        Self::session_from(parsed)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignupOutcome, AuthError> {
        let response = self
            .client
            .post(self.url("/api/auth/signup"))
            .json(&CredentialsBody { email, password })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response, false).await);
        }

        Ok(response.json().await?)
    }
}

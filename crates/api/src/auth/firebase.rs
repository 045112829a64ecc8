//! Identity Toolkit (Firebase Auth) REST backend.
//!
//! Signs in with `accounts:signInWithPassword`. The returned ID token is
//! carried on the identity so the credential relay can hand it to the
//! document store. Failures arrive as `{"error": {"message": CODE}}` and
//! are classified with [`SignInFailure::from_code`].

use async_trait::async_trait;
use folio_core::auth::{Identity, SignInFailure};
use serde::Deserialize;
use serde_json::json;

use super::service::AuthService;
use super::AuthError;

pub const DEFAULT_BASE_URL: &str = "https://identitytoolkit.googleapis.com/v1";

pub struct FirebaseAuthService {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    email: String,
    id_token: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl FirebaseAuthService {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }
}

/// Pull the failure code out of an error response body.
fn failure_from_body(body: &str) -> SignInFailure {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => SignInFailure::from_code(&envelope.error.message),
        Err(_) => SignInFailure::Other("unreadable-error".into()),
    }
}

#[async_trait]
impl AuthService for FirebaseAuthService {
    fn backend_name(&self) -> &'static str {
        "firebase"
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let response = self
            .client
            .post(format!("{}/accounts:signInWithPassword", self.base_url))
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Auth service unreachable");
                AuthError::SignIn(SignInFailure::Other("network-request-failed".into()))
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());

        if !status.is_success() {
            let failure = failure_from_body(&body);
            tracing::info!(status = status.as_u16(), ?failure, "Sign-in rejected");
            return Err(AuthError::SignIn(failure));
        }

        let parsed: SignInResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "Unexpected sign-in response");
            AuthError::SignIn(SignInFailure::Other("unexpected-response".into()))
        })?;

        Ok(Identity {
            uid: parsed.local_id,
            email: parsed.email,
            id_token: Some(parsed.id_token),
        })
    }

    /// ID tokens are stateless; signing out only drops them locally.
    async fn sign_out(&self, _identity: &Identity) -> Result<(), AuthError> {
        Ok(())
    }
}

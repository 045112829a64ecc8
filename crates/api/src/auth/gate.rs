//! The auth gate: tracks who (if anyone) is signed in.
//!
//! There is one gate per process. Writes in the admin console are only
//! reachable while it holds an identity; public showcase reads never look
//! at it. Session changes are published on a `watch` channel so the
//! credential relay can react.
//!
//! Every successful sign-in opens a new [`Session`] with a fresh id. Session
//! tokens carry that id, so a token outlives neither the sign-out that ends
//! its session nor a later sign-in that replaces it.

use std::sync::Arc;

use folio_core::auth::{Identity, SignInFailure};
use serde::Serialize;
use tokio::sync::watch;
use uuid::Uuid;

use super::service::AuthService;
use super::AuthError;

/// What the front end needs to decide between the login form and the console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateState {
    pub signed_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// One signed-in period, from sign-in until sign-out or the next sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub identity: Identity,
}

pub struct AuthGate {
    service: Arc<dyn AuthService>,
    session: watch::Sender<Option<Session>>,
}

impl AuthGate {
    pub fn new(service: Arc<dyn AuthService>) -> Self {
        let (session, _) = watch::channel(None);
        Self { service, session }
    }

    pub fn backend_name(&self) -> &'static str {
        self.service.backend_name()
    }

    /// Sign in with email and password.
    ///
    /// Empty credentials are refused without contacting the service. On
    /// failure the current session (if any) is left untouched. On success
    /// any previous session is replaced.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::SignIn(SignInFailure::MissingCredentials));
        }

        let identity = self.service.sign_in(email, password).await?;
        let session = Session {
            id: Uuid::new_v4().to_string(),
            identity,
        };
        tracing::info!(
            uid = %session.identity.uid,
            email = %session.identity.email,
            session_id = %session.id,
            "Signed in"
        );
        self.session.send_replace(Some(session.clone()));
        Ok(session)
    }

    /// End the current session.
    ///
    /// Signing out with nobody signed in is a no-op. If the service refuses,
    /// the session stays in place.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(session) = self.session() else {
            return Ok(());
        };

        self.service.sign_out(&session.identity).await.inspect_err(|e| {
            tracing::warn!(uid = %session.identity.uid, error = %e, "Sign-out failed");
        })?;

        // Only clear if no new session opened while the call was in flight.
        self.session.send_if_modified(|current| {
            if current.as_ref().map(|s| &s.id) == Some(&session.id) {
                *current = None;
                true
            } else {
                false
            }
        });
        tracing::info!(uid = %session.identity.uid, session_id = %session.id, "Signed out");
        Ok(())
    }

    pub fn session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    pub fn current(&self) -> Option<Identity> {
        self.session.borrow().as_ref().map(|s| s.identity.clone())
    }

    /// Whether `session_id` names the session that is open right now.
    pub fn is_current_session(&self, session_id: &str) -> bool {
        self.session
            .borrow()
            .as_ref()
            .is_some_and(|s| s.id == session_id)
    }

    pub fn is_signed_in(&self) -> bool {
        self.session.borrow().is_some()
    }

    pub fn state(&self) -> GateState {
        let session = self.session.borrow();
        GateState {
            signed_in: session.is_some(),
            email: session.as_ref().map(|s| s.identity.email.clone()),
        }
    }

    /// Receiver that wakes on every sign-in and sign-out.
    pub fn session_changes(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }
}

//! Authentication for the admin surface.
//!
//! - [`service`] -- the [`AuthService`](service::AuthService) seam.
//! - [`local`] -- single-account argon2 backend with lockout.
//! - [`firebase`] -- Identity Toolkit REST backend.
//! - [`gate`] -- the process-wide signed-in identity.
//! - [`relay`] -- forwards identity tokens to the document store.
//! - [`password`] -- Argon2id hashing.
//! - [`jwt`] -- session tokens for admin calls.

pub mod firebase;
pub mod gate;
pub mod jwt;
pub mod local;
pub mod password;
pub mod relay;
pub mod service;

use folio_core::auth::SignInFailure;

/// A rejected sign-in or a failed sign-out.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Sign-in rejected: {0:?}")]
    SignIn(SignInFailure),

    #[error("Sign-out failed: {0}")]
    SignOut(String),
}

impl AuthError {
    /// The fixed message shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::SignIn(failure) => failure.user_message(),
            Self::SignOut(_) => folio_core::notice::LOGOUT_FAILED,
        }
    }
}

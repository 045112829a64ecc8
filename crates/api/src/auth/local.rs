//! Local auth backend: one admin account configured from the environment.
//!
//! Used for development and tests in place of the hosted auth service.
//! Consecutive failures lock the account for a while, and a locked account
//! reports as rate-limited, the same way the hosted service does.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use folio_core::auth::{Identity, SignInFailure};

use super::password::verify_password;
use super::service::AuthService;
use super::AuthError;

/// Maximum consecutive failed sign-in attempts before locking the account.
pub const MAX_FAILED_ATTEMPTS: u32 = 5;

/// Duration in minutes to lock the account after too many failures.
pub const LOCK_DURATION_MINS: i64 = 15;

/// uid reported for the local admin.
pub const LOCAL_ADMIN_UID: &str = "local-admin";

#[derive(Default)]
struct Lockout {
    failed_count: u32,
    locked_until: Option<DateTime<Utc>>,
}

pub struct LocalAuthService {
    email: String,
    password_hash: String,
    lockout: Mutex<Lockout>,
}

impl LocalAuthService {
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password_hash: password_hash.into(),
            lockout: Mutex::new(Lockout::default()),
        }
    }

    fn lockout(&self) -> MutexGuard<'_, Lockout> {
        self.lockout.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_failure(&self) {
        let mut lockout = self.lockout();
        lockout.failed_count += 1;
        if lockout.failed_count >= MAX_FAILED_ATTEMPTS {
            let until = Utc::now() + chrono::Duration::minutes(LOCK_DURATION_MINS);
            lockout.locked_until = Some(until);
            lockout.failed_count = 0;
            tracing::warn!(
                email = %self.email,
                %until,
                "Admin account locked after failed sign-ins"
            );
        }
    }
}

#[async_trait]
impl AuthService for LocalAuthService {
    fn backend_name(&self) -> &'static str {
        "local"
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        // 1. Reject while locked.
        if let Some(until) = self.lockout().locked_until {
            if until > Utc::now() {
                return Err(AuthError::SignIn(SignInFailure::RateLimited));
            }
        }

        // 2. Unknown account.
        if !email.trim().eq_ignore_ascii_case(&self.email) {
            return Err(AuthError::SignIn(SignInFailure::UnknownAccount));
        }

        // 3. Verify password.
        let valid = verify_password(password, &self.password_hash).map_err(|e| {
            tracing::error!(error = %e, "Stored admin password hash is unusable");
            AuthError::SignIn(SignInFailure::Other("internal-error".into()))
        })?;

        if !valid {
            self.record_failure();
            return Err(AuthError::SignIn(SignInFailure::InvalidCredential));
        }

        // 4. Success resets the counter.
        *self.lockout() = Lockout::default();

        Ok(Identity {
            uid: LOCAL_ADMIN_UID.to_string(),
            email: self.email.clone(),
            id_token: None,
        })
    }

    async fn sign_out(&self, _identity: &Identity) -> Result<(), AuthError> {
        Ok(())
    }
}

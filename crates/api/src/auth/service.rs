use async_trait::async_trait;
use folio_core::auth::Identity;

use super::AuthError;

/// A remote (or stand-in) email/password auth service.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;

    /// Exchange credentials for an identity. Failures come back as
    /// [`AuthError::SignIn`] with a classified reason.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError>;

    /// End the session for `identity` at the service.
    async fn sign_out(&self, identity: &Identity) -> Result<(), AuthError>;
}

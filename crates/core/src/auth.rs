//! Signed-in identity and sign-in failure classification.

use serde::Serialize;

use crate::notice;

/// The identity the auth service reports while someone is signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    /// Stable account id at the auth service.
    pub uid: String,
    pub email: String,
    /// Bearer token the document store accepts for this identity, when the
    /// auth backend issues one.
    #[serde(skip)]
    pub id_token: Option<String>,
}

/// Why a sign-in attempt was rejected.
///
/// The auth service reports failures as free-form codes. They are folded
/// into this closed set so the login form only ever shows one of a few
/// fixed messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInFailure {
    /// Email or password left empty; nothing was sent.
    MissingCredentials,
    /// Malformed email or wrong password.
    InvalidCredential,
    /// No account exists for the email.
    UnknownAccount,
    /// Too many attempts; the service is refusing for now.
    RateLimited,
    /// Anything the mapping does not recognise, with the raw code.
    Other(String),
}

impl SignInFailure {
    /// Classify a raw failure code.
    ///
    /// Accepts both the SDK style (`auth/wrong-password`) and the REST
    /// style (`INVALID_PASSWORD`, optionally followed by ` : detail`).
    pub fn from_code(code: &str) -> Self {
        let head = code.split(':').next().unwrap_or(code).trim();
        match head {
            "auth/invalid-email"
            | "auth/wrong-password"
            | "auth/invalid-credential"
            | "INVALID_EMAIL"
            | "INVALID_PASSWORD"
            | "INVALID_LOGIN_CREDENTIALS" => Self::InvalidCredential,
            "auth/user-not-found" | "EMAIL_NOT_FOUND" => Self::UnknownAccount,
            "auth/too-many-requests" | "TOO_MANY_ATTEMPTS_TRY_LATER" => Self::RateLimited,
            other => Self::Other(other.to_string()),
        }
    }

    /// The fixed message shown on the login form.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingCredentials => notice::MISSING_CREDENTIALS,
            Self::InvalidCredential | Self::UnknownAccount => notice::INVALID_CREDENTIALS,
            Self::RateLimited => notice::TOO_MANY_ATTEMPTS,
            Self::Other(_) => notice::LOGIN_FAILED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sdk_codes_map_to_closed_set() {
        assert_eq!(
            SignInFailure::from_code("auth/wrong-password"),
            SignInFailure::InvalidCredential
        );
        assert_eq!(
            SignInFailure::from_code("auth/user-not-found"),
            SignInFailure::UnknownAccount
        );
        assert_eq!(
            SignInFailure::from_code("auth/too-many-requests"),
            SignInFailure::RateLimited
        );
    }

    #[test]
    fn rest_codes_with_detail_suffix() {
        assert_eq!(
            SignInFailure::from_code("TOO_MANY_ATTEMPTS_TRY_LATER : Access disabled"),
            SignInFailure::RateLimited
        );
        assert_eq!(
            SignInFailure::from_code("INVALID_LOGIN_CREDENTIALS"),
            SignInFailure::InvalidCredential
        );
    }

    #[test]
    fn unknown_code_falls_back_to_generic_message() {
        let failure = SignInFailure::from_code("USER_DISABLED");
        assert_eq!(failure, SignInFailure::Other("USER_DISABLED".into()));
        assert_eq!(failure.user_message(), notice::LOGIN_FAILED);
    }

    #[test]
    fn unknown_account_shares_invalid_credential_message() {
        assert_eq!(
            SignInFailure::UnknownAccount.user_message(),
            SignInFailure::InvalidCredential.user_message()
        );
    }
}

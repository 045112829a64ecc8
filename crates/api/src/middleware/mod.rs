//! Authentication middleware extractors.
//!
//! - [`auth::AdminUser`] -- a valid session token whose session is still
//!   open at the auth gate.

pub mod auth;

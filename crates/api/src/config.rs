use std::time::Duration;

use folio_genai::gemini::{DEFAULT_BASE_URL, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL};
use folio_genai::GeminiConfig;
use folio_store::firestore::{self, FirestoreConfig};

use crate::auth::jwt::JwtConfig;
use crate::auth::password::is_valid_hash;

/// Which document store backs the `projects` collection.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    /// In-process store. Contents are lost on restart.
    Memory,
    Firestore(FirestoreConfig),
}

/// Which auth service the gate signs in against.
#[derive(Debug, Clone)]
pub enum AuthBackend {
    /// One admin account with an argon2 hash.
    Local { email: String, password_hash: String },
    Firebase { api_key: String },
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Namespace segment of the collection path (default: `folio-local`).
    pub app_id: String,
    pub store: StoreBackend,
    pub auth: AuthBackend,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    pub genai: GeminiConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default                    |
    /// |------------------------------|----------------------------|
    /// | `HOST`                       | `0.0.0.0`                  |
    /// | `PORT`                       | `3000`                     |
    /// | `CORS_ORIGINS`               | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`       | `30`                       |
    /// | `APP_ID`                     | `folio-local`              |
    /// | `STORE_BACKEND`              | `memory`                   |
    /// | `FIRESTORE_PROJECT_ID`       | required for `firestore`   |
    /// | `FIRESTORE_POLL_INTERVAL_MS` | `2000`                     |
    /// | `AUTH_BACKEND`               | `local`                    |
    /// | `FIREBASE_API_KEY`           | required for `firebase`    |
    /// | `ADMIN_EMAIL`                | required for `local`       |
    /// | `ADMIN_PASSWORD_HASH`        | required for `local`       |
    /// | `GENAI_API_KEY`              | empty                      |
    /// | `GENAI_BASE_URL`             | public API root            |
    /// | `GENAI_TEXT_MODEL`           | see [`DEFAULT_TEXT_MODEL`] |
    /// | `GENAI_IMAGE_MODEL`          | see [`DEFAULT_IMAGE_MODEL`]|
    ///
    /// JWT settings are read by [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on malformed values or a missing backend setting, so a
    /// misconfigured server never starts.
    pub fn from_env() -> Self {
        let host = env_or("HOST", "0.0.0.0");

        let port: u16 = env_or("PORT", "3000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let app_id = env_or("APP_ID", "folio-local");

        let store = match env_or("STORE_BACKEND", "memory").as_str() {
            "memory" => StoreBackend::Memory,
            "firestore" => {
                let poll_ms: u64 = env_or("FIRESTORE_POLL_INTERVAL_MS", "2000")
                    .parse()
                    .expect("FIRESTORE_POLL_INTERVAL_MS must be a valid u64");
                StoreBackend::Firestore(FirestoreConfig {
                    project_id: required("FIRESTORE_PROJECT_ID"),
                    // The web API key doubles as the Firestore REST key.
                    api_key: std::env::var("FIREBASE_API_KEY").ok().filter(|k| !k.is_empty()),
                    base_url: env_or("FIRESTORE_BASE_URL", firestore::DEFAULT_BASE_URL),
                    poll_interval: Duration::from_millis(poll_ms),
                })
            }
            other => panic!("STORE_BACKEND must be 'memory' or 'firestore', got '{other}'"),
        };

        let auth = match env_or("AUTH_BACKEND", "local").as_str() {
            "local" => {
                let password_hash = required("ADMIN_PASSWORD_HASH");
                assert!(
                    is_valid_hash(&password_hash),
                    "ADMIN_PASSWORD_HASH must be an argon2 PHC string"
                );
                AuthBackend::Local {
                    email: required("ADMIN_EMAIL"),
                    password_hash,
                }
            }
            "firebase" => AuthBackend::Firebase {
                api_key: required("FIREBASE_API_KEY"),
            },
            other => panic!("AUTH_BACKEND must be 'local' or 'firebase', got '{other}'"),
        };

        let genai = GeminiConfig {
            api_key: env_or("GENAI_API_KEY", ""),
            base_url: env_or("GENAI_BASE_URL", DEFAULT_BASE_URL),
            text_model: env_or("GENAI_TEXT_MODEL", DEFAULT_TEXT_MODEL),
            image_model: env_or("GENAI_IMAGE_MODEL", DEFAULT_IMAGE_MODEL),
        };

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            app_id,
            store,
            auth,
            jwt,
            genai,
        }
    }

    pub fn store_backend_name(&self) -> &'static str {
        match self.store {
            StoreBackend::Memory => "memory",
            StoreBackend::Firestore(_) => "firestore",
        }
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}

fn required(name: &str) -> String {
    let value = std::env::var(name).unwrap_or_else(|_| panic!("{name} must be set"));
    assert!(!value.is_empty(), "{name} must not be empty");
    value
}

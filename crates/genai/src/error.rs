/// A generation call that produced nothing usable.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("Generation API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    /// The response lacked the expected field.
    #[error("Unexpected response shape: missing {0}")]
    UnexpectedShape(&'static str),
}

impl GenerationError {
    /// Whether the service answered but gave back nothing usable, as
    /// opposed to the request never completing.
    pub fn service_answered(&self) -> bool {
        matches!(self, Self::ApiError { .. } | Self::UnexpectedShape(_))
    }
}

// Error types for the collaborator boundaries. Each client returns a typed
// `ServiceError`; the `view` layer decides how a failure is shown, so no
// error ever reaches the user as an unhandled fault.

use thiserror::Error;

/// Raised once at startup when a required variable is absent.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),
}

/// Failure of a call to the text model or the review store.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("empty response: {0}")]
    EmptyResponse(String),
}

impl ServiceError {
    /// Build an `Api` error from a non-success body, preferring the
    /// message field the service puts in its JSON error object.
    pub(crate) fn from_body(
        status: u16,
        body: &str,
        pick: fn(&serde_json::Value) -> Option<&str>,
    ) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| pick(&v).map(str::to_string))
            .unwrap_or_else(|| body.trim().to_string());
        ServiceError::Api { status, message }
    }
}

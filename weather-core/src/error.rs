use reqwest::StatusCode;
use thiserror::Error;

/// Why a single provider request did not yield a snapshot.
///
/// These causes are for diagnostics only; the coordinator collapses all of
/// them into one user-facing message.
#[derive(Debug, Error)]
pub enum FetchError {
    /// No response was obtained (DNS, connection refused, broken body stream).
    #[error("transport failure: {0}")]
    Transport(#[source] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("provider rejected request with status {status}: {message}")]
    ProviderRejected { status: StatusCode, message: String },

    /// Success status, but the body did not match the expected schema.
    #[error("malformed provider response: {0}")]
    MalformedResponse(#[source] serde_json::Error),
}

impl FetchError {
    /// Short stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Transport(_) => "transport",
            FetchError::ProviderRejected { .. } => "provider_rejected",
            FetchError::MalformedResponse(_) => "malformed_response",
        }
    }
}

use thiserror::Error;

/// Failures raised by a single profile source. The enrichment chain logs these
/// and moves on; they never reach the caller of [`crate::EnrichmentChain::enrich`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EnrichError {
    #[error("source `{0}` has no credentials configured")]
    MissingCredentials(&'static str),
    #[error("invalid enrichment config: {0}")]
    InvalidConfig(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for EnrichError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            EnrichError::Timeout(err.to_string())
        } else if err.is_decode() {
            EnrichError::MalformedResponse(err.to_string())
        } else {
            EnrichError::Transport(err.to_string())
        }
    }
}

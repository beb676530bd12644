use thiserror::Error;

/// Errors surfaced by the embedding and text-generation clients and by vector math.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SemanticError {
    /// Configuration is inconsistent (e.g. api mode without an endpoint).
    #[error("invalid semantic config: {0}")]
    InvalidConfig(String),
    /// The provider contract requires non-empty input text.
    #[error("input text is empty")]
    EmptyInput,
    /// Two vectors of different length were compared.
    #[error("dimension mismatch: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
    /// The request never produced a response within the client timeout.
    #[error("request timed out: {0}")]
    Timeout(String),
    /// Connection-level failure talking to the provider.
    #[error("request failed: {0}")]
    Transport(String),
    /// The provider answered with a non-success status.
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// The provider answered, but not with something we can use.
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

impl SemanticError {
    /// Transient failures worth another attempt when retries are enabled.
    pub fn is_retryable(&self) -> bool {
        match self {
            SemanticError::Timeout(_) | SemanticError::Transport(_) => true,
            SemanticError::Status { status, .. } => {
                matches!(*status, 408 | 429) || (500..600).contains(status)
            }
            SemanticError::InvalidConfig(_)
            | SemanticError::EmptyInput
            | SemanticError::DimensionMismatch { .. }
            | SemanticError::MalformedResponse(_) => false,
        }
    }
}

impl From<reqwest::Error> for SemanticError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SemanticError::Timeout(err.to_string())
        } else if err.is_decode() {
            SemanticError::MalformedResponse(err.to_string())
        } else {
            SemanticError::Transport(err.to_string())
        }
    }
}

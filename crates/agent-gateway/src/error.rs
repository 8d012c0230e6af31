use thiserror::Error;

/// Failures of a model call. Neither kind is retried.
#[derive(Debug, Error)]
pub enum AgentError {
    /// The provider refused the request for rate-limit or billing reasons (HTTP 429).
    #[error("quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Any other provider or transport failure.
    #[error("{0}")]
    Provider(String),
}

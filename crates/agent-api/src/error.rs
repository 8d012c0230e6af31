use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use agent_gateway::AgentError;
use agent_store::StoreError;
use agent_types::api::ErrorBody;

/// Everything a handler can fail with, mapped onto a status code and a
/// `{"detail": ...}` body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Conversation not found")]
    NotFound,

    #[error("OpenAI API quota exceeded. Please check your billing.")]
    QuotaExceeded(String),

    #[error("Model error: {0}")]
    Provider(String),

    #[error("Server error: {0}")]
    Storage(StoreError),

    /// The request body was not valid JSON or did not match the expected shape.
    #[error("{}", .0.body_text())]
    InvalidBody(#[from] JsonRejection),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => Self::NotFound,
            other => Self::Storage(other),
        }
    }
}

impl From<AgentError> for ApiError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::QuotaExceeded(detail) => Self::QuotaExceeded(detail),
            AgentError::Provider(detail) => Self::Provider(detail),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::QuotaExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            Self::Provider(_) | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidBody(rejection) => rejection.status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::NotFound => {}
            Self::InvalidBody(rejection) => warn!("Rejected request body: {}", rejection.body_text()),
            Self::QuotaExceeded(detail) => warn!("Model quota exceeded: {}", detail),
            Self::Provider(detail) => error!("Model error: {}", detail),
            Self::Storage(err) => error!("Storage error: {}", err),
        }

        let body = ErrorBody { detail: self.to_string() };
        (self.status(), Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_not_found_maps_to_404() {
        let err = ApiError::from(StoreError::NotFound("abc".into()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Conversation not found");
    }

    #[test]
    fn test_store_failure_maps_to_500() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ApiError::from(StoreError::Io { path: "data/messages.json".into(), source: io });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("Server error: "));
    }

    #[test]
    fn test_agent_errors_map_to_429_and_500() {
        let quota = ApiError::from(AgentError::QuotaExceeded("slow down".into()));
        assert_eq!(quota.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(quota.to_string(), "OpenAI API quota exceeded. Please check your billing.");

        let provider = ApiError::from(AgentError::Provider("boom".into()));
        assert_eq!(provider.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(provider.to_string(), "Model error: boom");
    }
}

use std::time::Duration;

use thiserror::Error;

use crate::llm_client::LlmError;

/// Run-level error type. A single candidate's failure never produces one of
/// these; only problems that make the whole run meaningless do.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Job description could not be decoded: {0}")]
    JobDecode(#[from] DecodeError),

    #[error("Job description extraction failed: {0}")]
    JobExtraction(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Why a single extraction backend call did not yield usable fields.
/// Every variant advances the fallback chain.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BackendError {
    #[error("rate limited")]
    RateLimited,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("authentication error: {0}")]
    Auth(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

impl From<LlmError> for BackendError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::RateLimited => BackendError::RateLimited,
            LlmError::Api { status, message } if status == 401 || status == 403 => {
                BackendError::Auth(message)
            }
            LlmError::Api { status, message } => {
                BackendError::Transport(format!("status {status}: {message}"))
            }
            LlmError::Http(e) => BackendError::Transport(e.to_string()),
            LlmError::Parse(e) => BackendError::InvalidResponse(e.to_string()),
            LlmError::EmptyContent => {
                BackendError::InvalidResponse("LLM returned empty content".to_string())
            }
        }
    }
}

/// Document-to-text failures. Fatal for the affected document only.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("document contains no text")]
    Empty,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum EmbeddingError {
    #[error("embedding service unavailable: {0}")]
    Unavailable(String),

    #[error("embedding timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_maps_to_rate_limited() {
        assert_eq!(
            BackendError::from(LlmError::RateLimited),
            BackendError::RateLimited
        );
    }

    #[test]
    fn test_unauthorized_maps_to_auth() {
        let err = BackendError::from(LlmError::Api {
            status: 401,
            message: "bad key".to_string(),
        });
        assert_eq!(err, BackendError::Auth("bad key".to_string()));
    }

    #[test]
    fn test_server_error_maps_to_transport() {
        let err = BackendError::from(LlmError::Api {
            status: 503,
            message: "overloaded".to_string(),
        });
        assert!(matches!(err, BackendError::Transport(m) if m.contains("503")));
    }

    #[test]
    fn test_empty_content_is_invalid_response() {
        let err = BackendError::from(LlmError::EmptyContent);
        assert!(matches!(err, BackendError::InvalidResponse(_)));
    }

    #[test]
    fn test_timeout_display() {
        let err = BackendError::Timeout(Duration::from_millis(1500));
        assert_eq!(err.to_string(), "timed out after 1500ms");
    }
}

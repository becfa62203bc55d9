use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Corpus format error: {0}")]
    CorpusFormat(String),

    #[error("Embedding backend unavailable: {0}")]
    EmbeddingUnavailable(String),

    #[error("Index not ready: {0}")]
    IndexNotReady(String),

    #[error("Generation backend unavailable: {0}")]
    GenerationUnavailable(String),

    #[error("Vector dimension mismatch: index holds {expected}, query has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Get a sanitized error message safe for logging
    /// Filters out potentially sensitive information
    pub fn log_safe(&self) -> String {
        match self {
            // Backend errors can echo internal addresses back at us
            Error::EmbeddingUnavailable(_) => "Embedding backend unavailable".to_string(),
            Error::GenerationUnavailable(_) => "Generation backend unavailable".to_string(),

            Error::Internal(msg) => {
                if msg.to_lowercase().contains("password")
                    || msg.to_lowercase().contains("secret")
                    || msg.to_lowercase().contains("token")
                    || msg.to_lowercase().contains("key")
                {
                    "Internal error (details redacted)".to_string()
                } else {
                    format!("Internal error: {msg}")
                }
            }

            Error::CorpusFormat(msg) => format!("Corpus format error: {msg}"),
            Error::IndexNotReady(msg) => format!("Index not ready: {msg}"),
            Error::DimensionMismatch { expected, actual } => {
                format!("Vector dimension mismatch ({expected} vs {actual})")
            }
            Error::InvalidUrl(_) => "Invalid URL provided".to_string(),
            Error::Config(msg) => format!("Configuration error: {msg}"),
            Error::Validation(msg) => format!("Validation error: {msg}"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("Request error: {}", self.log_safe());

        let (status, error_message) = match &self {
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::GenerationUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Generation service unavailable".to_string(),
            ),
            Error::EmbeddingUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Embedding service unavailable".to_string(),
            ),
            Error::IndexNotReady(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Recipe index not ready".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_safe_hides_backend_details() {
        let err = Error::GenerationUnavailable("http://10.0.0.4:11434 refused".to_string());
        assert_eq!(err.log_safe(), "Generation backend unavailable");

        let err = Error::Internal("bad api key sk-123".to_string());
        assert_eq!(err.log_safe(), "Internal error (details redacted)");
    }

    #[test]
    fn test_status_mapping() {
        let response = Error::Validation("empty question".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = Error::GenerationUnavailable("timeout".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = Error::CorpusFormat("not a list".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

//! Failure taxonomy for compound lookups.

use crate::services::providers::ProviderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Message returned to callers for any failure outside the taxonomy.
pub const SERVER_ERROR_MESSAGE: &str = "Failed to generate compound structure";

#[derive(Debug, Error)]
pub enum CompoundError {
    #[error("Compound name is required")]
    MissingInput,

    #[error("Invalid JSON response: {0}")]
    InvalidJson(String),

    #[error("Invalid structure format")]
    InvalidShape,

    #[error("Server error: {0}")]
    ServerError(String),
}

impl From<ProviderError> for CompoundError {
    fn from(err: ProviderError) -> Self {
        CompoundError::ServerError(err.to_string())
    }
}

impl CompoundError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CompoundError::MissingInput => StatusCode::BAD_REQUEST,
            CompoundError::InvalidJson(_)
            | CompoundError::InvalidShape
            | CompoundError::ServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CompoundError::MissingInput => "missing_input",
            CompoundError::InvalidJson(_) => "invalid_json",
            CompoundError::InvalidShape => "invalid_shape",
            CompoundError::ServerError(_) => "server_error",
        }
    }

    /// Text placed in the `error` field of the response body.
    pub fn public_message(&self) -> String {
        match self {
            CompoundError::ServerError(_) => SERVER_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for CompoundError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(ErrorResponse {
                error: self.public_message(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_missing_input_is_400() {
        assert_eq!(CompoundError::MissingInput.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn generation_failures_are_500() {
        for err in [
            CompoundError::InvalidJson("expected value".into()),
            CompoundError::InvalidShape,
            CompoundError::ServerError("connection refused".into()),
        ] {
            assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn server_error_detail_is_not_exposed() {
        let err = CompoundError::ServerError("api key sk-123 rejected".into());
        assert_eq!(err.public_message(), SERVER_ERROR_MESSAGE);
    }

    #[test]
    fn parser_message_is_exposed() {
        let err = CompoundError::InvalidJson("expected value at line 1 column 1".into());
        assert_eq!(
            err.public_message(),
            "Invalid JSON response: expected value at line 1 column 1"
        );
    }

    #[test]
    fn provider_errors_become_server_errors() {
        let err: CompoundError = ProviderError::RateLimited.into();
        assert!(matches!(err, CompoundError::ServerError(_)));
    }
}

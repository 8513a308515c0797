//! Uniform error responses.
//!
//! Every failure leaves the API as `{ "error": "<message>" }` with a status
//! code derived from the service error, so clients never have to parse more
//! than one failure shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use quiz_services::{
    AuthError, DocumentServiceError, GenerationError, RosterError, SubmissionError,
};
use quiz_storage::repository::StorageError;

/// Transport-level error: a status code plus a client-facing message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
    #[error("{0}")]
    Upstream(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            error!(%status, %message, "request failed");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn from_storage(err: &StorageError) -> ApiError {
    match err {
        StorageError::NotFound => ApiError::NotFound(err.to_string()),
        StorageError::Conflict => ApiError::Conflict(err.to_string()),
        _ => ApiError::Internal(err.to_string()),
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match &err {
            AuthError::MissingCredentials
            | AuthError::PasswordTooShort { .. }
            | AuthError::User(_) => Self::BadRequest(err.to_string()),
            AuthError::UsernameTaken => Self::Conflict(err.to_string()),
            AuthError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            AuthError::UnknownDocument => Self::NotFound(err.to_string()),
            AuthError::Storage(inner) => from_storage(inner),
            _ => Self::Internal(err.to_string()),
        }
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        match &err {
            GenerationError::NoDocuments | GenerationError::NoParagraphs => {
                Self::BadRequest(err.to_string())
            }
            GenerationError::MissingJson
            | GenerationError::MalformedReply(_)
            | GenerationError::Question(_)
            | GenerationError::Ai(_) => Self::Upstream(err.to_string()),
            GenerationError::Storage(inner) => from_storage(inner),
            _ => Self::Internal(err.to_string()),
        }
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        match &err {
            SubmissionError::Storage(inner) => from_storage(inner),
            _ => Self::Internal(err.to_string()),
        }
    }
}

impl From<DocumentServiceError> for ApiError {
    fn from(err: DocumentServiceError) -> Self {
        match &err {
            DocumentServiceError::NotTeacher => Self::Forbidden(err.to_string()),
            DocumentServiceError::Document(_) => Self::BadRequest(err.to_string()),
            DocumentServiceError::Storage(inner) => from_storage(inner),
            _ => Self::Internal(err.to_string()),
        }
    }
}

impl From<RosterError> for ApiError {
    fn from(err: RosterError) -> Self {
        match &err {
            RosterError::Storage(inner) => from_storage(inner),
            _ => Self::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_services::AiError;

    #[test]
    fn auth_errors_map_to_expected_statuses() {
        let cases = [
            (ApiError::from(AuthError::MissingCredentials), StatusCode::BAD_REQUEST),
            (
                ApiError::from(AuthError::PasswordTooShort { min: 6 }),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::from(AuthError::UsernameTaken), StatusCode::CONFLICT),
            (
                ApiError::from(AuthError::InvalidCredentials),
                StatusCode::UNAUTHORIZED,
            ),
            (ApiError::from(AuthError::UnknownDocument), StatusCode::NOT_FOUND),
            (
                ApiError::from(AuthError::Storage(StorageError::Connection(
                    "pool closed".into(),
                ))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.status(), status, "{err}");
        }
    }

    #[test]
    fn generation_errors_split_client_and_upstream() {
        assert_eq!(
            ApiError::from(GenerationError::NoDocuments).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(GenerationError::MissingJson).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(GenerationError::Ai(AiError::Disabled)).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(GenerationError::Storage(StorageError::NotFound)).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn upload_role_violation_is_forbidden() {
        assert_eq!(
            ApiError::from(DocumentServiceError::NotTeacher).status(),
            StatusCode::FORBIDDEN
        );
    }
}

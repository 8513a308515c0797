//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{DocumentError, QuestionError, UserError};
use quiz_storage::repository::StorageError;

/// Errors emitted by the AI client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AiError {
    #[error("AI generation is not configured")]
    Disabled,
    #[error("AI model returned an empty response")]
    EmptyResponse,
    #[error("AI request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("username and password are required")]
    MissingCredentials,
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("username is already taken")]
    UsernameTaken,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("selected document does not exist")]
    UnknownDocument,
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `GenerationService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("no reference documents have been uploaded yet")]
    NoDocuments,
    #[error("document has no quizzable paragraphs")]
    NoParagraphs,
    #[error("model reply contains no JSON object")]
    MissingJson,
    #[error("model reply is not valid question JSON: {0}")]
    MalformedReply(#[from] serde_json::Error),
    #[error(transparent)]
    Ai(#[from] AiError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `SubmissionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubmissionError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `DocumentService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DocumentServiceError {
    #[error("only teachers can upload documents")]
    NotTeacher,
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `RosterService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RosterError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    User(#[from] UserError),
}

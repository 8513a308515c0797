#![forbid(unsafe_code)]

pub mod ai;
pub mod app_services;
pub mod auth_service;
pub mod document_service;
pub mod error;
pub mod generation;
pub mod password;
pub mod roster_service;
pub mod submission_service;

pub use quiz_core::Clock;

pub use ai::{AiClient, AiConfig, HttpAiClient};
pub use app_services::{ensure_teacher_account, AppServices, TeacherSeed};
pub use auth_service::{AuthService, RegisterRequest, UserProfile, MIN_PASSWORD_CHARS};
pub use document_service::DocumentService;
pub use error::{
    AiError, AppServicesError, AuthError, DocumentServiceError, GenerationError, RosterError,
    SubmissionError,
};
pub use generation::{GenerationPlan, GenerationService};
pub use password::{hash_password, verify_password};
pub use roster_service::{RosterService, StudentStanding};
pub use submission_service::{AnswerResult, SubmissionOutcome, SubmissionService, SubmittedAnswer};

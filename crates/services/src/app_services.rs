use std::sync::Arc;

use tracing::info;

use quiz_core::model::{Role, User, UserId, Username};
use quiz_storage::repository::{Storage, UserRepository};

use crate::ai::AiClient;
use crate::auth_service::AuthService;
use crate::document_service::DocumentService;
use crate::error::AppServicesError;
use crate::generation::GenerationService;
use crate::password::hash_password;
use crate::roster_service::RosterService;
use crate::submission_service::SubmissionService;
use crate::Clock;

/// Credentials for the teacher account seeded at startup.
#[derive(Debug, Clone)]
pub struct TeacherSeed {
    pub username: String,
    pub password: String,
}

/// Assembles the app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    auth: Arc<AuthService>,
    generation: Arc<GenerationService>,
    submissions: Arc<SubmissionService>,
    documents: Arc<DocumentService>,
    roster: Arc<RosterService>,
}

impl AppServices {
    /// Wires every service against the given storage and AI client.
    #[must_use]
    pub fn new(storage: &Storage, clock: Clock, ai: Arc<dyn AiClient>) -> Self {
        let auth = Arc::new(AuthService::new(
            clock,
            Arc::clone(&storage.users),
            Arc::clone(&storage.documents),
        ));
        let generation = Arc::new(GenerationService::new(
            clock,
            Arc::clone(&storage.users),
            Arc::clone(&storage.documents),
            Arc::clone(&storage.questions),
            Arc::clone(&storage.scores),
            ai,
        ));
        let submissions = Arc::new(SubmissionService::new(
            clock,
            Arc::clone(&storage.users),
            Arc::clone(&storage.questions),
            Arc::clone(&storage.scores),
        ));
        let documents = Arc::new(DocumentService::new(
            clock,
            Arc::clone(&storage.users),
            Arc::clone(&storage.documents),
        ));
        let roster = Arc::new(RosterService::new(Arc::clone(&storage.users)));

        Self {
            auth,
            generation,
            submissions,
            documents,
            roster,
        }
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn generation(&self) -> Arc<GenerationService> {
        Arc::clone(&self.generation)
    }

    #[must_use]
    pub fn submissions(&self) -> Arc<SubmissionService> {
        Arc::clone(&self.submissions)
    }

    #[must_use]
    pub fn documents(&self) -> Arc<DocumentService> {
        Arc::clone(&self.documents)
    }

    #[must_use]
    pub fn roster(&self) -> Arc<RosterService> {
        Arc::clone(&self.roster)
    }
}

/// Makes sure the configured teacher account exists, creating it on first
/// run and leaving an existing account untouched.
///
/// # Errors
///
/// Returns `AppServicesError::User` for an invalid seed username and
/// `AppServicesError::Storage` when the lookup or insert fails.
pub async fn ensure_teacher_account(
    users: &dyn UserRepository,
    clock: Clock,
    seed: &TeacherSeed,
) -> Result<UserId, AppServicesError> {
    let username = Username::new(seed.username.as_str())?;
    if let Some(existing) = users.find_user_by_username(username.as_str()).await? {
        return Ok(existing.id());
    }

    let teacher = User::new(
        UserId::generate(),
        username,
        hash_password(&seed.password),
        Role::Teacher,
        None,
        true,
        clock.now(),
    );
    users.insert_user(&teacher).await?;
    info!(username = %teacher.username(), "seeded teacher account");
    Ok(teacher.id())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

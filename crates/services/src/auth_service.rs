use std::sync::Arc;

use chrono::{DateTime, Utc};

use quiz_core::model::{DocumentId, Role, User, UserId, Username};
use quiz_core::Clock;
use quiz_storage::repository::{DocumentRepository, StorageError, UserRepository};

use crate::error::AuthError;
use crate::password::{hash_password, verify_password};

/// Minimum password length in characters.
pub const MIN_PASSWORD_CHARS: usize = 6;

/// Password-free view of an account, safe to hand to the transport layer.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    pub total_score: i64,
    pub selected_document: Option<DocumentId>,
    pub sequential_mode: bool,
    pub current_paragraph: u32,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id(),
            username: user.username().as_str().to_owned(),
            role: user.role(),
            total_score: user.total_score(),
            selected_document: user.selected_document(),
            sequential_mode: user.sequential_mode(),
            current_paragraph: user.current_paragraph(),
            created_at: user.created_at(),
        }
    }
}

/// Registration input.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub selected_document: Option<DocumentId>,
}

/// Handles account registration and password login.
#[derive(Clone)]
pub struct AuthService {
    clock: Clock,
    users: Arc<dyn UserRepository>,
    documents: Arc<dyn DocumentRepository>,
}

impl AuthService {
    #[must_use]
    pub fn new(
        clock: Clock,
        users: Arc<dyn UserRepository>,
        documents: Arc<dyn DocumentRepository>,
    ) -> Self {
        Self {
            clock,
            users,
            documents,
        }
    }

    /// Register a new student account.
    ///
    /// Registration always creates students; the teacher account is seeded
    /// at startup. New accounts start in sequential mode with zero score.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::User` for an invalid username,
    /// `AuthError::PasswordTooShort` for a password under six characters,
    /// `AuthError::UnknownDocument` when the chosen document does not exist,
    /// `AuthError::UsernameTaken` for a duplicate username, and
    /// `AuthError::Storage` on persistence failures.
    pub async fn register(&self, request: RegisterRequest) -> Result<UserProfile, AuthError> {
        let username = Username::new(request.username)?;
        if request.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AuthError::PasswordTooShort {
                min: MIN_PASSWORD_CHARS,
            });
        }
        if let Some(document_id) = request.selected_document {
            match self.documents.get_document(document_id).await {
                Ok(_) => {}
                Err(StorageError::NotFound) => return Err(AuthError::UnknownDocument),
                Err(e) => return Err(e.into()),
            }
        }

        let user = User::new(
            UserId::generate(),
            username,
            hash_password(&request.password),
            Role::Student,
            request.selected_document,
            true,
            self.clock.now(),
        );

        match self.users.insert_user(&user).await {
            Ok(()) => Ok(UserProfile::from_user(&user)),
            Err(StorageError::Conflict) => Err(AuthError::UsernameTaken),
            Err(e) => Err(e.into()),
        }
    }

    /// Log a user in by username and password.
    ///
    /// Unknown usernames and wrong passwords fail identically so the
    /// endpoint cannot be used to probe for accounts. Students may hand
    /// over a personal AI key; it replaces the stored one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` for blank input,
    /// `AuthError::InvalidCredentials` when the pair does not match, and
    /// `AuthError::Storage` on persistence failures.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        api_key: Option<&str>,
    ) -> Result<UserProfile, AuthError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let Some(mut user) = self.users.find_user_by_username(username).await? else {
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(password, user.password_hash()) {
            return Err(AuthError::InvalidCredentials);
        }

        if user.role() == Role::Student {
            let key = api_key.map(str::trim).filter(|k| !k.is_empty());
            if let Some(key) = key {
                let now = self.clock.now();
                self.users.update_api_key(user.id(), key, now).await?;
                user.set_api_key(key, now);
            }
        }

        Ok(UserProfile::from_user(&user))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    use quiz_core::model::Document;
    use quiz_core::time::{fixed_clock, fixed_now};
    use quiz_storage::repository::{DocumentRepository, InMemoryRepository, UserRepository};

    fn service(repo: &InMemoryRepository) -> AuthService {
        AuthService::new(fixed_clock(), Arc::new(repo.clone()), Arc::new(repo.clone()))
    }

    fn request(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_owned(),
            password: password.to_owned(),
            selected_document: None,
        }
    }

    #[tokio::test]
    async fn register_creates_a_sequential_student() {
        let repo = InMemoryRepository::new();
        let auth = service(&repo);

        let profile = auth.register(request("ada", "secret-pw")).await.unwrap();
        assert_eq!(profile.username, "ada");
        assert_eq!(profile.role, Role::Student);
        assert_eq!(profile.total_score, 0);
        assert!(profile.sequential_mode);
        assert_eq!(profile.current_paragraph, 0);
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let repo = InMemoryRepository::new();
        let auth = service(&repo);

        let err = auth.register(request("ada", "tiny")).await.unwrap_err();
        assert!(matches!(err, AuthError::PasswordTooShort { min: 6 }));
    }

    #[tokio::test]
    async fn register_rejects_duplicate_username() {
        let repo = InMemoryRepository::new();
        let auth = service(&repo);
        auth.register(request("ada", "secret-pw")).await.unwrap();

        let err = auth
            .register(request("ada", "another-pw"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UsernameTaken));
    }

    #[tokio::test]
    async fn register_rejects_unknown_selected_document() {
        let repo = InMemoryRepository::new();
        let auth = service(&repo);

        let mut req = request("ada", "secret-pw");
        req.selected_document = Some(DocumentId::generate());
        let err = auth.register(req).await.unwrap_err();
        assert!(matches!(err, AuthError::UnknownDocument));
    }

    #[tokio::test]
    async fn register_accepts_existing_selected_document() {
        let repo = InMemoryRepository::new();
        let document = Document::new(
            DocumentId::generate(),
            "history.txt",
            "Reference text with substance.",
            fixed_now(),
        )
        .unwrap();
        repo.insert_document(&document).await.unwrap();
        let auth = service(&repo);

        let mut req = request("ada", "secret-pw");
        req.selected_document = Some(document.id());
        let profile = auth.register(req).await.unwrap();
        assert_eq!(profile.selected_document, Some(document.id()));
    }

    #[tokio::test]
    async fn login_roundtrip_returns_profile() {
        let repo = InMemoryRepository::new();
        let auth = service(&repo);
        auth.register(request("ada", "secret-pw")).await.unwrap();

        let profile = auth.login("ada", "secret-pw", None).await.unwrap();
        assert_eq!(profile.username, "ada");
    }

    #[tokio::test]
    async fn login_failures_are_uniform() {
        let repo = InMemoryRepository::new();
        let auth = service(&repo);
        auth.register(request("ada", "secret-pw")).await.unwrap();

        let unknown_user = auth.login("eve", "secret-pw", None).await.unwrap_err();
        let wrong_password = auth.login("ada", "wrong-pw", None).await.unwrap_err();

        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert_eq!(unknown_user.to_string(), wrong_password.to_string());
    }

    #[tokio::test]
    async fn login_rejects_blank_credentials() {
        let repo = InMemoryRepository::new();
        let auth = service(&repo);

        let err = auth.login("  ", "secret-pw", None).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));

        let err = auth.login("ada", "", None).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));
    }

    #[tokio::test]
    async fn student_login_stores_supplied_api_key() {
        let repo = InMemoryRepository::new();
        let auth = service(&repo);
        let profile = auth.register(request("ada", "secret-pw")).await.unwrap();

        auth.login("ada", "secret-pw", Some("pat-42")).await.unwrap();

        let stored = repo.get_user(profile.id).await.unwrap();
        assert_eq!(stored.api_key(), Some("pat-42"));
    }

    #[tokio::test]
    async fn blank_api_key_is_ignored() {
        let repo = InMemoryRepository::new();
        let auth = service(&repo);
        let profile = auth.register(request("ada", "secret-pw")).await.unwrap();

        auth.login("ada", "secret-pw", Some("   ")).await.unwrap();

        let stored = repo.get_user(profile.id).await.unwrap();
        assert_eq!(stored.api_key(), None);
    }

    #[tokio::test]
    async fn login_trims_the_username() {
        let repo = InMemoryRepository::new();
        let auth = service(&repo);
        auth.register(request("  ada  ", "secret-pw")).await.unwrap();

        let profile = auth.login("  ada ", "secret-pw", None).await.unwrap();
        assert_eq!(profile.username, "ada");
    }
}

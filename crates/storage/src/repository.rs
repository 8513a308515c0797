use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{
    Document, DocumentId, Question, QuestionId, Role, ScoreRecord, User, UserId,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Listing shape for a document: everything but the text itself.
///
/// Rosters and pickers never need the full content, so repositories can
/// serve listings without hauling document bodies around.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMeta {
    pub id: DocumentId,
    pub filename: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Repository contract for user accounts and their quiz progress.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the username or id is already
    /// taken, or other storage errors.
    async fn insert_user(&self, user: &User) -> Result<(), StorageError>;

    /// Fetch a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_user(&self, id: UserId) -> Result<User, StorageError>;

    /// Look up a user by exact username.
    ///
    /// # Errors
    ///
    /// Returns storage errors; an unknown username is `Ok(None)`.
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError>;

    /// Overwrite a user's cumulative score.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the user does not exist.
    async fn update_total_score(
        &self,
        id: UserId,
        total_score: i64,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Store a replacement AI key for a user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the user does not exist.
    async fn update_api_key(
        &self,
        id: UserId,
        api_key: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// Move a user's generation progress marker.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the user does not exist.
    async fn update_current_paragraph(
        &self,
        id: UserId,
        current_paragraph: u32,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    /// List student accounts ordered by total score, highest first.
    ///
    /// # Errors
    ///
    /// Returns storage errors.
    async fn list_students(&self) -> Result<Vec<User>, StorageError>;
}

/// Repository contract for uploaded reference documents.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Persist a new document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` on id collision, or other storage
    /// errors.
    async fn insert_document(&self, document: &Document) -> Result<(), StorageError>;

    /// Fetch a document by ID, content included.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_document(&self, id: DocumentId) -> Result<Document, StorageError>;

    /// Fetch the most recently uploaded document, if any.
    ///
    /// # Errors
    ///
    /// Returns storage errors; an empty store is `Ok(None)`.
    async fn latest_document(&self) -> Result<Option<Document>, StorageError>;

    /// List document metadata ordered by upload time, newest first.
    ///
    /// # Errors
    ///
    /// Returns storage errors.
    async fn list_documents(&self) -> Result<Vec<DocumentMeta>, StorageError>;
}

/// Repository contract for generated questions.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Persist a freshly generated question.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` on id collision, or other storage
    /// errors.
    async fn insert_question(&self, question: &Question) -> Result<(), StorageError>;

    /// Look up a single question.
    ///
    /// # Errors
    ///
    /// Returns storage errors; an unknown id is `Ok(None)` so that graders
    /// can skip stale submissions.
    async fn find_question(&self, id: QuestionId) -> Result<Option<Question>, StorageError>;

    /// Fetch the questions matching the given ids. Unknown ids are skipped.
    ///
    /// # Errors
    ///
    /// Returns storage errors.
    async fn list_questions_by_ids(
        &self,
        ids: &[QuestionId],
    ) -> Result<Vec<Question>, StorageError>;
}

/// Repository contract for the append-only answer log.
#[async_trait]
pub trait ScoreRecordRepository: Send + Sync {
    /// Append one graded answer. Records are never updated or removed.
    ///
    /// # Errors
    ///
    /// Returns storage errors.
    async fn append_score_record(&self, record: &ScoreRecord) -> Result<(), StorageError>;

    /// IDs of every question the user has ever answered.
    ///
    /// # Errors
    ///
    /// Returns storage errors.
    async fn list_answered_question_ids(
        &self,
        user_id: UserId,
    ) -> Result<Vec<QuestionId>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    users: Arc<Mutex<HashMap<UserId, User>>>,
    documents: Arc<Mutex<HashMap<DocumentId, Document>>>,
    questions: Arc<Mutex<HashMap<QuestionId, Question>>>,
    score_records: Arc<Mutex<Vec<ScoreRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
            documents: Arc::new(Mutex::new(HashMap::new())),
            questions: Arc::new(Mutex::new(HashMap::new())),
            score_records: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn insert_user(&self, user: &User) -> Result<(), StorageError> {
        let mut guard = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.contains_key(&user.id()) {
            return Err(StorageError::Conflict);
        }
        if guard
            .values()
            .any(|u| u.username().as_str() == user.username().as_str())
        {
            return Err(StorageError::Conflict);
        }
        guard.insert(user.id(), user.clone());
        Ok(())
    }

    async fn get_user(&self, id: UserId) -> Result<User, StorageError> {
        let guard = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(&id).cloned().ok_or(StorageError::NotFound)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        let guard = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .values()
            .find(|u| u.username().as_str() == username)
            .cloned())
    }

    async fn update_total_score(
        &self,
        id: UserId,
        total_score: i64,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let user = guard.get_mut(&id).ok_or(StorageError::NotFound)?;
        let delta = total_score - user.total_score();
        user.apply_score_change(delta, updated_at);
        Ok(())
    }

    async fn update_api_key(
        &self,
        id: UserId,
        api_key: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let user = guard.get_mut(&id).ok_or(StorageError::NotFound)?;
        user.set_api_key(api_key, updated_at);
        Ok(())
    }

    async fn update_current_paragraph(
        &self,
        id: UserId,
        current_paragraph: u32,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let user = guard.get_mut(&id).ok_or(StorageError::NotFound)?;
        user.set_current_paragraph(current_paragraph, updated_at);
        Ok(())
    }

    async fn list_students(&self) -> Result<Vec<User>, StorageError> {
        let guard = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut students: Vec<User> = guard
            .values()
            .filter(|u| u.role() == Role::Student)
            .cloned()
            .collect();
        students.sort_by(|a, b| {
            b.total_score()
                .cmp(&a.total_score())
                .then_with(|| a.username().as_str().cmp(b.username().as_str()))
        });
        Ok(students)
    }
}

#[async_trait]
impl DocumentRepository for InMemoryRepository {
    async fn insert_document(&self, document: &Document) -> Result<(), StorageError> {
        let mut guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.contains_key(&document.id()) {
            return Err(StorageError::Conflict);
        }
        guard.insert(document.id(), document.clone());
        Ok(())
    }

    async fn get_document(&self, id: DocumentId) -> Result<Document, StorageError> {
        let guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(&id).cloned().ok_or(StorageError::NotFound)
    }

    async fn latest_document(&self) -> Result<Option<Document>, StorageError> {
        let guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .values()
            .max_by(|a, b| {
                a.uploaded_at()
                    .cmp(&b.uploaded_at())
                    .then_with(|| a.id().value().cmp(&b.id().value()))
            })
            .cloned())
    }

    async fn list_documents(&self) -> Result<Vec<DocumentMeta>, StorageError> {
        let guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut metas: Vec<DocumentMeta> = guard
            .values()
            .map(|d| DocumentMeta {
                id: d.id(),
                filename: d.filename().to_owned(),
                uploaded_at: d.uploaded_at(),
            })
            .collect();
        metas.sort_by(|a, b| {
            b.uploaded_at
                .cmp(&a.uploaded_at)
                .then_with(|| a.filename.cmp(&b.filename))
        });
        Ok(metas)
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn insert_question(&self, question: &Question) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.contains_key(&question.id()) {
            return Err(StorageError::Conflict);
        }
        guard.insert(question.id(), question.clone());
        Ok(())
    }

    async fn find_question(&self, id: QuestionId) -> Result<Option<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&id).cloned())
    }

    async fn list_questions_by_ids(
        &self,
        ids: &[QuestionId],
    ) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(ids.iter().filter_map(|id| guard.get(id).cloned()).collect())
    }
}

#[async_trait]
impl ScoreRecordRepository for InMemoryRepository {
    async fn append_score_record(&self, record: &ScoreRecord) -> Result<(), StorageError> {
        let mut guard = self
            .score_records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(record.clone());
        Ok(())
    }

    async fn list_answered_question_ids(
        &self,
        user_id: UserId,
    ) -> Result<Vec<QuestionId>, StorageError> {
        let guard = self
            .score_records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|r| r.user_id == user_id)
            .map(|r| r.question_id)
            .collect())
    }
}

/// Aggregates the four repositories behind trait objects for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserRepository>,
    pub documents: Arc<dyn DocumentRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub scores: Arc<dyn ScoreRecordRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let users: Arc<dyn UserRepository> = Arc::new(repo.clone());
        let documents: Arc<dyn DocumentRepository> = Arc::new(repo.clone());
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let scores: Arc<dyn ScoreRecordRepository> = Arc::new(repo);
        Self {
            users,
            documents,
            questions,
            scores,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{
        grade_answer, QuestionDraft, QuestionKind, Role, ScoreRecordId, Username,
    };
    use quiz_core::time::fixed_now;

    fn build_user(name: &str, role: Role) -> User {
        User::new(
            UserId::generate(),
            Username::new(name).unwrap(),
            "salt$digest",
            role,
            None,
            true,
            fixed_now(),
        )
    }

    fn build_question(content: &str) -> Question {
        QuestionDraft {
            kind: QuestionKind::Fill,
            content: content.to_string(),
            options: Vec::new(),
            correct_answer: "answer".to_string(),
        }
        .validate("notes.txt", fixed_now())
        .unwrap()
        .assign_id(QuestionId::generate())
    }

    #[tokio::test]
    async fn insert_user_rejects_duplicate_username() {
        let repo = InMemoryRepository::new();
        repo.insert_user(&build_user("ada", Role::Student))
            .await
            .unwrap();

        let err = repo
            .insert_user(&build_user("ada", Role::Student))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict));
    }

    #[tokio::test]
    async fn list_students_orders_by_score_and_skips_teachers() {
        let repo = InMemoryRepository::new();
        let mut first = build_user("first", Role::Student);
        first.apply_score_change(50, fixed_now());
        let second = build_user("second", Role::Student);
        let teacher = build_user("prof", Role::Teacher);

        repo.insert_user(&second).await.unwrap();
        repo.insert_user(&first).await.unwrap();
        repo.insert_user(&teacher).await.unwrap();

        let students = repo.list_students().await.unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[0].username().as_str(), "first");
        assert_eq!(students[1].username().as_str(), "second");
    }

    #[tokio::test]
    async fn latest_document_prefers_newest_upload() {
        let repo = InMemoryRepository::new();
        let older = Document::new(
            DocumentId::generate(),
            "old.txt",
            "older reference text",
            fixed_now(),
        )
        .unwrap();
        let newer = Document::new(
            DocumentId::generate(),
            "new.txt",
            "newer reference text",
            fixed_now() + chrono::Duration::minutes(5),
        )
        .unwrap();

        repo.insert_document(&older).await.unwrap();
        repo.insert_document(&newer).await.unwrap();

        let latest = repo.latest_document().await.unwrap().unwrap();
        assert_eq!(latest.filename(), "new.txt");

        let listed = repo.list_documents().await.unwrap();
        assert_eq!(listed[0].filename, "new.txt");
        assert_eq!(listed[1].filename, "old.txt");
    }

    #[tokio::test]
    async fn unknown_question_ids_are_skipped() {
        let repo = InMemoryRepository::new();
        let known = build_question("A question with substance");
        repo.insert_question(&known).await.unwrap();

        let fetched = repo
            .list_questions_by_ids(&[known.id(), QuestionId::generate()])
            .await
            .unwrap();
        assert_eq!(fetched.len(), 1);

        let missing = repo.find_question(QuestionId::generate()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn answered_ids_follow_appended_records() {
        let repo = InMemoryRepository::new();
        let user = build_user("ada", Role::Student);
        let question = build_question("Some question content");
        let grade = grade_answer(QuestionKind::Fill, "answer", "answer");

        repo.append_score_record(&ScoreRecord::new(
            ScoreRecordId::generate(),
            user.id(),
            question.id(),
            grade,
            "answer",
            fixed_now(),
        ))
        .await
        .unwrap();

        let answered = repo.list_answered_question_ids(user.id()).await.unwrap();
        assert_eq!(answered, vec![question.id()]);

        let other = repo
            .list_answered_question_ids(UserId::generate())
            .await
            .unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn targeted_updates_touch_single_fields() {
        let repo = InMemoryRepository::new();
        let user = build_user("ada", Role::Student);
        repo.insert_user(&user).await.unwrap();
        let later = fixed_now() + chrono::Duration::minutes(1);

        repo.update_total_score(user.id(), 35, later).await.unwrap();
        repo.update_api_key(user.id(), "pat-9", later).await.unwrap();
        repo.update_current_paragraph(user.id(), 12, later)
            .await
            .unwrap();

        let stored = repo.get_user(user.id()).await.unwrap();
        assert_eq!(stored.total_score(), 35);
        assert_eq!(stored.api_key(), Some("pat-9"));
        assert_eq!(stored.current_paragraph(), 12);
        assert_eq!(stored.updated_at(), later);
    }
}

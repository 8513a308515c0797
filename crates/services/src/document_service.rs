use std::sync::Arc;

use tracing::info;

use quiz_core::model::{Document, DocumentId, UserId};
use quiz_core::Clock;
use quiz_storage::repository::{DocumentMeta, DocumentRepository, UserRepository};

use crate::error::DocumentServiceError;

/// Stores and lists the reference documents questions are drawn from.
#[derive(Clone)]
pub struct DocumentService {
    clock: Clock,
    users: Arc<dyn UserRepository>,
    documents: Arc<dyn DocumentRepository>,
}

impl DocumentService {
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

    /// Stores a new reference document on behalf of a teacher.
    ///
    /// # Errors
    ///
    /// Returns `DocumentServiceError::NotTeacher` when the uploader is a
    /// student, `DocumentServiceError::Document` when the filename or content
    /// is blank, and `DocumentServiceError::Storage` when the uploader is
    /// unknown or persistence fails.
    pub async fn upload(
        &self,
        uploader: UserId,
        filename: &str,
        content: &str,
    ) -> Result<Document, DocumentServiceError> {
        let user = self.users.get_user(uploader).await?;
        if !user.role().is_teacher() {
            return Err(DocumentServiceError::NotTeacher);
        }

        let document = Document::new(DocumentId::generate(), filename, content, self.clock.now())?;
        self.documents.insert_document(&document).await?;
        info!(filename = %document.filename(), "stored reference document");
        Ok(document)
    }

    /// Lists stored documents, newest upload first.
    ///
    /// # Errors
    ///
    /// Returns `DocumentServiceError::Storage` when the listing cannot be
    /// read.
    pub async fn list(&self) -> Result<Vec<DocumentMeta>, DocumentServiceError> {
        Ok(self.documents.list_documents().await?)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

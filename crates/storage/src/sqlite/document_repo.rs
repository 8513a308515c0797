use quiz_core::model::{Document, DocumentId};

use super::SqliteRepository;
use super::mapping::{exec_err, map_document_meta_row, map_document_row};
use crate::repository::{DocumentMeta, DocumentRepository, StorageError};

#[async_trait::async_trait]
impl DocumentRepository for SqliteRepository {
    async fn insert_document(&self, document: &Document) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO documents (id, filename, content, uploaded_at)
            VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(document.id().value().to_string())
        .bind(document.filename())
        .bind(document.content())
        .bind(document.uploaded_at())
        .execute(&self.pool)
        .await
        .map_err(exec_err)?;

        Ok(())
    }

    async fn get_document(&self, id: DocumentId) -> Result<Document, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, filename, content, uploaded_at
            FROM documents WHERE id = ?1
            ",
        )
        .bind(id.value().to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => map_document_row(&row),
            None => Err(StorageError::NotFound),
        }
    }

    async fn latest_document(&self) -> Result<Option<Document>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, filename, content, uploaded_at
            FROM documents
            ORDER BY uploaded_at DESC, id DESC
            LIMIT 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.as_ref().map(map_document_row).transpose()
    }

    async fn list_documents(&self) -> Result<Vec<DocumentMeta>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, filename, uploaded_at
            FROM documents
            ORDER BY uploaded_at DESC, filename ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut metas = Vec::with_capacity(rows.len());
        for row in rows {
            metas.push(map_document_meta_row(&row)?);
        }
        Ok(metas)
    }
}

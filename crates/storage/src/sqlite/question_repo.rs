use std::collections::HashMap;

use quiz_core::model::{Question, QuestionId};

use super::SqliteRepository;
use super::mapping::{exec_err, map_question_row, options_to_json};
use crate::repository::{QuestionRepository, StorageError};

#[async_trait::async_trait]
impl QuestionRepository for SqliteRepository {
    async fn insert_question(&self, question: &Question) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO questions (
                id, kind, content, options, correct_answer, source_document, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(question.id().value().to_string())
        .bind(question.kind().as_str())
        .bind(question.content())
        .bind(options_to_json(question.kind(), question.options())?)
        .bind(question.correct_answer())
        .bind(question.source_document())
        .bind(question.created_at())
        .execute(&self.pool)
        .await
        .map_err(exec_err)?;

        Ok(())
    }

    async fn find_question(&self, id: QuestionId) -> Result<Option<Question>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, kind, content, options, correct_answer, source_document, created_at
            FROM questions WHERE id = ?1
            ",
        )
        .bind(id.value().to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.as_ref().map(map_question_row).transpose()
    }

    async fn list_questions_by_ids(
        &self,
        ids: &[QuestionId],
    ) -> Result<Vec<Question>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut sql = String::from(
            r"
            SELECT id, kind, content, options, correct_answer, source_document, created_at
            FROM questions
            WHERE id IN (
            ",
        );

        for i in 0..ids.len() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push('?');
            sql.push_str(&(i + 1).to_string());
        }
        sql.push_str(")\n");

        let mut q = sqlx::query(&sql);
        for id in ids {
            q = q.bind(id.value().to_string());
        }

        let rows = q
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut by_id: HashMap<QuestionId, Question> = HashMap::with_capacity(rows.len());
        for row in rows {
            let question = map_question_row(&row)?;
            by_id.insert(question.id(), question);
        }

        // Preserve input order; unknown ids are simply dropped.
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(question) = by_id.remove(id) {
                out.push(question);
            }
        }

        Ok(out)
    }
}

use quiz_core::model::{QuestionId, ScoreRecord, UserId};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{exec_err, ser, uuid_from_text};
use crate::repository::{ScoreRecordRepository, StorageError};

#[async_trait::async_trait]
impl ScoreRecordRepository for SqliteRepository {
    async fn append_score_record(&self, record: &ScoreRecord) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO score_records (
                id, user_id, question_id, is_correct, score_change, user_answer, created_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(record.id.value().to_string())
        .bind(record.user_id.value().to_string())
        .bind(record.question_id.value().to_string())
        .bind(i64::from(record.is_correct))
        .bind(record.score_change)
        .bind(record.user_answer.as_str())
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(exec_err)?;

        Ok(())
    }

    async fn list_answered_question_ids(
        &self,
        user_id: UserId,
    ) -> Result<Vec<QuestionId>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT question_id FROM score_records
            WHERE user_id = ?1
            ORDER BY created_at ASC
            ",
        )
        .bind(user_id.value().to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            let raw: String = row.try_get("question_id").map_err(ser)?;
            ids.push(QuestionId::new(uuid_from_text("question_id", &raw)?));
        }
        Ok(ids)
    }
}

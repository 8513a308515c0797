use chrono::{DateTime, Utc};
use quiz_core::model::{Role, User, UserId};

use super::SqliteRepository;
use super::mapping::{exec_err, map_user_row};
use crate::repository::{StorageError, UserRepository};

const USER_COLUMNS: &str = r"
            id, username, password_hash, role, total_score, api_key,
            selected_document, sequential_mode, current_paragraph,
            created_at, updated_at
";

#[async_trait::async_trait]
impl UserRepository for SqliteRepository {
    async fn insert_user(&self, user: &User) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO users (
                id, username, password_hash, role, total_score, api_key,
                selected_document, sequential_mode, current_paragraph,
                created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ",
        )
        .bind(user.id().value().to_string())
        .bind(user.username().as_str())
        .bind(user.password_hash())
        .bind(user.role().as_str())
        .bind(user.total_score())
        .bind(user.api_key())
        .bind(user.selected_document().map(|d| d.value().to_string()))
        .bind(i64::from(user.sequential_mode()))
        .bind(i64::from(user.current_paragraph()))
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(exec_err)?;

        Ok(())
    }

    async fn get_user(&self, id: UserId) -> Result<User, StorageError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
        let row = sqlx::query(&sql)
            .bind(id.value().to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => map_user_row(&row),
            None => Err(StorageError::NotFound),
        }
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1");
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.as_ref().map(map_user_row).transpose()
    }

    async fn update_total_score(
        &self,
        id: UserId,
        total_score: i64,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            UPDATE users SET total_score = ?2, updated_at = ?3 WHERE id = ?1
            ",
        )
        .bind(id.value().to_string())
        .bind(total_score)
        .bind(updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn update_api_key(
        &self,
        id: UserId,
        api_key: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            UPDATE users SET api_key = ?2, updated_at = ?3 WHERE id = ?1
            ",
        )
        .bind(id.value().to_string())
        .bind(api_key)
        .bind(updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn update_current_paragraph(
        &self,
        id: UserId,
        current_paragraph: u32,
        updated_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        let res = sqlx::query(
            r"
            UPDATE users SET current_paragraph = ?2, updated_at = ?3 WHERE id = ?1
            ",
        )
        .bind(id.value().to_string())
        .bind(i64::from(current_paragraph))
        .bind(updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn list_students(&self) -> Result<Vec<User>, StorageError> {
        let sql = format!(
            r"
            SELECT {USER_COLUMNS} FROM users
            WHERE role = ?1
            ORDER BY total_score DESC, username ASC
            "
        );
        let rows = sqlx::query(&sql)
            .bind(Role::Student.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut students = Vec::with_capacity(rows.len());
        for row in rows {
            students.push(map_user_row(&row)?);
        }
        Ok(students)
    }
}

use std::sync::Arc;

use chrono::{DateTime, Utc};

use quiz_core::model::{User, UserId};
use quiz_storage::repository::UserRepository;

use crate::error::RosterError;

/// One student row on the teacher's score board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentStanding {
    pub id: UserId,
    pub username: String,
    pub total_score: i64,
    pub created_at: DateTime<Utc>,
}

impl StudentStanding {
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id(),
            username: user.username().as_str().to_owned(),
            total_score: user.total_score(),
            created_at: user.created_at(),
        }
    }
}

/// Teacher-side view over enrolled students.
#[derive(Clone)]
pub struct RosterService {
    users: Arc<dyn UserRepository>,
}

impl RosterService {
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Lists students ordered by total score, highest first. Teacher
    /// accounts never appear in the roster.
    ///
    /// # Errors
    ///
    /// Returns `RosterError::Storage` when the listing cannot be read.
    pub async fn list_students(&self) -> Result<Vec<StudentStanding>, RosterError> {
        let students = self.users.list_students().await?;
        Ok(students.iter().map(StudentStanding::from_user).collect())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

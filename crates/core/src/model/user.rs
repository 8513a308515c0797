use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::{DocumentId, UserId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UserError {
    #[error("username cannot be empty")]
    EmptyUsername,

    #[error("username too long: {len} chars (max {max})")]
    UsernameTooLong { len: usize, max: usize },

    #[error("unknown role: {0}")]
    UnknownRole(String),
}

//
// ─── ROLE ──────────────────────────────────────────────────────────────────────
//

/// Account role deciding which operations a user may perform.
///
/// Students answer questions and accumulate score; teachers upload
/// documents and read the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
}

impl Role {
    /// Parses a stored role string.
    ///
    /// # Errors
    ///
    /// Returns `UserError::UnknownRole` for anything other than
    /// `student` or `teacher`.
    pub fn parse(value: &str) -> Result<Self, UserError> {
        match value {
            "student" => Ok(Self::Student),
            "teacher" => Ok(Self::Teacher),
            other => Err(UserError::UnknownRole(other.to_string())),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
        }
    }

    #[must_use]
    pub fn is_teacher(self) -> bool {
        matches!(self, Role::Teacher)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//
// ─── USERNAME ──────────────────────────────────────────────────────────────────
//

/// Maximum username length in characters.
pub const MAX_USERNAME_CHARS: usize = 64;

/// A validated account name: trimmed, non-empty, at most 64 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    /// Creates a validated `Username`.
    ///
    /// # Errors
    ///
    /// Returns `UserError::EmptyUsername` if the trimmed name is empty.
    /// Returns `UserError::UsernameTooLong` if it exceeds 64 characters.
    pub fn new(name: impl Into<String>) -> Result<Self, UserError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(UserError::EmptyUsername);
        }
        let len = trimmed.chars().count();
        if len > MAX_USERNAME_CHARS {
            return Err(UserError::UsernameTooLong {
                len,
                max: MAX_USERNAME_CHARS,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── USER ──────────────────────────────────────────────────────────────────────
//

/// An account with its quiz progress state.
///
/// The cumulative score moves with answer submissions; the paragraph
/// offset moves with question generation and only ever advances forward
/// or wraps to zero at the end of the selected document.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    username: Username,
    password_hash: String,
    role: Role,
    total_score: i64,
    api_key: Option<String>,
    selected_document: Option<DocumentId>,
    sequential_mode: bool,
    current_paragraph: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a freshly registered user.
    ///
    /// New accounts start with a zero score and generation progress at
    /// the top of the document.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: UserId,
        username: Username,
        password_hash: impl Into<String>,
        role: Role,
        selected_document: Option<DocumentId>,
        sequential_mode: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            password_hash: password_hash.into(),
            role,
            total_score: 0,
            api_key: None,
            selected_document,
            sequential_mode,
            current_paragraph: 0,
            created_at,
            updated_at: created_at,
        }
    }

    /// Rehydrates a user from persisted storage.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: UserId,
        username: Username,
        password_hash: String,
        role: Role,
        total_score: i64,
        api_key: Option<String>,
        selected_document: Option<DocumentId>,
        sequential_mode: bool,
        current_paragraph: u32,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            password_hash,
            role,
            total_score,
            api_key,
            selected_document,
            sequential_mode,
            current_paragraph,
            created_at,
            updated_at,
        }
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    #[must_use]
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub fn total_score(&self) -> i64 {
        self.total_score
    }

    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    #[must_use]
    pub fn selected_document(&self) -> Option<DocumentId> {
        self.selected_document
    }

    #[must_use]
    pub fn sequential_mode(&self) -> bool {
        self.sequential_mode
    }

    #[must_use]
    pub fn current_paragraph(&self) -> u32 {
        self.current_paragraph
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a score delta from an answer batch.
    pub fn apply_score_change(&mut self, delta: i64, now: DateTime<Utc>) {
        self.total_score += delta;
        self.updated_at = now;
    }

    /// Moves the generation progress marker.
    pub fn set_current_paragraph(&mut self, index: u32, now: DateTime<Utc>) {
        self.current_paragraph = index;
        self.updated_at = now;
    }

    /// Stores a replacement AI key supplied at login.
    pub fn set_api_key(&mut self, key: impl Into<String>, now: DateTime<Utc>) {
        self.api_key = Some(key.into());
        self.updated_at = now;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn student(name: &str) -> User {
        User::new(
            UserId::generate(),
            Username::new(name).unwrap(),
            "salt$digest",
            Role::Student,
            None,
            true,
            fixed_now(),
        )
    }

    #[test]
    fn username_rejects_empty() {
        let err = Username::new("   ").unwrap_err();
        assert_eq!(err, UserError::EmptyUsername);
    }

    #[test]
    fn username_trims_whitespace() {
        let name = Username::new("  ada  ").unwrap();
        assert_eq!(name.as_str(), "ada");
    }

    #[test]
    fn username_rejects_overlong() {
        let long = "x".repeat(MAX_USERNAME_CHARS + 1);
        let err = Username::new(long).unwrap_err();
        assert!(matches!(err, UserError::UsernameTooLong { .. }));
    }

    #[test]
    fn role_parse_roundtrip() {
        assert_eq!(Role::parse("student").unwrap(), Role::Student);
        assert_eq!(Role::parse("teacher").unwrap(), Role::Teacher);
        assert_eq!(Role::Teacher.as_str(), "teacher");
    }

    #[test]
    fn role_parse_rejects_unknown() {
        let err = Role::parse("admin").unwrap_err();
        assert_eq!(err, UserError::UnknownRole("admin".to_string()));
    }

    #[test]
    fn new_user_starts_at_zero() {
        let user = student("ada");
        assert_eq!(user.total_score(), 0);
        assert_eq!(user.current_paragraph(), 0);
        assert!(user.sequential_mode());
        assert_eq!(user.api_key(), None);
    }

    #[test]
    fn score_change_accumulates_and_may_go_negative() {
        let mut user = student("ada");
        let now = fixed_now();
        user.apply_score_change(10, now);
        user.apply_score_change(-30, now);
        assert_eq!(user.total_score(), -20);
    }

    #[test]
    fn paragraph_marker_moves() {
        let mut user = student("ada");
        user.set_current_paragraph(7, fixed_now());
        assert_eq!(user.current_paragraph(), 7);
    }

    #[test]
    fn api_key_is_replaced() {
        let mut user = student("ada");
        user.set_api_key("pat-123", fixed_now());
        assert_eq!(user.api_key(), Some("pat-123"));
    }
}

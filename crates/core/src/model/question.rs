use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── QUESTION KIND ─────────────────────────────────────────────────────────────
//

/// The two question forms the generator produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Multiple choice with labelled options; answered by label.
    Choice,
    /// Fill in the blank; answered by free text.
    Fill,
}

impl QuestionKind {
    /// Parses a stored kind string.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::UnknownKind` for anything other than
    /// `choice` or `fill`.
    pub fn parse(value: &str) -> Result<Self, QuestionError> {
        match value {
            "choice" => Ok(Self::Choice),
            "fill" => Ok(Self::Fill),
            other => Err(QuestionError::UnknownKind(other.to_string())),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionKind::Choice => "choice",
            QuestionKind::Fill => "fill",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//
// ─── CHOICE OPTION ─────────────────────────────────────────────────────────────
//

/// One selectable answer of a choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub label: String,
    pub text: String,
}

impl ChoiceOption {
    #[must_use]
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question content cannot be empty")]
    EmptyContent,

    #[error("unknown question kind: {0}")]
    UnknownKind(String),

    #[error("choice question needs at least 2 options, got {0}")]
    TooFewOptions(usize),

    #[error("choice option label cannot be empty")]
    EmptyOptionLabel,

    #[error("correct answer '{0}' does not match any option label")]
    CorrectLabelMissing(String),

    #[error("correct answer cannot be empty")]
    EmptyCorrectAnswer,
}

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

/// Unvalidated question material as produced by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuestionDraft {
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub content: String,
    #[serde(default)]
    pub options: Vec<ChoiceOption>,
    pub correct_answer: String,
}

impl QuestionDraft {
    /// Checks the draft and stamps it with its source document.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyContent` if the text is blank,
    /// `QuestionError::TooFewOptions` / `EmptyOptionLabel` /
    /// `CorrectLabelMissing` for malformed choice questions, and
    /// `QuestionError::EmptyCorrectAnswer` for blank answers.
    pub fn validate(
        self,
        source_document: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<ValidatedQuestion, QuestionError> {
        let content = self.content.trim().to_owned();
        if content.is_empty() {
            return Err(QuestionError::EmptyContent);
        }
        let correct_answer = self.correct_answer.trim().to_owned();
        if correct_answer.is_empty() {
            return Err(QuestionError::EmptyCorrectAnswer);
        }

        let options = match self.kind {
            QuestionKind::Choice => {
                if self.options.len() < 2 {
                    return Err(QuestionError::TooFewOptions(self.options.len()));
                }
                let mut options = Vec::with_capacity(self.options.len());
                for option in self.options {
                    let label = option.label.trim().to_owned();
                    if label.is_empty() {
                        return Err(QuestionError::EmptyOptionLabel);
                    }
                    options.push(ChoiceOption::new(label, option.text.trim().to_owned()));
                }
                if !options.iter().any(|o| o.label == correct_answer) {
                    return Err(QuestionError::CorrectLabelMissing(correct_answer));
                }
                options
            }
            // Any options the generator attached to a fill question are noise.
            QuestionKind::Fill => Vec::new(),
        };

        Ok(ValidatedQuestion {
            kind: self.kind,
            content,
            options,
            correct_answer,
            source_document: source_document.into(),
            created_at: now,
        })
    }
}

/// A draft that passed validation, ready for an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuestion {
    pub kind: QuestionKind,
    pub content: String,
    pub options: Vec<ChoiceOption>,
    pub correct_answer: String,
    pub source_document: String,
    pub created_at: DateTime<Utc>,
}

impl ValidatedQuestion {
    #[must_use]
    pub fn assign_id(self, id: QuestionId) -> Question {
        Question {
            id,
            kind: self.kind,
            content: self.content,
            options: self.options,
            correct_answer: self.correct_answer,
            source_document: self.source_document,
            created_at: self.created_at,
        }
    }
}

/// A persisted question. Immutable after creation; in particular the
/// correct answer never changes once assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    kind: QuestionKind,
    content: String,
    options: Vec<ChoiceOption>,
    correct_answer: String,
    source_document: String,
    created_at: DateTime<Utc>,
}

impl Question {
    /// Rehydrates a question from persisted storage.
    #[must_use]
    pub fn from_persisted(
        id: QuestionId,
        kind: QuestionKind,
        content: String,
        options: Vec<ChoiceOption>,
        correct_answer: String,
        source_document: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind,
            content,
            options,
            correct_answer,
            source_document,
            created_at,
        }
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn options(&self) -> &[ChoiceOption] {
        &self.options
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn source_document(&self) -> &str {
        &self.source_document
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

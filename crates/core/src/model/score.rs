use chrono::{DateTime, Utc};

use crate::model::ids::{QuestionId, ScoreRecordId, UserId};
use crate::model::question::QuestionKind;

//
// ─── GRADING ───────────────────────────────────────────────────────────────────
//

/// Points won or lost on a choice question.
pub const CHOICE_POINTS: i64 = 10;

/// Points per answer character on a correctly filled blank.
pub const FILL_POINTS_PER_CHAR: i64 = 5;

/// Outcome of grading a single submitted answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerGrade {
    pub is_correct: bool,
    pub score_change: i64,
}

/// Grades a submitted answer against the stored correct answer.
///
/// Choice questions compare labels exactly and swing the score both
/// ways: +10 correct, -10 wrong. Fill questions compare trimmed text;
/// a correct fill earns 5 points per character of the trimmed answer,
/// a wrong fill costs nothing.
#[must_use]
pub fn grade_answer(kind: QuestionKind, correct_answer: &str, submitted: &str) -> AnswerGrade {
    match kind {
        QuestionKind::Choice => {
            let is_correct = submitted == correct_answer;
            AnswerGrade {
                is_correct,
                score_change: if is_correct { CHOICE_POINTS } else { -CHOICE_POINTS },
            }
        }
        QuestionKind::Fill => {
            let submitted = submitted.trim();
            let is_correct = submitted == correct_answer.trim();
            let score_change = if is_correct {
                FILL_POINTS_PER_CHAR * submitted.chars().count() as i64
            } else {
                0
            };
            AnswerGrade {
                is_correct,
                score_change,
            }
        }
    }
}

//
// ─── SCORE RECORD ──────────────────────────────────────────────────────────────
//

/// Record of one graded answer. Append-only: records are written once and
/// never mutated or deleted, so a user's history stays replayable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    pub id: ScoreRecordId,
    pub user_id: UserId,
    pub question_id: QuestionId,
    pub is_correct: bool,
    pub score_change: i64,
    pub user_answer: String,
    pub created_at: DateTime<Utc>,
}

impl ScoreRecord {
    #[must_use]
    pub fn new(
        id: ScoreRecordId,
        user_id: UserId,
        question_id: QuestionId,
        grade: AnswerGrade,
        user_answer: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            question_id,
            is_correct: grade.is_correct,
            score_change: grade.score_change,
            user_answer: user_answer.into(),
            created_at,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

mod document;
mod ids;
mod question;
mod score;
mod user;

pub use ids::{DocumentId, ParseIdError, QuestionId, ScoreRecordId, UserId};

pub use document::{split_paragraphs, Document, DocumentError, MIN_PARAGRAPH_CHARS};
pub use question::{
    ChoiceOption, Question, QuestionDraft, QuestionError, QuestionKind, ValidatedQuestion,
};
pub use score::{
    grade_answer, AnswerGrade, ScoreRecord, CHOICE_POINTS, FILL_POINTS_PER_CHAR,
};
pub use user::{Role, User, UserError, Username, MAX_USERNAME_CHARS};

use thiserror::Error;

use crate::model::{DocumentError, QuestionError, UserError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Question(#[from] QuestionError),
}

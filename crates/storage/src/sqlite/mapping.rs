use quiz_core::model::{
    ChoiceOption, Document, DocumentId, Question, QuestionId, QuestionKind, Role, User, UserId,
    Username,
};
use sqlx::Row;
use uuid::Uuid;

use crate::repository::{DocumentMeta, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Maps an execution error, translating unique-constraint violations into
/// `StorageError::Conflict`.
pub(crate) fn exec_err(e: sqlx::Error) -> StorageError {
    if e.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
    {
        StorageError::Conflict
    } else {
        StorageError::Connection(e.to_string())
    }
}

pub(crate) fn uuid_from_text(field: &'static str, value: &str) -> Result<Uuid, StorageError> {
    Uuid::parse_str(value)
        .map_err(|_| StorageError::Serialization(format!("invalid {field}: {value}")))
}

pub(crate) fn u32_from_i64(field: &'static str, value: i64) -> Result<u32, StorageError> {
    u32::try_from(value).map_err(|_| StorageError::Serialization(format!("{field} out of range")))
}

pub(crate) fn map_user_row(row: &sqlx::sqlite::SqliteRow) -> Result<User, StorageError> {
    let id = UserId::new(uuid_from_text(
        "user id",
        row.try_get::<String, _>("id").map_err(ser)?.as_str(),
    )?);
    let username =
        Username::new(row.try_get::<String, _>("username").map_err(ser)?).map_err(ser)?;
    let role = Role::parse(row.try_get::<String, _>("role").map_err(ser)?.as_str()).map_err(ser)?;

    let selected_document = row
        .try_get::<Option<String>, _>("selected_document")
        .map_err(ser)?
        .map(|raw| uuid_from_text("selected_document", &raw).map(DocumentId::new))
        .transpose()?;

    let current_paragraph = u32_from_i64(
        "current_paragraph",
        row.try_get::<i64, _>("current_paragraph").map_err(ser)?,
    )?;

    Ok(User::from_persisted(
        id,
        username,
        row.try_get::<String, _>("password_hash").map_err(ser)?,
        role,
        row.try_get::<i64, _>("total_score").map_err(ser)?,
        row.try_get::<Option<String>, _>("api_key").map_err(ser)?,
        selected_document,
        row.try_get::<i64, _>("sequential_mode").map_err(ser)? != 0,
        current_paragraph,
        row.try_get("created_at").map_err(ser)?,
        row.try_get("updated_at").map_err(ser)?,
    ))
}

pub(crate) fn map_document_row(row: &sqlx::sqlite::SqliteRow) -> Result<Document, StorageError> {
    let id = DocumentId::new(uuid_from_text(
        "document id",
        row.try_get::<String, _>("id").map_err(ser)?.as_str(),
    )?);

    Document::new(
        id,
        row.try_get::<String, _>("filename").map_err(ser)?,
        row.try_get::<String, _>("content").map_err(ser)?,
        row.try_get("uploaded_at").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_document_meta_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<DocumentMeta, StorageError> {
    let id = DocumentId::new(uuid_from_text(
        "document id",
        row.try_get::<String, _>("id").map_err(ser)?.as_str(),
    )?);

    Ok(DocumentMeta {
        id,
        filename: row.try_get::<String, _>("filename").map_err(ser)?,
        uploaded_at: row.try_get("uploaded_at").map_err(ser)?,
    })
}

pub(crate) fn options_to_json(
    kind: QuestionKind,
    options: &[ChoiceOption],
) -> Result<Option<String>, StorageError> {
    match kind {
        QuestionKind::Choice => serde_json::to_string(options).map(Some).map_err(ser),
        QuestionKind::Fill => Ok(None),
    }
}

pub(crate) fn options_from_json(raw: Option<String>) -> Result<Vec<ChoiceOption>, StorageError> {
    match raw {
        Some(json) => serde_json::from_str(&json).map_err(ser),
        None => Ok(Vec::new()),
    }
}

pub(crate) fn map_question_row(row: &sqlx::sqlite::SqliteRow) -> Result<Question, StorageError> {
    let id = QuestionId::new(uuid_from_text(
        "question id",
        row.try_get::<String, _>("id").map_err(ser)?.as_str(),
    )?);
    let kind =
        QuestionKind::parse(row.try_get::<String, _>("kind").map_err(ser)?.as_str())
            .map_err(ser)?;
    let options = options_from_json(row.try_get::<Option<String>, _>("options").map_err(ser)?)?;

    Ok(Question::from_persisted(
        id,
        kind,
        row.try_get::<String, _>("content").map_err(ser)?,
        options,
        row.try_get::<String, _>("correct_answer").map_err(ser)?,
        row.try_get::<String, _>("source_document").map_err(ser)?,
        row.try_get("created_at").map_err(ser)?,
    ))
}

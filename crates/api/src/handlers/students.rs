//! Score ranking for the teacher view.

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use quiz_core::model::UserId;
use quiz_services::StudentStanding;

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Serialize)]
pub(crate) struct StudentsResponse {
    students: Vec<StudentDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StudentDto {
    id: UserId,
    username: String,
    total_score: i64,
    created_at: DateTime<Utc>,
}

impl StudentDto {
    fn from_standing(standing: &StudentStanding) -> Self {
        Self {
            id: standing.id,
            username: standing.username.clone(),
            total_score: standing.total_score,
            created_at: standing.created_at,
        }
    }
}

pub(crate) async fn list(
    State(state): State<AppState>,
) -> Result<Json<StudentsResponse>, ApiError> {
    let students = state.services.roster().list_students().await?;
    Ok(Json(StudentsResponse {
        students: students.iter().map(StudentDto::from_standing).collect(),
    }))
}

//! Registration and login.

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quiz_core::model::{DocumentId, Role, UserId};
use quiz_services::{RegisterRequest, UserProfile};

use crate::error::ApiError;
use crate::handlers::ApiJson;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegisterBody {
    username: String,
    password: String,
    #[serde(default)]
    selected_document: Option<DocumentId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginBody {
    username: String,
    password: String,
    #[serde(default)]
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AuthResponse {
    user: UserDto,
}

/// Client-facing account view. Never carries the password hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserDto {
    id: UserId,
    username: String,
    role: Role,
    total_score: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    selected_document: Option<DocumentId>,
    sequential_mode: bool,
    current_paragraph: u32,
    created_at: DateTime<Utc>,
}

impl UserDto {
    fn from_profile(profile: &UserProfile) -> Self {
        Self {
            id: profile.id,
            username: profile.username.clone(),
            role: profile.role,
            total_score: profile.total_score,
            selected_document: profile.selected_document,
            sequential_mode: profile.sequential_mode,
            current_paragraph: profile.current_paragraph,
            created_at: profile.created_at,
        }
    }
}

pub(crate) async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterBody>,
) -> Result<Json<AuthResponse>, ApiError> {
    let profile = state
        .services
        .auth()
        .register(RegisterRequest {
            username: body.username,
            password: body.password,
            selected_document: body.selected_document,
        })
        .await?;
    Ok(Json(AuthResponse {
        user: UserDto::from_profile(&profile),
    }))
}

pub(crate) async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginBody>,
) -> Result<Json<AuthResponse>, ApiError> {
    let profile = state
        .services
        .auth()
        .login(&body.username, &body.password, body.api_key.as_deref())
        .await?;
    Ok(Json(AuthResponse {
        user: UserDto::from_profile(&profile),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    fn profile(selected: Option<DocumentId>) -> UserProfile {
        UserProfile {
            id: UserId::generate(),
            username: "ada".into(),
            role: Role::Student,
            total_score: 40,
            selected_document: selected,
            sequential_mode: true,
            current_paragraph: 5,
            created_at: fixed_now(),
        }
    }

    #[test]
    fn user_dto_uses_camel_case_and_omits_empty_selection() {
        let dto = UserDto::from_profile(&profile(None));
        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value["totalScore"], 40);
        assert_eq!(value["sequentialMode"], true);
        assert_eq!(value["currentParagraph"], 5);
        assert_eq!(value["role"], "student");
        assert!(value.get("selectedDocument").is_none());
        assert!(value.get("passwordHash").is_none());
    }

    #[test]
    fn user_dto_serializes_selected_document_when_present() {
        let document = DocumentId::generate();
        let dto = UserDto::from_profile(&profile(Some(document)));
        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value["selectedDocument"], document.to_string());
    }
}

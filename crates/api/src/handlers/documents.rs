//! Document listing and upload.

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use quiz_core::model::{Document, DocumentId, UserId};
use quiz_storage::repository::DocumentMeta;

use crate::error::ApiError;
use crate::handlers::ApiJson;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UploadBody {
    user_id: UserId,
    filename: String,
    content: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct DocumentsResponse {
    documents: Vec<DocumentDto>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UploadResponse {
    document: DocumentDto,
}

/// Listing view: document text never leaves the server through this API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DocumentDto {
    id: DocumentId,
    filename: String,
    uploaded_at: DateTime<Utc>,
}

impl DocumentDto {
    fn from_meta(meta: &DocumentMeta) -> Self {
        Self {
            id: meta.id,
            filename: meta.filename.clone(),
            uploaded_at: meta.uploaded_at,
        }
    }

    fn from_document(document: &Document) -> Self {
        Self {
            id: document.id(),
            filename: document.filename().to_owned(),
            uploaded_at: document.uploaded_at(),
        }
    }
}

pub(crate) async fn list(
    State(state): State<AppState>,
) -> Result<Json<DocumentsResponse>, ApiError> {
    let documents = state.services.documents().list().await?;
    Ok(Json(DocumentsResponse {
        documents: documents.iter().map(DocumentDto::from_meta).collect(),
    }))
}

pub(crate) async fn upload(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<UploadBody>,
) -> Result<Json<UploadResponse>, ApiError> {
    let document = state
        .services
        .documents()
        .upload(body.user_id, &body.filename, &body.content)
        .await?;
    Ok(Json(UploadResponse {
        document: DocumentDto::from_document(&document),
    }))
}

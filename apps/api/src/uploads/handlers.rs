use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;
use crate::uploads::DEFAULT_CONTENT_TYPE;

#[derive(Debug, Deserialize)]
pub struct PresignQuery {
    pub key: Option<String>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
}

#[derive(Serialize)]
pub struct PresignResponse {
    pub url: String,
}

/// GET /api/v1/uploads/presign?key=..&type=..
pub async fn handle_presign(
    State(state): State<AppState>,
    Query(query): Query<PresignQuery>,
) -> Result<Json<PresignResponse>, AppError> {
    let key = query
        .key
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| AppError::Validation("key required".to_string()))?;
    let storage = state.uploads.as_ref().ok_or(AppError::StorageNotConfigured)?;
    let content_type = query
        .content_type
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());

    let url = storage.presign_upload(&key, &content_type).await?;
    Ok(Json(PresignResponse { url }))
}

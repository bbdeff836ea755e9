use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::Note;
use crate::handlers::{json_body, path_params};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::NoteView;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// GET /api/workspaces/:id/notes
///
/// Each note carries `can_manage`, true when the caller may edit or delete it.
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    params: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Vec<NoteView>> {
    let workspace_id = path_params(params)?;
    let notes = state.notes().list(user.user_id, workspace_id).await?;
    Ok(ApiResponse::success(notes))
}

/// POST /api/workspaces/:id/notes
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    params: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> ApiResult<Note> {
    let workspace_id = path_params(params)?;
    let body = json_body(payload)?;
    let note = state
        .notes()
        .create(user.user_id, workspace_id, &body.title, &body.content)
        .await?;
    Ok(ApiResponse::created(note))
}

/// PUT /api/workspaces/:id/notes/:note_id - Creator or workspace owner
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    params: Result<Path<(Uuid, Uuid)>, PathRejection>,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> ApiResult<Note> {
    let (workspace_id, note_id) = path_params(params)?;
    let body = json_body(payload)?;
    let note = state
        .notes()
        .update(user.user_id, workspace_id, note_id, &body.title, &body.content)
        .await?;
    Ok(ApiResponse::success(note))
}

/// DELETE /api/workspaces/:id/notes/:note_id - Creator or workspace owner
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    params: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> ApiResult<()> {
    let (workspace_id, note_id) = path_params(params)?;
    state.notes().delete(user.user_id, workspace_id, note_id).await?;
    Ok(ApiResponse::no_content())
}

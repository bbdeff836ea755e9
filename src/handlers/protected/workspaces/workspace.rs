use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::handlers::{json_body, path_params};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{JoinOutcome, WorkspaceSummary, WorkspaceView};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateWorkspaceRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct JoinWorkspaceRequest {
    #[serde(default)]
    pub invite_code: String,
}

/// GET /api/workspaces - Workspaces the caller belongs to, newest membership first
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<WorkspaceSummary>> {
    let workspaces = state.workspaces().list(user.user_id).await?;
    Ok(ApiResponse::success(workspaces))
}

/// POST /api/workspaces - Create a workspace owned by the caller
///
/// Expected Input: `{ "name": "Design team" }`. Responds 201 with the
/// workspace, including its invite code.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreateWorkspaceRequest>, JsonRejection>,
) -> ApiResult<WorkspaceView> {
    let body = json_body(payload)?;
    let workspace = state.workspaces().create(user.user_id, &body.name).await?;
    Ok(ApiResponse::created(workspace))
}

/// POST /api/workspaces/join - Join with an invite code
///
/// Expected Input: `{ "invite_code": "3F9A0C12BE" }`. Joining a workspace
/// the caller already belongs to succeeds and changes nothing.
pub async fn join(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<JoinWorkspaceRequest>, JsonRejection>,
) -> ApiResult<JoinOutcome> {
    let body = json_body(payload)?;
    let outcome = state.workspaces().join(user.user_id, &body.invite_code).await?;
    Ok(ApiResponse::success(outcome))
}

/// GET /api/workspaces/:id
pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    params: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<WorkspaceView> {
    let workspace_id = path_params(params)?;
    let workspace = state.workspaces().get(user.user_id, workspace_id).await?;
    Ok(ApiResponse::success(workspace))
}

/// DELETE /api/workspaces/:id - Owner only; removes notes, files and memberships
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    params: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<()> {
    let workspace_id = path_params(params)?;
    state.workspaces().delete(user.user_id, workspace_id).await?;
    Ok(ApiResponse::no_content())
}

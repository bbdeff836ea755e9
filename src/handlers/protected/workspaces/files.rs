use axum::{
    extract::rejection::PathRejection,
    extract::{Multipart, Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use uuid::Uuid;

use crate::database::models::WorkspaceFile;
use crate::error::ApiError;
use crate::handlers::path_params;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{FileView, UploadRequest};
use crate::state::AppState;

/// Multipart field carrying the upload
const FILE_FIELD: &str = "file";

/// GET /api/workspaces/:id/files
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    params: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Vec<FileView>> {
    let workspace_id = path_params(params)?;
    let files = state.files().list(user.user_id, workspace_id).await?;
    Ok(ApiResponse::success(files))
}

/// POST /api/workspaces/:id/files - multipart upload, field `file`
///
/// Files up to 10 MiB inclusive are accepted; larger ones get 413 and are
/// never written to storage.
pub async fn upload(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    params: Result<Path<Uuid>, PathRejection>,
    mut multipart: Multipart,
) -> ApiResult<WorkspaceFile> {
    let workspace_id = path_params(params)?;
    // Non-members are turned away before any of the body is buffered.
    state.files().check_upload(user.user_id, workspace_id).await?;

    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;
        upload = Some(UploadRequest {
            file_name,
            content_type,
            data,
        });
        break;
    }

    let upload = upload.ok_or_else(|| ApiError::validation_error("File is required"))?;
    let file = state.files().upload(user.user_id, workspace_id, upload).await?;
    Ok(ApiResponse::created(file))
}

/// GET /api/workspaces/:id/files/:file_id - raw bytes as an attachment
pub async fn download(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    params: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> Result<Response, ApiError> {
    let (workspace_id, file_id) = path_params(params)?;
    let download = state.files().download(user.user_id, workspace_id, file_id).await?;

    let content_type = HeaderValue::from_str(&download.file.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let disposition = HeaderValue::from_str(&content_disposition(&download.file.file_name))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        download.data,
    )
        .into_response())
}

/// DELETE /api/workspaces/:id/files/:file_id - Uploader or workspace owner
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    params: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> ApiResult<()> {
    let (workspace_id, file_id) = path_params(params)?;
    state.files().delete(user.user_id, workspace_id, file_id).await?;
    Ok(ApiResponse::no_content())
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("Request body is too large".to_string())
    } else {
        ApiError::bad_request(err.body_text())
    }
}

/// `attachment; filename="..."` with the name reduced to printable ASCII.
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();
    format!("attachment; filename=\"{}\"", fallback)
}

// handlers/public/auth/login.rs - POST /auth/login handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;

use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::Session;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /auth/login - Authenticate with email and password
///
/// Expected Input:
/// ```json
/// { "email": "user@example.com", "password": "..." }
/// ```
///
/// Expected Output:
/// ```json
/// {
///   "success": true,
///   "data": {
///     "token": "eyJhbGciOiJIUzI1NiI...",
///     "user": { "id": "...", "email": "user@example.com", "full_name": "...", "created_at": "..." },
///     "expires_in": 604800
///   }
/// }
/// ```
///
/// Wrong email and wrong password produce the same 401 response.
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Session> {
    let body = json_body(payload)?;
    let session = state.auth().login(&body.email, &body.password).await?;
    Ok(ApiResponse::success(session))
}

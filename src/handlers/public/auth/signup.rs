// handlers/public/auth/signup.rs - POST /auth/signup handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;

use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::Session;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// POST /auth/signup - Create an account and receive a token
///
/// Expected Input:
/// ```json
/// { "name": "Ada Lovelace", "email": "ada@example.com", "password": "at-least-8" }
/// ```
///
/// Responds 201 with the same payload as login. 400 on missing fields, a
/// malformed email or a short password; 409 when the email is taken.
pub async fn signup_post(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<Session> {
    let body = json_body(payload)?;
    let session = state
        .auth()
        .signup(&body.name, &body.email, &body.password)
        .await?;
    Ok(ApiResponse::created(session))
}

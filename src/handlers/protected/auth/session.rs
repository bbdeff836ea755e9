use axum::{extract::State, Extension};

use crate::database::models::User;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /api/auth/whoami - Profile of the authenticated user
///
/// Expected Output:
/// ```json
/// {
///   "success": true,
///   "data": { "id": "...", "email": "user@example.com", "full_name": "...", "created_at": "..." }
/// }
/// ```
pub async fn whoami(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<User> {
    let profile = state.auth().whoami(user.user_id).await?;
    Ok(ApiResponse::success(profile))
}

// handlers/mod.rs - Handler tiers
//
// Public (no auth) → Protected (JWT auth, workspace policy)

pub mod public;
pub mod protected;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::Path;
use axum::Json;

use crate::error::ApiError;

/// Unwrap a JSON body, reporting malformed input in the API error format.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// Unwrap path parameters, reporting malformed ids in the API error format.
pub(crate) fn path_params<T>(params: Result<Path<T>, PathRejection>) -> Result<T, ApiError> {
    params
        .map(|Path(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

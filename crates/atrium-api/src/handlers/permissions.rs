//! Batch permission check endpoint

use axum::{extract::State, Json};

use atrium_guard::{
    check_batch, require_principal, AccessError, PermissionCheckRequest, PermissionCheckResponse,
};

use crate::AppState;

/// `POST /permissions/check`
///
/// Order-preserving: one result per input check. Checks the engine cannot
/// answer come back `allowed: false`.
#[tracing::instrument(skip(state, request))]
pub async fn check_handler(
    State(state): State<AppState>,
    Json(request): Json<PermissionCheckRequest>,
) -> Result<Json<PermissionCheckResponse>, AccessError> {
    let user = require_principal(state.sessions.as_ref()).await?;
    let response = check_batch(&state.engine, &user, &request).await;
    Ok(Json(response))
}

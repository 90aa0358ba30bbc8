//! Provider status endpoint

use axum::{extract::State, Json};
use serde::Serialize;

use atrium_guard::{require_principal, AccessError};
use atrium_provider::ProviderStatus;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderStatus>,
}

/// `GET /providers` - every known provider with key and active status
/// for the calling user. Key material itself never appears here.
#[tracing::instrument(skip(state))]
pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<Json<ProvidersResponse>, AccessError> {
    let user = require_principal(state.sessions.as_ref()).await?;
    let providers = state.resolver.provider_status(&user).await;
    Ok(Json(ProvidersResponse { providers }))
}

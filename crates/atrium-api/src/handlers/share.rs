//! Resource sharing and role endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use atrium_guard::{require_principal, AccessError};
use atrium_rebac::vocabulary::relation_applies;
use atrium_types::{Permission, Principal, Relation, ResourceType};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ShareRequest {
    /// Who receives (or loses) the relation.
    pub user: Principal,
    pub relation: Relation,
}

#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub shared: bool,
}

#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub role: Option<Relation>,
}

fn parse_type(raw: &str) -> Result<ResourceType, AccessError> {
    raw.parse::<ResourceType>()
        .map_err(|_| AccessError::InvalidRequest(format!("unknown resource type '{raw}'")))
}

/// The permission required to manage access to a resource of this type.
fn sharing_permission(resource_type: ResourceType) -> Result<Permission, AccessError> {
    match resource_type {
        ResourceType::Document => Ok(Permission::CanShare),
        ResourceType::Project => Ok(Permission::CanManageMembers),
        ResourceType::Task | ResourceType::Note => Err(AccessError::InvalidRequest(format!(
            "{resource_type} resources cannot be shared"
        ))),
    }
}

/// `POST /resources/{type}/{id}/share`
#[tracing::instrument(skip(state, request))]
pub async fn share_handler(
    State(state): State<AppState>,
    Path((resource_type, id)): Path<(String, String)>,
    Json(request): Json<ShareRequest>,
) -> Result<Json<ShareResponse>, AccessError> {
    let resource_type = parse_type(&resource_type)?;
    let permission = sharing_permission(resource_type)?;
    if !relation_applies(resource_type, request.relation) {
        return Err(AccessError::InvalidRequest(format!(
            "relation '{}' does not apply to {resource_type} resources",
            request.relation
        )));
    }

    state
        .guard
        .guarded(
            state.sessions.as_ref(),
            resource_type,
            permission,
            (id, request),
            |(id, _)| Some(id.clone()),
            |_, (id, request)| {
                let engine = state.engine.clone();
                async move {
                    let object = atrium_types::ObjectRef::new(resource_type, id);
                    engine.grant(&request.user, &object, request.relation).await?;
                    Ok(Json(ShareResponse { shared: true }))
                }
            },
        )
        .await
}

/// `DELETE /resources/{type}/{id}/share`
#[tracing::instrument(skip(state, request))]
pub async fn revoke_handler(
    State(state): State<AppState>,
    Path((resource_type, id)): Path<(String, String)>,
    Json(request): Json<ShareRequest>,
) -> Result<Json<ShareResponse>, AccessError> {
    let resource_type = parse_type(&resource_type)?;
    let permission = sharing_permission(resource_type)?;

    state
        .guard
        .guarded(
            state.sessions.as_ref(),
            resource_type,
            permission,
            (id, request),
            |(id, _)| Some(id.clone()),
            |_, (id, request)| {
                let engine = state.engine.clone();
                async move {
                    let object = atrium_types::ObjectRef::new(resource_type, id);
                    engine.revoke(&request.user, &object, request.relation).await?;
                    Ok(Json(ShareResponse { shared: false }))
                }
            },
        )
        .await
}

/// `GET /resources/{type}/{id}/role` - the caller's highest role.
#[tracing::instrument(skip(state))]
pub async fn role_handler(
    State(state): State<AppState>,
    Path((resource_type, id)): Path<(String, String)>,
) -> Result<Json<RoleResponse>, AccessError> {
    let resource_type = parse_type(&resource_type)?;
    let user = require_principal(state.sessions.as_ref()).await?;
    let role = state.engine.role_of(&user, resource_type, &id).await;
    Ok(Json(RoleResponse { role }))
}

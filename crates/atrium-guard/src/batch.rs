//! Batch permission checks
//!
//! The UI asks about several permissions at once when rendering a
//! resource page. Results are order-preserving, one per input check,
//! and fail closed: a check the engine cannot answer is `allowed: false`.

use serde::{Deserialize, Serialize};

use atrium_rebac::RebacEngine;
use atrium_types::{ObjectRef, Permission, Principal, ResourceType};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionCheck {
    #[serde(rename = "resourceType")]
    pub resource_type: ResourceType,
    #[serde(rename = "resourceId")]
    pub resource_id: String,
    pub permission: Permission,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionCheckRequest {
    pub checks: Vec<PermissionCheck>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionResult {
    #[serde(rename = "resourceId")]
    pub resource_id: String,
    pub allowed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionCheckResponse {
    pub results: Vec<PermissionResult>,
}

/// Evaluate every check for `user`, preserving input order.
pub async fn check_batch(
    engine: &RebacEngine,
    user: &Principal,
    request: &PermissionCheckRequest,
) -> PermissionCheckResponse {
    let mut results = Vec::with_capacity(request.checks.len());
    for check in &request.checks {
        let object = ObjectRef::new(check.resource_type, &check.resource_id);
        let allowed = engine.check(user, &object, check.permission).await;
        results.push(PermissionResult { resource_id: check.resource_id.clone(), allowed });
    }
    PermissionCheckResponse { results }
}

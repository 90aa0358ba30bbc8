//! Permission enforcement primitives
//!
//! `require_permission` raises a typed denial; `filter_by_permission`
//! narrows bulk listings with exactly one existence check per resource;
//! `guarded` wraps an operation with identity resolution and a
//! permission check.

use std::future::Future;
use std::sync::Arc;

use atrium_rebac::RebacEngine;
use atrium_types::{ObjectRef, Permission, Principal, ResourceType};

use crate::error::AccessError;
use crate::session::{require_principal, SessionResolver};

/// Anything carrying a resource id, so bulk filters can work over full
/// application records rather than bare id lists.
pub trait ResourceId {
    fn resource_id(&self) -> &str;
}

impl ResourceId for String {
    fn resource_id(&self) -> &str {
        self
    }
}

impl ResourceId for &str {
    fn resource_id(&self) -> &str {
        self
    }
}

/// Enforcement operations over the ReBAC engine.
#[derive(Clone)]
pub struct PermissionGuard {
    engine: Arc<RebacEngine>,
}

impl PermissionGuard {
    pub fn new(engine: Arc<RebacEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &RebacEngine {
        &self.engine
    }

    /// Fail with a typed denial unless the user holds `permission`.
    pub async fn require_permission(
        &self,
        user: &Principal,
        resource_type: ResourceType,
        resource_id: &str,
        permission: Permission,
    ) -> Result<(), AccessError> {
        let resource = ObjectRef::new(resource_type, resource_id);
        if self.engine.check(user, &resource, permission).await {
            Ok(())
        } else {
            Err(AccessError::Denied { permission, resource })
        }
    }

    /// The subsequence of `resources` the user holds `permission` on,
    /// in input order. One check per resource, regardless of how many
    /// permissions the caller will render.
    pub async fn filter_by_permission<T: ResourceId>(
        &self,
        user: &Principal,
        resources: Vec<T>,
        resource_type: ResourceType,
        permission: Permission,
    ) -> Vec<T> {
        let mut authorized = Vec::with_capacity(resources.len());
        for resource in resources {
            let object = ObjectRef::new(resource_type, resource.resource_id());
            if self.engine.check(user, &object, permission).await {
                authorized.push(resource);
            }
        }
        authorized
    }

    /// Non-raising variant of [`PermissionGuard::require_permission`].
    pub async fn can_access(
        &self,
        user: &Principal,
        resource_type: ResourceType,
        resource_id: &str,
        permission: Permission,
    ) -> bool {
        self.require_permission(user, resource_type, resource_id, permission).await.is_ok()
    }

    /// Wrap an operation with identity resolution and a permission check.
    ///
    /// The extractor may return `None` for operations that are not about
    /// one specific resource (list endpoints); the check is skipped and
    /// the operation still runs under the resolved identity. Denials pass
    /// through typed; anything else the operation raises is flattened to
    /// a generic internal error.
    pub async fn guarded<Req, Res, Fut, Op>(
        &self,
        sessions: &dyn SessionResolver,
        resource_type: ResourceType,
        permission: Permission,
        request: Req,
        extract_id: impl FnOnce(&Req) -> Option<String>,
        operation: Op,
    ) -> Result<Res, AccessError>
    where
        Op: FnOnce(Principal, Req) -> Fut,
        Fut: Future<Output = anyhow::Result<Res>>,
    {
        let user = require_principal(sessions).await?;

        if let Some(resource_id) = extract_id(&request) {
            self.require_permission(&user, resource_type, &resource_id, permission).await?;
        }

        operation(user, request).await.map_err(|err| match err.downcast::<AccessError>() {
            Ok(access) => access,
            Err(other) => AccessError::Internal(other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_rebac::workspace_model;
    use atrium_store::MemoryTupleStore;
    use atrium_types::Relation;
    use crate::session::StaticSession;

    async fn guard_with_owner(user: &Principal, doc_ids: &[&str]) -> PermissionGuard {
        let store = Arc::new(MemoryTupleStore::with_model(workspace_model()).await);
        let engine = Arc::new(RebacEngine::new(store));
        for id in doc_ids {
            engine
                .grant(user, &ObjectRef::new(ResourceType::Document, *id), Relation::Owner)
                .await
                .unwrap();
        }
        PermissionGuard::new(engine)
    }

    fn alice() -> Principal {
        Principal::new("alice@example.com")
    }

    #[tokio::test]
    async fn test_require_permission_allows_and_denies() {
        let guard = guard_with_owner(&alice(), &["d1"]).await;

        guard
            .require_permission(&alice(), ResourceType::Document, "d1", Permission::CanWrite)
            .await
            .unwrap();

        let err = guard
            .require_permission(&alice(), ResourceType::Document, "d2", Permission::CanWrite)
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::Denied { .. }));
    }

    #[tokio::test]
    async fn test_filter_preserves_input_order() {
        let guard = guard_with_owner(&alice(), &["d1", "d3", "d5"]).await;

        let input: Vec<String> =
            ["d5", "d2", "d3", "d4", "d1"].iter().map(|s| s.to_string()).collect();
        let filtered = guard
            .filter_by_permission(&alice(), input, ResourceType::Document, Permission::CanRead)
            .await;
        assert_eq!(filtered, vec!["d5", "d3", "d1"]);
    }

    #[tokio::test]
    async fn test_filter_works_over_records() {
        #[derive(Debug, PartialEq)]
        struct Doc {
            id: String,
            title: String,
        }
        impl ResourceId for Doc {
            fn resource_id(&self) -> &str {
                &self.id
            }
        }

        let guard = guard_with_owner(&alice(), &["d1"]).await;
        let docs = vec![
            Doc { id: "d1".into(), title: "mine".into() },
            Doc { id: "d2".into(), title: "not mine".into() },
        ];
        let filtered = guard
            .filter_by_permission(&alice(), docs, ResourceType::Document, Permission::CanRead)
            .await;
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "mine");
    }

    #[tokio::test]
    async fn test_guarded_happy_path() {
        let guard = guard_with_owner(&alice(), &["d1"]).await;
        let session = StaticSession::user("alice@example.com");

        let result = guard
            .guarded(
                &session,
                ResourceType::Document,
                Permission::CanRead,
                "d1".to_string(),
                |id| Some(id.clone()),
                |user, id| async move { Ok(format!("{user} read {id}")) },
            )
            .await
            .unwrap();
        assert_eq!(result, "alice@example.com read d1");
    }

    #[tokio::test]
    async fn test_guarded_rejects_anonymous_before_running() {
        let guard = guard_with_owner(&alice(), &["d1"]).await;
        let session = StaticSession::anonymous();

        let err = guard
            .guarded::<String, String, _, _>(
                &session,
                ResourceType::Document,
                Permission::CanRead,
                "d1".to_string(),
                |id| Some(id.clone()),
                |_, _| async move { panic!("operation must not run") },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_guarded_denies_before_running() {
        let guard = guard_with_owner(&alice(), &[]).await;
        let session = StaticSession::user("alice@example.com");

        let err: AccessError = guard
            .guarded(
                &session,
                ResourceType::Document,
                Permission::CanDelete,
                "d1".to_string(),
                |id| Some(id.clone()),
                |_, _| async move { Ok::<_, anyhow::Error>("ran") },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::Denied { .. }));
    }

    #[tokio::test]
    async fn test_guarded_flattens_unexpected_errors() {
        let guard = guard_with_owner(&alice(), &["d1"]).await;
        let session = StaticSession::user("alice@example.com");

        let err = guard
            .guarded(
                &session,
                ResourceType::Document,
                Permission::CanRead,
                "d1".to_string(),
                |id| Some(id.clone()),
                |_, _| async move {
                    Err::<String, _>(anyhow::anyhow!("connection reset by peer"))
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AccessError::Internal(_)));
    }

    #[tokio::test]
    async fn test_guarded_skips_check_without_resource_id() {
        let guard = guard_with_owner(&alice(), &[]).await;
        let session = StaticSession::user("alice@example.com");

        let result = guard
            .guarded(
                &session,
                ResourceType::Document,
                Permission::CanRead,
                (),
                |_| None,
                |user, _| async move { Ok::<_, anyhow::Error>(user.as_str().to_string()) },
            )
            .await
            .unwrap();
        assert_eq!(result, "alice@example.com");
    }
}

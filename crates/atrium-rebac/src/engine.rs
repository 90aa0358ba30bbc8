//! The ReBAC engine
//!
//! Typed grant/revoke/check/list operations over a [`TupleStore`].
//! Check and list calls fail closed; grant is idempotent; revoke and
//! other mutations propagate store errors.

use std::sync::Arc;

use tracing::warn;

use atrium_store::TupleStore;
use atrium_types::{
    ObjectRef, Permission, Principal, Relation, ResourceType, StoreError, Tuple,
};

use crate::vocabulary::relation_priority;
use crate::RebacResult;

/// Outcome of a grant call. Both variants are success; the distinction
/// lets bulk callers report how much work was actually new.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantOutcome {
    Granted,
    AlreadyExisted,
}

/// Typed access to the authorization graph.
pub struct RebacEngine {
    store: Arc<dyn TupleStore>,
}

impl RebacEngine {
    pub fn new(store: Arc<dyn TupleStore>) -> Self {
        Self { store }
    }

    /// Check a derived permission. Fails closed: any store error is
    /// logged and reported as "not authorized".
    pub async fn check(
        &self,
        user: &Principal,
        object: &ObjectRef,
        permission: Permission,
    ) -> bool {
        self.check_raw(user, object, permission.as_str()).await
    }

    /// Check a base relation. Fails closed like [`RebacEngine::check`].
    pub async fn check_relation(
        &self,
        user: &Principal,
        object: &ObjectRef,
        relation: Relation,
    ) -> bool {
        self.check_raw(user, object, relation.as_str()).await
    }

    async fn check_raw(&self, user: &Principal, object: &ObjectRef, name: &str) -> bool {
        match self
            .store
            .check(&user.as_user_ref(), name, &object.to_string())
            .await
        {
            Ok(allowed) => allowed,
            Err(err) => {
                warn!(
                    user = %user,
                    object = %object,
                    relation = name,
                    error = %err,
                    "authorization check failed, denying"
                );
                false
            }
        }
    }

    /// Grant a relation. Idempotent: a tuple that already exists is a
    /// logged no-op, not an error.
    pub async fn grant(
        &self,
        user: &Principal,
        object: &ObjectRef,
        relation: Relation,
    ) -> RebacResult<GrantOutcome> {
        let tuple = Tuple::new(user.as_user_ref(), relation.as_str(), object.to_string());
        match self.store.write(vec![tuple]).await {
            Ok(()) => Ok(GrantOutcome::Granted),
            Err(StoreError::AlreadyExists) => {
                warn!(user = %user, object = %object, relation = %relation, "relation already exists, skipping");
                Ok(GrantOutcome::AlreadyExisted)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Revoke a relation. Store errors propagate; revoking an absent
    /// tuple succeeds.
    pub async fn revoke(
        &self,
        user: &Principal,
        object: &ObjectRef,
        relation: Relation,
    ) -> RebacResult<()> {
        let tuple = Tuple::new(user.as_user_ref(), relation.as_str(), object.to_string());
        self.store.delete(vec![tuple]).await?;
        Ok(())
    }

    /// Objects of `resource_type` on which `user` holds `relation`.
    ///
    /// Takes the relation by wire name so callers can probe permission
    /// names and legacy aliases alike. Degrades to empty on store errors
    /// so listing pages show nothing rather than crashing; malformed
    /// references in the reply are skipped.
    pub async fn list_objects(
        &self,
        user: &Principal,
        resource_type: ResourceType,
        relation: &str,
    ) -> Vec<ObjectRef> {
        match self
            .store
            .list_objects(&user.as_user_ref(), resource_type.as_str(), relation)
            .await
        {
            Ok(raw) => raw
                .iter()
                .filter_map(|r| match ObjectRef::parse(r) {
                    Ok(obj) => Some(obj),
                    Err(err) => {
                        warn!(reference = %r, error = %err, "skipping malformed object reference");
                        None
                    }
                })
                .collect(),
            Err(err) => {
                warn!(user = %user, resource_type = %resource_type, relation, error = %err, "list_objects failed, returning empty");
                Vec::new()
            }
        }
    }

    /// Principals holding `relation` on `object`. Degrades to empty on
    /// store errors.
    pub async fn list_users(&self, object: &ObjectRef, relation: Relation) -> Vec<Principal> {
        match self
            .store
            .list_users(&object.to_string(), relation.as_str())
            .await
        {
            Ok(raw) => raw
                .iter()
                .filter_map(|r| Principal::from_user_ref(r))
                .collect(),
            Err(err) => {
                warn!(object = %object, relation = %relation, error = %err, "list_users failed, returning empty");
                Vec::new()
            }
        }
    }

    /// The user's highest-privilege relation on a resource, probing the
    /// type's vocabulary in priority order. `None` when no relation holds.
    pub async fn role_of(
        &self,
        user: &Principal,
        resource_type: ResourceType,
        resource_id: &str,
    ) -> Option<Relation> {
        let object = ObjectRef::new(resource_type, resource_id);
        for relation in relation_priority(resource_type) {
            if self.check_relation(user, &object, *relation).await {
                return Some(*relation);
            }
        }
        None
    }
}

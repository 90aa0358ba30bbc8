//! Helper utilities for integration tests

use std::sync::Arc;

use async_trait::async_trait;

use atrium_rebac::{workspace_model, RebacEngine};
use atrium_store::{AuthorizationModel, MemoryTupleStore, TupleStore};
use atrium_types::{ObjectRef, Principal, ResourceType, StoreError, StoreResult, Tuple};

/// Engine backed by a memory store with the workspace model published.
pub async fn engine() -> (RebacEngine, Arc<MemoryTupleStore>) {
    let store = Arc::new(MemoryTupleStore::with_model(workspace_model()).await);
    (RebacEngine::new(store.clone()), store)
}

pub fn alice() -> Principal {
    Principal::new("alice@example.com")
}

pub fn bob() -> Principal {
    Principal::new("bob@example.com")
}

pub fn document(id: &str) -> ObjectRef {
    ObjectRef::new(ResourceType::Document, id)
}

/// A tuple store whose transport is down. Every call fails with
/// `Unavailable`, which read paths must convert to deny/empty.
pub struct UnreachableTupleStore;

#[async_trait]
impl TupleStore for UnreachableTupleStore {
    async fn check(&self, _user: &str, _relation: &str, _object: &str) -> StoreResult<bool> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn write(&self, _tuples: Vec<Tuple>) -> StoreResult<()> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn delete(&self, _tuples: Vec<Tuple>) -> StoreResult<()> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn list_objects(
        &self,
        _user: &str,
        _object_type: &str,
        _relation: &str,
    ) -> StoreResult<Vec<String>> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn list_users(&self, _object: &str, _relation: &str) -> StoreResult<Vec<String>> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn publish_model(&self, _model: &AuthorizationModel) -> StoreResult<String> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

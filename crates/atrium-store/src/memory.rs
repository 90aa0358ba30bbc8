//! In-memory tuple store for development and tests
//!
//! Holds the published authorization model and evaluates permission
//! checks through its rewrite rules, so tests exercise the same
//! relation-vs-permission distinction the external service enforces.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use atrium_types::{StoreError, StoreResult, Tuple};

use crate::{AuthorizationModel, TupleStore};

#[derive(Default)]
struct MemoryState {
    tuples: HashSet<Tuple>,
    model: Option<AuthorizationModel>,
    model_id: Option<String>,
}

/// In-memory tuple store implementation.
#[derive(Default)]
pub struct MemoryTupleStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryTupleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct with a model already published, for test fixtures.
    pub async fn with_model(model: AuthorizationModel) -> Self {
        let store = Self::new();
        // publish_model on a fresh store cannot fail
        let _ = store.publish_model(&model).await;
        store
    }

    fn object_type(object: &str) -> &str {
        object.split_once(':').map(|(t, _)| t).unwrap_or(object)
    }
}

#[async_trait]
impl TupleStore for MemoryTupleStore {
    async fn check(&self, user: &str, relation: &str, object: &str) -> StoreResult<bool> {
        let state = self.state.read().await;
        let names: Vec<String> = match &state.model {
            Some(model) => model
                .satisfying_relations(Self::object_type(object), relation)
                .into_iter()
                .map(str::to_string)
                .collect(),
            None => vec![relation.to_string()],
        };
        Ok(names.iter().any(|name| {
            state.tuples.contains(&Tuple::new(user, name.clone(), object))
        }))
    }

    async fn write(&self, tuples: Vec<Tuple>) -> StoreResult<()> {
        let mut state = self.state.write().await;
        if tuples.iter().any(|t| state.tuples.contains(t)) {
            return Err(StoreError::AlreadyExists);
        }
        for tuple in tuples {
            state.tuples.insert(tuple);
        }
        Ok(())
    }

    async fn delete(&self, tuples: Vec<Tuple>) -> StoreResult<()> {
        let mut state = self.state.write().await;
        for tuple in &tuples {
            state.tuples.remove(tuple);
        }
        Ok(())
    }

    async fn list_objects(
        &self,
        user: &str,
        object_type: &str,
        relation: &str,
    ) -> StoreResult<Vec<String>> {
        let state = self.state.read().await;
        let names: HashSet<&str> = match &state.model {
            Some(model) => model.satisfying_relations(object_type, relation).into_iter().collect(),
            None => std::iter::once(relation).collect(),
        };
        let prefix = format!("{object_type}:");
        let mut objects: Vec<String> = state
            .tuples
            .iter()
            .filter(|t| {
                t.user == user && names.contains(t.relation.as_str()) && t.object.starts_with(&prefix)
            })
            .map(|t| t.object.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        objects.sort();
        Ok(objects)
    }

    async fn list_users(&self, object: &str, relation: &str) -> StoreResult<Vec<String>> {
        let state = self.state.read().await;
        let names: HashSet<&str> = match &state.model {
            Some(model) => model
                .satisfying_relations(Self::object_type(object), relation)
                .into_iter()
                .collect(),
            None => std::iter::once(relation).collect(),
        };
        let mut users: Vec<String> = state
            .tuples
            .iter()
            .filter(|t| t.object == object && names.contains(t.relation.as_str()))
            .map(|t| t.user.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        users.sort();
        Ok(users)
    }

    async fn publish_model(&self, model: &AuthorizationModel) -> StoreResult<String> {
        let mut state = self.state.write().await;
        let id = Uuid::new_v4().to_string();
        state.model = Some(model.clone());
        state.model_id = Some(id.clone());
        Ok(id)
    }
}

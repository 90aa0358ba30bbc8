//! # Atrium Store - Tuple Store Client
//!
//! Thin transport to the external authorization service. Exposes
//! check/write/delete/list primitives over wire-form tuples; everything
//! typed lives one layer up in `atrium-rebac`.

use async_trait::async_trait;
use atrium_types::{StoreResult, Tuple};

pub mod http;
pub mod memory;
pub mod model;

pub use http::HttpTupleStore;
pub use memory::MemoryTupleStore;
pub use model::{AuthorizationModel, PermissionRule, TypeDefinition};

/// The abstract tuple store interface.
///
/// All references are in wire form: users as `user:{id}`, objects as
/// `{type}:{id}`. Relation names may be base relations or derived
/// permissions; the store applies the published authorization model's
/// rewrite rules during `check` and `list_objects`.
#[async_trait]
pub trait TupleStore: Send + Sync {
    /// Check whether `user` has `relation` on `object`.
    async fn check(&self, user: &str, relation: &str, object: &str) -> StoreResult<bool>;

    /// Write tuples. Reports [`StoreError::AlreadyExists`] if any tuple
    /// is already present; in that case nothing is written.
    ///
    /// [`StoreError::AlreadyExists`]: atrium_types::StoreError::AlreadyExists
    async fn write(&self, tuples: Vec<Tuple>) -> StoreResult<()>;

    /// Delete tuples. Deleting an absent tuple is a no-op.
    async fn delete(&self, tuples: Vec<Tuple>) -> StoreResult<()>;

    /// List object references of `object_type` on which `user` has
    /// `relation`, as `{type}:{id}` strings.
    async fn list_objects(
        &self,
        user: &str,
        object_type: &str,
        relation: &str,
    ) -> StoreResult<Vec<String>>;

    /// List user references holding `relation` on `object`, as
    /// `user:{id}` strings.
    async fn list_users(&self, object: &str, relation: &str) -> StoreResult<Vec<String>>;

    /// Publish an authorization model and return its id. Called once at
    /// setup; the model is externally versioned and never mutated at
    /// runtime.
    async fn publish_model(&self, model: &AuthorizationModel) -> StoreResult<String>;
}

//! Credential record storage seam
//!
//! The relational implementation lives with the storage collaborator;
//! this crate ships the trait and an in-memory implementation for tests
//! and development.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use atrium_types::{CredentialRecord, Provider};

/// Storage for encrypted per-user provider credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert or replace the record for `(user, provider)`. Replacing
    /// keeps `created_at` and bumps `updated_at`.
    async fn upsert(&self, user: &str, provider: Provider, encrypted_key: String);

    /// The record for `(user, provider)`, if any.
    async fn find(&self, user: &str, provider: Provider) -> Option<CredentialRecord>;

    /// All records for a user.
    async fn list(&self, user: &str) -> Vec<CredentialRecord>;

    /// Remove the record for `(user, provider)`.
    async fn remove(&self, user: &str, provider: Provider);
}

/// In-memory credential store.
#[derive(Default)]
pub struct MemoryCredentialStore {
    records: Arc<RwLock<HashMap<(String, Provider), CredentialRecord>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn upsert(&self, user: &str, provider: Provider, encrypted_key: String) {
        let mut records = self.records.write().await;
        let key = (user.to_string(), provider);
        match records.get_mut(&key) {
            Some(existing) => {
                existing.encrypted_key = encrypted_key;
                existing.updated_at = Utc::now();
            }
            None => {
                records.insert(key, CredentialRecord::new(user, provider, encrypted_key));
            }
        }
    }

    async fn find(&self, user: &str, provider: Provider) -> Option<CredentialRecord> {
        self.records.read().await.get(&(user.to_string(), provider)).cloned()
    }

    async fn list(&self, user: &str) -> Vec<CredentialRecord> {
        let mut records: Vec<CredentialRecord> = self
            .records
            .read()
            .await
            .values()
            .filter(|r| r.user == user)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.provider.as_str());
        records
    }

    async fn remove(&self, user: &str, provider: Provider) {
        self.records.write().await.remove(&(user.to_string(), provider));
    }
}

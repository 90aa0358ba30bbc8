//! # Atrium Provider - AI Provider Resolution
//!
//! Resolves which AI provider a user's requests go through. Only
//! user-provided keys from the credential store are considered; there are
//! no environment-variable fallbacks. Priority order is fixed and only
//! consulted among *plausible* keys: an expired or placeholder key for a
//! higher-priority provider never shadows a working lower-priority one.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};
use zeroize::Zeroizing;

use atrium_types::{Principal, Provider};
use atrium_vault::{CredentialStore, KeyVault};

pub mod models;

pub use models::{chat_model, embedding_model, UseCase};

/// Fixed provider priority for resolution.
pub const PROVIDER_PRIORITY: [Provider; 3] = [Provider::Google, Provider::OpenAi, Provider::Groq];

#[derive(Debug, Error)]
pub enum ProviderError {
    /// No stored credential decrypted to a plausible key.
    #[error(
        "no AI provider key available for this user; add a key under Settings \u{2192} AI Keys"
    )]
    NoProviderAvailable,
}

/// A resolved provider with a usable decrypted key.
pub struct ResolvedProvider {
    pub provider: Provider,
    pub model: String,
    /// Decrypted key in a zeroized buffer. Never logged.
    pub api_key: Zeroizing<String>,
}

impl std::fmt::Debug for ResolvedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedProvider")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Per-provider status row for settings pages and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ProviderStatus {
    pub provider: Provider,
    pub name: &'static str,
    pub model: &'static str,
    pub has_key: bool,
    pub is_active: bool,
}

/// Walks providers in priority order and returns the first usable key.
pub struct ProviderResolver {
    vault: Arc<KeyVault>,
    credentials: Arc<dyn CredentialStore>,
}

impl ProviderResolver {
    pub fn new(vault: Arc<KeyVault>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self { vault, credentials }
    }

    /// Resolve the user's provider for general use.
    ///
    /// Providers whose stored key fails to decrypt or is implausible are
    /// skipped, not fatal; only a fully empty walk fails.
    pub async fn resolve(&self, user: &Principal) -> Result<ResolvedProvider, ProviderError> {
        for provider in PROVIDER_PRIORITY {
            let Some(record) = self.credentials.find(user.as_str(), provider).await else {
                continue;
            };
            let key = match self.vault.decrypt(&record.encrypted_key) {
                Ok(key) => key,
                Err(err) => {
                    warn!(user = %user, provider = %provider, error = %err, "stored credential failed to decrypt, skipping provider");
                    continue;
                }
            };
            if !KeyVault::is_plausible(&key) {
                debug!(user = %user, provider = %provider, "stored credential is implausible, skipping provider");
                continue;
            }
            return Ok(ResolvedProvider {
                provider,
                model: chat_model(provider, UseCase::General).to_string(),
                api_key: key,
            });
        }
        Err(ProviderError::NoProviderAvailable)
    }

    /// Resolve and re-map the model for a specific use case.
    pub async fn resolve_for_use_case(
        &self,
        user: &Principal,
        use_case: UseCase,
    ) -> Result<ResolvedProvider, ProviderError> {
        let mut resolved = self.resolve(user).await?;
        resolved.model = chat_model(resolved.provider, use_case).to_string();
        Ok(resolved)
    }

    /// Status of every known provider for a user.
    pub async fn provider_status(&self, user: &Principal) -> Vec<ProviderStatus> {
        let active = self.resolve(user).await.ok().map(|r| r.provider);
        let mut rows = Vec::with_capacity(PROVIDER_PRIORITY.len());
        for provider in PROVIDER_PRIORITY {
            let has_key = self.credentials.find(user.as_str(), provider).await.is_some();
            rows.push(ProviderStatus {
                provider,
                name: provider.display_name(),
                model: chat_model(provider, UseCase::General),
                has_key,
                is_active: active == Some(provider),
            });
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atrium_vault::MemoryCredentialStore;

    const SECRET: &str = "a-vault-secret-that-is-long-enough-to-pass";

    async fn resolver_with(
        keys: &[(Provider, &str)],
    ) -> (ProviderResolver, Arc<KeyVault>) {
        let vault = Arc::new(KeyVault::new(SECRET).unwrap());
        let credentials = Arc::new(MemoryCredentialStore::new());
        for (provider, plaintext) in keys {
            let encrypted = vault.encrypt(plaintext).unwrap();
            credentials.upsert("alice", *provider, encrypted).await;
        }
        (ProviderResolver::new(vault.clone(), credentials), vault)
    }

    fn alice() -> Principal {
        Principal::new("alice")
    }

    #[tokio::test]
    async fn test_resolves_highest_priority_plausible_key() {
        let (resolver, _) = resolver_with(&[
            (Provider::Google, "google-key-1234567890"),
            (Provider::Groq, "groq-key-1234567890"),
        ])
        .await;

        let resolved = resolver.resolve(&alice()).await.unwrap();
        assert_eq!(resolved.provider, Provider::Google);
        assert_eq!(resolved.model, "gemini-2.5-flash");
        assert_eq!(resolved.api_key.as_str(), "google-key-1234567890");
    }

    #[tokio::test]
    async fn test_implausible_high_priority_key_falls_through() {
        // google outranks groq, but its key is a placeholder
        let (resolver, _) = resolver_with(&[
            (Provider::Google, "your-google-key-here"),
            (Provider::Groq, "groq-key-1234567890"),
        ])
        .await;

        let resolved = resolver.resolve(&alice()).await.unwrap();
        assert_eq!(resolved.provider, Provider::Groq);
        assert_eq!(resolved.model, "llama-3.1-8b-instant");
    }

    #[tokio::test]
    async fn test_undecryptable_key_falls_through() {
        let vault = Arc::new(KeyVault::new(SECRET).unwrap());
        let credentials = Arc::new(MemoryCredentialStore::new());
        credentials.upsert("alice", Provider::Google, "not-a-valid-payload".into()).await;
        let encrypted = vault.encrypt("openai-key-1234567890").unwrap();
        credentials.upsert("alice", Provider::OpenAi, encrypted).await;

        let resolver = ProviderResolver::new(vault, credentials);
        let resolved = resolver.resolve(&alice()).await.unwrap();
        assert_eq!(resolved.provider, Provider::OpenAi);
    }

    #[tokio::test]
    async fn test_no_keys_fails_with_guidance() {
        let (resolver, _) = resolver_with(&[]).await;
        let err = resolver.resolve(&alice()).await.unwrap_err();
        assert!(err.to_string().contains("Settings"));
    }

    #[tokio::test]
    async fn test_use_case_remaps_model() {
        let (resolver, _) =
            resolver_with(&[(Provider::OpenAi, "openai-key-1234567890")]).await;

        let powerful =
            resolver.resolve_for_use_case(&alice(), UseCase::Powerful).await.unwrap();
        assert_eq!(powerful.model, "gpt-4o");

        let fast = resolver.resolve_for_use_case(&alice(), UseCase::Fast).await.unwrap();
        assert_eq!(fast.model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_provider_status_rows() {
        let (resolver, _) = resolver_with(&[(Provider::Groq, "groq-key-1234567890")]).await;

        let rows = resolver.provider_status(&alice()).await;
        assert_eq!(rows.len(), 3);

        let google = rows.iter().find(|r| r.provider == Provider::Google).unwrap();
        assert!(!google.has_key);
        assert!(!google.is_active);

        let groq = rows.iter().find(|r| r.provider == Provider::Groq).unwrap();
        assert!(groq.has_key);
        assert!(groq.is_active);
    }
}

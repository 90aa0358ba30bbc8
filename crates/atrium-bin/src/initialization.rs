//! Startup composition
//!
//! Builds the process-lifetime handles (store client, vault, resolver,
//! pipeline) from configuration and wires them into the application
//! state. Every handle is constructed exactly once and shared by `Arc`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use atrium_api::AppState;
use atrium_config::{Config, StoreBackend};
use atrium_guard::SessionResolver;
use atrium_provider::ProviderResolver;
use atrium_rebac::{workspace_model, RebacEngine};
use atrium_retrieval::{
    HttpEmbedder, MemoryEmbeddingIndex, ParagraphChunker, RetrievalPipeline,
};
use atrium_store::{HttpTupleStore, MemoryTupleStore, TupleStore};
use atrium_vault::{KeyVault, MemoryCredentialStore};

/// Build the tuple store client selected by configuration.
pub async fn build_store(config: &Config) -> anyhow::Result<Arc<dyn TupleStore>> {
    match config.store.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryTupleStore::new())),
        StoreBackend::Http => {
            let endpoint = config
                .store
                .endpoint
                .as_ref()
                .context("http store backend requires an endpoint")?;
            let store = HttpTupleStore::new(
                endpoint.clone(),
                config.store.model_id.clone(),
                Duration::from_secs(config.store.timeout_secs),
            )?;
            Ok(Arc::new(store))
        }
    }
}

/// Publish the workspace authorization model unless one is already
/// configured. Returns the model id in use.
pub async fn ensure_model(
    store: &Arc<dyn TupleStore>,
    config: &Config,
) -> anyhow::Result<String> {
    if let Some(id) = &config.store.model_id {
        info!(model_id = %id, "using configured authorization model");
        return Ok(id.clone());
    }
    let id = store
        .publish_model(&workspace_model())
        .await
        .context("failed to publish workspace authorization model")?;
    info!(model_id = %id, "published workspace authorization model");
    Ok(id)
}

/// Wire the application state from configuration.
///
/// The session resolver is injected by the caller: the real one belongs
/// to the session collaborator, tests pass a static identity.
pub async fn build_state(
    config: &Config,
    sessions: Arc<dyn SessionResolver>,
) -> anyhow::Result<AppState> {
    let store = build_store(config).await?;
    ensure_model(&store, config).await?;

    let engine = Arc::new(RebacEngine::new(store));
    let vault = Arc::new(KeyVault::new(&config.vault.encryption_secret)?);
    let credentials = Arc::new(MemoryCredentialStore::new());
    let resolver = Arc::new(ProviderResolver::new(vault.clone(), credentials.clone()));

    let embedder = Arc::new(HttpEmbedder::new(
        resolver.clone(),
        Duration::from_secs(config.store.timeout_secs),
    )?);
    let index = Arc::new(MemoryEmbeddingIndex::new());
    let pipeline = Arc::new(RetrievalPipeline::new(
        engine.clone(),
        embedder,
        index,
        Box::new(ParagraphChunker::default()),
    ));

    Ok(AppState::new(engine, sessions, vault, credentials, resolver, pipeline))
}

//! # Atrium API - REST Surface
//!
//! Exposes the permission-check, sharing, role, provider-status, and
//! assistant-search endpoints. Handlers stay thin: identity comes from
//! the session collaborator in state, enforcement from `atrium-guard`,
//! and everything else from the core crates.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use atrium_guard::{PermissionGuard, SessionResolver};
use atrium_provider::ProviderResolver;
use atrium_rebac::RebacEngine;
use atrium_retrieval::RetrievalPipeline;
use atrium_vault::{CredentialStore, KeyVault};

pub mod handlers;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RebacEngine>,
    pub guard: PermissionGuard,
    pub sessions: Arc<dyn SessionResolver>,
    pub vault: Arc<KeyVault>,
    pub credentials: Arc<dyn CredentialStore>,
    pub resolver: Arc<ProviderResolver>,
    pub pipeline: Arc<RetrievalPipeline>,
}

impl AppState {
    pub fn new(
        engine: Arc<RebacEngine>,
        sessions: Arc<dyn SessionResolver>,
        vault: Arc<KeyVault>,
        credentials: Arc<dyn CredentialStore>,
        resolver: Arc<ProviderResolver>,
        pipeline: Arc<RetrievalPipeline>,
    ) -> Self {
        let guard = PermissionGuard::new(engine.clone());
        Self { engine, guard, sessions, vault, credentials, resolver, pipeline }
    }
}

/// Build the router over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/permissions/check", post(handlers::permissions::check_handler))
        .route(
            "/resources/:resource_type/:id/share",
            post(handlers::share::share_handler).delete(handlers::share::revoke_handler),
        )
        .route("/resources/:resource_type/:id/role", get(handlers::share::role_handler))
        .route("/assistant/search", post(handlers::search::search_handler))
        .route("/providers", get(handlers::providers::list_handler))
        .with_state(state)
}

//! Session identity seam
//!
//! Identity resolution belongs to the external session collaborator;
//! this crate only needs "who is calling, if anyone".

use async_trait::async_trait;

use atrium_types::Principal;

use crate::error::AccessError;

/// Resolves the calling user's identity from ambient session state.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    /// The current principal, or `None` when no session exists.
    async fn current_principal(&self) -> Option<Principal>;
}

/// Resolve the caller or fail with `Unauthenticated`.
pub async fn require_principal(
    sessions: &dyn SessionResolver,
) -> Result<Principal, AccessError> {
    sessions.current_principal().await.ok_or(AccessError::Unauthenticated)
}

/// Fixed-identity resolver for tests and single-user tooling.
pub struct StaticSession(pub Option<Principal>);

impl StaticSession {
    pub fn user(id: &str) -> Self {
        Self(Some(Principal::new(id)))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

#[async_trait]
impl SessionResolver for StaticSession {
    async fn current_principal(&self) -> Option<Principal> {
        self.0.clone()
    }
}

//! Diagnostic probes for operators
//!
//! Small read-only checks used by ops tooling to confirm the
//! authorization graph is populated for a user.

use atrium_types::{Principal, ResourceType};

use crate::engine::RebacEngine;

/// What a user can currently see, per the authorization graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessStatus {
    pub user: Principal,
    pub readable_documents: usize,
    /// First few readable document ids, for spot checks.
    pub sample: Vec<String>,
}

/// Probe how many documents a user can read.
pub async fn access_status(engine: &RebacEngine, user: &Principal) -> AccessStatus {
    let objects = engine.list_objects(user, ResourceType::Document, "can_read").await;
    let sample = objects.iter().take(5).map(|o| o.id.clone()).collect();
    AccessStatus { user: user.clone(), readable_documents: objects.len(), sample }
}

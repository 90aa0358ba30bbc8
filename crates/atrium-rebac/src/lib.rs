//! # Atrium ReBAC - Relationship-Based Access Control Engine
//!
//! The typed layer over the tuple store: per-type relation vocabularies,
//! grant/revoke/check/list operations, role probing, and the bulk
//! backfill used to seed the authorization graph from existing records.
//!
//! Read-path semantics are fail-closed: a broken authorization dependency
//! must never fail open, so `check` degrades to `false` and the list
//! operations degrade to empty rather than surfacing transport errors.

use thiserror::Error;

pub mod backfill;
pub mod engine;
pub mod status;
pub mod vocabulary;

pub use backfill::{BackfillReport, DocumentSeed, NoteSeed, ProjectSeed, TaskSeed};
pub use engine::{GrantOutcome, RebacEngine};
pub use vocabulary::workspace_model;

use atrium_types::StoreError;

/// Errors surfaced by mutating engine operations.
///
/// Read-path operations never return this; they fail closed instead.
#[derive(Debug, Error)]
pub enum RebacError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type RebacResult<T> = std::result::Result<T, RebacError>;

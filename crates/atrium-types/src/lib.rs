//! # Atrium Types
//!
//! Shared type definitions for the Atrium workspace core.
//!
//! This crate provides the domain vocabulary used across the Atrium crates,
//! ensuring a single source of truth and preventing circular dependencies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod credential;
pub mod embedding;

pub use credential::{CredentialRecord, Provider};
pub use embedding::{EmbeddingRecord, SourceType};

// ============================================================================
// Principals and object references
// ============================================================================

/// An opaque user identity (an email address or subject id).
///
/// Stored without the `user:` wire prefix; [`Principal::as_user_ref`]
/// produces the prefixed form the tuple store expects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(pub String);

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Wire form used in tuple store requests: `user:{id}`.
    pub fn as_user_ref(&self) -> String {
        format!("user:{}", self.0)
    }

    /// Parse a `user:{id}` wire reference back into a principal.
    pub fn from_user_ref(raw: &str) -> Option<Self> {
        raw.strip_prefix("user:").map(|id| Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// The closed set of resource types in the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Document,
    Project,
    Task,
    Note,
}

impl ResourceType {
    pub const ALL: [ResourceType; 4] = [
        ResourceType::Document,
        ResourceType::Project,
        ResourceType::Task,
        ResourceType::Note,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Document => "document",
            ResourceType::Project => "project",
            ResourceType::Task => "task",
            ResourceType::Note => "note",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "document" => Ok(ResourceType::Document),
            "project" => Ok(ResourceType::Project),
            "task" => Ok(ResourceType::Task),
            "note" => Ok(ResourceType::Note),
            other => Err(StoreError::InvalidReference(format!(
                "unknown resource type '{other}'"
            ))),
        }
    }
}

/// A typed reference to a workspace resource, wire form `{type}:{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    pub resource_type: ResourceType,
    pub id: String,
}

impl ObjectRef {
    pub fn new(resource_type: ResourceType, id: impl Into<String>) -> Self {
        Self { resource_type, id: id.into() }
    }

    /// Parse a `{type}:{id}` wire reference.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        let (type_name, id) = raw.split_once(':').ok_or_else(|| {
            StoreError::InvalidReference(format!("object reference '{raw}' must be 'type:id'"))
        })?;
        if id.is_empty() {
            return Err(StoreError::InvalidReference(format!(
                "object reference '{raw}' has an empty id"
            )));
        }
        Ok(Self { resource_type: type_name.parse()?, id: id.to_string() })
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.id)
    }
}

// ============================================================================
// Relations and permissions
// ============================================================================

/// The closed set of base relations stored as tuples.
///
/// Which relations apply to which resource type is defined by the
/// per-type vocabulary (see `atrium-rebac`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Owner,
    Editor,
    Viewer,
    Member,
    Creator,
    Assignee,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Owner => "owner",
            Relation::Editor => "editor",
            Relation::Viewer => "viewer",
            Relation::Member => "member",
            Relation::Creator => "creator",
            Relation::Assignee => "assignee",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relation {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Relation::Owner),
            "editor" => Ok(Relation::Editor),
            "viewer" => Ok(Relation::Viewer),
            "member" => Ok(Relation::Member),
            "creator" => Ok(Relation::Creator),
            "assignee" => Ok(Relation::Assignee),
            other => Err(StoreError::InvalidReference(format!("unknown relation '{other}'"))),
        }
    }
}

/// Derived permissions.
///
/// Permissions are never written as tuples; the tuple store evaluates them
/// through the authorization model's rewrite rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    CanRead,
    CanWrite,
    CanDelete,
    CanShare,
    CanManageMembers,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::CanRead => "can_read",
            Permission::CanWrite => "can_write",
            Permission::CanDelete => "can_delete",
            Permission::CanShare => "can_share",
            Permission::CanManageMembers => "can_manage_members",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Tuples
// ============================================================================

/// The atomic authorization fact: `(user, relation, object)`.
///
/// All fields are in wire form (`user:{id}`, relation name, `{type}:{id}`).
/// Tuples are unique; writing an existing tuple reports
/// [`StoreError::AlreadyExists`], which grant treats as success.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tuple {
    pub user: String,
    pub relation: String,
    pub object: String,
}

impl Tuple {
    pub fn new(
        user: impl Into<String>,
        relation: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self { user: user.into(), relation: relation.into(), object: object.into() }
    }
}

// ============================================================================
// Error types
// ============================================================================

/// Errors from the tuple store transport.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The tuple being written already exists. Idempotent callers treat
    /// this as success.
    #[error("tuple already exists")]
    AlreadyExists,

    /// The store or the network between us and it is unreachable.
    /// Check-family callers convert this to a fail-closed `false`.
    #[error("tuple store unavailable: {0}")]
    Unavailable(String),

    /// A reference did not match the `type:id` / `user:{id}` wire grammar.
    #[error("invalid reference: {0}")]
    InvalidReference(String),

    /// The store answered with a payload we could not interpret.
    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

//! # Atrium Guard - Permission Enforcement Layer
//!
//! Turns raw authorization checks into request-guarding primitives:
//! a typed denial error, resource-list filtering for bulk endpoints, a
//! higher-order operation wrapper, and the batch check service consumed
//! by the UI layer.

pub mod batch;
pub mod enforce;
pub mod error;
pub mod session;

pub use batch::{check_batch, PermissionCheck, PermissionCheckRequest, PermissionCheckResponse, PermissionResult};
pub use enforce::{PermissionGuard, ResourceId};
pub use error::AccessError;
pub use session::{require_principal, SessionResolver, StaticSession};

//! Authorization error taxonomy
//!
//! `Unauthenticated` (no resolvable identity) is distinct from `Denied`
//! (identity known, permission absent). Denials carry the specific
//! permission and resource for debuggability; they never grant partial
//! access.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use atrium_types::{ObjectRef, Permission};

#[derive(Debug, Error)]
pub enum AccessError {
    /// No session identity could be resolved. Client-retryable after
    /// logging in.
    #[error("authentication required")]
    Unauthenticated,

    /// Identity known, permission absent.
    #[error("permission denied: {permission} on {resource}")]
    Denied { permission: Permission, resource: ObjectRef },

    /// The request itself was malformed (missing resource id, relation
    /// outside the type's vocabulary).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Anything unexpected crossing the guard seam. Details are logged,
    /// not returned.
    #[error("internal error")]
    Internal(String),
}

impl AccessError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AccessError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AccessError::Denied { .. } => StatusCode::FORBIDDEN,
            AccessError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AccessError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code for UI dispatch.
    pub fn code(&self) -> &'static str {
        match self {
            AccessError::Unauthenticated => "AUTH_REQUIRED",
            AccessError::Denied { .. } => "PERMISSION_DENIED",
            AccessError::InvalidRequest(_) => "INVALID_REQUEST",
            AccessError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        if let AccessError::Internal(detail) = &self {
            tracing::error!(detail = %detail, "internal error crossing guard boundary");
        }
        let body = ErrorBody { error: self.to_string(), code: self.code() };
        (self.status_code(), Json(body)).into_response()
    }
}

//! # Atrium Constants
//!
//! Centralized constants used across the Atrium codebase.
//! This crate provides a single source of truth for magic numbers and strings.

// ============================================================================
// Embedding Constants
// ============================================================================

/// Target dimensionality for stored embedding vectors.
///
/// Vectors from smaller models are zero-padded and vectors from larger
/// models are truncated to this length at normalization time. Mixing raw
/// dimensionalities would make cosine distance meaningless.
pub const TARGET_DIM: usize = 1536;

/// Default number of results returned by a semantic search.
pub const DEFAULT_SEARCH_LIMIT: usize = 4;

// ============================================================================
// Similarity Thresholds
// ============================================================================

/// First-pass similarity threshold for authorized searches.
pub const SIMILARITY_THRESHOLD_AUTHORIZED: f32 = 0.3;

/// First-pass similarity threshold for unscoped (internal tooling) searches.
pub const SIMILARITY_THRESHOLD_UNSCOPED: f32 = 0.5;

/// Fallback threshold used once when the first pass returns nothing.
///
/// Embedding spaces from different providers are not score-calibrated
/// identically; a fixed high threshold starves valid answers for some
/// providers.
pub const SIMILARITY_THRESHOLD_FALLBACK: f32 = 0.1;

// ============================================================================
// Authorization Constants
// ============================================================================

/// Relation names probed, in order, to resolve a user's readable document
/// set. Stops at the first non-empty result.
///
/// TODO: collapse to `can_read` once every deployed authorization model is
/// on the current schema; the `viewer`/`reader` entries only exist to
/// tolerate models published before the permission rewrite rules landed.
pub const READ_RELATION_ALIASES: &[&str] = &["can_read", "viewer", "reader"];

// ============================================================================
// Vault Constants
// ============================================================================

/// Minimum length for the configured encryption secret.
pub const MIN_ENCRYPTION_SECRET_LEN: usize = 32;

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// API keys at or below this length are rejected as implausible before any
/// network round trip is spent on them.
pub const MIN_PLAUSIBLE_KEY_LEN: usize = 10;

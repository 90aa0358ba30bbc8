//! Embedding dimensionality normalization
//!
//! Different providers emit different vector lengths (768 for
//! text-embedding-004, 1536 for text-embedding-3-small). Comparing raw
//! lengths would make cosine distance meaningless, so every vector is
//! forced to [`TARGET_DIM`] before storage or comparison: truncated if
//! longer, zero-padded if shorter. This is a lossy compatibility shim and
//! unrecoverable if a provider changes dimensionality after encoding.

use tracing::warn;

use atrium_const::TARGET_DIM;

/// Force a vector to exactly [`TARGET_DIM`] entries.
pub fn normalize_dimension(mut vec: Vec<f32>, source: &str) -> Vec<f32> {
    match vec.len().cmp(&TARGET_DIM) {
        std::cmp::Ordering::Equal => vec,
        std::cmp::Ordering::Greater => {
            warn!(from = vec.len(), to = TARGET_DIM, source, "truncating embedding");
            vec.truncate(TARGET_DIM);
            vec
        }
        std::cmp::Ordering::Less => {
            warn!(from = vec.len(), to = TARGET_DIM, source, "zero-padding embedding");
            vec.resize(TARGET_DIM, 0.0);
            vec
        }
    }
}

//! # Atrium Observe
//!
//! Structured logging for the Atrium services.
//!
//! Log lines never contain decrypted credentials; callers log key *sources*
//! (provider names, user ids) rather than key material.

use std::str::FromStr;

use tracing::Span;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// Log output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors (for development).
    Pretty,
    /// Compact format without colors.
    Compact,
    /// JSON format (for production).
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow::anyhow!("unknown log format '{other}'")),
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// `filter` falls back to the `RUST_LOG` environment variable, then to
/// `info,atrium=debug`.
pub fn init_logging(format: LogFormat, filter: Option<&str>) -> anyhow::Result<()> {
    let env_filter = match filter {
        Some(directive) => EnvFilter::try_new(directive)?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,atrium=debug")),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    match format {
        LogFormat::Pretty => builder
            .pretty()
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize pretty logger: {e}"))?,
        LogFormat::Compact => builder
            .compact()
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize compact logger: {e}"))?,
        LogFormat::Json => builder
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize JSON logger: {e}"))?,
    }

    tracing::info!(format = ?format, "logging initialized");
    Ok(())
}

/// Span covering one authorization decision.
pub fn authorization_span(user: &str, object: &str, permission: &str) -> Span {
    tracing::info_span!(
        "authorization",
        user = user,
        object = object,
        permission = permission,
        allowed = tracing::field::Empty,
    )
}

/// Span covering one authorization-filtered retrieval.
pub fn retrieval_span(user: &str, query_chars: usize) -> Span {
    tracing::debug_span!(
        "retrieval",
        user = user,
        query_chars = query_chars,
        authorized_documents = tracing::field::Empty,
        results = tracing::field::Empty,
        threshold = tracing::field::Empty,
    )
}

/// Record the outcome of an authorization decision on its span.
pub fn record_decision(span: &Span, allowed: bool) {
    span.record("allowed", allowed);
}

/// Record retrieval results on the retrieval span.
pub fn record_retrieval(span: &Span, authorized_documents: usize, results: usize, threshold: f32) {
    span.record("authorized_documents", authorized_documents);
    span.record("results", results);
    span.record("threshold", threshold);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("yaml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_span_creation_does_not_panic() {
        let span = authorization_span("user:alice", "document:1", "can_read");
        record_decision(&span, true);

        let span = retrieval_span("user:alice", 42);
        record_retrieval(&span, 3, 2, 0.3);
    }
}

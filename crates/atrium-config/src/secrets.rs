//! Secret sources
//!
//! A small seam over "where configuration values come from" so tests can
//! run without touching the process environment.

use std::collections::HashMap;

/// A source of named configuration values.
pub trait SecretSource: Send + Sync {
    /// Get a value by key, if present and non-empty.
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads from the process environment.
pub struct EnvSecretSource;

impl SecretSource for EnvSecretSource {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.is_empty())
    }
}

/// Fixed in-memory values, for tests.
#[derive(Default)]
pub struct MemorySecretSource {
    values: HashMap<String, String>,
}

impl MemorySecretSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl SecretSource for MemorySecretSource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

//! Credential record types
//!
//! A credential is a per-user, per-provider API key stored encrypted at
//! rest. The plaintext key exists only transiently during provider
//! resolution and is never logged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Supported AI providers, in no particular order here.
///
/// Resolution priority is fixed by the provider resolver, not by this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    OpenAi,
    Groq,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::OpenAi => "openai",
            Provider::Groq => "groq",
        }
    }

    /// Human-readable name for status listings.
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Google => "Google Gemini",
            Provider::OpenAi => "OpenAI",
            Provider::Groq => "Groq",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(Provider::Google),
            "openai" => Ok(Provider::OpenAi),
            "groq" => Ok(Provider::Groq),
            other => Err(format!("unknown provider '{other}'")),
        }
    }
}

/// An encrypted API key for one `(user, provider)` pair.
///
/// `encrypted_key` holds base64(`iv[12] || tag[16] || ciphertext`); the
/// vault owns the byte layout. At most one live record per pair is
/// meaningful for resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub id: Uuid,
    pub user: String,
    pub provider: Provider,
    pub encrypted_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CredentialRecord {
    pub fn new(user: impl Into<String>, provider: Provider, encrypted_key: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user: user.into(),
            provider,
            encrypted_key,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_names() {
        assert_eq!(Provider::OpenAi.as_str(), "openai");
        assert_eq!("groq".parse::<Provider>().unwrap(), Provider::Groq);
        assert!("anthropic".parse::<Provider>().is_err());
    }

    #[test]
    fn test_record_timestamps_start_equal() {
        let rec = CredentialRecord::new("alice", Provider::Google, "abc".into());
        assert_eq!(rec.created_at, rec.updated_at);
    }

    #[test]
    fn test_provider_serde_lowercase() {
        let json = serde_json::to_string(&Provider::OpenAi).unwrap();
        assert_eq!(json, "\"openai\"");
    }
}

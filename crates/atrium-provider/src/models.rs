//! Static provider/model tables
//!
//! Adding a provider means extending every match here; the compiler
//! enforces the exhaustiveness.

use serde::{Deserialize, Serialize};

use atrium_types::Provider;

/// What the resolved model will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UseCase {
    General,
    Fast,
    Powerful,
    RealTime,
}

/// Chat model identifier for a provider and use case.
pub fn chat_model(provider: Provider, use_case: UseCase) -> &'static str {
    match (provider, use_case) {
        (Provider::Google, UseCase::Powerful) => "gemini-2.5-pro",
        (Provider::Google, _) => "gemini-2.5-flash",
        (Provider::OpenAi, UseCase::Powerful) => "gpt-4o",
        (Provider::OpenAi, _) => "gpt-4o-mini",
        (Provider::Groq, UseCase::Powerful) => "llama-3.1-70b-versatile",
        (Provider::Groq, _) => "llama-3.1-8b-instant",
    }
}

/// Embedding model identifier for a provider.
///
/// Groq serves no embedding endpoint; its users embed through the OpenAI
/// API with the standard small model.
pub fn embedding_model(provider: Provider) -> &'static str {
    match provider {
        Provider::Google => "text-embedding-004",
        Provider::OpenAi | Provider::Groq => "text-embedding-3-small",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_fast_and_real_time_share_models() {
        for provider in [Provider::Google, Provider::OpenAi, Provider::Groq] {
            assert_eq!(
                chat_model(provider, UseCase::General),
                chat_model(provider, UseCase::Fast)
            );
            assert_eq!(
                chat_model(provider, UseCase::General),
                chat_model(provider, UseCase::RealTime)
            );
        }
    }

    #[test]
    fn test_powerful_models() {
        assert_eq!(chat_model(Provider::Google, UseCase::Powerful), "gemini-2.5-pro");
        assert_eq!(chat_model(Provider::OpenAi, UseCase::Powerful), "gpt-4o");
        assert_eq!(
            chat_model(Provider::Groq, UseCase::Powerful),
            "llama-3.1-70b-versatile"
        );
    }

    #[test]
    fn test_groq_embeds_through_openai_model() {
        assert_eq!(embedding_model(Provider::Groq), embedding_model(Provider::OpenAi));
    }

    #[test]
    fn test_use_case_serde_names() {
        let json = serde_json::to_string(&UseCase::RealTime).unwrap();
        assert_eq!(json, "\"real-time\"");
    }
}

//! Chat provider construction.
//!
//! Every supported backend speaks the OpenAI chat completions protocol, so
//! [`create_provider`] only picks the base URL, key handling and
//! capabilities before building an [`OpenAiCompatibleProvider`].

pub mod openai_compat;

use coderag_core::llm::box_provider::BoxLlmProvider;
use coderag_types::config::ProviderSettings;
use coderag_types::llm::{CompletionRequest, LlmError, Message, ProviderKind};

use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config::{self as compat, LOCAL_API_KEY, OpenAiCompatConfig};

/// Build a [`BoxLlmProvider`] from the `[provider]` settings.
///
/// `api_key` is the already-resolved secret value. OpenAI requires one;
/// local servers fall back to a placeholder. A configured `base_url`
/// overrides the kind's default and the provider is then named after
/// `settings.name`.
///
/// # Errors
///
/// `AuthenticationFailed` when OpenAI has no key, `InvalidRequest` when a
/// custom provider has no base URL.
pub fn create_provider(
    settings: &ProviderSettings,
    api_key: Option<&str>,
) -> Result<BoxLlmProvider, LlmError> {
    let key = match api_key.filter(|k| !k.is_empty()) {
        Some(k) => k,
        None if settings.kind.requires_api_key() => return Err(LlmError::AuthenticationFailed),
        None => LOCAL_API_KEY,
    };

    let mut config = match settings.kind {
        ProviderKind::OpenAi => compat::openai_defaults(key, &settings.model),
        ProviderKind::Ollama => compat::ollama_defaults(&settings.model),
        ProviderKind::Vllm => compat::vllm_defaults(&settings.model),
        ProviderKind::Custom => {
            let Some(base_url) = settings.base_url.as_deref() else {
                return Err(LlmError::InvalidRequest(
                    "custom provider requires base_url".to_string(),
                ));
            };
            let mut config = compat::vllm_defaults(&settings.model);
            config.base_url = base_url.to_string();
            config
        }
    };
    config.api_key = key.to_string();

    if let Some(base_url) = settings.base_url.as_deref() {
        config = OpenAiCompatConfig {
            provider_name: settings.name.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            ..config
        };
    }

    tracing::debug!(
        provider = %config.provider_name,
        kind = %settings.kind,
        base_url = %config.base_url,
        model = %config.model,
        "creating chat provider"
    );

    Ok(BoxLlmProvider::new(OpenAiCompatibleProvider::new(config)))
}

/// Send a minimal "Hello" completion to verify the endpoint and key.
pub async fn test_provider_connection(provider: &BoxLlmProvider) -> Result<(), LlmError> {
    let request = CompletionRequest {
        model: String::new(),
        messages: vec![Message::user("Hello")],
        system: None,
        max_tokens: 10,
        temperature: Some(0.0),
        stream: false,
        stop_sequences: None,
    };
    provider.complete(&request).await?;
    Ok(())
}

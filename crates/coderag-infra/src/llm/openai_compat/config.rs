//! Configuration and per-backend defaults for OpenAI-compatible providers.
//!
//! Each backend that speaks the chat completions protocol gets a factory
//! function returning an [`OpenAiCompatConfig`] with the right base URL and
//! capabilities.

use coderag_types::llm::ProviderCapabilities;

/// Placeholder key for local servers that ignore authentication.
pub const LOCAL_API_KEY: &str = "not-needed";

/// Configuration for an OpenAI-compatible provider.
pub struct OpenAiCompatConfig {
    /// Provider name used in logs and spans (e.g., "openai", "vllm").
    pub provider_name: String,
    /// Base URL including the version segment (e.g., `http://localhost:8000/v1`).
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub capabilities: ProviderCapabilities,
}

/// OpenAI: `https://api.openai.com/v1`, 128K context, 16K output.
pub fn openai_defaults(api_key: &str, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: "https://api.openai.com/v1".into(),
        api_key: api_key.into(),
        model: model.into(),
        capabilities: ProviderCapabilities {
            streaming: true,
            max_context_tokens: 128_000,
            max_output_tokens: 16_384,
        },
    }
}

/// Ollama's OpenAI-compatible endpoint at `http://localhost:11434/v1`.
pub fn ollama_defaults(model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "ollama".into(),
        base_url: "http://localhost:11434/v1".into(),
        api_key: LOCAL_API_KEY.into(),
        model: model.into(),
        capabilities: ProviderCapabilities {
            streaming: true,
            max_context_tokens: 8_192,
            max_output_tokens: 4_096,
        },
    }
}

/// vLLM's OpenAI-compatible server at `http://localhost:8000/v1`.
///
/// Sized for long code-review outputs (32K new tokens).
pub fn vllm_defaults(model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "vllm".into(),
        base_url: "http://localhost:8000/v1".into(),
        api_key: LOCAL_API_KEY.into(),
        model: model.into(),
        capabilities: ProviderCapabilities {
            streaming: true,
            max_context_tokens: 131_072,
            max_output_tokens: 32_768,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_defaults_use_placeholder_key() {
        let ollama = ollama_defaults("llama3.1:8b");
        assert_eq!(ollama.base_url, "http://localhost:11434/v1");
        assert_eq!(ollama.api_key, LOCAL_API_KEY);

        let vllm = vllm_defaults("Qwen/Qwen3-Coder-30B-A3B-Instruct");
        assert_eq!(vllm.base_url, "http://localhost:8000/v1");
        assert_eq!(vllm.capabilities.max_output_tokens, 32_768);
    }

    #[test]
    fn test_openai_defaults() {
        let config = openai_defaults("sk-test", "gpt-4o-mini");
        assert_eq!(config.provider_name, "openai");
        assert_eq!(config.api_key, "sk-test");
        assert!(config.capabilities.streaming);
    }
}

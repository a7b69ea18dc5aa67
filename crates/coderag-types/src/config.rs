//! Runtime configuration types for coderag.
//!
//! `AppConfig` represents the `coderag.toml` file that selects the chat
//! provider, the embedding backend, retrieval defaults, and run settings.
//! Every field has a default so an absent or partial file is valid.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::llm::ProviderKind;
use crate::retrieval::{DEFAULT_RULE_THRESHOLD, DEFAULT_TOP_K, SearchOptions};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub embedding: EmbeddingSettings,
    #[serde(default)]
    pub retrieval: RetrievalSettings,
    #[serde(default)]
    pub runs: RunSettings,
}

/// How a system prompt and user prompt are laid out for a given model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptStyle {
    /// System message followed by a user message.
    #[default]
    Chat,
    /// System prompt folded into an `@@ Instruction` / `@@ Response` template.
    Instruction,
    /// System prompt dropped; only the user message is sent.
    UserOnly,
}

/// Chat provider section (`[provider]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub kind: ProviderKind,
    /// Display name used in logs and spans.
    #[serde(default = "default_provider_name")]
    pub name: String,
    /// Override the kind's default base URL.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_chat_model")]
    pub model: String,
    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub prompt_style: PromptStyle,
}

fn default_provider_name() -> String {
    "openai".to_string()
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            name: default_provider_name(),
            base_url: None,
            model: default_chat_model(),
            api_key_env: default_api_key_env(),
            max_tokens: default_max_tokens(),
            temperature: None,
            prompt_style: PromptStyle::default(),
        }
    }
}

/// Which embedding implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingBackend {
    /// Local ONNX inference.
    #[default]
    Fastembed,
    /// Remote `/v1/embeddings` endpoint.
    Openai,
}

/// Embedding section (`[embedding]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    #[serde(default)]
    pub backend: EmbeddingBackend,
    /// Model name; backend default when unset.
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Where fastembed caches downloaded model files.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::default(),
            model: None,
            base_url: None,
            api_key_env: default_api_key_env(),
            cache_dir: None,
        }
    }
}

/// Retrieval section (`[retrieval]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalSettings {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default)]
    pub threshold: Option<f32>,
    /// Replace the built-in rules with a TOML rules file.
    #[serde(default)]
    pub rules_file: Option<PathBuf>,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            threshold: None,
            rules_file: None,
        }
    }
}

impl RetrievalSettings {
    /// Options for prefixing prompts with rules. `threshold` wins over the
    /// configured one; with neither set, the rule floor of 0.7 applies.
    pub fn rule_options(&self, threshold: Option<f32>) -> SearchOptions {
        SearchOptions::top_k(self.top_k)
            .with_threshold(threshold.or(self.threshold).unwrap_or(DEFAULT_RULE_THRESHOLD))
    }
}

/// Repeated-run section (`[runs]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSettings {
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    /// Pause between iterations in milliseconds.
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_iterations() -> u32 {
    10
}

fn default_pause_ms() -> u64 {
    2000
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            pause_ms: default_pause_ms(),
            output_dir: default_output_dir(),
        }
    }
}

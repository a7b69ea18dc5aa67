//! Application state: resolved configuration plus factories for the
//! provider, retriever and output sink each command needs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use secrecy::ExposeSecret;

use coderag_core::embedding::box_embedder::BoxEmbedder;
use coderag_core::llm::box_provider::BoxLlmProvider;
use coderag_core::llm::registry::ProviderRegistry;
use coderag_core::retrieval::RuleRetriever;
use coderag_core::retrieval::rules::default_rules;
use coderag_core::session::SessionRunner;
use coderag_infra::config::{apply_env_overrides, load_config};
use coderag_infra::embedding::create_embedder;
use coderag_infra::llm::create_provider;
use coderag_infra::output::MarkdownSink;
use coderag_infra::rules::load_rules_file;
use coderag_infra::secret::resolve_api_key;
use coderag_types::config::{AppConfig, ProviderSettings};
use coderag_types::llm::ProviderKind;

/// Shared state for CLI commands.
pub struct AppState {
    pub config: AppConfig,
    pub config_path: PathBuf,
}

impl AppState {
    /// Load `config_path` and apply `CODERAG_*` environment overrides.
    pub async fn load(config_path: &Path) -> Result<Self> {
        let mut config = load_config(config_path).await?;
        apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
        tracing::debug!(
            provider = %config.provider.kind,
            model = %config.provider.model,
            embedding = ?config.embedding.backend,
            "configuration resolved"
        );
        Ok(Self {
            config,
            config_path: config_path.to_path_buf(),
        })
    }

    /// Chat provider from `[provider]`.
    pub fn provider(&self) -> Result<BoxLlmProvider> {
        build_provider(&self.config.provider)
    }

    /// Local Ollama and vLLM defaults plus the configured provider.
    ///
    /// Local entries need no key, so they are always registered. The
    /// configured provider is skipped with a warning when it cannot be
    /// built (for example a missing API key); [`provider`](Self::provider)
    /// reports the cause.
    pub fn registry(&self) -> Result<ProviderRegistry> {
        let mut registry = ProviderRegistry::new();
        for kind in [ProviderKind::Ollama, ProviderKind::Vllm] {
            registry.register(kind.to_string(), build_provider(&self.local_settings(kind))?);
        }
        match self.provider() {
            Ok(provider) => registry.register(self.config.provider.name.clone(), provider),
            Err(err) => tracing::warn!(
                provider = %self.config.provider.name,
                error = %format!("{err:#}"),
                "configured provider unavailable"
            ),
        }
        Ok(registry)
    }

    /// Settings for a local server entry. The configured model is only
    /// reused when `[provider] kind` matches, otherwise the server's
    /// default model is requested.
    fn local_settings(&self, kind: ProviderKind) -> ProviderSettings {
        let configured = &self.config.provider;
        let model = if configured.kind == kind {
            configured.model.clone()
        } else {
            String::new()
        };
        ProviderSettings {
            kind,
            name: kind.to_string(),
            base_url: None,
            model,
            ..configured.clone()
        }
    }

    /// Session runner over the configured provider.
    pub fn runner(&self) -> Result<SessionRunner<BoxLlmProvider>> {
        Ok(SessionRunner::from_settings(
            self.provider()?,
            &self.config.provider,
        ))
    }

    /// Embed the rule corpus (built-in or `[retrieval] rules_file`).
    pub async fn retriever(&self) -> Result<RuleRetriever<BoxEmbedder>> {
        let docs = match self.config.retrieval.rules_file.as_deref() {
            Some(path) => load_rules_file(path).await?,
            None => default_rules(),
        };

        let settings = &self.config.embedding;
        let key = resolve_api_key(&settings.api_key_env);
        let embedder = create_embedder(settings, key)
            .await
            .context("failed to initialise the embedding backend")?;

        let retriever = RuleRetriever::build(embedder, docs)
            .await
            .context("failed to build the rule index")?;
        Ok(retriever)
    }

    /// Markdown sink rooted at `[runs] output_dir`.
    pub fn sink(&self) -> MarkdownSink {
        MarkdownSink::new(&self.config.runs.output_dir)
    }
}

fn build_provider(settings: &ProviderSettings) -> Result<BoxLlmProvider> {
    let key = resolve_api_key(&settings.api_key_env);
    let provider = create_provider(settings, key.as_ref().map(|k| k.expose_secret()))
        .with_context(|| {
            if settings.kind.requires_api_key() {
                format!(
                    "cannot create {} provider (set ${})",
                    settings.kind, settings.api_key_env
                )
            } else {
                format!("cannot create {} provider", settings.kind)
            }
        })?;
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_missing_config_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let state = AppState::load(&tmp.path().join("coderag.toml")).await.unwrap();
        assert_eq!(state.config.runs.iterations, 10);
        assert!(state.config_path.ends_with("coderag.toml"));
    }

    #[tokio::test]
    async fn test_registry_includes_local_providers() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("coderag.toml");
        tokio::fs::write(
            &path,
            "[provider]\nkind = \"vllm\"\nname = \"gpu-box\"\nbase_url = \"http://gpu-box:8000/v1\"\n",
        )
        .await
        .unwrap();

        let state = AppState::load(&path).await.unwrap();
        let registry = state.registry().unwrap();
        assert_eq!(registry.list_names(), vec!["gpu-box", "ollama", "vllm"]);
    }

    #[tokio::test]
    async fn test_registry_skips_configured_provider_without_key() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("coderag.toml");
        tokio::fs::write(
            &path,
            "[provider]\nkind = \"openai\"\napi_key_env = \"CODERAG_STATE_TEST_MISSING_KEY\"\n",
        )
        .await
        .unwrap();
        // SAFETY: test-only, the variable name is unique to this test.
        unsafe { std::env::remove_var("CODERAG_STATE_TEST_MISSING_KEY") };

        let state = AppState::load(&path).await.unwrap();
        assert!(state.provider().is_err());

        let registry = state.registry().unwrap();
        assert_eq!(registry.list_names(), vec!["ollama", "vllm"]);
        assert!(registry.get("openai").is_none());
    }

    #[test]
    fn test_local_settings_reuse_model_only_for_matching_kind() {
        let mut config = AppConfig::default();
        config.provider.kind = ProviderKind::Vllm;
        config.provider.model = "Qwen/Qwen3-Coder-30B-A3B-Instruct".to_string();
        let state = AppState {
            config,
            config_path: PathBuf::from("coderag.toml"),
        };

        let vllm = state.local_settings(ProviderKind::Vllm);
        assert_eq!(vllm.model, "Qwen/Qwen3-Coder-30B-A3B-Instruct");
        assert_eq!(vllm.name, "vllm");

        let ollama = state.local_settings(ProviderKind::Ollama);
        assert!(ollama.model.is_empty());
        assert!(ollama.base_url.is_none());
    }
}

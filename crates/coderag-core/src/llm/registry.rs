//! Provider registry for runtime provider lookup.

use std::collections::HashMap;

use super::box_provider::BoxLlmProvider;

/// Registry of configured LLM providers, indexed by name.
///
/// The CLI registers the provider from `[provider]` under its configured
/// name, next to the local servers, so `provider test <name>` can pick one.
pub struct ProviderRegistry {
    providers: HashMap<String, BoxLlmProvider>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// Register a provider under the given name, replacing any previous one.
    pub fn register(&mut self, name: impl Into<String>, provider: BoxLlmProvider) {
        self.providers.insert(name.into(), provider);
    }

    pub fn get(&self, name: &str) -> Option<&BoxLlmProvider> {
        self.providers.get(name)
    }

    /// Remove and return a provider, handing ownership to the caller.
    pub fn take(&mut self, name: &str) -> Option<BoxLlmProvider> {
        self.providers.remove(name)
    }

    /// Registered provider names, sorted.
    pub fn list_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::box_provider::test_support::ScriptedProvider;

    #[test]
    fn test_register_get_take() {
        let mut registry = ProviderRegistry::new();
        registry.register("vllm", BoxLlmProvider::new(ScriptedProvider::new(&[])));
        registry.register("ollama", BoxLlmProvider::new(ScriptedProvider::new(&[])));

        assert_eq!(registry.list_names(), vec!["ollama", "vllm"]);
        assert!(registry.get("vllm").is_some());
        assert!(registry.get("openai").is_none());

        let taken = registry.take("vllm");
        assert!(taken.is_some());
        assert_eq!(registry.list_names(), vec!["ollama"]);
    }
}

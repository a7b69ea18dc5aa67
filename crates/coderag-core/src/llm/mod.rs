//! LLM provider abstractions for coderag.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: Object-safe wrapper for dynamic dispatch
//! - `ProviderRegistry`: name-indexed lookup of configured providers

pub mod box_provider;
pub mod provider;
pub mod registry;

//! Infrastructure adapters for coderag.
//!
//! Concrete implementations of the ports defined in `coderag-core`:
//! OpenAI-compatible chat providers, embedding backends, the Markdown
//! response sink, plus config loading, fixture discovery and dataset
//! validation.

pub mod config;
pub mod embedding;
pub mod fixtures;
pub mod llm;
pub mod output;
pub mod rules;
pub mod secret;
pub mod training;

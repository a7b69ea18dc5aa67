//! Prompt construction: templates, placeholder filling, and per-model
//! message layout.

pub mod builder;
pub mod templates;

pub use builder::{fill, format_rag_docs, rag_qa_prompt, render_request, with_rules};

//! Retrieval, prompting and review orchestration for coderag.
//!
//! This crate defines the "ports" (provider, embedder and sink traits) that
//! the infrastructure layer implements, plus the pure logic built on them:
//! the flat inner-product index, the rule retriever, prompt templates, the
//! repeated-session runner and the code review pipeline. It depends only on
//! `coderag-types` -- never on `coderag-infra` or any network/IO crate.

pub mod embedding;
pub mod llm;
pub mod output;
pub mod prompt;
pub mod retrieval;
pub mod review;
pub mod session;

//! Shared domain types for coderag.
//!
//! LLM request/response shapes, retrieval results, review stages, runtime
//! configuration, fine-tuning dataset records and their error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod error;
pub mod llm;
pub mod retrieval;
pub mod review;
pub mod training;

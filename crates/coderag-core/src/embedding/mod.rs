//! Text embedding abstractions.
//!
//! `Embedder` is implemented in coderag-infra (fastembed, OpenAI-compatible
//! HTTP); `BoxEmbedder` allows picking the backend at runtime.

pub mod box_embedder;
pub mod embedder;

//! Embedder trait for text-to-vector conversion.
//!
//! Implementations (local fastembed, remote OpenAI-compatible endpoints)
//! live in coderag-infra.

use coderag_types::error::EmbedError;

/// Trait for converting text into embedding vectors.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait Embedder: Send + Sync {
    /// Embed one or more texts into vectors.
    ///
    /// Returns exactly one vector per input text, in input order.
    fn embed(
        &self,
        texts: &[String],
    ) -> impl std::future::Future<Output = Result<Vec<Vec<f32>>, EmbedError>> + Send;

    /// The model name used for embeddings (e.g., "BAAI/bge-small-en-v1.5").
    fn model_name(&self) -> &str;

    /// The dimensionality of the output vectors.
    fn dimension(&self) -> usize;
}

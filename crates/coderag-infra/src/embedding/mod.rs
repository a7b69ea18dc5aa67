//! Embedding backends.
//!
//! [`FastEmbedder`] runs a local ONNX model; [`OpenAiEmbedder`] calls a
//! remote `/v1/embeddings` endpoint. [`create_embedder`] picks one from the
//! `[embedding]` settings.

pub mod fastembed;
pub mod openai;

use coderag_core::embedding::box_embedder::BoxEmbedder;
use coderag_types::config::{EmbeddingBackend, EmbeddingSettings};
use coderag_types::error::EmbedError;
use secrecy::SecretString;

pub use self::fastembed::FastEmbedder;
pub use self::openai::OpenAiEmbedder;

/// Build the configured embedder.
///
/// The fastembed backend may download model files on first use.
pub async fn create_embedder(
    settings: &EmbeddingSettings,
    api_key: Option<SecretString>,
) -> Result<BoxEmbedder, EmbedError> {
    match settings.backend {
        EmbeddingBackend::Fastembed => {
            let embedder = FastEmbedder::load(settings).await?;
            Ok(BoxEmbedder::new(embedder))
        }
        EmbeddingBackend::Openai => {
            let key = api_key.ok_or_else(|| {
                EmbedError::Backend(format!(
                    "no API key found in ${} for the openai embedding backend",
                    settings.api_key_env
                ))
            })?;
            Ok(BoxEmbedder::new(OpenAiEmbedder::from_settings(settings, key)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_openai_backend_requires_key() {
        let settings = EmbeddingSettings {
            backend: EmbeddingBackend::Openai,
            ..EmbeddingSettings::default()
        };
        let err = create_embedder(&settings, None).await.err().unwrap();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[tokio::test]
    async fn test_openai_backend_with_key() {
        let settings = EmbeddingSettings {
            backend: EmbeddingBackend::Openai,
            ..EmbeddingSettings::default()
        };
        let embedder = create_embedder(&settings, Some(SecretString::from("sk-test".to_string())))
            .await
            .unwrap();
        assert_eq!(embedder.model_name(), "text-embedding-3-small");
        assert_eq!(embedder.dimension(), 1536);
    }
}

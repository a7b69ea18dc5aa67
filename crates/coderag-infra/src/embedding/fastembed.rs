//! FastEmbed-based local embedding generator.
//!
//! Implements the `Embedder` trait from `coderag-core` with fastembed's ONNX
//! runtime inference. Defaults to BGESmallENV15 (384 dimensions).

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use ::fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use coderag_core::embedding::embedder::Embedder;
use coderag_types::config::EmbeddingSettings;
use coderag_types::error::EmbedError;

/// Supported local models: (config name, fastembed model, dimension).
const MODELS: &[(&str, EmbeddingModel, usize)] = &[
    ("BAAI/bge-small-en-v1.5", EmbeddingModel::BGESmallENV15, 384),
    ("BAAI/bge-base-en-v1.5", EmbeddingModel::BGEBaseENV15, 768),
    (
        "sentence-transformers/all-MiniLM-L6-v2",
        EmbeddingModel::AllMiniLML6V2,
        384,
    ),
    (
        "intfloat/multilingual-e5-small",
        EmbeddingModel::MultilingualE5Small,
        384,
    ),
    ("BAAI/bge-m3", EmbeddingModel::BGEM3, 1024),
];

const DEFAULT_MODEL: &str = "BAAI/bge-small-en-v1.5";

/// Look up a model by name (case-insensitive).
fn resolve_model(name: &str) -> Result<(&'static str, EmbeddingModel, usize), EmbedError> {
    MODELS
        .iter()
        .find(|(n, _, _)| n.eq_ignore_ascii_case(name))
        .map(|(n, m, d)| (*n, m.clone(), *d))
        .ok_or_else(|| {
            let known: Vec<&str> = MODELS.iter().map(|(n, _, _)| *n).collect();
            EmbedError::Backend(format!(
                "unknown fastembed model '{name}' (known: {})",
                known.join(", ")
            ))
        })
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("coderag")
        .join("fastembed")
}

/// Local embedder. Inference is CPU-bound and runs on the blocking pool.
pub struct FastEmbedder {
    model: Arc<Mutex<TextEmbedding>>,
    model_name: String,
    dimension: usize,
}

impl FastEmbedder {
    /// Load (and on first use download) the configured model.
    pub async fn load(settings: &EmbeddingSettings) -> Result<Self, EmbedError> {
        let requested = settings.model.as_deref().unwrap_or(DEFAULT_MODEL);
        let (model_name, model, dimension) = resolve_model(requested)?;
        let cache_dir = settings.cache_dir.clone().unwrap_or_else(default_cache_dir);

        tracing::info!(
            model = model_name,
            cache_dir = %cache_dir.display(),
            "loading fastembed model"
        );

        let embedding = tokio::task::spawn_blocking(move || {
            TextEmbedding::try_new(
                InitOptions::new(model)
                    .with_cache_dir(cache_dir)
                    .with_show_download_progress(false),
            )
        })
        .await
        .map_err(|e| EmbedError::Backend(format!("model loader panicked: {e}")))?
        .map_err(|e| EmbedError::Backend(e.to_string()))?;

        Ok(Self {
            model: Arc::new(Mutex::new(embedding)),
            model_name: model_name.to_string(),
            dimension,
        })
    }
}

impl Embedder for FastEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = Arc::clone(&self.model);
        let batch = texts.to_vec();
        let sent = batch.len();

        let vectors = tokio::task::spawn_blocking(move || {
            let mut guard = model
                .lock()
                .map_err(|_| EmbedError::Backend("embedding model lock poisoned".to_string()))?;
            guard
                .embed(batch, None)
                .map_err(|e| EmbedError::Backend(e.to_string()))
        })
        .await
        .map_err(|e| EmbedError::Backend(format!("embedding task panicked: {e}")))??;

        if vectors.len() != sent {
            return Err(EmbedError::CountMismatch {
                sent,
                received: vectors.len(),
            });
        }
        Ok(vectors)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

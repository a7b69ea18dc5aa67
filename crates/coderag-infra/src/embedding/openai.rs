//! OpenAI-compatible embeddings over HTTP (`/v1/embeddings`).

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use coderag_core::embedding::embedder::Embedder;
use coderag_types::config::EmbeddingSettings;
use coderag_types::error::EmbedError;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "text-embedding-3-small";

/// Known output sizes; other models report 0 until the first response.
fn known_dimension(model: &str) -> usize {
    match model {
        "text-embedding-3-small" | "text-embedding-ada-002" => 1536,
        "text-embedding-3-large" => 3072,
        _ => 0,
    }
}

fn has_version_suffix(base_url: &str) -> bool {
    let Some(last_segment) = base_url.rsplit('/').next() else {
        return false;
    };
    let Some(rest) = last_segment.strip_prefix('v') else {
        return false;
    };
    !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit())
}

/// Resolve the embeddings URL from a host, a versioned base, or a full URL.
fn embeddings_endpoint(base_url: &str) -> String {
    let normalized = base_url.trim_end_matches('/');
    if normalized.ends_with("/embeddings") {
        return normalized.to_string();
    }
    if has_version_suffix(normalized) {
        return format!("{normalized}/embeddings");
    }
    format!("{normalized}/v1/embeddings")
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

/// Remote embedder. Does NOT derive Debug (holds the API key).
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_key: SecretString,
    endpoint: String,
    model: String,
    dimension: usize,
}

impl OpenAiEmbedder {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            endpoint: embeddings_endpoint(DEFAULT_BASE_URL),
            model: DEFAULT_MODEL.to_string(),
            dimension: known_dimension(DEFAULT_MODEL),
        }
    }

    pub fn from_settings(settings: &EmbeddingSettings, api_key: SecretString) -> Self {
        let mut embedder = Self::new(api_key);
        if let Some(model) = settings.model.as_deref() {
            embedder = embedder.with_model(model);
        }
        if let Some(url) = settings.base_url.as_deref() {
            embedder = embedder.with_base_url(url);
        }
        embedder
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self.dimension = known_dimension(model);
        self
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.endpoint = embeddings_endpoint(url);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Embedder for OpenAiEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| EmbedError::Backend(e.to_string()))?
            .json::<EmbeddingResponse>()
            .await
            .map_err(|e| EmbedError::Backend(format!("invalid embeddings response: {e}")))?;

        if response.data.is_empty() {
            return Err(EmbedError::EmptyResponse);
        }
        if response.data.len() != texts.len() {
            return Err(EmbedError::CountMismatch {
                sent: texts.len(),
                received: response.data.len(),
            });
        }

        let mut data = response.data;
        data.sort_by_key(|d| d.index);
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

use thiserror::Error;

use crate::llm::LlmError;

/// Errors from embedding backends.
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("embedding backend error: {0}")]
    Backend(String),

    #[error("embedding backend returned no vectors")]
    EmptyResponse,

    #[error("embedding count mismatch: sent {sent} texts, received {received} vectors")]
    CountMismatch { sent: usize, received: usize },
}

/// Errors from the flat vector index.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("vector dimension mismatch: index expects {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("index has zero dimension")]
    ZeroDimension,
}

/// Errors from building or querying a retriever.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error(transparent)]
    Embed(#[from] EmbedError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error("rule corpus is empty")]
    EmptyCorpus,
}

/// Errors from a generation run (repeated sessions, review pipelines).
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors from reading a fine-tuning dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(String),

    #[error("line {line}: invalid JSON: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: each record needs 'instruction' and 'output' (missing '{field}')")]
    MissingField { line: usize, field: String },
}

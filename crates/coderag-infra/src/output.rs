//! Markdown file sink for generated responses.

use std::io;
use std::path::{Path, PathBuf};

use coderag_core::output::ResponseSink;

/// Writes each response to `<root>/<relative_path>`, creating parent
/// directories as needed.
#[derive(Debug, Clone)]
pub struct MarkdownSink {
    root: PathBuf,
}

impl MarkdownSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResponseSink for MarkdownSink {
    async fn write(&self, relative_path: &str, content: &str) -> io::Result<()> {
        let path = self.root.join(relative_path);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, content).await?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "wrote response");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let sink = MarkdownSink::new(tmp.path());

        sink.write("cot_chatgpt_only_code_1/linter_result.md", "- unused import")
            .await
            .unwrap();

        let written = tokio::fs::read_to_string(
            tmp.path().join("cot_chatgpt_only_code_1/linter_result.md"),
        )
        .await
        .unwrap();
        assert_eq!(written, "- unused import");
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let tmp = TempDir::new().unwrap();
        let sink = MarkdownSink::new(tmp.path());
        sink.write("quickstart_response_0.md", "first").await.unwrap();
        sink.write("quickstart_response_0.md", "").await.unwrap();

        let written = tokio::fs::read_to_string(tmp.path().join("quickstart_response_0.md"))
            .await
            .unwrap();
        assert!(written.is_empty());
    }
}

//! JSONL fine-tuning dataset reader.
//!
//! One JSON object per line with string `instruction` and `output` fields.
//! Blank lines are skipped; line numbers in errors are 1-based.

use std::path::Path;

use serde_json::Value;

use coderag_types::error::DatasetError;
use coderag_types::training::TrainingExample;

/// Load and validate every record in a JSONL file.
pub async fn load_dataset(path: &Path) -> Result<Vec<TrainingExample>, DatasetError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DatasetError::Io(format!("{}: {e}", path.display())))?;
    let examples = parse_dataset(&content)?;
    tracing::info!(path = %path.display(), examples = examples.len(), "dataset loaded");
    Ok(examples)
}

fn parse_dataset(content: &str) -> Result<Vec<TrainingExample>, DatasetError> {
    let mut examples = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(raw).map_err(|e| DatasetError::Parse {
            line,
            message: e.to_string(),
        })?;

        let field = |name: &str| -> Result<String, DatasetError> {
            value
                .get(name)
                .and_then(Value::as_str)
                .map(String::from)
                .ok_or_else(|| DatasetError::MissingField {
                    line,
                    field: name.to_string(),
                })
        };

        examples.push(TrainingExample {
            instruction: field("instruction")?,
            output: field("output")?,
        });
    }

    Ok(examples)
}

/// Render one example as the supervised training text.
pub fn format_example(example: &TrainingExample) -> String {
    format!(
        "問題：{}\n答案：{}",
        example.instruction.trim(),
        example.output.trim()
    )
}

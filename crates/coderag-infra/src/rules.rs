//! Rule corpus loading from TOML.
//!
//! ```toml
//! [[rule]]
//! category = "security"
//! text = "Never build SQL from string concatenation."
//! ```

use std::path::Path;

use serde::Deserialize;

use coderag_types::error::ConfigError;
use coderag_types::retrieval::{RuleCategory, RuleDocument};

#[derive(Deserialize)]
struct RulesFile {
    #[serde(default)]
    rule: Vec<RuleEntry>,
}

#[derive(Deserialize)]
struct RuleEntry {
    category: RuleCategory,
    text: String,
}

/// Load a rules file. Ids follow file order; blank rules are skipped.
pub async fn load_rules_file(path: &Path) -> Result<Vec<RuleDocument>, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    parse_rules(&content).map_err(|message| ConfigError::Parse {
        path: path.display().to_string(),
        message,
    })
}

fn parse_rules(content: &str) -> Result<Vec<RuleDocument>, String> {
    let file: RulesFile = toml::from_str(content).map_err(|e| e.to_string())?;
    let docs: Vec<RuleDocument> = file
        .rule
        .into_iter()
        .filter(|r| !r.text.trim().is_empty())
        .enumerate()
        .map(|(id, r)| RuleDocument {
            id,
            category: r.category,
            text: r.text.trim().to_string(),
        })
        .collect();

    if docs.is_empty() {
        return Err("no rules defined".to_string());
    }
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_rules_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("rules.toml");
        tokio::fs::write(
            &path,
            r#"
[[rule]]
category = "security"
text = "Validate all external input."

[[rule]]
category = "testing"
text = "   "

[[rule]]
category = "performance"
text = "Avoid quadratic loops over large inputs."
"#,
        )
        .await
        .unwrap();

        let rules = load_rules_file(&path).await.unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].id, 0);
        assert_eq!(rules[1].id, 1);
        assert_eq!(rules[1].category, RuleCategory::Performance);
    }

    #[test]
    fn test_parse_rules_rejects_empty_and_unknown_category() {
        assert!(parse_rules("").is_err());
        let err = parse_rules("[[rule]]\ncategory = \"style\"\ntext = \"x\"\n").unwrap_err();
        assert!(err.contains("style") || err.contains("variant"));
    }

    #[tokio::test]
    async fn test_load_rules_file_missing() {
        let tmp = TempDir::new().unwrap();
        let err = load_rules_file(&tmp.path().join("nope.toml")).await.unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}

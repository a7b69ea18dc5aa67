//! Retrieval types: rule documents, scored hits, and search options.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default number of nearest neighbours returned by a search.
pub const DEFAULT_TOP_K: usize = 15;

/// Similarity floor used when callers only want confident matches.
pub const DEFAULT_RULE_THRESHOLD: f32 = 0.7;

/// Topic a review rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    MutableState,
    ControlFlow,
    InterfaceDesign,
    Performance,
    Readability,
    Testing,
    Security,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCategory::MutableState => write!(f, "mutable_state"),
            RuleCategory::ControlFlow => write!(f, "control_flow"),
            RuleCategory::InterfaceDesign => write!(f, "interface_design"),
            RuleCategory::Performance => write!(f, "performance"),
            RuleCategory::Readability => write!(f, "readability"),
            RuleCategory::Testing => write!(f, "testing"),
            RuleCategory::Security => write!(f, "security"),
        }
    }
}

impl FromStr for RuleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mutable_state" => Ok(RuleCategory::MutableState),
            "control_flow" => Ok(RuleCategory::ControlFlow),
            "interface_design" => Ok(RuleCategory::InterfaceDesign),
            "performance" => Ok(RuleCategory::Performance),
            "readability" => Ok(RuleCategory::Readability),
            "testing" => Ok(RuleCategory::Testing),
            "security" => Ok(RuleCategory::Security),
            other => Err(format!("invalid rule category: '{other}'")),
        }
    }
}

/// A single review rule in the retrieval corpus.
///
/// `id` is the position in the corpus and doubles as the row id in the
/// flat index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDocument {
    pub id: usize,
    pub category: RuleCategory,
    pub text: String,
}

/// A retrieved document with its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredDocument {
    pub id: usize,
    pub text: String,
    /// Inner product of the normalised query and document vectors.
    pub score: f32,
}

/// Parameters for a nearest-neighbour search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    pub k: usize,
    /// Drop hits scoring strictly below this value.
    pub threshold: Option<f32>,
}

impl SearchOptions {
    pub fn top_k(k: usize) -> Self {
        Self { k, threshold: None }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = Some(threshold);
        self
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::top_k(DEFAULT_TOP_K)
    }
}

/// Result of a retrieval: texts in rank order plus the scored records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Retrieval {
    pub docs: Vec<String>,
    pub scored: Vec<ScoredDocument>,
}

impl Retrieval {
    pub fn from_scored(scored: Vec<ScoredDocument>) -> Self {
        let docs = scored.iter().map(|s| s.text.clone()).collect();
        Self { docs, scored }
    }

    pub fn is_empty(&self) -> bool {
        self.scored.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_options_default() {
        let opts = SearchOptions::default();
        assert_eq!(opts.k, 15);
        assert!(opts.threshold.is_none());
        assert_eq!(opts.with_threshold(0.5).threshold, Some(0.5));
    }

    #[test]
    fn test_rule_category_roundtrip() {
        for cat in [
            RuleCategory::MutableState,
            RuleCategory::ControlFlow,
            RuleCategory::InterfaceDesign,
            RuleCategory::Performance,
            RuleCategory::Readability,
            RuleCategory::Testing,
            RuleCategory::Security,
        ] {
            let parsed: RuleCategory = cat.to_string().parse().unwrap();
            assert_eq!(parsed, cat);
        }
    }

    #[test]
    fn test_retrieval_from_scored_keeps_order() {
        let retrieval = Retrieval::from_scored(vec![
            ScoredDocument {
                id: 4,
                text: "b".to_string(),
                score: 0.9,
            },
            ScoredDocument {
                id: 1,
                text: "a".to_string(),
                score: 0.2,
            },
        ]);
        assert_eq!(retrieval.docs, vec!["b".to_string(), "a".to_string()]);
        assert!(!retrieval.is_empty());
    }
}

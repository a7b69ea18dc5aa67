//! Code review run types: pipeline stages and fixture sets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// File written by the single-prompt review mode.
pub const SINGLE_REVIEW_ARTIFACT: &str = "single_code_review_prompt_result.md";

/// File written by the review-skill mode.
pub const SKILL_REVIEW_ARTIFACT: &str = "code_review_skill_result.md";

/// File written by the judge prompt builder.
pub const JUDGE_ARTIFACT: &str = "our_llm_judge.md";

/// One step of the chain-of-thought review pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStage {
    FirstSummary,
    FirstCodeReview,
    Linter,
    CodeSmell,
    TotalSummary,
    /// Produced outside the pipeline; the judge reads it if present.
    StepByStepAnalysis,
}

impl ReviewStage {
    /// Stages the pipeline runs, in order.
    pub const PIPELINE: [ReviewStage; 5] = [
        ReviewStage::FirstSummary,
        ReviewStage::FirstCodeReview,
        ReviewStage::Linter,
        ReviewStage::CodeSmell,
        ReviewStage::TotalSummary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStage::FirstSummary => "first_summary",
            ReviewStage::FirstCodeReview => "first_code_review",
            ReviewStage::Linter => "linter",
            ReviewStage::CodeSmell => "code_smell",
            ReviewStage::TotalSummary => "total_summary",
            ReviewStage::StepByStepAnalysis => "step_by_step_analysis",
        }
    }

    /// Artifact file name, e.g. `linter_result.md`.
    pub fn artifact_name(&self) -> String {
        format!("{}_result.md", self.as_str())
    }
}

impl fmt::Display for ReviewStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which assistant generated a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureOrigin {
    ChatGpt,
    Copilot,
}

impl FixtureOrigin {
    pub const ALL: [FixtureOrigin; 2] = [FixtureOrigin::ChatGpt, FixtureOrigin::Copilot];

    /// Directory name on disk.
    pub fn dir_name(&self) -> &'static str {
        match self {
            FixtureOrigin::ChatGpt => "ChatGPT",
            FixtureOrigin::Copilot => "Copilot",
        }
    }
}

impl fmt::Display for FixtureOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixtureOrigin::ChatGpt => write!(f, "chatgpt"),
            FixtureOrigin::Copilot => write!(f, "copilot"),
        }
    }
}

impl FromStr for FixtureOrigin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chatgpt" => Ok(FixtureOrigin::ChatGpt),
            "copilot" => Ok(FixtureOrigin::Copilot),
            other => Err(format!("invalid fixture origin: '{other}'")),
        }
    }
}

/// Shape of the fixture content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureKind {
    BadData,
    CodeDiff,
    OnlyCode,
}

impl FixtureKind {
    pub const ALL: [FixtureKind; 3] = [
        FixtureKind::BadData,
        FixtureKind::CodeDiff,
        FixtureKind::OnlyCode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FixtureKind::BadData => "bad_data",
            FixtureKind::CodeDiff => "code_diff",
            FixtureKind::OnlyCode => "only_code",
        }
    }
}

impl fmt::Display for FixtureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FixtureKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "bad_data" => Ok(FixtureKind::BadData),
            "code_diff" => Ok(FixtureKind::CodeDiff),
            "only_code" => Ok(FixtureKind::OnlyCode),
            other => Err(format!("invalid fixture kind: '{other}'")),
        }
    }
}

/// A directory of fixture files: `<root>/<kind>/<language>/<origin>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureSet {
    pub origin: FixtureOrigin,
    pub kind: FixtureKind,
    pub language: String,
}

impl FixtureSet {
    pub fn new(origin: FixtureOrigin, kind: FixtureKind, language: impl Into<String>) -> Self {
        Self {
            origin,
            kind,
            language: language.into(),
        }
    }

    /// Prefix for per-file output folders, e.g. `cot_chatgpt_code_diff`.
    pub fn folder_prefix(&self) -> String {
        format!("cot_{}_{}", self.origin, self.kind)
    }
}

/// How each fixture file is reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewMode {
    /// One comprehensive prompt per file.
    #[default]
    Single,
    /// Summary, review, lint, smell, then a combined summary.
    ChainOfThought,
    /// One three-section (summary, linting, smells) skill prompt per file.
    Skill,
}

impl FromStr for ReviewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single" => Ok(ReviewMode::Single),
            "cot" | "chain_of_thought" => Ok(ReviewMode::ChainOfThought),
            "skill" => Ok(ReviewMode::Skill),
            other => Err(format!("invalid review mode: '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_artifact_names() {
        assert_eq!(ReviewStage::Linter.artifact_name(), "linter_result.md");
        assert_eq!(
            ReviewStage::StepByStepAnalysis.artifact_name(),
            "step_by_step_analysis_result.md"
        );
        assert_eq!(ReviewStage::PIPELINE.len(), 5);
        assert_eq!(ReviewStage::PIPELINE[4], ReviewStage::TotalSummary);
    }

    #[test]
    fn test_folder_prefix() {
        let set = FixtureSet::new(FixtureOrigin::Copilot, FixtureKind::BadData, "Python");
        assert_eq!(set.folder_prefix(), "cot_copilot_bad_data");
    }

    #[test]
    fn test_parse_kind_accepts_dashes() {
        assert_eq!("code-diff".parse::<FixtureKind>().unwrap(), FixtureKind::CodeDiff);
        assert_eq!("cot".parse::<ReviewMode>().unwrap(), ReviewMode::ChainOfThought);
        assert_eq!("Skill".parse::<ReviewMode>().unwrap(), ReviewMode::Skill);
        assert!("gemini".parse::<FixtureOrigin>().is_err());
    }
}

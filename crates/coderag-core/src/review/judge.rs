//! Judge prompt assembly from chain-of-thought artifacts.

use std::collections::HashMap;

use coderag_types::review::ReviewStage;

use crate::prompt::fill;
use crate::prompt::templates::JUDGE_TEMPLATE;

/// Stage outputs read back from one review folder.
#[derive(Debug, Clone, Default)]
pub struct JudgeArtifacts {
    texts: HashMap<ReviewStage, String>,
}

impl JudgeArtifacts {
    /// Stages whose artifacts the judge prompt reads.
    pub const STAGES: [ReviewStage; 6] = [
        ReviewStage::CodeSmell,
        ReviewStage::FirstCodeReview,
        ReviewStage::FirstSummary,
        ReviewStage::Linter,
        ReviewStage::StepByStepAnalysis,
        ReviewStage::TotalSummary,
    ];

    pub fn insert(&mut self, stage: ReviewStage, text: impl Into<String>) {
        self.texts.insert(stage, text.into());
    }

    pub fn get(&self, stage: ReviewStage) -> &str {
        self.texts.get(&stage).map(String::as_str).unwrap_or_default()
    }

    /// Stages with no artifact, in [`Self::STAGES`] order.
    pub fn missing(&self) -> Vec<ReviewStage> {
        Self::STAGES
            .into_iter()
            .filter(|s| !self.texts.contains_key(s))
            .collect()
    }
}

/// Render the judge prompt. Missing artifacts become empty sections.
pub fn build_judge_prompt(artifacts: &JudgeArtifacts) -> String {
    let review_comment = format!(
        "First code review: \n\n{}\n\nFirst summary: \n\n{}\n\nTotal summary: \n\n {}\n\nStep by step analysis: \n\n{}",
        artifacts.get(ReviewStage::FirstCodeReview),
        artifacts.get(ReviewStage::FirstSummary),
        artifacts.get(ReviewStage::TotalSummary),
        artifacts.get(ReviewStage::StepByStepAnalysis),
    );

    fill(
        JUDGE_TEMPLATE,
        &[
            ("code_diff", "\n\n"),
            (
                "code_smell_detector_messages",
                artifacts.get(ReviewStage::CodeSmell),
            ),
            ("linter_messages", artifacts.get(ReviewStage::Linter)),
            ("review_comment", &review_comment),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_judge_prompt_sections() {
        let mut artifacts = JudgeArtifacts::default();
        artifacts.insert(ReviewStage::FirstCodeReview, "FCR");
        artifacts.insert(ReviewStage::FirstSummary, "FS");
        artifacts.insert(ReviewStage::TotalSummary, "TS");
        artifacts.insert(ReviewStage::StepByStepAnalysis, "SBS");
        artifacts.insert(ReviewStage::CodeSmell, "SMELL");
        artifacts.insert(ReviewStage::Linter, "LINT");
        assert!(artifacts.missing().is_empty());

        let prompt = build_judge_prompt(&artifacts);
        assert!(prompt.contains(
            "First code review: \n\nFCR\n\nFirst summary: \n\nFS\n\nTotal summary: \n\n TS\n\nStep by step analysis: \n\nSBS"
        ));
        assert!(prompt.contains("Code smell detector messages:\nSMELL"));
        assert!(prompt.contains("Linter messages:\nLINT"));
        assert!(!prompt.contains("{review_comment}"));
    }

    #[test]
    fn test_missing_artifacts_render_empty() {
        let mut artifacts = JudgeArtifacts::default();
        artifacts.insert(ReviewStage::Linter, "LINT");

        let missing = artifacts.missing();
        assert_eq!(missing.len(), 5);
        assert!(missing.contains(&ReviewStage::StepByStepAnalysis));

        let prompt = build_judge_prompt(&artifacts);
        assert!(prompt.contains("Step by step analysis: \n\n\n"));
    }
}

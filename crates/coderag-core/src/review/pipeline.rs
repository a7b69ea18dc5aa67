//! Review pipelines.

use coderag_types::error::RunError;
use coderag_types::retrieval::SearchOptions;
use coderag_types::review::{ReviewStage, SINGLE_REVIEW_ARTIFACT, SKILL_REVIEW_ARTIFACT};
use serde::Serialize;
use tracing::{debug, info};

use crate::embedding::box_embedder::BoxEmbedder;
use crate::llm::provider::LlmProvider;
use crate::output::ResponseSink;
use crate::prompt::templates::{
    CODE_REVIEW_SKILL_TEMPLATE, CODE_SMELL_TEMPLATE, FIRST_CODE_REVIEW_TEMPLATE, FIRST_SUMMARY_TEMPLATE, LINTER_TEMPLATE,
    SINGLE_CODE_REVIEW_TEMPLATE, TOTAL_SUMMARY_TEMPLATE,
};
use crate::prompt::{fill, with_rules};
use crate::retrieval::RuleRetriever;
use crate::session::runner::{SessionRunner, write_answer};

/// Output folder for one fixture file: `<prefix>_<stem>`.
pub fn review_dir(prefix: &str, file_stem: &str) -> String {
    format!("{prefix}_{file_stem}")
}

/// Prompt for a code-only stage.
///
/// `TotalSummary` and `StepByStepAnalysis` need earlier outputs and return
/// `None` here.
pub fn stage_prompt(stage: ReviewStage, code: &str) -> Option<String> {
    let template = match stage {
        ReviewStage::FirstSummary => FIRST_SUMMARY_TEMPLATE,
        ReviewStage::FirstCodeReview => FIRST_CODE_REVIEW_TEMPLATE,
        ReviewStage::Linter => LINTER_TEMPLATE,
        ReviewStage::CodeSmell => CODE_SMELL_TEMPLATE,
        ReviewStage::TotalSummary | ReviewStage::StepByStepAnalysis => return None,
    };
    Some(fill(template, &[("code_diff", code)]))
}

/// One stage's answer and where it was written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageResult {
    pub stage: ReviewStage,
    pub path: String,
    pub text: String,
}

/// Everything a chain-of-thought review produced for one file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReviewOutcome {
    pub stages: Vec<StageResult>,
}

impl ReviewOutcome {
    pub fn text(&self, stage: ReviewStage) -> Option<&str> {
        self.stages
            .iter()
            .find(|s| s.stage == stage)
            .map(|s| s.text.as_str())
    }
}

/// Runs review prompts through a session, optionally grounding each
/// prompt in retrieved rules.
pub struct ReviewPipeline<'a, P: LlmProvider> {
    runner: &'a SessionRunner<P>,
    retriever: Option<&'a RuleRetriever<BoxEmbedder>>,
    options: SearchOptions,
}

impl<'a, P: LlmProvider> ReviewPipeline<'a, P> {
    pub fn new(runner: &'a SessionRunner<P>) -> Self {
        Self {
            runner,
            retriever: None,
            options: SearchOptions::default(),
        }
    }

    /// Prefix every prompt with the rules retrieved for it. Each prompt is
    /// its own query.
    pub fn with_rag(
        mut self,
        retriever: &'a RuleRetriever<BoxEmbedder>,
        options: SearchOptions,
    ) -> Self {
        self.retriever = Some(retriever);
        self.options = options;
        self
    }

    async fn prepare(&self, prompt: String) -> Result<String, RunError> {
        let Some(retriever) = self.retriever else {
            return Ok(prompt);
        };
        let rules = retriever.rule_docs(&prompt, self.options).await?;
        debug!(rules = rules.len(), "prepending retrieved rules");
        Ok(with_rules(&prompt, &rules))
    }

    async fn ask_and_write<S: ResponseSink>(
        &self,
        prompt: String,
        path: String,
        sink: &S,
    ) -> Result<String, RunError> {
        let prompt = self.prepare(prompt).await?;
        let answer = self.runner.ask("", &prompt).await?;
        write_answer(sink, &path, &answer).await?;
        Ok(answer)
    }

    /// One comprehensive review prompt; writes the single-review artifact.
    pub async fn single<S: ResponseSink>(
        &self,
        code: &str,
        target_dir: &str,
        sink: &S,
    ) -> Result<String, RunError> {
        let prompt = fill(SINGLE_CODE_REVIEW_TEMPLATE, &[("code_diff", code)]);
        let path = format!("{target_dir}/{SINGLE_REVIEW_ARTIFACT}");
        let answer = self.ask_and_write(prompt, path, sink).await?;
        info!(dir = target_dir, "single review written");
        Ok(answer)
    }

    /// Review-skill prompt (summary, linting, smells per diff); writes the
    /// skill artifact.
    pub async fn skill<S: ResponseSink>(
        &self,
        code: &str,
        target_dir: &str,
        sink: &S,
    ) -> Result<String, RunError> {
        let prompt = fill(CODE_REVIEW_SKILL_TEMPLATE, &[("code_diff", code)]);
        let path = format!("{target_dir}/{SKILL_REVIEW_ARTIFACT}");
        let answer = self.ask_and_write(prompt, path, sink).await?;
        info!(dir = target_dir, "skill review written");
        Ok(answer)
    }

    /// Summary, review, lint, and smell stages, then a combined summary.
    pub async fn chain_of_thought<S: ResponseSink>(
        &self,
        code: &str,
        target_dir: &str,
        sink: &S,
    ) -> Result<ReviewOutcome, RunError> {
        let mut outcome = ReviewOutcome::default();

        for stage in ReviewStage::PIPELINE {
            let prompt = match stage_prompt(stage, code) {
                Some(prompt) => prompt,
                None => fill(
                    TOTAL_SUMMARY_TEMPLATE,
                    &[
                        (
                            "first_code_review",
                            outcome.text(ReviewStage::FirstCodeReview).unwrap_or_default(),
                        ),
                        (
                            "first_summary",
                            outcome.text(ReviewStage::FirstSummary).unwrap_or_default(),
                        ),
                        (
                            "code_diff",
                            outcome.text(ReviewStage::CodeSmell).unwrap_or_default(),
                        ),
                    ],
                ),
            };

            let path = format!("{target_dir}/{}", stage.artifact_name());
            let text = self.ask_and_write(prompt, path.clone(), sink).await?;
            debug!(%stage, %path, "stage complete");
            outcome.stages.push(StageResult { stage, path, text });
        }

        info!(dir = target_dir, stages = outcome.stages.len(), "chain-of-thought review written");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::box_embedder::test_support::KeywordEmbedder;
    use crate::llm::box_provider::test_support::ScriptedProvider;
    use crate::output::test_support::MemorySink;
    use coderag_types::config::PromptStyle;
    use coderag_types::retrieval::{RuleCategory, RuleDocument};

    fn runner(replies: &[&str]) -> SessionRunner<ScriptedProvider> {
        SessionRunner::new(ScriptedProvider::new(replies), "m", PromptStyle::Chat, 512)
    }

    #[test]
    fn test_review_dir_and_stage_prompts() {
        assert_eq!(review_dir("cot_chatgpt_code_diff", "3"), "cot_chatgpt_code_diff_3");
        let linter = stage_prompt(ReviewStage::Linter, "x = 1").unwrap();
        assert!(linter.contains("x = 1"));
        assert!(stage_prompt(ReviewStage::TotalSummary, "x").is_none());
    }

    #[tokio::test]
    async fn test_single_review_writes_artifact() {
        let runner = runner(&["looks fine"]);
        let sink = MemorySink::default();

        let answer = ReviewPipeline::new(&runner)
            .single("print(1)", "cot_copilot_only_code_1", &sink)
            .await
            .unwrap();
        assert_eq!(answer, "looks fine");
        assert_eq!(
            sink.get("cot_copilot_only_code_1/single_code_review_prompt_result.md")
                .as_deref(),
            Some("looks fine")
        );

        let sent = runner.provider().recorded();
        assert!(sent[0].system.is_none());
        assert!(sent[0].messages[0].content.contains("print(1)"));
    }

    #[tokio::test]
    async fn test_chain_of_thought_runs_every_stage() {
        let runner = runner(&["S-1", "R-1", "L-1", "C-1", "T-1"]);
        let sink = MemorySink::default();

        let outcome = ReviewPipeline::new(&runner)
            .chain_of_thought("def f(x=[]): pass", "cot_chatgpt_bad_data_1", &sink)
            .await
            .unwrap();

        assert_eq!(outcome.stages.len(), 5);
        assert_eq!(outcome.text(ReviewStage::Linter), Some("L-1"));
        assert_eq!(
            sink.get("cot_chatgpt_bad_data_1/total_summary_result.md").as_deref(),
            Some("T-1")
        );

        let sent = runner.provider().recorded();
        let total_prompt = &sent[4].messages[0].content;
        assert!(total_prompt.contains("First code review:\nR-1"));
        assert!(total_prompt.contains("First summary:\nS-1"));
        assert!(total_prompt.contains("Code smell analysis:\nC-1"));
        assert!(!total_prompt.contains("L-1"));
        assert!(!total_prompt.contains("def f(x=[])"));
    }

    #[tokio::test]
    async fn test_rag_prefixes_rules() {
        let retriever = RuleRetriever::build(
            BoxEmbedder::new(KeywordEmbedder::new(&["code", "lint"])),
            vec![RuleDocument {
                id: 0,
                category: RuleCategory::Readability,
                text: "Keep code tidy.".to_string(),
            }],
        )
        .await
        .unwrap();

        let runner = runner(&["ok"]);
        let sink = MemorySink::default();
        ReviewPipeline::new(&runner)
            .with_rag(&retriever, SearchOptions::default().with_threshold(0.1))
            .single("x", "dir", &sink)
            .await
            .unwrap();

        let sent = runner.provider().recorded();
        assert!(sent[0].messages[0].content.contains("- Keep code tidy."));
    }

    fn stage_rules() -> Vec<RuleDocument> {
        [
            "Rule A: summarize",
            "Rule B: first-pass",
            "Rule C: linter",
            "Rule D: detector",
            "Rule E: final review report",
        ]
        .iter()
        .enumerate()
        .map(|(id, text)| RuleDocument {
            id,
            category: RuleCategory::Readability,
            text: text.to_string(),
        })
        .collect()
    }

    #[tokio::test]
    async fn test_chain_of_thought_retrieves_rules_per_stage() {
        let retriever = RuleRetriever::build(
            BoxEmbedder::new(KeywordEmbedder::new(&[
                "summarize",
                "first-pass",
                "linter",
                "detector",
                "final review report",
            ])),
            stage_rules(),
        )
        .await
        .unwrap();

        // The smell answer mentions "detector" twice, so the filled total
        // summary matches rule D rather than the template's rule E.
        let runner = runner(&["S-1", "R-1", "L-1", "C-1 detector detector", "T-1"]);
        let sink = MemorySink::default();
        ReviewPipeline::new(&runner)
            .with_rag(&retriever, SearchOptions::top_k(1).with_threshold(0.1))
            .chain_of_thought("x = 1", "cot_chatgpt_code_diff_1", &sink)
            .await
            .unwrap();

        let sent = runner.provider().recorded();
        assert_eq!(sent.len(), 5);

        let expected = ["Rule A", "Rule B", "Rule C", "Rule D", "Rule D"];
        for (request, rule) in sent.iter().zip(expected) {
            let prompt = &request.messages[0].content;
            assert!(prompt.starts_with("Apply the following review rules"));
            let listed: Vec<&str> = prompt
                .lines()
                .filter(|l| l.starts_with("- Rule "))
                .collect();
            assert_eq!(listed.len(), 1, "one rule per stage: {listed:?}");
            assert!(listed[0].starts_with(&format!("- {rule}:")));
        }

        let total = &sent[4].messages[0].content;
        assert!(total.contains("Code smell analysis:\nC-1 detector detector"));
        assert!(!total.contains("- Rule E"));
    }

    #[tokio::test]
    async fn test_chain_of_thought_without_rag_sends_bare_prompts() {
        let runner = runner(&["S", "R", "L", "C", "T"]);
        let sink = MemorySink::default();
        ReviewPipeline::new(&runner)
            .chain_of_thought("x = 1", "dir", &sink)
            .await
            .unwrap();

        let sent = runner.provider().recorded();
        assert_eq!(
            sent[0].messages[0].content,
            stage_prompt(ReviewStage::FirstSummary, "x = 1").unwrap()
        );
        assert!(
            sent.iter()
                .all(|r| !r.messages[0].content.contains("Apply the following review rules"))
        );
    }

    #[tokio::test]
    async fn test_skill_review_writes_artifact() {
        let runner = runner(&["three sections"]);
        let sink = MemorySink::default();

        let answer = ReviewPipeline::new(&runner)
            .skill("- a\n+ b", "cot_copilot_code_diff_2", &sink)
            .await
            .unwrap();
        assert_eq!(answer, "three sections");
        assert_eq!(
            sink.get("cot_copilot_code_diff_2/code_review_skill_result.md")
                .as_deref(),
            Some("three sections")
        );

        let prompt = &runner.provider().recorded()[0].messages[0].content;
        assert!(prompt.contains("## Code diff\n- a\n+ b"));
        assert!(prompt.contains("**Summary**, **Linting Issues**, **Code Smells**"));
    }
}

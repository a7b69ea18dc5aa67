//! Sequential request runner.
//!
//! Every call is awaited before the next one starts. Output files are
//! numbered from 0 and named by the plan's prefix.

use std::time::Duration;

use coderag_types::config::{PromptStyle, ProviderSettings};
use coderag_types::error::RunError;
use coderag_types::llm::{CompletionRequest, LlmError};
use tracing::{Instrument, info, info_span, warn};

use crate::llm::provider::LlmProvider;
use crate::output::ResponseSink;
use crate::prompt::render_request;

/// What a repeated run sends and where its answers go.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub system: String,
    pub question: String,
    /// Second-turn system prompt (two-turn runs only).
    pub follow_up_system: String,
    /// Prepended to the first answer to form the second-turn question.
    pub follow_up_question: String,
    pub iterations: u32,
    /// File name prefix, usually the model family (e.g. `llama3`).
    pub prefix: String,
    pub pause: Duration,
}

impl RunPlan {
    /// `<prefix>_response_<i>.md`
    pub fn single_turn_path(&self, i: u32) -> String {
        format!("{}_response_{i}.md", self.prefix)
    }

    /// `<prefix>_response_<i>_<turn>.md`
    pub fn two_turn_path(&self, i: u32, turn: u8) -> String {
        format!("{}_response_{i}_{turn}.md", self.prefix)
    }
}

/// Sends prompts to one provider with fixed generation settings.
pub struct SessionRunner<P: LlmProvider> {
    provider: P,
    model: String,
    style: PromptStyle,
    max_tokens: u32,
    temperature: Option<f64>,
}

impl<P: LlmProvider> SessionRunner<P> {
    pub fn new(provider: P, model: impl Into<String>, style: PromptStyle, max_tokens: u32) -> Self {
        Self {
            provider,
            model: model.into(),
            style,
            max_tokens,
            temperature: None,
        }
    }

    pub fn from_settings(provider: P, settings: &ProviderSettings) -> Self {
        Self::new(
            provider,
            settings.model.clone(),
            settings.prompt_style,
            settings.max_tokens,
        )
        .with_temperature(settings.temperature)
    }

    pub fn with_temperature(mut self, temperature: Option<f64>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build the request a call to [`ask`](Self::ask) would send.
    pub fn build_request(&self, system: &str, user: &str) -> CompletionRequest {
        let (system, messages) = render_request(self.style, system, user);
        CompletionRequest {
            model: self.model.clone(),
            messages,
            system,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            stream: false,
            stop_sequences: None,
        }
    }

    /// One completion. Returns the answer text.
    pub async fn ask(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let request = self.build_request(system, user);

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.provider.name(),
            gen_ai.request.model = %request.model,
            gen_ai.request.max_tokens = request.max_tokens,
            gen_ai.request.temperature = ?request.temperature,
            gen_ai.request.stream = false,
        );

        let response = self.provider.complete(&request).instrument(span).await?;
        info!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            stop_reason = ?response.stop_reason,
            "completion finished"
        );
        Ok(response.content)
    }

    /// Ask the same question `iterations` times, one file per answer.
    pub async fn run_repeated<S: ResponseSink>(
        &self,
        plan: &RunPlan,
        sink: &S,
    ) -> Result<Vec<String>, RunError> {
        let mut written = Vec::with_capacity(plan.iterations as usize);
        for i in 0..plan.iterations {
            self.pause_before(plan, i).await;

            let answer = self.ask(&plan.system, &plan.question).await?;
            let path = plan.single_turn_path(i);
            write_answer(sink, &path, &answer).await?;
            info!(iteration = i, %path, "response written");
            written.push(path);
        }
        Ok(written)
    }

    /// Two turns per iteration: the second turn sees the first answer.
    pub async fn run_two_turn<S: ResponseSink>(
        &self,
        plan: &RunPlan,
        sink: &S,
    ) -> Result<Vec<String>, RunError> {
        let mut written = Vec::with_capacity(plan.iterations as usize * 2);
        for i in 0..plan.iterations {
            self.pause_before(plan, i).await;

            let first = self.ask(&plan.system, &plan.question).await?;
            let path = plan.two_turn_path(i, 1);
            write_answer(sink, &path, &first).await?;
            written.push(path);

            let follow_up = format!("{}{}", plan.follow_up_question, first);
            let second = self.ask(&plan.follow_up_system, &follow_up).await?;
            let path = plan.two_turn_path(i, 2);
            write_answer(sink, &path, &second).await?;
            written.push(path);

            info!(iteration = i, "two-turn exchange written");
        }
        Ok(written)
    }

    async fn pause_before(&self, plan: &RunPlan, i: u32) {
        if i > 0 && !plan.pause.is_zero() {
            tokio::time::sleep(plan.pause).await;
        }
    }
}

/// Write an answer through the sink. Empty answers still produce a file.
pub(crate) async fn write_answer<S: ResponseSink>(
    sink: &S,
    path: &str,
    content: &str,
) -> Result<(), RunError> {
    if content.trim().is_empty() {
        warn!(%path, "model returned an empty response");
    }
    sink.write(path, content)
        .await
        .map_err(|source| RunError::Write {
            path: path.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::box_provider::test_support::ScriptedProvider;
    use crate::output::test_support::MemorySink;

    fn plan(iterations: u32) -> RunPlan {
        RunPlan {
            system: "be a reviewer".to_string(),
            question: "review this".to_string(),
            follow_up_system: String::new(),
            follow_up_question: "Refine: ".to_string(),
            iterations,
            prefix: "llama3".to_string(),
            pause: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn test_ask_uses_chat_layout() {
        let runner = SessionRunner::new(
            ScriptedProvider::new(&["ok"]),
            "gpt-4o-mini",
            PromptStyle::Chat,
            256,
        );
        assert_eq!(runner.ask("sys", "hi").await.unwrap(), "ok");

        let sent = runner.provider().recorded();
        assert_eq!(sent[0].system.as_deref(), Some("sys"));
        assert_eq!(sent[0].max_tokens, 256);
        assert_eq!(sent[0].model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_run_repeated_numbers_files_from_zero() {
        let runner = SessionRunner::new(
            ScriptedProvider::new(&["a", "b", "c"]),
            "m",
            PromptStyle::UserOnly,
            64,
        );
        let sink = MemorySink::default();

        let written = runner.run_repeated(&plan(3), &sink).await.unwrap();
        assert_eq!(
            written,
            vec![
                "llama3_response_0.md",
                "llama3_response_1.md",
                "llama3_response_2.md"
            ]
        );
        assert_eq!(sink.get("llama3_response_2.md").as_deref(), Some("c"));
        assert!(runner.provider().recorded().iter().all(|r| r.system.is_none()));
    }

    #[tokio::test]
    async fn test_run_two_turn_feeds_first_answer_back() {
        let runner = SessionRunner::new(
            ScriptedProvider::new(&["first", "second"]),
            "m",
            PromptStyle::Chat,
            64,
        );
        let sink = MemorySink::default();

        runner.run_two_turn(&plan(1), &sink).await.unwrap();
        assert_eq!(sink.get("llama3_response_0_1.md").as_deref(), Some("first"));
        assert_eq!(sink.get("llama3_response_0_2.md").as_deref(), Some("second"));

        let sent = runner.provider().recorded();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].messages[0].content, "Refine: first");
        assert!(sent[1].system.is_none());
    }

    #[tokio::test]
    async fn test_default_follow_up_puts_answer_on_new_line() {
        use crate::prompt::templates::{FOLLOW_UP_QUESTION, FOLLOW_UP_SYSTEM_PROMPT};

        let runner = SessionRunner::new(
            ScriptedProvider::new(&["first", "second"]),
            "m",
            PromptStyle::Chat,
            64,
        );
        let plan = RunPlan {
            follow_up_system: FOLLOW_UP_SYSTEM_PROMPT.to_string(),
            follow_up_question: FOLLOW_UP_QUESTION.to_string(),
            ..plan(1)
        };
        runner.run_two_turn(&plan, &MemorySink::default()).await.unwrap();

        let sent = runner.provider().recorded();
        assert_eq!(sent[1].messages[0].content, "\nfirst");
        assert!(sent[1].system.is_none());
    }

    #[tokio::test]
    async fn test_empty_answer_still_written() {
        let runner = SessionRunner::new(
            ScriptedProvider::new(&[""]),
            "m",
            PromptStyle::Chat,
            64,
        );
        let sink = MemorySink::default();
        runner.run_repeated(&plan(1), &sink).await.unwrap();
        assert_eq!(sink.get("llama3_response_0.md").as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_provider_failure_stops_run() {
        let runner = SessionRunner::new(
            ScriptedProvider::new(&["only one"]),
            "m",
            PromptStyle::Chat,
            64,
        );
        let sink = MemorySink::default();
        let err = runner.run_repeated(&plan(2), &sink).await.unwrap_err();
        assert!(matches!(err, RunError::Llm(_)));
        assert_eq!(sink.paths(), vec!["llama3_response_0.md"]);
    }
}

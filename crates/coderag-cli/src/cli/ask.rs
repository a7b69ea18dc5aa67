//! `coderag ask`: answer a question from the retrieved rules.

use std::io::Write;

use anyhow::{Context, Result, bail};
use console::style;
use futures_util::StreamExt;
use tracing::Instrument;
use tracing::field::Empty;

use coderag_core::llm::box_provider::BoxLlmProvider;
use coderag_core::prompt::rag_qa_prompt;
use coderag_core::session::SessionRunner;
use coderag_observe::genai_attrs;
use coderag_types::llm::StreamEvent;
use coderag_types::retrieval::SearchOptions;

use crate::cli::search::print_hits;
use crate::state::AppState;

pub async fn run(
    state: &AppState,
    query: &str,
    k: Option<usize>,
    threshold: Option<f32>,
    stream: bool,
    json: bool,
) -> Result<()> {
    let retriever = state.retriever().await?;
    let runner = state.runner()?;

    let mut options = SearchOptions::top_k(k.unwrap_or(state.config.retrieval.top_k));
    let threshold = threshold.or(state.config.retrieval.threshold);
    if let Some(t) = threshold {
        options = options.with_threshold(t);
    }

    let retrieval = retriever.search(query, options).await?;
    tracing::info!(hits = retrieval.scored.len(), "rules retrieved for question");
    let prompt = rag_qa_prompt(&retrieval.docs, query);

    if threshold.is_some() && !json {
        print_hits(query, &retrieval);
    }

    if stream && !json {
        println!("  {}", style("Answer").bold());
        println!();
        stream_answer(&runner, &prompt).await?;
        return Ok(());
    }

    let answer = runner.ask("", &prompt).await?;

    if json {
        let out = serde_json::json!({
            "query": query,
            "docs": retrieval.scored,
            "answer": answer,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("  {}", style("Answer").bold());
        println!();
        println!("{answer}");
        println!();
    }
    Ok(())
}

/// Print text deltas as they arrive; usage lands on the span.
async fn stream_answer(runner: &SessionRunner<BoxLlmProvider>, prompt: &str) -> Result<()> {
    let provider = runner.provider();
    if !provider.capabilities().streaming {
        bail!("provider '{}' does not support streaming", provider.name());
    }

    let mut request = runner.build_request("", prompt);
    request.stream = true;

    let span = tracing::info_span!(
        "gen_ai.stream",
        gen_ai.system = provider.name(),
        gen_ai.request.model = %request.model,
        gen_ai.request.max_tokens = request.max_tokens,
        gen_ai.request.stream = true,
        gen_ai.usage.input_tokens = Empty,
        gen_ai.usage.output_tokens = Empty,
        gen_ai.response.finish_reason = Empty,
    );

    let mut events = provider.stream(request);
    let mut stdout = std::io::stdout();

    async {
        while let Some(event) = events.next().await {
            match event? {
                StreamEvent::TextDelta { text } => {
                    write!(stdout, "{text}").context("failed to write to stdout")?;
                    stdout.flush().context("failed to flush stdout")?;
                }
                StreamEvent::Usage(usage) => {
                    let span = tracing::Span::current();
                    span.record(genai_attrs::GEN_AI_USAGE_INPUT_TOKENS, usage.input_tokens);
                    span.record(genai_attrs::GEN_AI_USAGE_OUTPUT_TOKENS, usage.output_tokens);
                }
                StreamEvent::MessageDelta { stop_reason } => {
                    tracing::Span::current().record(
                        genai_attrs::GEN_AI_RESPONSE_FINISH_REASON,
                        tracing::field::debug(&stop_reason),
                    );
                }
                StreamEvent::Connected | StreamEvent::Done => {}
            }
        }
        println!();
        println!();
        anyhow::Ok(())
    }
    .instrument(span)
    .await
}

//! OpenAI SSE stream to [`StreamEvent`] adapter.

use std::pin::Pin;

use async_openai::types::chat::ChatCompletionResponseStream;
use futures_util::{Stream, StreamExt};

use coderag_types::llm::{LlmError, StreamEvent, Usage};

use super::map_finish_reason;

/// Map an async-openai [`ChatCompletionResponseStream`] to [`StreamEvent`]s.
///
/// Emission order: `Connected`, then `TextDelta` per non-empty chunk,
/// `MessageDelta` when a finish reason arrives, `Usage` from the final
/// usage-only chunk (needs `stream_options.include_usage`), and `Done`.
pub fn map_openai_stream(
    stream: ChatCompletionResponseStream,
) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>> {
    Box::pin(async_stream::try_stream! {
        yield StreamEvent::Connected;

        let mut stream = stream;
        while let Some(result) = stream.next().await {
            let chunk = result.map_err(|e| LlmError::Stream(e.to_string()))?;

            if let Some(usage) = chunk.usage.as_ref() {
                yield StreamEvent::Usage(Usage {
                    input_tokens: usage.prompt_tokens,
                    output_tokens: usage.completion_tokens,
                });
            }

            for choice in &chunk.choices {
                if let Some(text) = choice.delta.content.clone() {
                    if !text.is_empty() {
                        yield StreamEvent::TextDelta { text };
                    }
                }

                if let Some(reason) = choice.finish_reason.as_ref() {
                    yield StreamEvent::MessageDelta {
                        stop_reason: map_finish_reason(reason),
                    };
                }
            }
        }

        yield StreamEvent::Done;
    })
}

//! OpenTelemetry GenAI semantic-convention attribute names.
//!
//! `tracing` macros need literal field names, so spans spell these out
//! inline; the constants are for `Span::record` and for consumers that
//! filter exported spans.

/// Span name for a single chat completion.
pub const SPAN_COMPLETE: &str = "gen_ai.complete";

/// Span name for a streamed chat completion.
pub const SPAN_STREAM: &str = "gen_ai.stream";

/// The provider name (e.g., "openai", "vllm").
pub const GEN_AI_SYSTEM: &str = "gen_ai.system";

pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

pub const GEN_AI_REQUEST_MAX_TOKENS: &str = "gen_ai.request.max_tokens";

pub const GEN_AI_REQUEST_TEMPERATURE: &str = "gen_ai.request.temperature";

pub const GEN_AI_REQUEST_STREAM: &str = "gen_ai.request.stream";

/// Input tokens reported by the provider.
pub const GEN_AI_USAGE_INPUT_TOKENS: &str = "gen_ai.usage.input_tokens";

/// Output tokens reported by the provider.
pub const GEN_AI_USAGE_OUTPUT_TOKENS: &str = "gen_ai.usage.output_tokens";

/// Why generation stopped (e.g., "end_turn", "max_tokens").
pub const GEN_AI_RESPONSE_FINISH_REASON: &str = "gen_ai.response.finish_reason";

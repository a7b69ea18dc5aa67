//! Code review over fixture files: single-prompt and chain-of-thought
//! pipelines, plus judge prompt assembly from their artifacts.

pub mod judge;
pub mod pipeline;

pub use judge::{JudgeArtifacts, build_judge_prompt};
pub use pipeline::{ReviewOutcome, ReviewPipeline, StageResult, review_dir, stage_prompt};

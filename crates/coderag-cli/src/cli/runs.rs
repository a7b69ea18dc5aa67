//! `coderag quickstart` and `coderag multi`: repeated review sessions over
//! the sample pull request.

use std::time::Duration;

use anyhow::Result;
use console::style;

use coderag_core::prompt::templates::{
    FOLLOW_UP_QUESTION, FOLLOW_UP_SYSTEM_PROMPT, REVIEWER_SYSTEM_PROMPT, SAMPLE_PR_QUESTION,
};
use coderag_core::session::RunPlan;

use crate::state::AppState;

/// Single question or question plus follow-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunKind {
    SingleTurn,
    TwoTurn,
}

fn build_plan(state: &AppState, iterations: Option<u32>, prefix: String) -> RunPlan {
    RunPlan {
        system: REVIEWER_SYSTEM_PROMPT.to_string(),
        question: SAMPLE_PR_QUESTION.to_string(),
        follow_up_system: FOLLOW_UP_SYSTEM_PROMPT.to_string(),
        follow_up_question: FOLLOW_UP_QUESTION.to_string(),
        iterations: iterations.unwrap_or(state.config.runs.iterations),
        prefix,
        pause: Duration::from_millis(state.config.runs.pause_ms),
    }
}

pub async fn run(
    state: &AppState,
    kind: RunKind,
    iterations: Option<u32>,
    prefix: String,
    json: bool,
) -> Result<()> {
    let runner = state.runner()?;
    let sink = state.sink();
    let plan = build_plan(state, iterations, prefix);

    tracing::info!(
        iterations = plan.iterations,
        prefix = %plan.prefix,
        model = runner.model(),
        "starting repeated run"
    );

    let written = match kind {
        RunKind::SingleTurn => runner.run_repeated(&plan, &sink).await?,
        RunKind::TwoTurn => runner.run_two_turn(&plan, &sink).await?,
    };

    if json {
        let out = serde_json::json!({
            "output_dir": sink.root(),
            "files": written,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Wrote {} response file(s) to {}",
        style("✓").green().bold(),
        written.len(),
        style(sink.root().display()).cyan()
    );
    for path in &written {
        println!("    {}", style(path).dim());
    }
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use coderag_types::config::AppConfig;
    use std::path::PathBuf;

    #[test]
    fn test_build_plan_uses_config_defaults() {
        let state = AppState {
            config: AppConfig::default(),
            config_path: PathBuf::from("coderag.toml"),
        };
        let plan = build_plan(&state, None, "llama3".to_string());
        assert_eq!(plan.iterations, 10);
        assert_eq!(plan.pause, Duration::from_millis(2000));
        assert_eq!(plan.single_turn_path(3), "llama3_response_3.md");

        let plan = build_plan(&state, Some(1), "qwen".to_string());
        assert_eq!(plan.iterations, 1);
        assert!(plan.question.contains("diff"));
    }
}

//! `coderag judge`: assemble the judge prompt for each review folder.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;

use coderag_core::output::ResponseSink;
use coderag_core::review::build_judge_prompt;
use coderag_infra::fixtures::{find_review_dirs, read_judge_artifacts};
use coderag_infra::output::MarkdownSink;
use coderag_types::review::JUDGE_ARTIFACT;

use crate::state::AppState;

#[derive(Serialize)]
struct JudgedFolder {
    folder: PathBuf,
    missing: Vec<String>,
}

async fn judge_folder(dir: &Path) -> Result<JudgedFolder> {
    let artifacts = read_judge_artifacts(dir)
        .await
        .with_context(|| format!("failed to read artifacts in {}", dir.display()))?;
    let prompt = build_judge_prompt(&artifacts);

    MarkdownSink::new(dir)
        .write(JUDGE_ARTIFACT, &prompt)
        .await
        .with_context(|| format!("failed to write {JUDGE_ARTIFACT} in {}", dir.display()))?;

    Ok(JudgedFolder {
        folder: dir.to_path_buf(),
        missing: artifacts
            .missing()
            .iter()
            .map(|s| s.artifact_name())
            .collect(),
    })
}

pub async fn run(state: &AppState, root: Option<PathBuf>, json: bool) -> Result<()> {
    let root = root.unwrap_or_else(|| state.config.runs.output_dir.clone());
    let dirs = find_review_dirs(&root)
        .await
        .with_context(|| format!("failed to scan {}", root.display()))?;

    let mut judged = Vec::with_capacity(dirs.len());
    for dir in &dirs {
        judged.push(judge_folder(dir).await?);
    }
    tracing::info!(folders = judged.len(), "judge prompts written");

    if json {
        println!("{}", serde_json::to_string_pretty(&judged)?);
        return Ok(());
    }

    println!();
    if judged.is_empty() {
        println!(
            "  {} No cot* folders under {}.",
            style("i").blue().bold(),
            style(root.display()).cyan()
        );
        println!();
        return Ok(());
    }

    for folder in &judged {
        let mark = if folder.missing.is_empty() {
            style("✓").green().bold()
        } else {
            style("!").yellow().bold()
        };
        println!("  {mark} {}", folder.folder.display());
        for missing in &folder.missing {
            println!("      {} {}", style("missing").yellow(), style(missing).dim());
        }
    }
    println!();
    Ok(())
}

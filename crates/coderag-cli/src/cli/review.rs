//! `coderag review`: batch review over fixture sets.
//!
//! Every fixture file gets its own output folder named
//! `cot_<origin>_<kind>_<stem>` under the output directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use coderag_core::review::{ReviewPipeline, review_dir};
use coderag_infra::fixtures::{discover, fixture_dir};
use coderag_types::review::{FixtureKind, FixtureOrigin, FixtureSet, ReviewMode};

use crate::state::AppState;

#[derive(Args)]
pub struct ReviewArgs {
    /// Fixture root holding `<kind>/<language>/<origin>/` directories.
    pub root: PathBuf,

    /// `single` (one prompt), `cot` (staged chain of thought) or `skill`
    /// (three-section review skill).
    #[arg(long, default_value = "single", value_parser = parse_mode)]
    pub mode: ReviewMode,

    /// Prefix each prompt with retrieved review rules.
    #[arg(long)]
    pub rag: bool,

    /// Rule similarity floor for `--rag` (overrides `[retrieval] threshold`,
    /// 0.7 when neither is set).
    #[arg(long, requires = "rag")]
    pub threshold: Option<f32>,

    /// Fixture origins to review (repeatable; default: all).
    #[arg(long, value_parser = parse_origin)]
    pub origin: Vec<FixtureOrigin>,

    /// Fixture kinds to review (repeatable; default: all).
    #[arg(long, value_parser = parse_kind)]
    pub kind: Vec<FixtureKind>,

    /// Language directory under each kind.
    #[arg(long, default_value = "Python")]
    pub language: String,

    /// Output directory (defaults to `[runs] output_dir`).
    #[arg(long)]
    pub out: Option<PathBuf>,
}

fn parse_mode(s: &str) -> Result<ReviewMode, String> {
    s.parse()
}

fn parse_origin(s: &str) -> Result<FixtureOrigin, String> {
    s.parse()
}

fn parse_kind(s: &str) -> Result<FixtureKind, String> {
    s.parse()
}

/// Cartesian product of the selected origins and kinds (all when empty).
fn selected_sets(args: &ReviewArgs) -> Vec<FixtureSet> {
    let origins: &[FixtureOrigin] = if args.origin.is_empty() {
        &FixtureOrigin::ALL
    } else {
        &args.origin
    };
    let kinds: &[FixtureKind] = if args.kind.is_empty() {
        &FixtureKind::ALL
    } else {
        &args.kind
    };

    origins
        .iter()
        .flat_map(|&origin| {
            kinds
                .iter()
                .map(move |&kind| FixtureSet::new(origin, kind, args.language.clone()))
        })
        .collect()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[derive(Serialize)]
struct ReviewedFile {
    source: PathBuf,
    folder: String,
    artifacts: Vec<String>,
}

pub async fn run(state: &AppState, args: ReviewArgs, json: bool, quiet: bool) -> Result<()> {
    let runner = state.runner()?;
    let sink = match args.out.as_deref() {
        Some(out) => coderag_infra::output::MarkdownSink::new(out),
        None => state.sink(),
    };

    let retriever = if args.rag {
        Some(state.retriever().await?)
    } else {
        None
    };
    let mut pipeline = ReviewPipeline::new(&runner);
    if let Some(retriever) = retriever.as_ref() {
        let options = state.config.retrieval.rule_options(args.threshold);
        pipeline = pipeline.with_rag(retriever, options);
    }

    let mut jobs: Vec<(FixtureSet, PathBuf)> = Vec::new();
    for set in selected_sets(&args) {
        match discover(&args.root, &set).await {
            Ok(files) => jobs.extend(files.into_iter().map(|f| (set.clone(), f))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    dir = %fixture_dir(&args.root, &set).display(),
                    "fixture directory not found, skipping"
                );
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to list {}", fixture_dir(&args.root, &set).display())
                });
            }
        }
    }

    let progress = if json || quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(jobs.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .context("invalid progress template")?
                .progress_chars("=> "),
        );
        bar
    };

    let mut reviewed = Vec::with_capacity(jobs.len());
    for (set, path) in jobs {
        let stem = file_stem(&path);
        let folder = review_dir(&set.folder_prefix(), &stem);
        progress.set_message(folder.clone());

        let code = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;

        let artifacts = match args.mode {
            ReviewMode::Single => {
                pipeline.single(&code, &folder, &sink).await?;
                vec![format!(
                    "{folder}/{}",
                    coderag_types::review::SINGLE_REVIEW_ARTIFACT
                )]
            }
            ReviewMode::Skill => {
                pipeline.skill(&code, &folder, &sink).await?;
                vec![format!(
                    "{folder}/{}",
                    coderag_types::review::SKILL_REVIEW_ARTIFACT
                )]
            }
            ReviewMode::ChainOfThought => pipeline
                .chain_of_thought(&code, &folder, &sink)
                .await?
                .stages
                .into_iter()
                .map(|s| s.path)
                .collect(),
        };

        reviewed.push(ReviewedFile {
            source: path,
            folder,
            artifacts,
        });
        progress.inc(1);
    }
    progress.finish_and_clear();

    if json {
        println!("{}", serde_json::to_string_pretty(&reviewed)?);
        return Ok(());
    }

    println!();
    if reviewed.is_empty() {
        println!(
            "  {} No fixture files found under {}.",
            style("i").blue().bold(),
            style(args.root.display()).cyan()
        );
    } else {
        println!(
            "  {} Reviewed {} file(s) into {}",
            style("✓").green().bold(),
            reviewed.len(),
            style(sink.root().display()).cyan()
        );
    }
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(origin: Vec<FixtureOrigin>, kind: Vec<FixtureKind>) -> ReviewArgs {
        ReviewArgs {
            root: PathBuf::from("datas"),
            mode: ReviewMode::Single,
            rag: false,
            threshold: None,
            origin,
            kind,
            language: "Python".to_string(),
            out: None,
        }
    }

    #[test]
    fn test_selected_sets_defaults_to_all() {
        let sets = selected_sets(&args(Vec::new(), Vec::new()));
        assert_eq!(sets.len(), 6);
        assert_eq!(sets[0].folder_prefix(), "cot_chatgpt_bad_data");
    }

    #[test]
    fn test_selected_sets_filters() {
        let sets = selected_sets(&args(
            vec![FixtureOrigin::Copilot],
            vec![FixtureKind::CodeDiff, FixtureKind::OnlyCode],
        ));
        let prefixes: Vec<String> = sets.iter().map(FixtureSet::folder_prefix).collect();
        assert_eq!(prefixes, vec!["cot_copilot_code_diff", "cot_copilot_only_code"]);
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem(Path::new("datas/only_code/Python/ChatGPT/11.py")), "11");
    }
}

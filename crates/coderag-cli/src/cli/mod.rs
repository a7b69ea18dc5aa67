//! CLI command definitions for the `coderag` binary.
//!
//! Uses clap derive macros for argument parsing. Each subcommand lives in
//! its own module with a `run` entry point.

pub mod ask;
pub mod dataset;
pub mod judge;
pub mod provider;
pub mod review;
pub mod runs;
pub mod search;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use coderag_infra::config::DEFAULT_CONFIG_FILE;

/// Retrieval-augmented code review with OpenAI-compatible LLMs.
#[derive(Parser)]
#[command(name = "coderag", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true, env = "CODERAG_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout via OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank the review rules against a query.
    Search {
        query: String,

        /// Number of nearest rules to return.
        #[arg(short, long)]
        k: Option<usize>,

        /// Drop rules scoring below this similarity.
        #[arg(short, long)]
        threshold: Option<f32>,
    },

    /// Answer a question from the retrieved rules.
    Ask {
        query: String,

        /// Number of rules to retrieve.
        #[arg(short, long)]
        k: Option<usize>,

        /// Only use rules scoring at least this similarity.
        #[arg(short, long)]
        threshold: Option<f32>,

        /// Print the answer as it is generated.
        #[arg(long)]
        stream: bool,
    },

    /// Ask the sample pull-request review question repeatedly.
    Quickstart {
        /// Number of runs (defaults to `[runs] iterations`).
        #[arg(short = 'n', long)]
        iterations: Option<u32>,

        /// Output file prefix.
        #[arg(long, default_value = "quickstart")]
        prefix: String,
    },

    /// Two-turn review: the second turn refines the first answer.
    Multi {
        #[arg(short = 'n', long)]
        iterations: Option<u32>,

        #[arg(long, default_value = "multi")]
        prefix: String,
    },

    /// Review every fixture file and write one folder per file.
    Review(review::ReviewArgs),

    /// Build the judge prompt in every `cot*` folder under a root.
    Judge {
        /// Directory to scan (defaults to `[runs] output_dir`).
        root: Option<PathBuf>,
    },

    /// Inspect fine-tuning inputs.
    Dataset {
        #[command(subcommand)]
        action: dataset::DatasetCommand,
    },

    /// Inspect and test the configured chat provider.
    Provider {
        #[command(subcommand)]
        action: provider::ProviderCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_review_args() {
        let cli = Cli::try_parse_from([
            "coderag", "review", "datas", "--mode", "cot", "--rag", "--origin", "copilot",
            "--kind", "only_code", "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Review(args) => {
                assert!(args.rag);
                assert_eq!(args.origin.len(), 1);
                assert_eq!(args.language, "Python");
            }
            _ => panic!("expected review"),
        }
    }

    #[test]
    fn test_parse_review_skill_mode() {
        let cli = Cli::try_parse_from(["coderag", "review", "datas", "--mode", "skill"]).unwrap();
        match cli.command {
            Commands::Review(args) => {
                assert_eq!(args.mode, coderag_types::review::ReviewMode::Skill);
                assert!(!args.rag);
            }
            _ => panic!("expected review"),
        }
    }

    #[test]
    fn test_parse_search_defaults() {
        let cli = Cli::try_parse_from(["coderag", "search", "global state", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
        match cli.command {
            Commands::Search { k, threshold, .. } => {
                assert!(k.is_none());
                assert!(threshold.is_none());
            }
            _ => panic!("expected search"),
        }
    }
}

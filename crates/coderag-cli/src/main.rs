//! coderag CLI entry point.
//!
//! Binary name: `coderag`
//!
//! Parses CLI arguments, sets up tracing, loads configuration, then
//! dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use cli::runs::RunKind;
use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,coderag=debug",
        _ => "trace",
    };

    if cli.otel {
        coderag_observe::init_tracing(filter, true)
            .map_err(|e| anyhow::anyhow!("failed to initialise tracing: {e}"))?;
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "coderag", &mut std::io::stdout());
        return Ok(());
    }

    let result = dispatch(cli).await;
    coderag_observe::shutdown_tracing();
    result
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let json = cli.json;
    let command = match cli.command {
        // Dataset commands only read the environment
        Commands::Dataset { action } => return cli::dataset::handle(action, json).await,
        Commands::Completions { .. } => return Ok(()),
        command => command,
    };

    let state = AppState::load(&cli.config).await?;

    match command {
        Commands::Search {
            query,
            k,
            threshold,
        } => cli::search::run(&state, &query, k, threshold, json).await,

        Commands::Ask {
            query,
            k,
            threshold,
            stream,
        } => cli::ask::run(&state, &query, k, threshold, stream, json).await,

        Commands::Quickstart { iterations, prefix } => {
            cli::runs::run(&state, RunKind::SingleTurn, iterations, prefix, json).await
        }

        Commands::Multi { iterations, prefix } => {
            cli::runs::run(&state, RunKind::TwoTurn, iterations, prefix, json).await
        }

        Commands::Review(args) => cli::review::run(&state, args, json, cli.quiet).await,

        Commands::Judge { root } => cli::judge::run(&state, root, json).await,

        Commands::Provider { action } => cli::provider::handle(action, &state, json).await,

        Commands::Dataset { .. } | Commands::Completions { .. } => Ok(()),
    }
}

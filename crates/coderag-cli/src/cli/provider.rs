//! `coderag provider`: inspect and test chat providers.

use anyhow::{Context, Result, anyhow};
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use coderag_infra::llm::test_provider_connection;

use crate::state::AppState;

#[derive(Subcommand)]
pub enum ProviderCommand {
    /// List available providers and their capabilities.
    List,

    /// Send a minimal completion to verify connectivity.
    Test {
        /// Provider to test (defaults to the configured one).
        #[arg(long)]
        name: Option<String>,
    },
}

pub async fn handle(cmd: ProviderCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        ProviderCommand::List => list(state, json),
        ProviderCommand::Test { name } => test(state, name, json).await,
    }
}

fn list(state: &AppState, json: bool) -> Result<()> {
    let registry = state.registry()?;
    let configured = state.config.provider.name.as_str();
    let configured_missing = registry.get(configured).is_none();

    if json {
        let mut entries: Vec<serde_json::Value> = registry
            .list_names()
            .into_iter()
            .filter_map(|name| registry.get(name).map(|p| (name, p)))
            .map(|(name, p)| {
                serde_json::json!({
                    "name": name,
                    "configured": name == configured,
                    "available": true,
                    "capabilities": p.capabilities(),
                })
            })
            .collect();
        if configured_missing {
            entries.push(serde_json::json!({
                "name": configured,
                "configured": true,
                "available": false,
            }));
        }
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Provider").fg(Color::White),
        Cell::new("Configured").fg(Color::White),
        Cell::new("Streaming").fg(Color::White),
        Cell::new("Context").fg(Color::White),
        Cell::new("Max Output").fg(Color::White),
    ]);

    for name in registry.list_names() {
        let Some(provider) = registry.get(name) else {
            continue;
        };
        let caps = provider.capabilities();
        let configured_cell = if name == configured {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("-")
        };
        table.add_row(vec![
            Cell::new(name),
            configured_cell,
            Cell::new(if caps.streaming { "yes" } else { "no" }),
            Cell::new(caps.max_context_tokens),
            Cell::new(caps.max_output_tokens),
        ]);
    }
    if configured_missing {
        table.add_row(vec![
            Cell::new(configured),
            Cell::new("unavailable").fg(Color::Red),
            Cell::new("-"),
            Cell::new("-"),
            Cell::new("-"),
        ]);
    }

    println!();
    println!(
        "  {} {}",
        style("Config:").dim(),
        style(state.config_path.display()).cyan()
    );
    println!();
    println!("{table}");
    println!();
    Ok(())
}

async fn test(state: &AppState, name: Option<String>, json: bool) -> Result<()> {
    let mut registry = state.registry()?;
    let name = name.unwrap_or_else(|| state.config.provider.name.clone());
    let provider = match registry.take(&name) {
        Some(provider) => provider,
        // Rebuild to surface why the configured provider was skipped.
        None if name == state.config.provider.name => state.provider()?,
        None => return Err(anyhow!("unknown provider '{name}'")),
    };

    let spinner = if json {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .context("invalid spinner template")?,
        );
        spinner.set_message(format!("Testing {name}..."));
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        spinner
    };

    let result = test_provider_connection(&provider).await;
    spinner.finish_and_clear();

    if json {
        let out = serde_json::json!({
            "name": name,
            "ok": result.is_ok(),
            "error": result.as_ref().err().map(ToString::to_string),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    match result {
        Ok(()) => {
            println!(
                "  {} {} responded",
                style("✓").green().bold(),
                style(&name).cyan()
            );
            Ok(())
        }
        Err(err) => {
            println!("  {} {} failed: {err}", style("✗").red().bold(), style(&name).cyan());
            Err(err).with_context(|| format!("provider '{name}' connection test failed"))
        }
    }
}

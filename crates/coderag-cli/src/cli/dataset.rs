//! `coderag dataset`: validate fine-tuning inputs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use coderag_infra::training::{format_example, load_dataset, plan_from_env};
use coderag_types::training::TrainingPlan;

#[derive(Subcommand)]
pub enum DatasetCommand {
    /// Validate a JSONL dataset and summarise it.
    Check {
        /// Dataset path (defaults to `$DATA_PATH` or `data.jsonl`).
        path: Option<PathBuf>,

        /// Print the first N formatted examples.
        #[arg(long, default_value = "0")]
        preview: usize,
    },

    /// Print the LoRA training plan resolved from the environment.
    Plan,
}

pub async fn handle(cmd: DatasetCommand, json: bool) -> Result<()> {
    let plan = plan_from_env().context("invalid training environment")?;
    match cmd {
        DatasetCommand::Check { path, preview } => {
            check(&plan, path.unwrap_or_else(|| plan.data_path.clone()), preview, json).await
        }
        DatasetCommand::Plan => show_plan(&plan, json),
    }
}

async fn check(plan: &TrainingPlan, path: PathBuf, preview: usize, json: bool) -> Result<()> {
    let examples = load_dataset(&path).await?;

    if json {
        let out = serde_json::json!({
            "path": path,
            "examples": examples.len(),
            "effective_batch_size": plan.effective_batch_size(),
            "preview": examples.iter().take(preview).map(format_example).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {} valid example(s) in {}",
        style("✓").green().bold(),
        examples.len(),
        style(path.display()).cyan()
    );
    println!(
        "  {} {} optimizer step(s) per epoch at effective batch {}",
        style("i").blue().bold(),
        plan.steps_per_epoch(examples.len()),
        plan.effective_batch_size()
    );

    for (i, example) in examples.iter().take(preview).enumerate() {
        println!();
        println!("  {}", style(format!("Example {}", i + 1)).bold());
        println!("{}", format_example(example));
    }
    println!();
    Ok(())
}

fn show_plan(plan: &TrainingPlan, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(plan)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Setting").fg(Color::White),
        Cell::new("Value").fg(Color::White),
    ]);

    let rows: Vec<(&str, String)> = vec![
        ("model", plan.model_name.clone()),
        ("data", plan.data_path.display().to_string()),
        ("output", plan.output_dir.display().to_string()),
        ("seq_len", plan.seq_len.to_string()),
        ("micro_batch_size", plan.micro_batch_size.to_string()),
        ("grad_accum_steps", plan.gradient_accumulation_steps.to_string()),
        ("effective_batch", plan.effective_batch_size().to_string()),
        ("epochs", plan.num_epochs.to_string()),
        ("learning_rate", plan.learning_rate.to_string()),
        ("warmup_ratio", plan.warmup_ratio.to_string()),
        ("weight_decay", plan.weight_decay.to_string()),
        ("lora_r", plan.lora.r.to_string()),
        ("lora_alpha", plan.lora.alpha.to_string()),
        ("lora_dropout", plan.lora.dropout.to_string()),
        ("target_modules", plan.lora.target_modules.join(", ")),
    ];
    for (key, value) in rows {
        table.add_row(vec![Cell::new(key).fg(Color::Cyan), Cell::new(value)]);
    }

    println!();
    println!("  {}", style("LoRA training plan").bold());
    println!();
    println!("{table}");
    println!();
    Ok(())
}

//! `coderag search`: rank the review rules against a query.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use coderag_types::retrieval::{Retrieval, SearchOptions};

use crate::state::AppState;

pub async fn run(
    state: &AppState,
    query: &str,
    k: Option<usize>,
    threshold: Option<f32>,
    json: bool,
) -> Result<()> {
    let retriever = state.retriever().await?;

    let mut options = SearchOptions::top_k(k.unwrap_or(state.config.retrieval.top_k));
    if let Some(t) = threshold.or(state.config.retrieval.threshold) {
        options = options.with_threshold(t);
    }

    let retrieval = retriever.search(query, options).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&retrieval.scored)?);
        return Ok(());
    }

    print_hits(query, &retrieval);
    Ok(())
}

/// Styled table of scored rules. Shared with `ask`.
pub fn print_hits(query: &str, retrieval: &Retrieval) {
    println!();
    println!(
        "  {} Rules matching {}",
        style("🔍").bold(),
        style(format!("\"{query}\"")).cyan()
    );
    println!();

    if retrieval.is_empty() {
        println!(
            "  {} No rules passed the threshold.",
            style("i").blue().bold()
        );
        println!();
        return;
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Rank").fg(Color::White),
        Cell::new("Score").fg(Color::White),
        Cell::new("Rule").fg(Color::White),
    ]);

    for (rank, hit) in retrieval.scored.iter().enumerate() {
        let score_color = if hit.score >= 0.7 {
            Color::Green
        } else if hit.score >= 0.5 {
            Color::Yellow
        } else {
            Color::DarkGrey
        };
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(format!("{:.4}", hit.score)).fg(score_color),
            Cell::new(&hit.text),
        ]);
    }

    println!("{table}");
    println!();
}

//! Crosstab command - two-way totals for heatmaps.

use std::path::PathBuf;

use colored::Colorize;
use serde_json::json;

use super::{CommandResult, Context, describe_filters, print_json, resolve_measure};
use crate::cli::FilterArgs;

pub fn run(
    ctx: &Context,
    file: PathBuf,
    rows: String,
    cols: String,
    value: Option<String>,
    keep_unknown: bool,
    filters: FilterArgs,
) -> CommandResult {
    let dashboard = ctx.load(&file)?;
    for name in [&rows, &cols] {
        if !dashboard.dataset().has_field(name) {
            return Err(format!("Unknown field: {}", name).into());
        }
    }
    let measure = resolve_measure(&dashboard, value)?;
    let state = filters.to_state();

    let mut table = dashboard
        .view(&state)
        .crosstab(&rows, &cols, measure.as_deref());
    if !keep_unknown {
        table = table.without_unknown();
    }

    if ctx.json {
        return print_json(&json!({
            "rows_field": rows,
            "columns_field": cols,
            "measure": measure,
            "filters": state,
            "table": table,
        }));
    }

    println!(
        "{} {} by {} x {} ({})",
        "Crosstab:".cyan().bold(),
        measure.as_deref().unwrap_or("row count").white(),
        rows.white(),
        cols.white(),
        describe_filters(&state)
    );
    println!();

    if table.is_empty() {
        println!("  {}", "No matching rows".dimmed());
        return Ok(());
    }

    let label_width = table.rows.iter().map(String::len).max().unwrap_or(0).max(4);
    let cell_width = table
        .columns
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max(10);

    print!("  {:label_width$}", "");
    for column in &table.columns {
        print!(" {}", format!("{:>cell_width$}", column).bold());
    }
    println!();

    let max = table.max_value();
    for (row, cells) in table.rows.iter().zip(&table.cells) {
        print!("  {:label_width$}", row);
        for value in cells {
            let text = format!("{:>cell_width$.0}", value);
            let shaded = if *value <= 0.0 {
                text.dimmed()
            } else if *value >= max * 0.5 {
                text.red()
            } else {
                text.yellow()
            };
            print!(" {}", shaded);
        }
        println!();
    }

    Ok(())
}
